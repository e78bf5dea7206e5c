use core::alloc::Layout;
use core::any::{Any, TypeId};

use crate::info::{PrimitiveKind, TypeGuid};

/// Descriptor of a scalar type such as `u32`, `f32`, `bool` or `String`.
#[derive(Debug, Clone)]
pub struct PrimitiveDescriptor {
    kind: PrimitiveKind,
    guid: TypeGuid,
    type_id: TypeId,
    layout: Layout,
}

impl PrimitiveDescriptor {
    /// Describes `T` as a primitive of the given kind.
    ///
    /// The codecs downcast values to the Rust type matching `kind`,
    /// so `T` must be that exact type.
    pub fn new<T: Any>(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            guid: TypeGuid::from_name(kind.name()),
            type_id: TypeId::of::<T>(),
            layout: Layout::new::<T>(),
        }
    }

    #[inline]
    pub const fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    #[inline]
    pub const fn guid(&self) -> TypeGuid {
        self.guid
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub const fn layout(&self) -> Layout {
        self.layout
    }
}
