use core::alloc::Layout;
use core::any::TypeId;

use crate::info::{ArrayDescriptor, EnumDescriptor, FlagsDescriptor, KindError};
use crate::info::{PointerDescriptor, PrimitiveDescriptor, RecordDescriptor};
use crate::info::{PrimitiveKind, TypeGuid, TypeKind};

/// Run-time description of a type, one variant per [`TypeKind`].
///
/// # Obtain
///
/// - [`Described::descriptor`] when the type is known at compile time.
/// - [`TypeRegistry::get`], [`TypeRegistry::get_by_guid`] or
///   [`TypeRegistry::get_by_name`] otherwise.
///
/// Descriptors are built once and live for the rest of the process.
///
/// [`Described::descriptor`]: crate::info::Described::descriptor
/// [`TypeRegistry::get`]: crate::registry::TypeRegistry::get
/// [`TypeRegistry::get_by_guid`]: crate::registry::TypeRegistry::get_by_guid
/// [`TypeRegistry::get_by_name`]: crate::registry::TypeRegistry::get_by_name
#[derive(Debug)]
pub enum TypeDescriptor {
    Primitive(PrimitiveDescriptor),
    Enum(EnumDescriptor),
    Flags(FlagsDescriptor),
    Record(RecordDescriptor),
    Pointer(PointerDescriptor),
    Array(ArrayDescriptor),
}

// Helper macro that implements type-safe accessor methods like `as_record`.
macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        /// Convert [`TypeDescriptor`] to the specific descriptor.
        pub const fn $name(&self) -> Result<&$info, KindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(KindError {
                    expected: TypeKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

// Dispatches a method call to the inner descriptor.
macro_rules! dispatch {
    ($self:ident.$method:ident()) => {
        match $self {
            Self::Primitive(info) => info.$method(),
            Self::Enum(info) => info.$method(),
            Self::Flags(info) => info.$method(),
            Self::Record(info) => info.$method(),
            Self::Pointer(info) => info.$method(),
            Self::Array(info) => info.$method(),
        }
    };
}

impl TypeDescriptor {
    impl_cast_method!(as_primitive: Primitive => PrimitiveDescriptor);
    impl_cast_method!(as_enum: Enum => EnumDescriptor);
    impl_cast_method!(as_flags: Flags => FlagsDescriptor);
    impl_cast_method!(as_record: Record => RecordDescriptor);
    impl_cast_method!(as_pointer: Pointer => PointerDescriptor);
    impl_cast_method!(as_array: Array => ArrayDescriptor);

    /// Returns the [`TypeKind`] of this descriptor.
    ///
    /// # Examples
    ///
    /// ```
    /// use rt_reflect::info::{Described, TypeKind};
    ///
    /// assert_eq!(u32::descriptor().kind(), TypeKind::Primitive);
    /// assert_eq!(<Vec<u32>>::descriptor().kind(), TypeKind::Array);
    /// ```
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Primitive(_) => TypeKind::Primitive,
            Self::Enum(_) => TypeKind::Enum,
            Self::Flags(_) => TypeKind::Flags,
            Self::Record(_) => TypeKind::Record,
            Self::Pointer(_) => TypeKind::Pointer,
            Self::Array(_) => TypeKind::Array,
        }
    }

    /// The stable type name.
    pub const fn name(&self) -> &'static str {
        dispatch!(self.name())
    }

    /// The stable guid derived from [`name`](Self::name).
    pub const fn guid(&self) -> TypeGuid {
        dispatch!(self.guid())
    }

    /// The Rust [`TypeId`] of the described type.
    pub const fn type_id(&self) -> TypeId {
        dispatch!(self.type_id())
    }

    /// Size and alignment of the described type.
    pub const fn layout(&self) -> Layout {
        dispatch!(self.layout())
    }

    /// Returns `true` for types whose binary form is a fixed-size copy of
    /// their storage: non-string primitives, enums and flags.
    pub const fn is_bitwise(&self) -> bool {
        match self {
            Self::Primitive(info) => !matches!(info.kind(), PrimitiveKind::String),
            Self::Enum(_) | Self::Flags(_) => true,
            _ => false,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
