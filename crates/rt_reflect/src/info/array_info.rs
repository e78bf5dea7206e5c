use core::alloc::Layout;
use core::any::{Any, TypeId};

use crate::info::{TypeDescriptor, TypeGuid};

/// Operations over the storage of a dynamic array.
///
/// Every function returns `None`/`false` when given a value of the wrong type.
#[derive(Debug, Clone, Copy)]
pub struct ArrayAccessor {
    pub len: fn(&dyn Any) -> Option<usize>,
    pub get: fn(&dyn Any, usize) -> Option<&dyn Any>,
    pub get_mut: fn(&mut dyn Any, usize) -> Option<&mut dyn Any>,
    /// Grows with default items or truncates.
    pub resize: fn(&mut dyn Any, usize) -> bool,
}

/// Descriptor of a growable sequence of items of one type.
#[derive(Debug)]
pub struct ArrayDescriptor {
    name: &'static str,
    guid: TypeGuid,
    type_id: TypeId,
    layout: Layout,
    item: fn() -> &'static TypeDescriptor,
    accessor: ArrayAccessor,
}

impl ArrayDescriptor {
    /// Creates a descriptor for the array type `T`.
    pub fn new<T: Any>(
        name: &'static str,
        item: fn() -> &'static TypeDescriptor,
        accessor: ArrayAccessor,
    ) -> Self {
        Self {
            name,
            guid: TypeGuid::from_name(name),
            type_id: TypeId::of::<T>(),
            layout: Layout::new::<T>(),
            item,
            accessor,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
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

    /// Descriptor of the item type.
    #[inline]
    pub fn item(&self) -> &'static TypeDescriptor {
        (self.item)()
    }

    #[inline]
    pub fn len(&self, array: &dyn Any) -> Option<usize> {
        (self.accessor.len)(array)
    }

    #[inline]
    pub fn get<'a>(&self, array: &'a dyn Any, index: usize) -> Option<&'a dyn Any> {
        (self.accessor.get)(array, index)
    }

    #[inline]
    pub fn get_mut<'a>(&self, array: &'a mut dyn Any, index: usize) -> Option<&'a mut dyn Any> {
        (self.accessor.get_mut)(array, index)
    }

    #[inline]
    pub fn resize(&self, array: &mut dyn Any, len: usize) -> bool {
        (self.accessor.resize)(array, len)
    }
}
