use core::alloc::Layout;
use core::any::{Any, TypeId};

use crate::clump::ObjectHandle;
use crate::info::{RecordDescriptor, TypeDescriptor, TypeGuid};

/// Reads and writes the handle stored in a pointer value.
#[derive(Debug, Clone, Copy)]
pub struct PointerAccessor {
    /// `Some(None)` is a null pointer, `None` a value of the wrong type.
    pub get: fn(&dyn Any) -> Option<Option<ObjectHandle>>,
    pub set: fn(&mut dyn Any, Option<ObjectHandle>) -> bool,
}

/// Descriptor of a reference to an object stored in a [`Clump`].
///
/// Pointers never own their target. Codecs persist them as a
/// `(record, index)` pair and resolve them again through the caller.
///
/// [`Clump`]: crate::clump::Clump
#[derive(Debug)]
pub struct PointerDescriptor {
    name: &'static str,
    guid: TypeGuid,
    type_id: TypeId,
    layout: Layout,
    pointee: fn() -> &'static TypeDescriptor,
    accessor: PointerAccessor,
}

impl PointerDescriptor {
    /// Creates a descriptor for the pointer type `T`.
    pub fn new<T: Any>(
        name: &'static str,
        pointee: fn() -> &'static TypeDescriptor,
        accessor: PointerAccessor,
    ) -> Self {
        Self {
            name,
            guid: TypeGuid::from_name(name),
            type_id: TypeId::of::<T>(),
            layout: Layout::new::<T>(),
            pointee,
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

    /// Descriptor of the pointee type.
    #[inline]
    pub fn pointee(&self) -> &'static TypeDescriptor {
        (self.pointee)()
    }

    /// The pointee as a record, `None` if it is not one.
    pub fn pointee_record(&self) -> Option<&'static RecordDescriptor> {
        self.pointee().as_record().ok()
    }

    #[inline]
    pub fn read(&self, value: &dyn Any) -> Option<Option<ObjectHandle>> {
        (self.accessor.get)(value)
    }

    #[inline]
    pub fn write(&self, target: &mut dyn Any, handle: Option<ObjectHandle>) -> bool {
        (self.accessor.set)(target, handle)
    }
}
