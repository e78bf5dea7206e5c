use alloc::format;
use alloc::string::String;
use core::any::Any;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::info::{Described, GenericDescriptorCell, PointerAccessor, PointerDescriptor};
use crate::info::TypeDescriptor;

slotmap::new_key_type! {
    /// Generation-checked address of an object in a [`Clump`].
    ///
    /// A handle of a removed object never aliases a later one.
    ///
    /// [`Clump`]: crate::clump::Clump
    pub struct ObjectHandle;
}

/// A typed, non-owning reference to a `T` stored in a [`Clump`].
///
/// The described form of `ObjectRef<T>` is a pointer to the record `T`,
/// named `ObjectRef<T>`.
///
/// [`Clump`]: crate::clump::Clump
pub struct ObjectRef<T> {
    handle: Option<ObjectHandle>,
    marker: PhantomData<fn() -> T>,
}

impl<T> ObjectRef<T> {
    #[inline]
    pub const fn new(handle: ObjectHandle) -> Self {
        Self {
            handle: Some(handle),
            marker: PhantomData,
        }
    }

    #[inline]
    pub const fn null() -> Self {
        Self {
            handle: None,
            marker: PhantomData,
        }
    }

    #[inline]
    pub const fn handle(&self) -> Option<ObjectHandle> {
        self.handle
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.handle.is_none()
    }

    #[inline]
    pub fn set(&mut self, handle: Option<ObjectHandle>) {
        self.handle = handle;
    }
}

impl<T> Clone for ObjectRef<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ObjectRef<T> {}

impl<T> Default for ObjectRef<T> {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl<T> PartialEq for ObjectRef<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<T> Eq for ObjectRef<T> {}

impl<T> Hash for ObjectRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}

impl<T> fmt::Debug for ObjectRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.handle {
            Some(handle) => write!(f, "ObjectRef({handle:?})"),
            None => f.write_str("ObjectRef(null)"),
        }
    }
}

impl<T> From<ObjectHandle> for ObjectRef<T> {
    #[inline]
    fn from(handle: ObjectHandle) -> Self {
        Self::new(handle)
    }
}

fn read_ref<T: 'static>(value: &dyn Any) -> Option<Option<ObjectHandle>> {
    value.downcast_ref::<ObjectRef<T>>().map(ObjectRef::handle)
}

fn write_ref<T: 'static>(target: &mut dyn Any, handle: Option<ObjectHandle>) -> bool {
    match target.downcast_mut::<ObjectRef<T>>() {
        Some(target) => {
            target.set(handle);
            true
        }
        None => false,
    }
}

impl<T: Described> Described for ObjectRef<T> {
    fn descriptor() -> &'static TypeDescriptor {
        static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
        CELL.get_or_insert::<Self>(|| {
            let name = format!("ObjectRef<{}>", T::descriptor().name());
            TypeDescriptor::Pointer(PointerDescriptor::new::<Self>(
                String::leak(name),
                T::descriptor,
                PointerAccessor {
                    get: read_ref::<T>,
                    set: write_ref::<T>,
                },
            ))
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{ObjectHandle, ObjectRef};
    use crate::impl_described_record;
    use crate::info::Described;
    use slotmap::SlotMap;

    #[derive(Default)]
    struct Target {
        hp: i32,
    }

    impl_described_record!(Target { hp: i32 });

    #[test]
    fn pointer_descriptor() {
        let info = ObjectRef::<Target>::descriptor().as_pointer().unwrap();
        assert_eq!(info.name(), "ObjectRef<Target>");
        assert_eq!(info.pointee_record().map(|r| r.name()), Some("Target"));
        assert!(core::ptr::eq(
            ObjectRef::<Target>::descriptor(),
            ObjectRef::<Target>::descriptor()
        ));

        let mut slots = SlotMap::<ObjectHandle, ()>::with_key();
        let handle = slots.insert(());
        let mut value = ObjectRef::<Target>::null();
        assert_eq!(info.read(&value), Some(None));
        assert!(info.write(&mut value, Some(handle)));
        assert_eq!(value.handle(), Some(handle));
        assert_eq!(info.read(&value), Some(Some(handle)));
        assert!(!info.write(&mut 0_u32, None));
    }
}
