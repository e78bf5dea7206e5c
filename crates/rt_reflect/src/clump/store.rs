use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use rt_utils::TypeIdMap;
use slotmap::SlotMap;

use crate::clump::{ClumpError, ObjectHandle};
use crate::info::{Described, RecordDescriptor};

// -----------------------------------------------------------------------------
// ObjectList

/// The objects of one exact record type, in insertion order.
#[derive(Clone)]
pub struct ObjectList {
    record: &'static RecordDescriptor,
    handles: Vec<ObjectHandle>,
}

impl ObjectList {
    #[inline]
    pub fn record(&self) -> &'static RecordDescriptor {
        self.record
    }

    #[inline]
    pub fn handles(&self) -> &[ObjectHandle] {
        &self.handles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Position of `handle` in this list.
    pub fn index_of(&self, handle: ObjectHandle) -> Option<usize> {
        self.handles.iter().position(|h| *h == handle)
    }
}

impl fmt::Debug for ObjectList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectList")
            .field("record", &self.record.name())
            .field("len", &self.handles.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Clump

struct Slot {
    record: &'static RecordDescriptor,
    value: Box<dyn Any + Send + Sync>,
}

/// An ordered, heterogeneous collection of record objects.
///
/// Objects live in generation-checked slots addressed by [`ObjectHandle`],
/// and are grouped in one [`ObjectList`] per exact record type. Lists keep
/// the order in which their record was first seen, objects the order of
/// insertion.
///
/// # Examples
///
/// ```
/// use rt_reflect::clump::Clump;
/// use rt_reflect::impl_described_record;
///
/// #[derive(Default)]
/// struct Lamp { power: f32 }
///
/// impl_described_record!(Lamp { power: f32 });
///
/// let mut clump = Clump::new();
/// let lamp = clump.insert(Lamp { power: 60.0 }).unwrap();
/// clump.get_mut::<Lamp>(lamp).unwrap().power = 40.0;
///
/// assert_eq!(clump.get::<Lamp>(lamp).unwrap().power, 40.0);
/// assert_eq!(clump.iter_of::<Lamp>().count(), 1);
/// ```
#[derive(Default)]
pub struct Clump {
    slots: SlotMap<ObjectHandle, Slot>,
    lists: Vec<ObjectList>,
    list_index: TypeIdMap<usize>,
}

impl Clump {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Stores `value`, whose type must be described as a record.
    pub fn insert<T: Described>(&mut self, value: T) -> Result<ObjectHandle, ClumpError> {
        let descriptor = T::descriptor();
        let record = descriptor
            .as_record()
            .map_err(|_| ClumpError::NotARecord(descriptor.name()))?;
        Ok(self.insert_boxed(record, Box::new(value)))
    }

    /// Stores a default-constructed object of `record`.
    pub fn create(&mut self, record: &'static RecordDescriptor) -> Result<ObjectHandle, ClumpError> {
        let value = record
            .construct()
            .ok_or(ClumpError::NotConstructible(record.name()))?;
        Ok(self.insert_boxed(record, value))
    }

    /// Returns the list of `record`, creating it with room for `capacity`
    /// more objects.
    pub fn create_object_list(
        &mut self,
        record: &'static RecordDescriptor,
        capacity: usize,
    ) -> &mut ObjectList {
        let index = self.list_position(record);
        let list = &mut self.lists[index];
        list.handles.reserve(capacity);
        list
    }

    fn list_position(&mut self, record: &'static RecordDescriptor) -> usize {
        let lists = &mut self.lists;
        *self.list_index.get_or_insert(record.type_id(), || {
            lists.push(ObjectList {
                record,
                handles: Vec::new(),
            });
            lists.len() - 1
        })
    }

    fn insert_boxed(
        &mut self,
        record: &'static RecordDescriptor,
        value: Box<dyn Any + Send + Sync>,
    ) -> ObjectHandle {
        let index = self.list_position(record);
        let handle = self.slots.insert(Slot { record, value });
        self.lists[index].handles.push(handle);
        handle
    }

    #[inline]
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.slots.contains_key(handle)
    }

    /// The exact record of the object at `handle`.
    #[inline]
    pub fn record_of(&self, handle: ObjectHandle) -> Option<&'static RecordDescriptor> {
        self.slots.get(handle).map(|slot| slot.record)
    }

    /// Returns the object at `handle` if it is exactly a `T`.
    #[inline]
    pub fn get<T: Any>(&self, handle: ObjectHandle) -> Option<&T> {
        self.slots.get(handle)?.value.downcast_ref::<T>()
    }

    #[inline]
    pub fn get_mut<T: Any>(&mut self, handle: ObjectHandle) -> Option<&mut T> {
        self.slots.get_mut(handle)?.value.downcast_mut::<T>()
    }

    /// Returns the object at `handle` with its exact record.
    pub fn get_dyn(&self, handle: ObjectHandle) -> Option<(&'static RecordDescriptor, &dyn Any)> {
        let slot = self.slots.get(handle)?;
        Some((slot.record, &*slot.value as &dyn Any))
    }

    pub fn get_dyn_mut(
        &mut self,
        handle: ObjectHandle,
    ) -> Option<(&'static RecordDescriptor, &mut dyn Any)> {
        let slot = self.slots.get_mut(handle)?;
        Some((slot.record, &mut *slot.value as &mut dyn Any))
    }

    /// Deletes the object at `handle`.
    ///
    /// Later objects of the same list move down one index.
    pub fn remove(&mut self, handle: ObjectHandle) -> bool {
        let Some(slot) = self.slots.remove(handle) else {
            return false;
        };
        if let Some(index) = self.list_index.get(&slot.record.type_id()) {
            self.lists[*index].handles.retain(|h| *h != handle);
        }
        true
    }

    /// Deletes every object and list.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.lists.clear();
        self.list_index.clear();
    }

    /// The object lists, including emptied ones.
    #[inline]
    pub fn object_lists(&self) -> &[ObjectList] {
        &self.lists
    }

    pub fn find_list(&self, record: &RecordDescriptor) -> Option<&ObjectList> {
        let index = self.list_index.get(&record.type_id())?;
        Some(&self.lists[*index])
    }

    fn list_of<T: Any>(&self) -> Option<&ObjectList> {
        let index = self.list_index.get(&TypeId::of::<T>())?;
        Some(&self.lists[*index])
    }

    /// Iterates the objects of exactly type `T`, in insertion order.
    pub fn iter_of<T: Any>(&self) -> impl Iterator<Item = (ObjectHandle, &T)> {
        self.list_of::<T>()
            .map(|list| list.handles.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |handle| Some((*handle, self.get::<T>(*handle)?)))
    }

    /// Returns the only object of type `T`.
    ///
    /// With several objects the first one is returned and a warning logged.
    pub fn find_single<T: Any>(&self) -> Option<(ObjectHandle, &T)> {
        let list = self.list_of::<T>()?;
        if list.len() > 1 {
            log::warn!(
                "{} objects of `{}` where a single one is expected",
                list.len(),
                list.record.name()
            );
        }
        let handle = *list.handles.first()?;
        Some((handle, self.get::<T>(handle)?))
    }

    /// Returns the only object of type `T`, inserting a default one if
    /// there is none.
    pub fn get_or_create_single<T: Described + Default>(&mut self) -> Result<&mut T, ClumpError> {
        let existing = self.find_single::<T>().map(|(handle, _)| handle);
        let handle = match existing {
            Some(handle) => handle,
            None => self.insert(T::default())?,
        };
        self.get_mut::<T>(handle)
            .ok_or(ClumpError::NotARecord(T::descriptor().name()))
    }
}

impl fmt::Debug for Clump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clump")
            .field("len", &self.slots.len())
            .field("lists", &self.lists)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Clump;
    use crate::clump::ClumpError;
    use crate::impl_described_record;
    use crate::info::Described;
    use alloc::vec::Vec;

    #[derive(Default, Debug, PartialEq)]
    struct Mesh {
        vertices: u32,
    }

    #[derive(Default, Debug, PartialEq)]
    struct Skin {
        base: Mesh,
        bones: u8,
    }

    #[derive(Default)]
    struct Settings {
        volume: f32,
    }

    impl_described_record!(Mesh { vertices: u32 });
    impl_described_record!(Skin : base as Mesh { bones: u8 });
    impl_described_record!(Settings { volume: f32 });

    #[test]
    fn lists_per_exact_record() {
        let mut clump = Clump::new();
        let a = clump.insert(Mesh { vertices: 3 }).unwrap();
        let skin = clump.insert(Skin::default()).unwrap();
        let b = clump.insert(Mesh { vertices: 4 }).unwrap();

        assert_eq!(clump.len(), 3);
        let names: Vec<_> = clump.object_lists().iter().map(|l| l.record().name()).collect();
        assert_eq!(names, ["Mesh", "Skin"]);

        let meshes = clump.find_list(Mesh::descriptor().as_record().unwrap()).unwrap();
        assert_eq!(meshes.handles(), [a, b]);
        assert_eq!(meshes.index_of(b), Some(1));

        let vertices: Vec<_> = clump.iter_of::<Mesh>().map(|(_, m)| m.vertices).collect();
        assert_eq!(vertices, [3, 4]);
        assert!(clump.get::<Mesh>(skin).is_none());
        assert_eq!(clump.record_of(skin).map(|r| r.name()), Some("Skin"));
        assert_eq!(clump.get_dyn(skin).map(|(r, _)| r.name()), Some("Skin"));
    }

    #[test]
    fn create_and_remove() {
        let mut clump = Clump::new();
        let record = Skin::descriptor().as_record().unwrap();
        clump.create_object_list(record, 2);
        let first = clump.create(record).unwrap();
        let second = clump.create(record).unwrap();
        assert_eq!(clump.get::<Skin>(first), Some(&Skin::default()));

        assert!(clump.remove(first));
        assert!(!clump.remove(first));
        assert!(!clump.contains(first));
        assert_eq!(clump.find_list(record).unwrap().handles(), [second]);

        // Handles of removed objects stay dead after the slot is reused.
        let third = clump.create(record).unwrap();
        assert_ne!(first, third);
        assert!(clump.get::<Skin>(first).is_none());

        clump.clear();
        assert!(clump.is_empty());
        assert!(clump.object_lists().is_empty());
    }

    #[test]
    fn singles() {
        let mut clump = Clump::new();
        assert!(clump.find_single::<Settings>().is_none());
        clump.get_or_create_single::<Settings>().unwrap().volume = 0.5;
        assert_eq!(clump.get_or_create_single::<Settings>().unwrap().volume, 0.5);
        assert_eq!(clump.len(), 1);
        assert_eq!(clump.find_single::<Settings>().map(|(_, s)| s.volume), Some(0.5));
    }

    #[test]
    fn only_records_are_stored() {
        let mut clump = Clump::new();
        assert!(matches!(clump.insert(5_u32), Err(ClumpError::NotARecord("u32"))));
        assert!(clump.is_empty());
    }
}
