use alloc::vec::Vec;

use slotmap::SecondaryMap;

use crate::clump::{Clump, ClumpError, ObjectHandle, ObjectList};
use crate::codec::{ObjectLocation, ReferenceResolver, ReferenceTable, ResolvedObject};
use crate::info::{RecordDescriptor, TypeGuid};

// -----------------------------------------------------------------------------
// SaveTable

/// The lists being saved and the location of each of their objects.
pub(crate) struct SaveTable<'c> {
    lists: Vec<&'c ObjectList>,
    locations: SecondaryMap<ObjectHandle, ObjectLocation>,
}

impl<'c> SaveTable<'c> {
    pub fn new(clump: &'c Clump, skip_empty_lists: bool) -> Self {
        let lists: Vec<&ObjectList> = clump
            .object_lists()
            .iter()
            .filter(|list| !(skip_empty_lists && list.is_empty()))
            .collect();

        let mut locations = SecondaryMap::with_capacity(clump.len());
        for list in &lists {
            for (index, handle) in list.handles().iter().enumerate() {
                locations.insert(
                    *handle,
                    ObjectLocation {
                        record: list.record(),
                        index,
                    },
                );
            }
        }
        Self { lists, locations }
    }

    #[inline]
    pub fn lists(&self) -> &[&'c ObjectList] {
        &self.lists
    }
}

impl ReferenceTable for SaveTable<'_> {
    #[inline]
    fn locate(&self, handle: ObjectHandle) -> Option<ObjectLocation> {
        self.locations.get(handle).copied()
    }
}

// -----------------------------------------------------------------------------
// LoadTable

pub(crate) struct LoadedList {
    pub record: &'static RecordDescriptor,
    pub handles: Vec<ObjectHandle>,
}

/// The objects constructed by the first load phase, per persisted list.
#[derive(Default)]
pub(crate) struct LoadTable {
    lists: Vec<LoadedList>,
}

impl LoadTable {
    /// Constructs `count` default objects of `record` in `clump`.
    pub fn construct(
        &mut self,
        clump: &mut Clump,
        record: &'static RecordDescriptor,
        count: usize,
    ) -> Result<(), ClumpError> {
        if self.lists.iter().any(|list| core::ptr::eq(list.record, record)) {
            return Err(ClumpError::DuplicateList(record.name()));
        }
        if !record.is_concrete() {
            return Err(ClumpError::NotConstructible(record.name()));
        }

        clump.create_object_list(record, count);
        let mut handles = Vec::with_capacity(count);
        for _ in 0..count {
            handles.push(clump.create(record)?);
        }
        log::trace!("constructed {count} objects of `{}`", record.name());
        self.lists.push(LoadedList { record, handles });
        Ok(())
    }

    #[inline]
    pub fn lists(&self) -> &[LoadedList] {
        &self.lists
    }

    fn resolve(&self, list: Option<&LoadedList>, index: usize) -> Option<ResolvedObject> {
        let list = list?;
        Some(ResolvedObject {
            handle: *list.handles.get(index)?,
            record: list.record,
        })
    }
}

impl ReferenceResolver for LoadTable {
    fn resolve_by_name(&self, record: &str, index: usize) -> Option<ResolvedObject> {
        let list = self.lists.iter().find(|list| list.record.name() == record);
        self.resolve(list, index)
    }

    fn resolve_by_guid(&self, guid: TypeGuid, index: usize) -> Option<ResolvedObject> {
        let list = self.lists.iter().find(|list| list.record.guid() == guid);
        self.resolve(list, index)
    }
}
