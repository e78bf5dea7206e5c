use crate::clump::ObjectHandle;
use crate::info::{RecordDescriptor, TypeGuid};

/// Where an object sits in a persisted clump.
#[derive(Debug, Clone, Copy)]
pub struct ObjectLocation {
    /// The exact record of the object.
    pub record: &'static RecordDescriptor,
    /// The position of the object in the list of its record.
    pub index: usize,
}

/// A loaded object that a persisted reference points to.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedObject {
    pub handle: ObjectHandle,
    /// The exact record of the object.
    pub record: &'static RecordDescriptor,
}

/// Maps live handles to their persisted `(record, index)` form while saving.
pub trait ReferenceTable {
    /// Returns `None` for handles outside the saved set.
    fn locate(&self, handle: ObjectHandle) -> Option<ObjectLocation>;
}

/// Maps persisted `(record, index)` pairs back to handles while loading.
///
/// The text form names records, the binary form uses their guid.
pub trait ReferenceResolver {
    fn resolve_by_name(&self, record: &str, index: usize) -> Option<ResolvedObject>;

    fn resolve_by_guid(&self, guid: TypeGuid, index: usize) -> Option<ResolvedObject>;
}

/// A table and resolver that knows no objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReferences;

impl ReferenceTable for NoReferences {
    #[inline]
    fn locate(&self, _: ObjectHandle) -> Option<ObjectLocation> {
        None
    }
}

impl ReferenceResolver for NoReferences {
    #[inline]
    fn resolve_by_name(&self, _: &str, _: usize) -> Option<ResolvedObject> {
        None
    }

    #[inline]
    fn resolve_by_guid(&self, _: TypeGuid, _: usize) -> Option<ResolvedObject> {
        None
    }
}
