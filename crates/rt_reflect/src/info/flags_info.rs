use alloc::boxed::Box;
use alloc::string::String;
use core::alloc::Layout;
use core::any::{Any, TypeId};

use crate::info::TypeGuid;

/// The separator used by [`FlagsDescriptor::render`] and the text codecs.
pub const FLAG_SEPARATOR: char = '|';

// -----------------------------------------------------------------------------
// FlagsMember

/// A named bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagsMember {
    pub name: &'static str,
    pub mask: u32,
}

impl FlagsMember {
    #[inline]
    pub const fn new(name: &'static str, mask: u32) -> Self {
        Self { name, mask }
    }
}

// -----------------------------------------------------------------------------
// FlagsAccessor

/// Reads and writes the bit storage of a concrete flags instance.
#[derive(Debug, Clone, Copy)]
pub struct FlagsAccessor {
    pub get: fn(&dyn Any) -> Option<u32>,
    pub set: fn(&mut dyn Any, u32) -> bool,
}

// -----------------------------------------------------------------------------
// FlagsDescriptor

/// Descriptor of a bitmask type whose bits have individual names.
///
/// Member names are expected to come from compiled code, so
/// [`index_by_name`](Self::index_by_name) treats a miss as a programming error.
/// Masks may overlap; [`render`](Self::render) then reports every member
/// that shares a bit with the value.
#[derive(Debug)]
pub struct FlagsDescriptor {
    name: &'static str,
    guid: TypeGuid,
    type_id: TypeId,
    layout: Layout,
    members: Box<[FlagsMember]>,
    accessor: FlagsAccessor,
}

impl FlagsDescriptor {
    /// Creates a descriptor for `T`.
    pub fn new<T: Any>(name: &'static str, members: &[FlagsMember], accessor: FlagsAccessor) -> Self {
        Self {
            name,
            guid: TypeGuid::from_name(name),
            type_id: TypeId::of::<T>(),
            layout: Layout::new::<T>(),
            members: members.into(),
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

    /// Members in declaration order.
    #[inline]
    pub fn members(&self) -> &[FlagsMember] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Index of the member with exactly this name.
    ///
    /// A miss logs an error and fails a debug assertion.
    pub fn index_by_name(&self, name: &str) -> Option<usize> {
        let index = self.members.iter().position(|m| m.name == name);
        if index.is_none() {
            log::error!("unknown flag '{name}' in '{}'", self.name);
            debug_assert!(false, "unknown flag '{name}' in '{}'", self.name);
        }
        index
    }

    /// Mask of the member named `name`, `0` when there is none.
    pub fn value_by_name(&self, name: &str) -> u32 {
        match self.index_by_name(name) {
            Some(index) => self.members[index].mask,
            None => 0,
        }
    }

    /// Quiet exact lookup for names that come from external data.
    pub fn find_mask(&self, name: &str) -> Option<u32> {
        self.members.iter().find(|m| m.name == name).map(|m| m.mask)
    }

    /// Joins the names of all members intersecting `value` with `|`.
    ///
    /// This is a diagnostic dump. Bits not covered by any member are dropped.
    pub fn render(&self, value: u32) -> String {
        let mut out = String::new();
        for member in self.members.iter() {
            if member.mask & value != 0 {
                if !out.is_empty() {
                    out.push(FLAG_SEPARATOR);
                }
                out.push_str(member.name);
            }
        }
        out
    }

    /// Reads the bit storage of `value`.
    #[inline]
    pub fn read(&self, value: &dyn Any) -> Option<u32> {
        (self.accessor.get)(value)
    }

    /// Writes `bits` into the storage of `target`.
    #[inline]
    pub fn write(&self, target: &mut dyn Any, bits: u32) -> bool {
        (self.accessor.set)(target, bits)
    }
}

// -----------------------------------------------------------------------------
// Tests
