use alloc::boxed::Box;
use core::alloc::Layout;
use core::any::{Any, TypeId};

use crate::info::TypeGuid;

/// The string returned by [`EnumDescriptor::string_by_value`] for unknown values.
pub const INVALID_VALUE: &str = "INVALID_VALUE";

// -----------------------------------------------------------------------------
// EnumMember

/// A named enumerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumMember {
    pub name: &'static str,
    pub value: u32,
}

impl EnumMember {
    #[inline]
    pub const fn new(name: &'static str, value: u32) -> Self {
        Self { name, value }
    }
}

// -----------------------------------------------------------------------------
// EnumAccessor

/// Reads and writes the integer storage of a concrete enum instance.
///
/// `set` returns `false` when the target has the wrong type or the value
/// has no representation in it.
#[derive(Debug, Clone, Copy)]
pub struct EnumAccessor {
    pub get: fn(&dyn Any) -> Option<u32>,
    pub set: fn(&mut dyn Any, u32) -> bool,
}

// -----------------------------------------------------------------------------
// EnumDescriptor

/// Descriptor of a named-integer-constant type.
///
/// Members keep declaration order. Values need not be unique: aliases are
/// legal and value lookups return the first match.
///
/// # Examples
///
/// ```
/// use rt_reflect::info::{Described, TypeDescriptor};
/// use rt_reflect::impl_described_enum;
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Color { Red, Green, Blue }
///
/// impl_described_enum!(Color { Red, Green, Blue });
///
/// let info = Color::descriptor().as_enum().unwrap();
/// assert_eq!(info.string_by_value(1), "Green");
/// assert_eq!(info.value_by_string("blue"), 2);
/// ```
#[derive(Debug)]
pub struct EnumDescriptor {
    name: &'static str,
    guid: TypeGuid,
    type_id: TypeId,
    layout: Layout,
    members: Box<[EnumMember]>,
    accessor: EnumAccessor,
}

impl EnumDescriptor {
    /// Creates a descriptor for `T`.
    pub fn new<T: Any>(name: &'static str, members: &[EnumMember], accessor: EnumAccessor) -> Self {
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
    pub fn members(&self) -> &[EnumMember] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn member_at(&self, index: usize) -> Option<&EnumMember> {
        self.members.get(index)
    }

    /// Index of the first member whose value equals `value`.
    pub fn index_by_value(&self, value: u32) -> Option<usize> {
        self.members.iter().position(|m| m.value == value)
    }

    /// Index of the first member whose name matches, ignoring ASCII case.
    ///
    /// Logs a warning when nothing matches.
    pub fn index_by_name(&self, name: &str) -> Option<usize> {
        let index = self.find_name(name);
        if index.is_none() {
            log::warn!("no enum member named '{name}' in '{}'", self.name);
        }
        index
    }

    /// Name of the first member with `value`, or [`INVALID_VALUE`].
    pub fn string_by_value(&self, value: u32) -> &'static str {
        match self.index_by_value(value) {
            Some(index) => self.members[index].name,
            None => INVALID_VALUE,
        }
    }

    /// Value of the member named `name`, or `0` after logging an error.
    pub fn value_by_string(&self, name: &str) -> u32 {
        match self.find_name(name) {
            Some(index) => self.members[index].value,
            None => {
                log::error!("no enum value with name='{name}' in '{}'", self.name);
                0
            }
        }
    }

    /// Reads the integer storage of `value`.
    #[inline]
    pub fn read(&self, value: &dyn Any) -> Option<u32> {
        (self.accessor.get)(value)
    }

    /// Writes `raw` into the storage of `target`.
    #[inline]
    pub fn write(&self, target: &mut dyn Any, raw: u32) -> bool {
        (self.accessor.set)(target, raw)
    }

    /// Quiet case-insensitive lookup, used where a miss is reported differently.
    pub(crate) fn find_name(&self, name: &str) -> Option<usize> {
        self.members
            .iter()
            .position(|m| m.name.eq_ignore_ascii_case(name))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{EnumAccessor, EnumDescriptor, EnumMember, INVALID_VALUE};
    use core::any::Any;

    #[derive(Debug, Default, PartialEq)]
    struct Raw(u32);

    fn get(v: &dyn Any) -> Option<u32> {
        v.downcast_ref::<Raw>().map(|r| r.0)
    }

    fn set(v: &mut dyn Any, raw: u32) -> bool {
        match v.downcast_mut::<Raw>() {
            Some(r) => {
                r.0 = raw;
                true
            }
            None => false,
        }
    }

    fn color() -> EnumDescriptor {
        EnumDescriptor::new::<Raw>(
            "Color",
            &[
                EnumMember::new("Red", 0),
                EnumMember::new("Green", 1),
                EnumMember::new("Blue", 2),
                EnumMember::new("Verdant", 1),
            ],
            EnumAccessor { get, set },
        )
    }

    #[test]
    fn lookups() {
        let info = color();
        assert_eq!(info.string_by_value(1), "Green");
        assert_eq!(info.value_by_string("green"), 1);
        assert_eq!(info.value_by_string("GREEN"), 1);
        assert_eq!(info.value_by_string("purple"), 0);
        assert_eq!(info.string_by_value(7), INVALID_VALUE);
        assert_eq!(info.index_by_name("blue"), Some(2));
        assert_eq!(info.index_by_name("purple"), None);
    }

    #[test]
    fn aliases_resolve_to_first_member() {
        let info = color();
        assert_eq!(info.index_by_value(1), Some(1));
        assert_eq!(info.value_by_string("verdant"), 1);
        assert_eq!(info.string_by_value(1), "Green");
    }

    #[test]
    fn value_round_trip() {
        let info = color();
        for member in info.members() {
            let name = info.string_by_value(member.value);
            assert_eq!(info.value_by_string(name), member.value);
        }
    }

    #[test]
    fn accessor() {
        let info = color();
        let mut raw = Raw(0);
        assert!(info.write(&mut raw, 2));
        assert_eq!(info.read(&raw), Some(2));
        assert_eq!(info.read(&5_u8), None);
        assert!(!info.write(&mut 5_u8, 1));
    }
}
