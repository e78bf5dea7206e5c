use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use bitflags::bitflags;

use crate::info::{Described, TypeDescriptor};

bitflags! {
    /// Per-field codec behaviour.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u32 {
        /// Skipped by every codec, in both directions.
        const NO_SERIALIZE = 1 << 1;
        /// Reported as missing under [`MissingFieldPolicy::RejectRequired`].
        ///
        /// [`MissingFieldPolicy::RejectRequired`]: crate::codec::MissingFieldPolicy::RejectRequired
        const REQUIRED = 1 << 2;
    }
}

type Getter = Box<dyn Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync>;
type GetterMut = Box<dyn Fn(&mut dyn Any) -> Option<&mut dyn Any> + Send + Sync>;

#[inline(always)]
fn getter<F>(f: F) -> Getter
where
    F: Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync + 'static,
{
    Box::new(f)
}

#[inline(always)]
fn getter_mut<F>(f: F) -> GetterMut
where
    F: Fn(&mut dyn Any) -> Option<&mut dyn Any> + Send + Sync + 'static,
{
    Box::new(f)
}

/// A named field of a record.
///
/// The field type is resolved lazily through a function pointer, so records
/// may refer to themselves (for example through `Vec<Self>`).
///
/// Accessors are offset independent: they project a type-erased owner to the
/// field storage and return `None` when the owner has the wrong type.
///
/// # Examples
///
/// ```
/// use rt_reflect::info::Field;
///
/// struct Point { x: f32 }
///
/// let field = Field::new::<Point, f32>("x", |p| &p.x, |p| &mut p.x);
/// let point = Point { x: 4.0 };
/// let value = field.get(&point).unwrap();
/// assert_eq!(value.downcast_ref::<f32>(), Some(&4.0));
/// ```
pub struct Field {
    name: &'static str,
    type_descriptor: fn() -> &'static TypeDescriptor,
    flags: FieldFlags,
    get: Getter,
    get_mut: GetterMut,
}

impl Field {
    /// Describes the field `name` of owner `O` with type `T`.
    pub fn new<O: Any, T: Described>(
        name: &'static str,
        get: fn(&O) -> &T,
        get_mut: fn(&mut O) -> &mut T,
    ) -> Self {
        Self {
            name,
            type_descriptor: T::descriptor,
            flags: FieldFlags::empty(),
            get: getter(move |owner| owner.downcast_ref::<O>().map(|o| get(o) as &dyn Any)),
            get_mut: getter_mut(move |owner| {
                owner
                    .downcast_mut::<O>()
                    .map(|o| get_mut(o) as &mut dyn Any)
            }),
        }
    }

    /// Replaces the flags of this field.
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Descriptor of the field's type.
    #[inline]
    pub fn type_descriptor(&self) -> &'static TypeDescriptor {
        (self.type_descriptor)()
    }

    #[inline]
    pub fn flags(&self) -> FieldFlags {
        self.flags
    }

    /// Returns `false` for fields marked [`FieldFlags::NO_SERIALIZE`].
    #[inline]
    pub fn is_serialized(&self) -> bool {
        !self.flags.contains(FieldFlags::NO_SERIALIZE)
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.flags.contains(FieldFlags::REQUIRED)
    }

    /// Projects `owner` to this field.
    #[inline]
    pub fn get<'a>(&self, owner: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.get)(owner)
    }

    /// Projects `owner` to this field, mutably.
    #[inline]
    pub fn get_mut<'a>(&self, owner: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        (self.get_mut)(owner)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Field, FieldFlags};

    struct Sample {
        id: u32,
        label: alloc::string::String,
    }

    #[test]
    fn projection() {
        let id = Field::new::<Sample, u32>("id", |s| &s.id, |s| &mut s.id);
        let mut sample = Sample {
            id: 3,
            label: "a".into(),
        };

        assert_eq!(id.get(&sample).and_then(|v| v.downcast_ref::<u32>()), Some(&3));
        if let Some(v) = id.get_mut(&mut sample).and_then(|v| v.downcast_mut::<u32>()) {
            *v = 9;
        }
        assert_eq!(sample.id, 9);
        assert!(id.get(&5_u8).is_none());
        assert_eq!(sample.label, "a");
    }

    #[test]
    fn flags() {
        let label = Field::new::<Sample, alloc::string::String>("label", |s| &s.label, |s| &mut s.label)
            .with_flags(FieldFlags::NO_SERIALIZE);
        assert!(!label.is_serialized());
        assert!(!label.is_required());
        assert_eq!(label.type_descriptor().name(), "String");
    }
}
