use alloc::boxed::Box;
use alloc::vec::Vec;
use core::alloc::Layout;
use core::any::{Any, TypeId};
use core::fmt;
use std::sync::OnceLock;

use rt_utils::hash::HashMap;

use crate::info::{Described, Field, TypeDescriptor, TypeGuid};

/// A type-erased default constructor stored in a [`RecordDescriptor`].
pub type Constructor = fn() -> Box<dyn Any + Send + Sync>;

fn construct_default<T: Default + Send + Sync + 'static>() -> Box<dyn Any + Send + Sync> {
    Box::new(T::default())
}

// -----------------------------------------------------------------------------
// ParentLink

/// Link from a derived record to the record it extends.
///
/// Rust has no struct inheritance, so the derived type embeds its parent
/// and the link projects the derived value to that embedded part.
pub struct ParentLink {
    descriptor: fn() -> &'static TypeDescriptor,
    get: fn(&dyn Any) -> Option<&dyn Any>,
    get_mut: fn(&mut dyn Any) -> Option<&mut dyn Any>,
}

impl ParentLink {
    /// Descriptor of the linked parent type.
    #[inline]
    pub fn descriptor(&self) -> &'static TypeDescriptor {
        (self.descriptor)()
    }

    /// The parent record, `None` when the linked type is not a record.
    pub fn record(&self) -> Option<&'static RecordDescriptor> {
        self.descriptor().as_record().ok()
    }
}

// -----------------------------------------------------------------------------
// FieldRef

/// One entry of a record's full field list.
#[derive(Debug, Clone, Copy)]
pub struct FieldRef {
    /// The field itself.
    pub field: &'static Field,
    /// The record that declares the field.
    pub owner: &'static RecordDescriptor,
    /// How many parent projections lead from the traversed record to `owner`.
    pub depth: usize,
}

// -----------------------------------------------------------------------------
// RecordDescriptor

/// Descriptor of a composite type with named fields and an optional single parent.
///
/// - [`fields`](Self::fields) are the fields declared by this record, in order.
/// - [`full_fields`](Self::full_fields) is the traversal order used by the
///   codecs: the parent's full list followed by the own fields.
/// - [`field`](Self::field) looks up by name with shadowing: own fields
///   first, then the parent chain.
///
/// A field shadowing an ancestor field of the same name hides it from
/// [`field`](Self::field) but both are still visited by traversal.
///
/// # Examples
///
/// ```
/// use rt_reflect::info::Described;
/// use rt_reflect::impl_described_record;
///
/// #[derive(Default)]
/// struct Point { x: f32, y: f32 }
/// #[derive(Default)]
/// struct Point3 { base: Point, z: f32 }
///
/// impl_described_record!(Point { x: f32, y: f32 });
/// impl_described_record!(Point3 : base as Point { z: f32 });
///
/// let info = Point3::descriptor().as_record().unwrap();
/// let names: Vec<_> = info.full_fields().iter().map(|f| f.field.name()).collect();
/// assert_eq!(names, ["x", "y", "z"]);
/// ```
pub struct RecordDescriptor {
    name: &'static str,
    guid: TypeGuid,
    type_id: TypeId,
    layout: Layout,
    parent: Option<ParentLink>,
    fields: Box<[Field]>,
    field_indices: HashMap<&'static str, usize>,
    constructor: Option<Constructor>,
    full_fields: OnceLock<Box<[FieldRef]>>,
}

impl RecordDescriptor {
    /// Creates a record descriptor for `T` without fields.
    pub fn new<T: Any>(name: &'static str) -> Self {
        Self {
            name,
            guid: TypeGuid::from_name(name),
            type_id: TypeId::of::<T>(),
            layout: Layout::new::<T>(),
            parent: None,
            fields: Box::new([]),
            field_indices: HashMap::default(),
            constructor: None,
            full_fields: OnceLock::new(),
        }
    }

    /// Declares `P` as the parent record.
    ///
    /// `get` and `get_mut` project a derived value to its parent part and
    /// must return `None` for values of any other type.
    pub fn with_parent<P: Described>(
        mut self,
        get: fn(&dyn Any) -> Option<&dyn Any>,
        get_mut: fn(&mut dyn Any) -> Option<&mut dyn Any>,
    ) -> Self {
        self.parent = Some(ParentLink {
            descriptor: P::descriptor,
            get,
            get_mut,
        });
        self
    }

    /// Sets the own fields, in declaration order.
    ///
    /// On duplicated names the first declared field wins name lookups.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        let fields: Vec<Field> = fields.into_iter().collect();
        let mut field_indices = HashMap::with_capacity_and_hasher(fields.len(), Default::default());
        for (index, field) in fields.iter().enumerate() {
            field_indices.entry(field.name()).or_insert(index);
        }
        self.fields = fields.into_boxed_slice();
        self.field_indices = field_indices;
        self
    }

    /// Registers `T::default` as the constructor used when loading objects.
    ///
    /// `T` must be the described type.
    pub fn with_default<T: Default + Send + Sync + 'static>(mut self) -> Self {
        debug_assert_eq!(TypeId::of::<T>(), self.type_id);
        self.constructor = Some(construct_default::<T>);
        self
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

    /// The link to the parent record, if any.
    #[inline]
    pub fn parent_link(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    /// The parent record, if any.
    pub fn parent(&self) -> Option<&'static RecordDescriptor> {
        self.parent.as_ref().and_then(ParentLink::record)
    }

    /// Number of ancestors.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(parent) = current {
            depth += 1;
            current = parent.parent();
        }
        depth
    }

    /// Own fields in declaration order.
    #[inline]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Finds a field by name, searching own fields before the parent chain.
    pub fn field(&self, name: &str) -> Option<&Field> {
        match self.field_indices.get(name) {
            Some(&index) => Some(&self.fields[index]),
            None => self.parent().and_then(|parent| parent.field(name)),
        }
    }

    /// The parent's full field list followed by the own fields.
    ///
    /// Computed on first use and cached for the lifetime of the descriptor.
    pub fn full_fields(&'static self) -> &'static [FieldRef] {
        self.full_fields.get_or_init(|| {
            let mut list = Vec::new();
            if let Some(parent) = self.parent() {
                list.extend(parent.full_fields().iter().map(|entry| FieldRef {
                    depth: entry.depth + 1,
                    ..*entry
                }));
            }
            list.extend(self.fields.iter().map(|field| FieldRef {
                field,
                owner: self,
                depth: 0,
            }));
            list.into_boxed_slice()
        })
    }

    /// Returns `true` if `self` is `other` or one of its descendants.
    pub fn is_derived_from(&self, other: &RecordDescriptor) -> bool {
        let mut current = Some(self);
        while let Some(record) = current {
            if record.type_id == other.type_id {
                return true;
            }
            current = record.parent();
        }
        false
    }

    /// Returns `true` if objects of this record can be constructed at load time.
    #[inline]
    pub fn is_concrete(&self) -> bool {
        self.constructor.is_some()
    }

    /// Creates a default instance, if a constructor was registered.
    pub fn construct(&self) -> Option<Box<dyn Any + Send + Sync>> {
        self.constructor.map(|f| f())
    }

    /// Applies `depth` parent projections to `value`.
    pub fn project<'a>(&self, value: &'a dyn Any, depth: usize) -> Option<&'a dyn Any> {
        let mut record = self;
        let mut value = value;
        for _ in 0..depth {
            let link = record.parent.as_ref()?;
            value = (link.get)(value)?;
            record = link.record()?;
        }
        Some(value)
    }

    /// Applies `depth` parent projections to `value`, mutably.
    pub fn project_mut<'a>(&self, value: &'a mut dyn Any, depth: usize) -> Option<&'a mut dyn Any> {
        let mut record = self;
        let mut value = value;
        for _ in 0..depth {
            let link = record.parent.as_ref()?;
            value = (link.get_mut)(value)?;
            record = link.record()?;
        }
        Some(value)
    }

    /// Reads the field `entry` of `value`, `value` being an instance of `self`.
    pub fn field_value<'a>(&self, entry: &FieldRef, value: &'a dyn Any) -> Option<&'a dyn Any> {
        entry.field.get(self.project(value, entry.depth)?)
    }

    /// Mutable variant of [`field_value`](Self::field_value).
    pub fn field_value_mut<'a>(
        &self,
        entry: &FieldRef,
        value: &'a mut dyn Any,
    ) -> Option<&'a mut dyn Any> {
        entry.field.get_mut(self.project_mut(value, entry.depth)?)
    }
}

impl fmt::Debug for RecordDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordDescriptor")
            .field("name", &self.name)
            .field("guid", &self.guid)
            .field("parent", &self.parent().map(RecordDescriptor::name))
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::impl_described_record;
    use crate::info::{Described, RecordDescriptor};
    use alloc::vec::Vec;

    #[derive(Default, Debug, PartialEq)]
    struct Point {
        x: f32,
        y: f32,
    }

    #[derive(Default, Debug, PartialEq)]
    struct Point3 {
        base: Point,
        z: f32,
    }

    #[derive(Default, Debug, PartialEq)]
    struct Shadow {
        base: Point3,
        x: i32,
    }

    impl_described_record!(Point { x: f32, y: f32 });
    impl_described_record!(Point3 : base as Point { z: f32 });
    impl_described_record!(Shadow : base as Point3 { x: i32 });

    fn record<T: Described>() -> &'static RecordDescriptor {
        T::descriptor().as_record().unwrap()
    }

    fn names(info: &'static RecordDescriptor) -> Vec<&'static str> {
        info.full_fields().iter().map(|f| f.field.name()).collect()
    }

    #[test]
    fn full_field_list_concatenates_parents() {
        assert_eq!(names(record::<Point>()), ["x", "y"]);
        assert_eq!(names(record::<Point3>()), ["x", "y", "z"]);
        assert_eq!(names(record::<Shadow>()), ["x", "y", "z", "x"]);

        let depths: Vec<_> = record::<Shadow>().full_fields().iter().map(|f| f.depth).collect();
        assert_eq!(depths, [2, 2, 1, 0]);
    }

    #[test]
    fn full_field_list_is_cached() {
        let a = record::<Point3>().full_fields();
        let b = record::<Point3>().full_fields();
        assert!(core::ptr::eq(a, b));
    }

    #[test]
    fn lookup_shadows_ancestor_fields() {
        let shadow = record::<Shadow>();
        let x = shadow.field("x").unwrap();
        assert_eq!(x.type_descriptor().name(), "i32");
        assert_eq!(shadow.field("y").unwrap().type_descriptor().name(), "f32");
        assert!(shadow.field("w").is_none());
    }

    #[test]
    fn inheritance_queries() {
        let point = record::<Point>();
        let point3 = record::<Point3>();
        let shadow = record::<Shadow>();
        assert!(shadow.is_derived_from(point));
        assert!(point3.is_derived_from(point3));
        assert!(!point.is_derived_from(point3));
        assert_eq!(shadow.depth(), 2);
        assert_eq!(point.depth(), 0);
        assert!(core::ptr::eq(point3.parent().unwrap(), point));
    }

    #[test]
    fn field_values_through_projection() {
        let info = record::<Shadow>();
        let mut value = Shadow {
            base: Point3 {
                base: Point { x: 1.0, y: 2.0 },
                z: 3.0,
            },
            x: 4,
        };
        let fields = info.full_fields();

        let y = info.field_value(&fields[1], &value).unwrap();
        assert_eq!(y.downcast_ref::<f32>(), Some(&2.0));

        let z = info.field_value_mut(&fields[2], &mut value).unwrap();
        *z.downcast_mut::<f32>().unwrap() = 30.0;
        assert_eq!(value.base.z, 30.0);

        let x = info.field_value(&fields[3], &value).unwrap();
        assert_eq!(x.downcast_ref::<i32>(), Some(&4));
    }

    #[test]
    fn construct_default() {
        let info = record::<Point3>();
        assert!(info.is_concrete());
        let boxed = info.construct().unwrap();
        assert_eq!(boxed.downcast_ref::<Point3>(), Some(&Point3::default()));
    }
}
