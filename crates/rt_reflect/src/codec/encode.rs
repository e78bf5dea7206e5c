use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::codec::{ID_TAG, NULL_INDEX, NoReferences, ReferenceTable, TYPE_TAG};
use crate::info::{Described, PrimitiveKind, RecordDescriptor, TypeDescriptor};
use crate::tree::{NodeId, Scalar, Tree};

/// Encodes described values into a [`Tree`].
///
/// Encoding never fails:
///
/// - enums are written by name, [`INVALID_VALUE`] for unknown values;
/// - flags are written as `|`-joined names, unnamed bits are dropped;
/// - pointers outside the [`ReferenceTable`] are written as null;
/// - a value that does not match its descriptor is logged and written as
///   an empty object.
///
/// Without a reference table every pointer is written as null.
///
/// [`INVALID_VALUE`]: crate::info::INVALID_VALUE
pub struct Encoder<'a> {
    references: &'a dyn ReferenceTable,
}

impl Default for Encoder<'_> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Encoder<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            references: &NoReferences,
        }
    }

    /// Writes pointers through `references`.
    #[inline]
    pub fn with_references(references: &'a dyn ReferenceTable) -> Self {
        Self { references }
    }

    /// Appends the encoding of `value` to `tree` and returns its root node.
    #[inline]
    pub fn encode<T: Described>(&self, value: &T, tree: &mut Tree) -> NodeId {
        self.encode_dyn(value, T::descriptor(), tree)
    }

    /// Like [`encode`](Self::encode), for a type-erased `value` of the type
    /// described by `descriptor`.
    pub fn encode_dyn(
        &self,
        value: &dyn Any,
        descriptor: &'static TypeDescriptor,
        tree: &mut Tree,
    ) -> NodeId {
        match descriptor {
            TypeDescriptor::Primitive(info) => match primitive_scalar(info.kind(), value) {
                Some(Scalar::Str(value)) => tree.string(value),
                Some(Scalar::Number(value)) => tree.number(value),
                Some(Scalar::Bool(value)) => tree.boolean(value),
                None => mismatch(descriptor.name(), tree),
            },
            TypeDescriptor::Enum(info) => match info.read(value) {
                Some(raw) => tree.string(info.string_by_value(raw)),
                None => mismatch(descriptor.name(), tree),
            },
            TypeDescriptor::Flags(info) => match info.read(value) {
                Some(bits) => tree.string(info.render(bits)),
                None => mismatch(descriptor.name(), tree),
            },
            TypeDescriptor::Record(info) => self.encode_record(value, info, tree),
            TypeDescriptor::Array(info) => {
                let Some(len) = info.len(value) else {
                    return mismatch(descriptor.name(), tree);
                };
                let mut items = Vec::with_capacity(len);
                for index in 0..len {
                    let Some(item) = info.get(value, index) else {
                        return mismatch(descriptor.name(), tree);
                    };
                    items.push(self.encode_dyn(item, info.item(), tree));
                }
                tree.sequence(items)
            }
            TypeDescriptor::Pointer(info) => match info.read(value) {
                None => mismatch(descriptor.name(), tree),
                Some(None) => tree.number(NULL_INDEX as f64),
                Some(Some(handle)) => match self.references.locate(handle) {
                    Some(location) => {
                        let name = tree.string(location.record.name());
                        let index = tree.number(location.index as f64);
                        tree.object(alloc::vec![
                            (String::from(TYPE_TAG), name),
                            (String::from(ID_TAG), index),
                        ])
                    }
                    None => {
                        log::warn!(
                            "`{}` points to an object outside the saved set, written as null",
                            info.name()
                        );
                        tree.number(NULL_INDEX as f64)
                    }
                },
            },
        }
    }

    /// Like [`encode_dyn`](Self::encode_dyn), for an instance of `record`.
    pub fn encode_record(
        &self,
        value: &dyn Any,
        record: &'static RecordDescriptor,
        tree: &mut Tree,
    ) -> NodeId {
        let mut members = Vec::new();
        for entry in record.full_fields() {
            if !entry.field.is_serialized() {
                continue;
            }
            let Some(field) = record.field_value(entry, value) else {
                return mismatch(record.name(), tree);
            };
            let child = self.encode_dyn(field, entry.field.type_descriptor(), tree);
            members.push((String::from(entry.field.name()), child));
        }
        tree.object(members)
    }
}

fn primitive_scalar(kind: PrimitiveKind, value: &dyn Any) -> Option<Scalar> {
    #[inline(always)]
    fn number<T: Any + Copy + Into<f64>>(value: &dyn Any) -> Option<Scalar> {
        value.downcast_ref::<T>().map(|v| Scalar::Number((*v).into()))
    }

    match kind {
        PrimitiveKind::Bool => value.downcast_ref::<bool>().map(|v| Scalar::Bool(*v)),
        PrimitiveKind::I8 => number::<i8>(value),
        PrimitiveKind::I16 => number::<i16>(value),
        PrimitiveKind::I32 => number::<i32>(value),
        PrimitiveKind::U8 => number::<u8>(value),
        PrimitiveKind::U16 => number::<u16>(value),
        PrimitiveKind::U32 => number::<u32>(value),
        PrimitiveKind::F32 => number::<f32>(value),
        PrimitiveKind::F64 => number::<f64>(value),
        // Values above 2^53 lose precision.
        PrimitiveKind::I64 => value.downcast_ref::<i64>().map(|v| Scalar::Number(*v as f64)),
        PrimitiveKind::U64 => value.downcast_ref::<u64>().map(|v| Scalar::Number(*v as f64)),
        PrimitiveKind::String => value.downcast_ref::<String>().map(|v| Scalar::Str(v.clone())),
    }
}

#[cold]
fn mismatch(type_name: &str, tree: &mut Tree) -> NodeId {
    log::error!("value does not match the descriptor of `{type_name}`");
    tree.object(Vec::new())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Encoder;
    use crate::clump::{ObjectHandle, ObjectRef};
    use crate::codec::{ObjectLocation, ReferenceTable};
    use crate::info::{Described, FieldFlags, RecordDescriptor};
    use crate::tree::{NodeValue, Tree};
    use crate::{impl_described_flags, impl_described_record};
    use alloc::string::String;
    use alloc::vec::Vec;
    use bitflags::bitflags;
    use slotmap::SlotMap;

    bitflags! {
        #[derive(Clone, Copy, Debug, Default, PartialEq)]
        struct Layers: u8 {
            const GROUND = 1;
            const WATER = 2;
            const SKY = 4;
        }
    }

    impl_described_flags!(Layers { GROUND => "Ground", WATER => "Water", SKY => "Sky" });

    #[derive(Default)]
    struct Beacon {
        id: u64,
        layers: Layers,
        scratch: Vec<u8>,
        target: ObjectRef<Beacon>,
        tags: Vec<String>,
    }

    impl_described_record!(Beacon {
        id: u64,
        layers: Layers,
        scratch: Vec<u8> => FieldFlags::NO_SERIALIZE,
        target: ObjectRef<Beacon>,
        tags: Vec<String>,
    });

    struct OneObject(ObjectHandle);

    impl ReferenceTable for OneObject {
        fn locate(&self, handle: ObjectHandle) -> Option<ObjectLocation> {
            let record: &'static RecordDescriptor = Beacon::descriptor().as_record().ok()?;
            (handle == self.0).then_some(ObjectLocation { record, index: 3 })
        }
    }

    fn keys(tree: &Tree, root: crate::tree::NodeId) -> Vec<&str> {
        tree.members(root).unwrap().iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn record_layout() {
        let beacon = Beacon {
            id: 7,
            layers: Layers::GROUND | Layers::SKY,
            scratch: alloc::vec![1, 2, 3],
            tags: alloc::vec![String::from("a")],
            ..Default::default()
        };
        let mut tree = Tree::new();
        let root = Encoder::new().encode(&beacon, &mut tree);

        assert_eq!(keys(&tree, root), ["id", "layers", "target", "tags"]);
        assert_eq!(tree.as_number(tree.member(root, "id").unwrap()), Some(7.0));
        assert_eq!(tree.as_str(tree.member(root, "layers").unwrap()), Some("Ground|Sky"));
        assert_eq!(tree.as_number(tree.member(root, "target").unwrap()), Some(-1.0));
        let tags = tree.member(root, "tags").unwrap();
        assert_eq!(tree.items(tags).unwrap().len(), 1);
    }

    #[test]
    fn pointers_through_table() {
        let mut slots = SlotMap::<ObjectHandle, ()>::with_key();
        let known = slots.insert(());
        let unknown = slots.insert(());
        let table = OneObject(known);
        let encoder = Encoder::with_references(&table);

        let mut tree = Tree::new();
        let beacon = Beacon {
            target: ObjectRef::new(known),
            ..Default::default()
        };
        let root = encoder.encode(&beacon, &mut tree);
        let target = tree.member(root, "target").unwrap();
        assert_eq!(tree.as_str(tree.member(target, "_TYPE").unwrap()), Some("Beacon"));
        assert_eq!(tree.as_number(tree.member(target, "_ID").unwrap()), Some(3.0));

        let beacon = Beacon {
            target: ObjectRef::new(unknown),
            ..Default::default()
        };
        let root = encoder.encode(&beacon, &mut tree);
        let target = tree.member(root, "target").unwrap();
        assert_eq!(tree.as_number(target), Some(-1.0));
    }

    #[test]
    fn mismatched_value_is_total() {
        let mut tree = Tree::new();
        let root = Encoder::new().encode_dyn(&1_u8, Beacon::descriptor(), &mut tree);
        assert_eq!(tree.value(root), Some(&NodeValue::Object(Vec::new())));

        let root = Encoder::new().encode_dyn(&1_u8, String::descriptor(), &mut tree);
        assert!(tree.members(root).is_some());
    }
}
