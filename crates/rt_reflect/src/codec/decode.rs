use alloc::format;
use alloc::string::String;
use core::any::Any;

use crate::codec::{DecodeError, DecodeErrorKind, FieldPath, PathSegment};
use crate::codec::{ID_TAG, NULL_INDEX, NoReferences, ReferenceResolver, TYPE_TAG};
use crate::info::{ArrayDescriptor, Described, EnumDescriptor, FLAG_SEPARATOR, FlagsDescriptor};
use crate::info::{PointerDescriptor, PrimitiveKind, RecordDescriptor, TypeDescriptor};
use crate::tree::{NodeId, NodeValue, Scalar, Tree};

/// The default of [`DecodeOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// How the decoder treats record fields that have no member in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingFieldPolicy {
    /// Keep the current value of the field.
    #[default]
    Keep,
    /// Fail on fields marked [`FieldFlags::REQUIRED`], keep the others.
    ///
    /// [`FieldFlags::REQUIRED`]: crate::info::FieldFlags::REQUIRED
    RejectRequired,
    /// Fail on every missing serialized field.
    RejectAll,
}

/// Options of the [`Decoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub missing_fields: MissingFieldPolicy,
    /// Maximum nesting of decoded values.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            missing_fields: MissingFieldPolicy::Keep,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Decodes a [`Tree`] into described values, in place.
///
/// - Member names unknown to a record are ignored.
/// - Fields without a member follow [`DecodeOptions::missing_fields`].
/// - A field shadowing an ancestor field of the same name reads the
///   second member of that name, the ancestor field the first one.
/// - Pointers are resolved through the [`ReferenceResolver`]. Without one,
///   every non-null pointer is an [`UnresolvedReference`].
///
/// On error, the values decoded so far keep their new content.
///
/// [`UnresolvedReference`]: DecodeErrorKind::UnresolvedReference
pub struct Decoder<'a> {
    options: DecodeOptions,
    resolver: &'a dyn ReferenceResolver,
}

impl Default for Decoder<'_> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Decoder<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            options: DecodeOptions::default(),
            resolver: &NoReferences,
        }
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_resolver(mut self, resolver: &'a dyn ReferenceResolver) -> Self {
        self.resolver = resolver;
        self
    }

    #[inline]
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decodes the node `node` of `tree` into `target`.
    #[inline]
    pub fn decode<T: Described>(
        &self,
        tree: &Tree,
        node: NodeId,
        target: &mut T,
    ) -> Result<(), DecodeError> {
        self.decode_dyn(tree, node, T::descriptor(), target)
    }

    /// Like [`decode`](Self::decode), for a type-erased `target` of the type
    /// described by `descriptor`.
    pub fn decode_dyn(
        &self,
        tree: &Tree,
        node: NodeId,
        descriptor: &'static TypeDescriptor,
        target: &mut dyn Any,
    ) -> Result<(), DecodeError> {
        Walk {
            options: &self.options,
            resolver: self.resolver,
            tree,
            path: FieldPath::new(),
            depth: 0,
        }
        .value(node, descriptor, target)
    }

    /// Like [`decode_dyn`](Self::decode_dyn), for an instance of `record`.
    pub fn decode_record(
        &self,
        tree: &Tree,
        node: NodeId,
        record: &'static RecordDescriptor,
        target: &mut dyn Any,
    ) -> Result<(), DecodeError> {
        let mut walk = Walk {
            options: &self.options,
            resolver: self.resolver,
            tree,
            path: FieldPath::new(),
            depth: 1,
        };
        let value = walk.node(node)?;
        walk.record(node, value, record, target)
    }
}

// -----------------------------------------------------------------------------
// Walk

struct Walk<'d, 't> {
    options: &'d DecodeOptions,
    resolver: &'d dyn ReferenceResolver,
    tree: &'t Tree,
    path: FieldPath,
    depth: usize,
}

#[inline(always)]
fn write<T: Any>(target: &mut dyn Any, value: T) -> bool {
    match target.downcast_mut::<T>() {
        Some(target) => {
            *target = value;
            true
        }
        None => false,
    }
}

impl<'t> Walk<'_, 't> {
    #[cold]
    fn error(&self, kind: DecodeErrorKind, node: NodeId) -> DecodeError {
        DecodeError {
            kind,
            path: self.path.render(),
            file: self.tree.file().map(String::from),
            location: self.tree.location(node),
        }
    }

    #[cold]
    fn invalid_target(&self, expected: &'static str, node: NodeId) -> DecodeError {
        self.error(
            DecodeErrorKind::InvalidTarget {
                expected,
                found: "a value of another type",
            },
            node,
        )
    }

    #[cold]
    fn type_mismatch(&self, expected: &'static str, found: &NodeValue, node: NodeId) -> DecodeError {
        let found = match found {
            NodeValue::Scalar(Scalar::Number(n)) => format!("number {n}"),
            NodeValue::Scalar(Scalar::Str(s)) => format!("string \"{s}\""),
            other => String::from(other.describe()),
        };
        self.error(DecodeErrorKind::TypeMismatch { expected, found }, node)
    }

    fn node(&self, node: NodeId) -> Result<&'t NodeValue, DecodeError> {
        let tree = self.tree;
        tree.value(node).ok_or_else(|| {
            self.error(
                DecodeErrorKind::MalformedTree {
                    expected: "a node of this tree",
                    found: "a dangling node id",
                },
                node,
            )
        })
    }

    fn value(
        &mut self,
        node: NodeId,
        descriptor: &'static TypeDescriptor,
        target: &mut dyn Any,
    ) -> Result<(), DecodeError> {
        if self.depth >= self.options.max_depth {
            return Err(self.error(
                DecodeErrorKind::RecursionLimitExceeded(self.options.max_depth),
                node,
            ));
        }

        let value = self.node(node)?;

        self.depth += 1;
        let result = match descriptor {
            TypeDescriptor::Primitive(info) => {
                self.primitive(node, value, info.kind(), info.name(), target)
            }
            TypeDescriptor::Enum(info) => self.enumeration(node, value, info, target),
            TypeDescriptor::Flags(info) => self.flags(node, value, info, target),
            TypeDescriptor::Record(info) => self.record(node, value, info, target),
            TypeDescriptor::Array(info) => self.array(node, value, info, target),
            TypeDescriptor::Pointer(info) => self.pointer(node, value, info, target),
        };
        self.depth -= 1;
        result
    }

    fn primitive(
        &self,
        node: NodeId,
        value: &NodeValue,
        kind: PrimitiveKind,
        type_name: &'static str,
        target: &mut dyn Any,
    ) -> Result<(), DecodeError> {
        let written = match (kind, value) {
            (PrimitiveKind::Bool, NodeValue::Scalar(Scalar::Bool(v))) => write(target, *v),
            (PrimitiveKind::String, NodeValue::Scalar(Scalar::Str(v))) => {
                match target.downcast_mut::<String>() {
                    Some(target) => {
                        target.clone_from(v);
                        true
                    }
                    None => false,
                }
            }
            (PrimitiveKind::F32, NodeValue::Scalar(Scalar::Number(v))) => write(target, *v as f32),
            (PrimitiveKind::F64, NodeValue::Scalar(Scalar::Number(v))) => write(target, *v),
            (kind, NodeValue::Scalar(Scalar::Number(v))) if kind.is_integer() => {
                let v = *v;
                let in_range = kind
                    .integer_range()
                    .is_some_and(|(min, max)| v.fract() == 0.0 && v >= min && v <= max);
                if !in_range {
                    return Err(self.type_mismatch(type_name, value, node));
                }
                match kind {
                    PrimitiveKind::I8 => write(target, v as i8),
                    PrimitiveKind::I16 => write(target, v as i16),
                    PrimitiveKind::I32 => write(target, v as i32),
                    PrimitiveKind::I64 => write(target, v as i64),
                    PrimitiveKind::U8 => write(target, v as u8),
                    PrimitiveKind::U16 => write(target, v as u16),
                    PrimitiveKind::U32 => write(target, v as u32),
                    PrimitiveKind::U64 => write(target, v as u64),
                    _ => false,
                }
            }
            _ => return Err(self.type_mismatch(type_name, value, node)),
        };

        if written {
            Ok(())
        } else {
            Err(self.invalid_target(type_name, node))
        }
    }

    fn enumeration(
        &self,
        node: NodeId,
        value: &NodeValue,
        info: &'static EnumDescriptor,
        target: &mut dyn Any,
    ) -> Result<(), DecodeError> {
        let NodeValue::Scalar(Scalar::Str(name)) = value else {
            return Err(self.type_mismatch(info.name(), value, node));
        };
        let Some(member) = info.find_name(name).and_then(|index| info.member_at(index)) else {
            return Err(self.error(
                DecodeErrorKind::NotFound {
                    type_name: info.name(),
                    name: name.clone(),
                },
                node,
            ));
        };
        if info.write(target, member.value) {
            Ok(())
        } else {
            Err(self.invalid_target(info.name(), node))
        }
    }

    fn flag(&self, node: NodeId, info: &'static FlagsDescriptor, token: &str) -> Result<u32, DecodeError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(0);
        }
        info.find_mask(token).ok_or_else(|| {
            self.error(
                DecodeErrorKind::UnknownFlag {
                    type_name: info.name(),
                    flag: String::from(token),
                },
                node,
            )
        })
    }

    fn flags(
        &self,
        node: NodeId,
        value: &NodeValue,
        info: &'static FlagsDescriptor,
        target: &mut dyn Any,
    ) -> Result<(), DecodeError> {
        let mut bits = 0;
        match value {
            NodeValue::Scalar(Scalar::Str(text)) => {
                for token in text.split(FLAG_SEPARATOR) {
                    bits |= self.flag(node, info, token)?;
                }
            }
            NodeValue::Sequence(items) => {
                for item in items {
                    let Some(token) = self.tree.as_str(*item) else {
                        let found = self.tree.value(*item).unwrap_or(value);
                        return Err(self.type_mismatch(info.name(), found, *item));
                    };
                    bits |= self.flag(*item, info, token)?;
                }
            }
            _ => return Err(self.type_mismatch(info.name(), value, node)),
        }

        if info.write(target, bits) {
            Ok(())
        } else {
            Err(self.invalid_target(info.name(), node))
        }
    }

    fn record(
        &mut self,
        node: NodeId,
        value: &'t NodeValue,
        info: &'static RecordDescriptor,
        target: &mut dyn Any,
    ) -> Result<(), DecodeError> {
        let NodeValue::Object(members) = value else {
            return Err(self.error(
                DecodeErrorKind::MalformedTree {
                    expected: "object",
                    found: value.describe(),
                },
                node,
            ));
        };

        let fields = info.full_fields();
        for (position, entry) in fields.iter().enumerate() {
            let field = entry.field;
            if !field.is_serialized() {
                continue;
            }

            // Shadowed fields read the n-th member of their name.
            let occurrence = fields[..position]
                .iter()
                .filter(|e| e.field.is_serialized() && e.field.name() == field.name())
                .count();
            let child = members
                .iter()
                .filter(|(name, _)| name == field.name())
                .nth(occurrence)
                .map(|(_, id)| *id);

            self.path.push(PathSegment::Field(field.name()));
            match child {
                Some(child) => {
                    let Some(field_target) = info.field_value_mut(entry, target) else {
                        return Err(self.invalid_target(info.name(), node));
                    };
                    self.value(child, field.type_descriptor(), field_target)?;
                }
                None => {
                    let reject = match self.options.missing_fields {
                        MissingFieldPolicy::Keep => false,
                        MissingFieldPolicy::RejectRequired => field.is_required(),
                        MissingFieldPolicy::RejectAll => true,
                    };
                    if reject {
                        return Err(self.error(
                            DecodeErrorKind::MissingRequiredField {
                                record: entry.owner.name(),
                                field: field.name(),
                            },
                            node,
                        ));
                    }
                }
            }
            self.path.pop();
        }
        Ok(())
    }

    fn array(
        &mut self,
        node: NodeId,
        value: &'t NodeValue,
        info: &'static ArrayDescriptor,
        target: &mut dyn Any,
    ) -> Result<(), DecodeError> {
        let NodeValue::Sequence(items) = value else {
            return Err(self.error(
                DecodeErrorKind::MalformedTree {
                    expected: "sequence",
                    found: value.describe(),
                },
                node,
            ));
        };

        if !info.resize(target, items.len()) {
            return Err(self.invalid_target(info.name(), node));
        }
        for (index, item) in items.iter().enumerate() {
            self.path.push(PathSegment::Index(index));
            let Some(element) = info.get_mut(target, index) else {
                return Err(self.invalid_target(info.name(), node));
            };
            self.value(*item, info.item(), element)?;
            self.path.pop();
        }
        Ok(())
    }

    fn pointer(
        &self,
        node: NodeId,
        value: &NodeValue,
        info: &'static PointerDescriptor,
        target: &mut dyn Any,
    ) -> Result<(), DecodeError> {
        let null = NULL_INDEX as f64;
        let handle = match value {
            NodeValue::Scalar(Scalar::Number(n)) if *n == null => None,
            NodeValue::Object(_) => {
                let record = self
                    .tree
                    .member(node, TYPE_TAG)
                    .and_then(|id| self.tree.as_str(id));
                let index = self
                    .tree
                    .member(node, ID_TAG)
                    .and_then(|id| self.tree.as_number(id));
                let (Some(record), Some(index)) = (record, index) else {
                    return Err(self.error(
                        DecodeErrorKind::MalformedTree {
                            expected: "an object with `_TYPE` and `_ID`",
                            found: "an object without them",
                        },
                        node,
                    ));
                };

                if index == null {
                    None
                } else {
                    let unresolved = || {
                        self.error(
                            DecodeErrorKind::UnresolvedReference {
                                record: String::from(record),
                                index: index as i64,
                            },
                            node,
                        )
                    };
                    if index < 0.0 || index.fract() != 0.0 {
                        return Err(unresolved());
                    }
                    let resolved = self
                        .resolver
                        .resolve_by_name(record, index as usize)
                        .ok_or_else(unresolved)?;

                    let Some(pointee) = info.pointee_record() else {
                        return Err(self.invalid_target(info.name(), node));
                    };
                    if !resolved.record.is_derived_from(pointee) {
                        return Err(self.error(
                            DecodeErrorKind::InvalidTarget {
                                expected: pointee.name(),
                                found: resolved.record.name(),
                            },
                            node,
                        ));
                    }
                    Some(resolved.handle)
                }
            }
            _ => return Err(self.type_mismatch(info.name(), value, node)),
        };

        if info.write(target, handle) {
            Ok(())
        } else {
            Err(self.invalid_target(info.name(), node))
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{DecodeOptions, Decoder, MissingFieldPolicy};
    use crate::clump::{ObjectHandle, ObjectRef};
    use crate::codec::{DecodeErrorKind, ReferenceResolver, ResolvedObject};
    use crate::info::{Described, FieldFlags, TypeGuid};
    use crate::text::Parser;
    use crate::tree::Tree;
    use crate::{impl_described_enum, impl_described_flags, impl_described_record};
    use alloc::string::String;
    use alloc::vec::Vec;
    use bitflags::bitflags;
    use slotmap::SlotMap;

    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    enum Kind {
        #[default]
        Solid,
        Liquid,
    }

    bitflags! {
        #[derive(Clone, Copy, Debug, Default, PartialEq)]
        struct Access: u32 {
            const READ = 1;
            const WRITE = 2;
            const EXECUTE = 4;
        }
    }

    #[derive(Default, Debug, PartialEq)]
    struct Item {
        id: u8,
        kind: Kind,
        access: Access,
        weight: f32,
        tags: Vec<String>,
    }

    #[derive(Default, Debug, PartialEq)]
    struct Crate {
        name: String,
        items: Vec<Item>,
        owner: u32,
    }

    #[derive(Default, Debug, PartialEq)]
    struct Link {
        to: ObjectRef<Item>,
    }

    #[derive(Default, Debug, PartialEq)]
    struct Nest {
        children: Vec<Nest>,
    }

    impl_described_enum!(Kind { Solid, Liquid });
    impl_described_flags!(Access { READ => "Read", WRITE => "Write", EXECUTE => "Execute" });
    impl_described_record!(Item {
        id: u8 => FieldFlags::REQUIRED,
        kind: Kind,
        access: Access,
        weight: f32,
        tags: Vec<String>,
    });
    impl_described_record!(Crate { name: String, items: Vec<Item>, owner: u32 });
    impl_described_record!(Link { to: ObjectRef<Item> });
    impl_described_record!(Nest { children: Vec<Nest> });

    fn parse(text: &str) -> (Tree, crate::tree::NodeId) {
        Parser::new(text).parse().unwrap()
    }

    fn decode<T: Described>(text: &str, target: &mut T) -> Result<(), crate::codec::DecodeError> {
        let (tree, root) = parse(text);
        Decoder::new().decode(&tree, root, target)
    }

    fn kind_of<T: Described + Default>(text: &str) -> DecodeErrorKind {
        decode(text, &mut T::default()).unwrap_err().kind
    }

    #[test]
    fn scalars_enums_and_flags() {
        let mut item = Item::default();
        decode(
            "id = 9, kind = liquid, access = \" Read | Execute \", weight = 1.5, tags = [a b]",
            &mut item,
        )
        .unwrap();
        assert_eq!(
            item,
            Item {
                id: 9,
                kind: Kind::Liquid,
                access: Access::READ | Access::EXECUTE,
                weight: 1.5,
                tags: alloc::vec![String::from("a"), String::from("b")],
            }
        );

        decode("access = [Write, Read]", &mut item).unwrap();
        assert_eq!(item.access, Access::READ | Access::WRITE);
        decode("access = \"\"", &mut item).unwrap();
        assert_eq!(item.access, Access::empty());
    }

    #[test]
    fn forward_compatibility() {
        let mut item = Item {
            id: 1,
            weight: 3.0,
            ..Default::default()
        };
        decode("id = 2, color = red, extra = { deep = [1 2] }", &mut item).unwrap();
        assert_eq!(item.id, 2);
        assert_eq!(item.weight, 3.0);
    }

    #[test]
    fn missing_field_policies() {
        let (tree, root) = parse("kind = Solid");

        let strict = Decoder::new().with_options(DecodeOptions {
            missing_fields: MissingFieldPolicy::RejectRequired,
            ..Default::default()
        });
        let err = strict.decode(&tree, root, &mut Item::default()).unwrap_err();
        assert_eq!(
            err.kind,
            DecodeErrorKind::MissingRequiredField { record: "Item", field: "id" }
        );
        assert_eq!(err.path, "id");

        let (tree, root) = parse("id = 1");
        strict.decode(&tree, root, &mut Item::default()).unwrap();

        let all = Decoder::new().with_options(DecodeOptions {
            missing_fields: MissingFieldPolicy::RejectAll,
            ..Default::default()
        });
        let err = all.decode(&tree, root, &mut Item::default()).unwrap_err();
        assert_eq!(
            err.kind,
            DecodeErrorKind::MissingRequiredField { record: "Item", field: "kind" }
        );
    }

    #[test]
    fn type_errors() {
        assert!(matches!(
            kind_of::<Item>("id = 256"),
            DecodeErrorKind::TypeMismatch { expected: "u8", .. }
        ));
        assert!(matches!(
            kind_of::<Item>("id = 1.5"),
            DecodeErrorKind::TypeMismatch { expected: "u8", .. }
        ));
        assert!(matches!(
            kind_of::<Item>("weight = \"heavy\""),
            DecodeErrorKind::TypeMismatch { expected: "f32", .. }
        ));
        assert!(matches!(
            kind_of::<Item>("kind = 1"),
            DecodeErrorKind::TypeMismatch { expected: "Kind", .. }
        ));
        assert_eq!(
            kind_of::<Item>("kind = Gas"),
            DecodeErrorKind::NotFound {
                type_name: "Kind",
                name: String::from("Gas")
            }
        );
        assert_eq!(
            kind_of::<Item>("access = \"Read|Delete\""),
            DecodeErrorKind::UnknownFlag {
                type_name: "Access",
                flag: String::from("Delete")
            }
        );
        assert_eq!(
            kind_of::<Item>("tags = text"),
            DecodeErrorKind::MalformedTree {
                expected: "sequence",
                found: "string"
            }
        );
        assert_eq!(
            kind_of::<Crate>("items = [ 1 ]"),
            DecodeErrorKind::MalformedTree {
                expected: "object",
                found: "number"
            }
        );
    }

    #[test]
    fn error_path_and_location() {
        let (tree, root) = Parser::new("name = box\nitems = [\n { id = 1 }\n { id = 2, tags = [ x, 3 ] }\n]")
            .with_file("crate.son")
            .parse()
            .unwrap();
        let mut target = Crate::default();
        let err = Decoder::new().decode(&tree, root, &mut target).unwrap_err();

        assert_eq!(err.path, "items[1].tags[1]");
        assert_eq!(err.file.as_deref(), Some("crate.son"));
        assert_eq!(err.location.map(|l| (l.line, l.column)), Some((4, 24)));
        // Partial writes are kept.
        assert_eq!(target.name, "box");
        assert_eq!(target.items[0].id, 1);
    }

    #[test]
    fn recursion_limit() {
        let mut text = String::from("children = ");
        for _ in 0..6 {
            text.push_str("[ { children = ");
        }
        text.push_str("[]");
        for _ in 0..6 {
            text.push_str(" } ]");
        }
        let (tree, root) = parse(&text);

        let mut nest = Nest::default();
        Decoder::new().decode(&tree, root, &mut nest).unwrap();

        let shallow = Decoder::new().with_options(DecodeOptions {
            max_depth: 8,
            ..Default::default()
        });
        let err = shallow.decode(&tree, root, &mut Nest::default()).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::RecursionLimitExceeded(8));
    }

    struct Objects {
        item: ObjectHandle,
        link: ObjectHandle,
    }

    impl ReferenceResolver for Objects {
        fn resolve_by_name(&self, record: &str, index: usize) -> Option<ResolvedObject> {
            match (record, index) {
                ("Item", 0) => Some(ResolvedObject {
                    handle: self.item,
                    record: Item::descriptor().as_record().ok()?,
                }),
                ("Link", 0) => Some(ResolvedObject {
                    handle: self.link,
                    record: Link::descriptor().as_record().ok()?,
                }),
                _ => None,
            }
        }

        fn resolve_by_guid(&self, _: TypeGuid, _: usize) -> Option<ResolvedObject> {
            None
        }
    }

    #[test]
    fn pointers() {
        let mut slots = SlotMap::<ObjectHandle, ()>::with_key();
        let objects = Objects {
            item: slots.insert(()),
            link: slots.insert(()),
        };
        let decoder = Decoder::new().with_resolver(&objects);

        let mut link = Link::default();
        let (tree, root) = parse("to = { _TYPE = Item, _ID = 0 }");
        decoder.decode(&tree, root, &mut link).unwrap();
        assert_eq!(link.to.handle(), Some(objects.item));

        let (tree, root) = parse("to = -1");
        decoder.decode(&tree, root, &mut link).unwrap();
        assert!(link.to.is_null());

        let (tree, root) = parse("to = { _TYPE = Item, _ID = 4 }");
        let err = decoder.decode(&tree, root, &mut link).unwrap_err();
        assert_eq!(
            err.kind,
            DecodeErrorKind::UnresolvedReference {
                record: String::from("Item"),
                index: 4
            }
        );

        let (tree, root) = parse("to = { _TYPE = Link, _ID = 0 }");
        let err = decoder.decode(&tree, root, &mut link).unwrap_err();
        assert_eq!(
            err.kind,
            DecodeErrorKind::InvalidTarget {
                expected: "Item",
                found: "Link"
            }
        );

        let (tree, root) = parse("to = { _TYPE = Item, _ID = 0 }");
        let err = Decoder::new().decode(&tree, root, &mut link).unwrap_err();
        assert!(matches!(err.kind, DecodeErrorKind::UnresolvedReference { .. }));
    }

    #[test]
    fn wrong_target_type() {
        let (tree, root) = parse("id = 1");
        let mut wrong = 0_u64;
        let err = Decoder::new()
            .decode_dyn(&tree, root, Item::descriptor(), &mut wrong)
            .unwrap_err();
        assert!(matches!(err.kind, DecodeErrorKind::InvalidTarget { expected: "Item", .. }));
    }
}
