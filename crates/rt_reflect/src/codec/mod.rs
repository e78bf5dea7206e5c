//! Type-directed conversion between described values and [`Tree`]s.
//!
//! ## Menu
//!
//! - [`Encoder`]: value to tree, never fails.
//! - [`Decoder`]: tree to value, in place, with [`DecodeOptions`].
//! - [`ReferenceTable`] / [`ReferenceResolver`]: how pointers are written
//!   and resolved, provided by the clump persistence.
//! - [`DecodeError`]: failures with their [`FieldPath`] and source position.
//!
//! ## Layout
//!
//! | Kind      | Tree                                          |
//! |-----------|-----------------------------------------------|
//! | primitive | number, string or boolean                     |
//! | enum      | member name                                   |
//! | flags     | member names joined by a bar                  |
//! | record    | object of the serialized fields, in order     |
//! | array     | sequence                                      |
//! | pointer   | `-1`, or `{ _TYPE = Record, _ID = index }`    |
//!
//! [`Tree`]: crate::tree::Tree

mod decode;
mod encode;
mod error;
mod path;
mod references;

pub use decode::{DEFAULT_MAX_DEPTH, DecodeOptions, Decoder, MissingFieldPolicy};
pub use encode::Encoder;
pub use error::{DecodeError, DecodeErrorKind};
pub use path::{FieldPath, PathSegment};
pub use references::{NoReferences, ObjectLocation, ReferenceResolver, ReferenceTable};
pub use references::ResolvedObject;

use crate::info::Described;
use crate::tree::{NodeId, Tree};

/// Member naming the record of a persisted object reference.
pub const TYPE_TAG: &str = "_TYPE";

/// Member holding the index of a persisted object reference.
pub const ID_TAG: &str = "_ID";

/// The persisted index of a null pointer.
pub const NULL_INDEX: i32 = -1;

/// Encodes `value` into `tree` with the default [`Encoder`].
#[inline]
pub fn encode<T: Described>(value: &T, tree: &mut Tree) -> NodeId {
    Encoder::new().encode(value, tree)
}

/// Decodes `node` into `target` with the default [`Decoder`].
#[inline]
pub fn decode<T: Described>(tree: &Tree, node: NodeId, target: &mut T) -> Result<(), DecodeError> {
    Decoder::new().decode(tree, node, target)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{DecodeErrorKind, decode, encode};
    use crate::text::{Parser, TextWriter, WriterOptions};
    use crate::tree::Tree;
    use crate::{impl_described_enum, impl_described_flags, impl_described_record};
    use alloc::string::String;
    use bitflags::bitflags;

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    enum Color {
        #[default]
        Red = 1,
        Green = 2,
        Blue = 4,
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
    struct Marker {
        color: Color,
        access: Access,
        at: Point3,
        label: String,
    }

    /// Shadows `Point::x` with a field of another type.
    #[derive(Default, Debug, PartialEq)]
    struct Tagged {
        base: Point,
        x: String,
    }

    impl_described_enum!(Color { Red, Green, Blue });
    impl_described_flags!(Access { READ => "Read", WRITE => "Write", EXECUTE => "Execute" });
    impl_described_record!(Point { x: f32, y: f32 });
    impl_described_record!(Point3 : base as Point { z: f32 });
    impl_described_record!(Marker { color: Color, access: Access, at: Point3, label: String });
    impl_described_record!(Tagged : base as Point { x: String });

    fn to_text<T: crate::info::Described>(value: &T) -> String {
        let mut tree = Tree::new();
        let root = encode(value, &mut tree);
        TextWriter::new(&tree, &WriterOptions::default()).to_string(root)
    }

    fn from_text<T: crate::info::Described + Default>(text: &str) -> T {
        let (tree, root) = Parser::new(text).parse().unwrap();
        let mut value = T::default();
        decode(&tree, root, &mut value).unwrap();
        value
    }

    #[test]
    fn enum_by_name() {
        let marker = Marker {
            color: Color::Green,
            ..Default::default()
        };
        let text = to_text(&marker);
        assert!(text.contains("color = \"Green\""), "{text}");
        assert_eq!(from_text::<Marker>(&text).color, Color::Green);
        assert_eq!(from_text::<Marker>("color = BLUE").color, Color::Blue);
    }

    #[test]
    fn flags_by_names() {
        let marker = Marker {
            access: Access::READ | Access::EXECUTE,
            ..Default::default()
        };
        let text = to_text(&marker);
        assert!(text.contains("access = \"Read|Execute\""), "{text}");
        assert_eq!(from_text::<Marker>(&text).access, Access::READ | Access::EXECUTE);
    }

    #[test]
    fn derived_record_flattens_parent() {
        let point = Point3 {
            base: Point { x: 1.0, y: 2.0 },
            z: 3.0,
        };
        let mut tree = Tree::new();
        let root = encode(&point, &mut tree);
        let keys: alloc::vec::Vec<_> = tree
            .members(root)
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, ["x", "y", "z"]);

        let back: Point3 = from_text(&to_text(&point));
        assert_eq!(back, point);
    }

    #[test]
    fn nested_round_trip() {
        let marker = Marker {
            color: Color::Blue,
            access: Access::WRITE,
            at: Point3 {
                base: Point { x: -1.5, y: 0.25 },
                z: 8.0,
            },
            label: String::from("spawn point"),
        };
        assert_eq!(from_text::<Marker>(&to_text(&marker)), marker);
    }

    #[test]
    fn shadowed_fields_keep_their_order() {
        let tagged = Tagged {
            base: Point { x: 4.0, y: 5.0 },
            x: String::from("four"),
        };
        let mut tree = Tree::new();
        let root = encode(&tagged, &mut tree);
        assert_eq!(tree.members(root).unwrap().len(), 3);

        let mut back = Tagged::default();
        decode(&tree, root, &mut back).unwrap();
        assert_eq!(back, tagged);
    }

    #[test]
    fn unknown_enum_name() {
        let (tree, root) = Parser::new("color = Purple").parse().unwrap();
        let err = decode(&tree, root, &mut Marker::default()).unwrap_err();
        assert_eq!(err.path, "color");
        assert_eq!(
            err.kind,
            DecodeErrorKind::NotFound {
                type_name: "Color",
                name: String::from("Purple")
            }
        );
    }
}
