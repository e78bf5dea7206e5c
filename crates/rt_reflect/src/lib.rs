//! Run-time type descriptors and the codecs built on top of them.
//!
//! ## Menu
//!
//! - [`info`]: descriptors for primitives, enums, flag sets, records,
//!   pointers and arrays, plus the [`Described`](info::Described) trait.
//! - [`registry`]: the [`TypeRegistry`](registry::TypeRegistry) and the
//!   process-wide registry lifecycle.
//! - [`tree`]: the intermediate tree and its serde bridge.
//! - [`text`]: the text format of trees, and text load/save helpers.
//! - [`codec`]: type-directed encode/decode between values and trees.
//! - [`binary`]: the flat binary stream codec.
//! - [`clump`]: heterogeneous object collections and their persistence.
//!
//! ## Example
//!
//! ```
//! use rt_reflect::codec;
//! use rt_reflect::impl_described_record;
//! use rt_reflect::tree::Tree;
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Point {
//!     x: f32,
//!     y: f32,
//! }
//!
//! impl_described_record!(Point { x: f32, y: f32 });
//!
//! let mut tree = Tree::new();
//! let root = codec::encode(&Point { x: 1.0, y: 2.0 }, &mut tree);
//!
//! let mut point = Point::default();
//! codec::decode(&tree, root, &mut point).unwrap();
//! assert_eq!(point, Point { x: 1.0, y: 2.0 });
//! ```

// -----------------------------------------------------------------------------
// no_std style imports

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod macros;

pub mod binary;
pub mod clump;
pub mod codec;
pub mod info;
pub mod registry;
pub mod text;
pub mod tree;

#[doc(hidden)]
pub mod __macro_exports;

// -----------------------------------------------------------------------------
// Exports

pub use info::{Described, TypeDescriptor, TypeKind};
