//! The intermediate tree shared by the text codecs.
//!
//! ## Menu
//!
//! - [`Tree`]: an append-only arena of [`Node`]s addressed by [`NodeId`].
//! - [`NodeValue`]: a [`Scalar`], a sequence or an object.
//! - [`SourceLocation`]: the line and column a node was parsed from.
//! - [`NodeRef`] and [`TreeSeed`]: the bridge to any `serde` format.
//!
//! The text format itself lives in [`text`](crate::text).

// -----------------------------------------------------------------------------
// Modules

mod node;
mod serde;

// -----------------------------------------------------------------------------
// Exports

pub use node::{Node, NodeId, NodeValue, Scalar, SourceLocation, Tree};
pub use serde::{NodeRef, TreeSeed};

pub(crate) use serde::as_whole_number;
