//! Heterogeneous object collections and their persistence.
//!
//! ## Menu
//!
//! - [`Clump`]: records stored behind [`ObjectHandle`]s, grouped in one
//!   [`ObjectList`] per exact record type.
//! - [`ObjectRef`]: a typed reference between objects, described as a pointer.
//! - Binary form: [`save_clump`], [`load_clump`], [`load_clump_with`] and
//!   the file helpers.
//! - Text form: [`encode_clump`] / [`decode_clump`] on a tree, and
//!   [`save_clump_text`] / [`load_clump_text`] on streams.
//!
//! ## Loading
//!
//! Both forms load in two phases. The first constructs a default object for
//! every persisted entry, the second decodes each object and resolves its
//! references as `(record, index)` pairs against the objects of the first.
//! A reference may therefore point to an object stored later in the stream.

mod binary_form;
mod error;
mod handle;
mod store;
mod tables;
mod text_form;

pub use binary_form::{load_clump, load_clump_from_file, load_clump_with};
pub use binary_form::{save_clump, save_clump_to_file};
pub use error::ClumpError;
pub use handle::{ObjectHandle, ObjectRef};
pub use store::{Clump, ObjectList};
pub use text_form::{DATA_TAG, HEAD_TAG, SIZE_TAG};
pub use text_form::{decode_clump, encode_clump, load_clump_text, save_clump_text};

use crate::codec::DecodeOptions;
use crate::text::WriterOptions;

/// Magic of a binary clump stream.
pub const CLUMP_MAGIC: [u8; 4] = *b"RTCL";

/// Options of the clump save functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClumpSaveOptions {
    /// Leave out lists without objects.
    pub skip_empty_lists: bool,
    /// Layout of the text form.
    pub writer: WriterOptions,
}

impl Default for ClumpSaveOptions {
    fn default() -> Self {
        Self {
            skip_empty_lists: true,
            writer: WriterOptions::default(),
        }
    }
}

/// Options of the clump load functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClumpLoadOptions {
    /// Keep loading after an object fails to decode.
    ///
    /// The failed object stays in the clump with the fields decoded so far,
    /// and the failure is logged.
    pub skip_failed_objects: bool,
    pub decode: DecodeOptions,
}

// -----------------------------------------------------------------------------
// Tests
