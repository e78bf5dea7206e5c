//! The human-readable text format.
//!
//! ## Menu
//!
//! - [`Parser`]: text to [`Tree`], with file, line and column tracking.
//! - [`TextWriter`] and [`WriterOptions`]: [`Tree`] to text.
//! - [`TextConfig`]: key/value lookups over a parsed file.
//! - Value helpers combining the two with the [`codec`](crate::codec):
//!     - [`save_to_string`], [`save_to_stream`], [`save_to_file`]
//!     - [`load_from_str`], [`load_from_stream`], [`load_from_file`]
//!
//! ## Example
//!
//! ```
//! use rt_reflect::impl_described_record;
//! use rt_reflect::text::{self, WriterOptions};
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Window { title: String, width: u32 }
//!
//! impl_described_record!(Window { title: String, width: u32 });
//!
//! let window = Window { title: "main".into(), width: 800 };
//! let saved = text::save_to_string(&window, &WriterOptions::default());
//! assert_eq!(saved, "title = \"main\"\nwidth = 800\n");
//!
//! let mut loaded = Window::default();
//! text::load_from_str(&saved, &mut loaded).unwrap();
//! assert_eq!(loaded, window);
//! ```
//!
//! [`Tree`]: crate::tree::Tree

// -----------------------------------------------------------------------------
// Modules

mod config;
mod parser;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use config::TextConfig;
pub use parser::{MAX_DEPTH, ParseError, ParseErrorKind, Parser};
pub use writer::{TextWriter, WriterOptions};

// -----------------------------------------------------------------------------
// Value helpers

use alloc::string::{String, ToString};
use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::codec::{self, DecodeError};
use crate::info::Described;
use crate::tree::Tree;

/// An error returned by the text value helpers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TextError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Encodes `value` and writes it as text.
pub fn save_to_string<T: Described>(value: &T, options: &WriterOptions) -> String {
    let mut tree = Tree::new();
    let root = codec::encode(value, &mut tree);
    TextWriter::new(&tree, options).to_string(root)
}

/// Encodes `value` and writes it as text to `writer`.
pub fn save_to_stream<T: Described, W: Write>(
    value: &T,
    writer: &mut W,
    options: &WriterOptions,
) -> Result<(), TextError> {
    writer.write_all(save_to_string(value, options).as_bytes())?;
    Ok(())
}

/// Encodes `value` and writes it as text to the file at `path`.
pub fn save_to_file<T: Described>(
    value: &T,
    path: impl AsRef<Path>,
    options: &WriterOptions,
) -> Result<(), TextError> {
    std::fs::write(path, save_to_string(value, options))?;
    Ok(())
}

/// Parses `source` and decodes it into `target`.
#[inline]
pub fn load_from_str<T: Described>(source: &str, target: &mut T) -> Result<(), TextError> {
    load_parsed(Parser::new(source), target)
}

/// Reads `reader` to the end, then parses and decodes the text into `target`.
///
/// `file` and `line` locate the text in diagnostics, `line` being the
/// number of its first line.
pub fn load_from_stream<T: Described, R: Read>(
    reader: &mut R,
    target: &mut T,
    file: &str,
    line: u32,
) -> Result<(), TextError> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    load_parsed(Parser::new(&source).with_file(file).with_line(line), target)
}

/// Reads the file at `path`, then parses and decodes it into `target`.
pub fn load_from_file<T: Described>(path: impl AsRef<Path>, target: &mut T) -> Result<(), TextError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    load_parsed(
        Parser::new(&source).with_file(path.display().to_string()),
        target,
    )
}

fn load_parsed<T: Described>(parser: Parser<'_>, target: &mut T) -> Result<(), TextError> {
    let (tree, root) = parser.parse()?;
    codec::decode(&tree, root, target)?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests
