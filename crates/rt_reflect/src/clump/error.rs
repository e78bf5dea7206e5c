use alloc::string::String;
use std::io;

use thiserror::Error;

use crate::binary::BinaryError;
use crate::codec::DecodeError;
use crate::info::TypeGuid;
use crate::registry::RegistryError;
use crate::text::ParseError;

/// An error returned by [`Clump`](crate::clump::Clump) operations and the
/// clump persistence.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClumpError {
    /// Only records are stored in a clump.
    #[error("`{0}` is not a record")]
    NotARecord(&'static str),
    #[error("`{0}` has no default constructor")]
    NotConstructible(&'static str),
    /// Loading needs an empty clump.
    #[error("cannot load into a clump holding {0} objects")]
    NotEmpty(usize),
    #[error("unknown record `{0}`")]
    UnknownRecord(String),
    #[error("unknown record guid {0}")]
    UnknownGuid(TypeGuid),
    #[error("record `{0}` is listed twice")]
    DuplicateList(&'static str),
    #[error("unsupported clump version {0}")]
    UnsupportedVersion(u32),
    /// A persisted clump that does not have the clump layout.
    #[error("malformed clump: {0}")]
    Malformed(&'static str),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Binary(#[from] BinaryError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
