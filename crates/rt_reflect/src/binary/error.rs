use alloc::string::String;
use core::fmt;
use std::io;

use thiserror::Error;

use crate::info::TypeGuid;

/// What went wrong while reading or writing a binary stream.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BinaryErrorKind {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("bad magic {0:02x?}")]
    BadMagic([u8; 4]),
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),
    /// The header names another type than the one being loaded.
    #[error("stream holds type {found}, expected `{expected}`")]
    TypeMismatch { expected: &'static str, found: TypeGuid },
    #[error("{value} is not a value of `{type_name}`")]
    InvalidEnumValue { type_name: &'static str, value: u32 },
    /// A string or array length above [`MAX_ARRAY_ELEMENTS`].
    ///
    /// [`MAX_ARRAY_ELEMENTS`]: crate::binary::MAX_ARRAY_ELEMENTS
    #[error("length {0} exceeds the element limit")]
    LengthLimitExceeded(u32),
    #[error("string is not valid UTF-8")]
    InvalidString,
    #[error("unresolved reference to {guid} #{index}")]
    UnresolvedReference { guid: TypeGuid, index: i32 },
    /// A reference to an object of an unrelated record, or a value that is
    /// not of the described type.
    #[error("`{found}` is not a `{expected}`")]
    InvalidTarget {
        expected: &'static str,
        found: &'static str,
    },
    #[error("nesting deeper than {0} levels")]
    RecursionLimitExceeded(usize),
    /// Bytes left over in a sized object body.
    #[error("{0} trailing bytes after the value")]
    TrailingBytes(usize),
}

/// A [`BinaryErrorKind`] with the field path and the origin of the stream.
#[derive(Debug)]
pub struct BinaryError {
    pub kind: BinaryErrorKind,
    /// The field path, such as `a.b[2].c`, empty for the root value.
    pub path: String,
    pub file: Option<String>,
    /// The line the caller attributes the stream to, `0` when unknown.
    pub line: u32,
}

impl BinaryError {
    #[cold]
    pub(crate) fn new(kind: impl Into<BinaryErrorKind>) -> Self {
        Self {
            kind: kind.into(),
            path: String::new(),
            file: None,
            line: 0,
        }
    }

    pub(crate) fn with_origin(mut self, file: Option<&str>, line: u32) -> Self {
        if self.file.is_none() {
            self.file = file.map(String::from);
            self.line = line;
        }
        self
    }
}

impl From<io::Error> for BinaryError {
    #[inline]
    fn from(err: io::Error) -> Self {
        Self::new(err)
    }
}

impl fmt::Display for BinaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), 0) => write!(f, "{file}: ")?,
            (Some(file), line) => write!(f, "{file}:{line}: ")?,
            (None, _) => {}
        }
        if !self.path.is_empty() {
            write!(f, "at `{}`: ", self.path)?;
        }
        write!(f, "{}", self.kind)
    }
}

impl core::error::Error for BinaryError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match &self.kind {
            BinaryErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BinaryError, BinaryErrorKind};
    use alloc::string::{String, ToString};

    #[test]
    fn display() {
        let mut err = BinaryError::new(BinaryErrorKind::LengthLimitExceeded(u32::MAX))
            .with_origin(Some("level.bin"), 12);
        err.path = String::from("items");
        assert_eq!(
            err.to_string(),
            "level.bin:12: at `items`: length 4294967295 exceeds the element limit"
        );

        let err = BinaryError::new(BinaryErrorKind::UnsupportedVersion(9));
        assert_eq!(err.to_string(), "unsupported format version 9");
    }
}
