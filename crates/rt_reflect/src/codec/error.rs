use alloc::string::String;
use core::fmt;

use thiserror::Error;

use crate::tree::SourceLocation;

/// What went wrong while decoding a tree.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// An enum name that matches no member.
    #[error("`{name}` is not a member of `{type_name}`")]
    NotFound {
        type_name: &'static str,
        name: String,
    },
    /// A scalar of the wrong kind, or a number out of range.
    #[error("expected `{expected}`, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },
    #[error("`{flag}` is not a flag of `{type_name}`")]
    UnknownFlag {
        type_name: &'static str,
        flag: String,
    },
    #[error("missing field `{field}` of `{record}`")]
    MissingRequiredField {
        record: &'static str,
        field: &'static str,
    },
    /// A node whose shape does not fit the described type.
    #[error("expected {expected}, found {found}")]
    MalformedTree {
        expected: &'static str,
        found: &'static str,
    },
    #[error("nesting deeper than {0} levels")]
    RecursionLimitExceeded(usize),
    #[error("unresolved reference to `{record}` #{index}")]
    UnresolvedReference { record: String, index: i64 },
    /// A reference to an object of an unrelated record, or a target value
    /// that is not of the described type.
    #[error("`{found}` is not a `{expected}`")]
    InvalidTarget {
        expected: &'static str,
        found: &'static str,
    },
}

/// A [`DecodeErrorKind`] with the field path, file and position it was
/// detected at.
///
/// Values decoded before the error keep their new content.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    /// The field path, such as `a.b[2].c`, empty for the root value.
    pub path: String,
    pub file: Option<String>,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, &self.location) {
            (Some(file), Some(location)) => write!(f, "{file}:{location}: ")?,
            (Some(file), None) => write!(f, "{file}: ")?,
            (None, Some(location)) => write!(f, "{location}: ")?,
            (None, None) => {}
        }
        if !self.path.is_empty() {
            write!(f, "at `{}`: ", self.path)?;
        }
        write!(f, "{}", self.kind)
    }
}

impl core::error::Error for DecodeError {}

#[cfg(test)]
mod tests {
    use super::{DecodeError, DecodeErrorKind};
    use crate::tree::SourceLocation;
    use alloc::string::{String, ToString};

    #[test]
    fn display() {
        let err = DecodeError {
            kind: DecodeErrorKind::MissingRequiredField {
                record: "Point",
                field: "x",
            },
            path: String::from("shape.origin"),
            file: Some(String::from("scene.son")),
            location: Some(SourceLocation { line: 4, column: 2 }),
        };
        assert_eq!(
            err.to_string(),
            "scene.son:4:2: at `shape.origin`: missing field `x` of `Point`"
        );

        let err = DecodeError {
            kind: DecodeErrorKind::RecursionLimitExceeded(64),
            path: String::new(),
            file: None,
            location: None,
        };
        assert_eq!(err.to_string(), "nesting deeper than 64 levels");
    }
}
