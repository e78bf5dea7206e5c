use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// TypeKind

/// The closed set of descriptor kinds.
///
/// A [`TypeKind`] is obtained via [`TypeDescriptor::kind`](crate::info::TypeDescriptor::kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Enum,
    Flags,
    Record,
    Pointer,
    Array,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive => f.pad("Primitive"),
            Self::Enum => f.pad("Enum"),
            Self::Flags => f.pad("Flags"),
            Self::Record => f.pad("Record"),
            Self::Pointer => f.pad("Pointer"),
            Self::Array => f.pad("Array"),
        }
    }
}

/// Error returned when a `TypeDescriptor` is not the expected [`TypeKind`].
#[derive(Debug, Error)]
#[error("type kind mismatch: expected {expected}, received {received}")]
pub struct KindError {
    pub expected: TypeKind,
    pub received: TypeKind,
}

// -----------------------------------------------------------------------------
// PrimitiveKind

/// Scalar storage classes understood by every codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
}

impl PrimitiveKind {
    /// Canonical name used as the primitive's type name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "String",
        }
    }

    /// Returns `true` for signed and unsigned integers.
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::U8 | Self::U16 | Self::U32 | Self::U64
        )
    }

    /// Returns `true` for `f32` and `f64`.
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Inclusive range representable by an integer kind, as `f64`.
    ///
    /// Returns `None` for non-integer kinds.
    pub const fn integer_range(self) -> Option<(f64, f64)> {
        match self {
            Self::I8 => Some((i8::MIN as f64, i8::MAX as f64)),
            Self::I16 => Some((i16::MIN as f64, i16::MAX as f64)),
            Self::I32 => Some((i32::MIN as f64, i32::MAX as f64)),
            Self::I64 => Some((i64::MIN as f64, i64::MAX as f64)),
            Self::U8 => Some((0.0, u8::MAX as f64)),
            Self::U16 => Some((0.0, u16::MAX as f64)),
            Self::U32 => Some((0.0, u32::MAX as f64)),
            Self::U64 => Some((0.0, u64::MAX as f64)),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

// -----------------------------------------------------------------------------
// Tests
