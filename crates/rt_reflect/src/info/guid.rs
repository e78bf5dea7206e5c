use core::fmt;

/// A stable 32-bit type identifier derived from the type name.
///
/// Unlike [`TypeId`](core::any::TypeId), the value is identical across
/// builds and processes, which makes it suitable for persisted data.
/// It is the 32-bit FNV-1a hash of the name.
///
/// # Examples
///
/// ```
/// use rt_reflect::info::TypeGuid;
///
/// const GUID: TypeGuid = TypeGuid::from_name("Point");
/// assert_eq!(GUID, TypeGuid::from_name("Point"));
/// assert_ne!(GUID, TypeGuid::from_name("Point3"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeGuid(u32);

impl TypeGuid {
    const OFFSET_BASIS: u32 = 0x811C_9DC5;
    const PRIME: u32 = 0x0100_0193;

    /// Hashes `name` into a guid.
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u32;
            hash = hash.wrapping_mul(Self::PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Wraps a raw value read back from persisted data.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
