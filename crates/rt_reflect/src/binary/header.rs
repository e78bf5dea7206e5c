use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::binary::{BinaryError, BinaryErrorKind, FORMAT_VERSION};

/// The fixed 16-byte header of a binary stream.
///
/// ```text
/// magic (4) | version (4) | payload (4) | reserved (4)
/// ```
///
/// `payload` is the type guid of a single value, or the list count of a clump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: [u8; 4],
    pub version: u32,
    pub payload: u32,
    pub reserved: u32,
}

impl Header {
    pub const SIZE: usize = 16;

    #[inline]
    pub const fn new(magic: [u8; 4], payload: u32) -> Self {
        Self {
            magic,
            version: FORMAT_VERSION,
            payload,
            reserved: 0,
        }
    }

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.magic)?;
        w.write_u32::<LittleEndian>(self.version)?;
        w.write_u32::<LittleEndian>(self.payload)?;
        w.write_u32::<LittleEndian>(self.reserved)?;
        Ok(())
    }

    /// Reads a header and checks its magic and version.
    pub fn read<R: Read>(r: &mut R, magic: [u8; 4]) -> Result<Self, BinaryError> {
        let mut found = [0u8; 4];
        r.read_exact(&mut found)?;
        if found != magic {
            return Err(BinaryError::new(BinaryErrorKind::BadMagic(found)));
        }

        let version = r.read_u32::<LittleEndian>()?;
        if version != FORMAT_VERSION {
            return Err(BinaryError::new(BinaryErrorKind::UnsupportedVersion(version)));
        }

        Ok(Self {
            magic: found,
            version,
            payload: r.read_u32::<LittleEndian>()?,
            reserved: r.read_u32::<LittleEndian>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Header;
    use crate::binary::{BinaryErrorKind, VALUE_MAGIC};
    use alloc::vec::Vec;

    #[test]
    fn layout_and_checks() {
        let mut bytes = Vec::new();
        Header::new(VALUE_MAGIC, 0xAABB_CCDD).write(&mut bytes).unwrap();
        assert_eq!(bytes.len(), Header::SIZE);
        assert_eq!(&bytes[..4], b"RTBV");
        assert_eq!(&bytes[8..12], &[0xDD, 0xCC, 0xBB, 0xAA]);

        let header = Header::read(&mut bytes.as_slice(), VALUE_MAGIC).unwrap();
        assert_eq!(header.payload, 0xAABB_CCDD);

        let err = Header::read(&mut bytes.as_slice(), *b"RTCL").unwrap_err();
        assert!(matches!(err.kind, BinaryErrorKind::BadMagic(m) if &m == b"RTBV"));

        bytes[4] = 7;
        let err = Header::read(&mut bytes.as_slice(), VALUE_MAGIC).unwrap_err();
        assert!(matches!(err.kind, BinaryErrorKind::UnsupportedVersion(7)));

        let err = Header::read(&mut &bytes[..6], VALUE_MAGIC).unwrap_err();
        assert!(matches!(err.kind, BinaryErrorKind::Io(_)));
    }
}
