//! The flat little-endian stream codec.
//!
//! ## Menu
//!
//! - [`save_to_stream`] / [`load_from_stream`]: one value behind a [`Header`].
//! - [`save_binary_to_file`] / [`load_binary_from_file`]: the same over files.
//! - [`BinaryWriter`] / [`BinaryReader`]: the headerless walkers, also used
//!   by the clump persistence.
//!
//! A stream of a single value:
//!
//! ```text
//! "RTBV" | version u32 | type guid u32 | reserved u32 | value
//! ```
//!
//! The type guid is checked on load, the value layout is not
//! self-describing.
//!
//! ## Example
//!
//! ```
//! use rt_reflect::binary;
//! use rt_reflect::impl_described_record;
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Score { player: String, points: u32 }
//!
//! impl_described_record!(Score { player: String, points: u32 });
//!
//! let mut bytes = Vec::new();
//! binary::save_to_stream(&Score { player: "ann".into(), points: 40 }, &mut bytes).unwrap();
//!
//! let mut score = Score::default();
//! binary::load_from_stream(bytes.as_slice(), &mut score, "<memory>", 0).unwrap();
//! assert_eq!(score.points, 40);
//! ```

use alloc::string::ToString;
use core::alloc::Layout;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::info::Described;

mod error;
mod header;
mod reader;
mod writer;

pub use error::{BinaryError, BinaryErrorKind};
pub use header::Header;
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

/// The version written to and expected in every [`Header`].
pub const FORMAT_VERSION: u32 = 1;

/// Magic of a single-value stream.
pub const VALUE_MAGIC: [u8; 4] = *b"RTBV";

/// Upper bound of string and array lengths, in elements.
pub const MAX_ARRAY_ELEMENTS: u32 = 16_777_216;

/// Byte width of the integer storage of an enum or flags type.
pub(crate) fn storage_width(layout: Layout) -> usize {
    match layout.size() {
        0 | 1 => 1,
        2 => 2,
        _ => 4,
    }
}

/// Writes `value` behind a single-value header.
pub fn save_to_stream<T: Described, W: Write>(value: &T, mut writer: W) -> Result<(), BinaryError> {
    Header::new(VALUE_MAGIC, T::descriptor().guid().to_raw()).write(&mut writer)?;
    BinaryWriter::new(&mut writer).write(value)?;
    writer.flush()?;
    Ok(())
}

/// Reads a value written by [`save_to_stream`] into `target`.
///
/// `file` and `line` only label errors. Pointers cannot be resolved
/// outside a clump and fail with [`UnresolvedReference`] unless null.
///
/// [`UnresolvedReference`]: BinaryErrorKind::UnresolvedReference
pub fn load_from_stream<T: Described, R: Read>(
    mut reader: R,
    target: &mut T,
    file: &str,
    line: u32,
) -> Result<(), BinaryError> {
    let load = |reader: &mut R, target: &mut T| {
        let descriptor = T::descriptor();
        let header = Header::read(reader, VALUE_MAGIC)?;
        if header.payload != descriptor.guid().to_raw() {
            return Err(BinaryError::new(BinaryErrorKind::TypeMismatch {
                expected: descriptor.name(),
                found: crate::info::TypeGuid::from_raw(header.payload),
            }));
        }
        BinaryReader::new(reader).read(target)
    };
    load(&mut reader, target).map_err(|err| err.with_origin(Some(file), line))
}

/// Writes `value` to a new file at `path`.
pub fn save_binary_to_file<T: Described>(value: &T, path: impl AsRef<Path>) -> Result<(), BinaryError> {
    let file = File::create(path)?;
    save_to_stream(value, BufWriter::new(file))
}

/// Reads the file at `path` into `target`.
pub fn load_binary_from_file<T: Described>(
    path: impl AsRef<Path>,
    target: &mut T,
) -> Result<(), BinaryError> {
    let path = path.as_ref();
    let name = path.display().to_string();
    let file = File::open(path).map_err(|err| BinaryError::new(err).with_origin(Some(&name), 0))?;
    load_from_stream(BufReader::new(file), target, &name, 0)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{BinaryErrorKind, BinaryReader, BinaryWriter, Header, MAX_ARRAY_ELEMENTS, VALUE_MAGIC};
    use super::{load_binary_from_file, load_from_stream, save_binary_to_file, save_to_stream};
    use crate::clump::{ObjectHandle, ObjectRef};
    use crate::codec::{ObjectLocation, ReferenceResolver, ReferenceTable, ResolvedObject};
    use crate::info::{Described, FieldFlags, RecordDescriptor, TypeGuid};
    use crate::{impl_described_enum, impl_described_flags, impl_described_record};
    use alloc::string::String;
    use alloc::vec::Vec;
    use bitflags::bitflags;
    use slotmap::SlotMap;

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    #[repr(u8)]
    enum Biome {
        #[default]
        Plains = 0,
        Desert = 3,
    }

    bitflags! {
        #[derive(Clone, Copy, Debug, Default, PartialEq)]
        struct Rules: u16 {
            const PVP = 1;
            const HARDCORE = 0x100;
        }
    }

    #[derive(Default, Debug, PartialEq)]
    struct Region {
        name: String,
        biome: Biome,
        rules: Rules,
        heights: Vec<i16>,
        cache: u64,
    }

    #[derive(Default, Debug, PartialEq)]
    struct Capital {
        base: Region,
        population: u32,
        twin: ObjectRef<Region>,
    }

    impl_described_enum!(Biome { Plains, Desert });
    impl_described_flags!(Rules { PVP => "Pvp", HARDCORE => "Hardcore" });
    impl_described_record!(Region {
        name: String,
        biome: Biome,
        rules: Rules,
        heights: Vec<i16>,
        cache: u64 => FieldFlags::NO_SERIALIZE,
    });
    impl_described_record!(Capital : base as Region { population: u32, twin: ObjectRef<Region> });

    fn region() -> Region {
        Region {
            name: String::from("dune"),
            biome: Biome::Desert,
            rules: Rules::PVP | Rules::HARDCORE,
            heights: alloc::vec![-3, 0, 700],
            cache: 99,
        }
    }

    #[test]
    fn value_layout() {
        let mut bytes = Vec::new();
        save_to_stream(&region(), &mut bytes).unwrap();

        let body = &bytes[Header::SIZE..];
        #[rustfmt::skip]
        let expected: &[u8] = &[
            4, 0, 0, 0, b'd', b'u', b'n', b'e', // name
            3,                                  // biome, one byte
            0x01, 0x01,                         // rules, two bytes
            3, 0, 0, 0, 0xFD, 0xFF, 0, 0, 0xBC, 0x02, // heights
        ];
        assert_eq!(body, expected);

        let mut back = Region::default();
        load_from_stream(bytes.as_slice(), &mut back, "<memory>", 0).unwrap();
        assert_eq!(back, Region { cache: 0, ..region() });
    }

    #[test]
    fn header_checks() {
        let mut bytes = Vec::new();
        save_to_stream(&region(), &mut bytes).unwrap();

        let mut capital = Capital::default();
        let err = load_from_stream(bytes.as_slice(), &mut capital, "world.bin", 7).unwrap_err();
        assert!(matches!(
            err.kind,
            BinaryErrorKind::TypeMismatch { expected: "Capital", found } if found == Region::descriptor().guid()
        ));
        assert_eq!(err.file.as_deref(), Some("world.bin"));
        assert_eq!(err.line, 7);

        let mut region = Region::default();
        let err = load_from_stream(&bytes[..Header::SIZE + 6], &mut region, "world.bin", 7).unwrap_err();
        assert!(matches!(err.kind, BinaryErrorKind::Io(_)));
        assert_eq!(err.path, "name");
    }

    #[test]
    fn invalid_values() {
        let mut bytes = Vec::new();
        Header::new(VALUE_MAGIC, Region::descriptor().guid().to_raw())
            .write(&mut bytes)
            .unwrap();
        bytes.extend_from_slice(&[0, 0, 0, 0, 2]);
        let err = load_from_stream(bytes.as_slice(), &mut Region::default(), "r", 1).unwrap_err();
        assert!(matches!(
            err.kind,
            BinaryErrorKind::InvalidEnumValue { type_name: "Biome", value: 2 }
        ));
        assert_eq!(err.path, "biome");

        let mut reader = BinaryReader::new(&[0xFF, 0xFF, 0xFF, 0xFF][..]);
        let err = reader.read(&mut Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err.kind, BinaryErrorKind::LengthLimitExceeded(u32::MAX)));

        let mut reader = BinaryReader::new(&[2, 0, 0, 0, 0xC3, 0x28][..]);
        let err = reader.read(&mut String::new()).unwrap_err();
        assert!(matches!(err.kind, BinaryErrorKind::InvalidString));
    }

    #[test]
    fn truncated_lengths() {
        // A maximal length followed by nothing.
        let input = MAX_ARRAY_ELEMENTS.to_le_bytes();

        let mut names = alloc::vec![String::from("kept")];
        let err = BinaryReader::new(&input[..]).read(&mut names).unwrap_err();
        assert!(matches!(err.kind, BinaryErrorKind::Io(_)));
        assert_eq!(err.path, "[0]");
        assert!(names.is_empty());
        assert!(names.capacity() < 1024);

        let mut text = String::from("kept");
        let err = BinaryReader::new(&input[..]).read(&mut text).unwrap_err();
        assert!(matches!(err.kind, BinaryErrorKind::Io(_)));
        assert_eq!(text, "kept");

        // Two items declared, one present.
        let mut heights: Vec<i16> = Vec::new();
        let err = BinaryReader::new(&[2, 0, 0, 0, 7, 0, 1][..])
            .read(&mut heights)
            .unwrap_err();
        assert!(matches!(err.kind, BinaryErrorKind::Io(_)));
        assert_eq!(err.path, "[1]");
        assert_eq!(heights, [7]);
    }

    struct Objects {
        region: ObjectHandle,
    }

    impl ReferenceTable for Objects {
        fn locate(&self, handle: ObjectHandle) -> Option<ObjectLocation> {
            let record: &'static RecordDescriptor = Region::descriptor().as_record().ok()?;
            (handle == self.region).then_some(ObjectLocation { record, index: 5 })
        }
    }

    impl ReferenceResolver for Objects {
        fn resolve_by_name(&self, _: &str, _: usize) -> Option<ResolvedObject> {
            None
        }

        fn resolve_by_guid(&self, guid: TypeGuid, index: usize) -> Option<ResolvedObject> {
            let record = Region::descriptor().as_record().ok()?;
            (guid == record.guid() && index == 5).then_some(ResolvedObject {
                handle: self.region,
                record,
            })
        }
    }

    #[test]
    fn derived_records_and_pointers() {
        let mut slots = SlotMap::<ObjectHandle, ()>::with_key();
        let objects = Objects {
            region: slots.insert(()),
        };
        let capital = Capital {
            base: region(),
            population: 12_000,
            twin: ObjectRef::new(objects.region),
        };

        let mut writer = BinaryWriter::with_references(Vec::new(), &objects);
        writer.write(&capital).unwrap();
        let bytes = writer.into_inner();
        let guid = Region::descriptor().guid().to_raw().to_le_bytes();
        assert_eq!(&bytes[bytes.len() - 8..bytes.len() - 4], &guid);
        assert_eq!(&bytes[bytes.len() - 4..], &5_i32.to_le_bytes());

        let mut back = Capital::default();
        BinaryReader::with_resolver(bytes.as_slice(), &objects)
            .read(&mut back)
            .unwrap();
        assert_eq!(back.base.name, "dune");
        assert_eq!(back.population, 12_000);
        assert_eq!(back.twin, capital.twin);

        let err = BinaryReader::new(bytes.as_slice())
            .read(&mut Capital::default())
            .unwrap_err();
        assert!(matches!(err.kind, BinaryErrorKind::UnresolvedReference { index: 5, .. }));
        assert_eq!(err.path, "twin");

        // Null pointers need no resolver.
        let mut writer = BinaryWriter::new(Vec::new());
        writer.write(&Capital::default()).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(&bytes[bytes.len() - 4..], &(-1_i32).to_le_bytes());
        BinaryReader::new(bytes.as_slice())
            .read(&mut Capital::default())
            .unwrap();
    }

    #[test]
    fn recursion_limit() {
        let mut bytes = Vec::new();
        BinaryWriter::new(&mut bytes)
            .write(&alloc::vec![alloc::vec![1_u8]])
            .unwrap();
        let mut nested: Vec<Vec<u8>> = Vec::new();
        let err = BinaryReader::new(bytes.as_slice())
            .with_max_depth(2)
            .read(&mut nested)
            .unwrap_err();
        assert!(matches!(err.kind, BinaryErrorKind::RecursionLimitExceeded(2)));
        assert_eq!(err.path, "[0][0]");
    }

    #[test]
    fn file_round_trip() {
        let path = std::env::temp_dir().join("rt_reflect_binary_file_round_trip.bin");
        save_binary_to_file(&region(), &path).unwrap();
        let mut back = Region::default();
        load_binary_from_file(&path, &mut back).unwrap();
        assert_eq!(back.heights, region().heights);
        let _ = std::fs::remove_file(&path);

        let err = load_binary_from_file(&path, &mut back).unwrap_err();
        assert!(matches!(err.kind, BinaryErrorKind::Io(_)));
        assert!(err.file.is_some());
    }
}
