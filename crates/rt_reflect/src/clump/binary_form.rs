use alloc::string::ToString;
use alloc::vec::Vec;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::binary::{BinaryError, BinaryErrorKind, BinaryReader, BinaryWriter, Header};
use crate::binary::MAX_ARRAY_ELEMENTS;
use crate::clump::tables::{LoadTable, SaveTable};
use crate::clump::{CLUMP_MAGIC, Clump, ClumpError, ClumpLoadOptions, ClumpSaveOptions};
use crate::info::TypeGuid;
use crate::registry::{self, TypeRegistry};

/// Writes `clump` as a binary stream.
///
/// ```text
/// "RTCL" | version u32 | list count u32 | reserved u32
/// (record guid u32, object count u32) per list
/// (body size u32, body) per object, list by list
/// ```
pub fn save_clump<W: Write>(
    clump: &Clump,
    mut writer: W,
    options: &ClumpSaveOptions,
) -> Result<(), ClumpError> {
    let table = SaveTable::new(clump, options.skip_empty_lists);
    let lists = table.lists();

    Header::new(CLUMP_MAGIC, count(lists.len())?).write(&mut writer)?;
    for list in lists {
        writer.write_u32::<LittleEndian>(list.record().guid().to_raw())?;
        writer.write_u32::<LittleEndian>(count(list.len())?)?;
    }

    let mut body = Vec::new();
    for list in lists {
        for handle in list.handles() {
            let (record, value) = clump
                .get_dyn(*handle)
                .ok_or(ClumpError::Malformed("a list holds a removed object"))?;
            body.clear();
            BinaryWriter::with_references(&mut body, &table).write_record(value, record)?;
            let size = u32::try_from(body.len())
                .map_err(|_| ClumpError::Malformed("object body larger than 4 GiB"))?;
            writer.write_u32::<LittleEndian>(size)?;
            writer.write_all(&body)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Upper bound of the up-front reservation for the bodies of one list.
const BODY_RESERVE: usize = 4096;

fn count(len: usize) -> Result<u32, BinaryError> {
    match u32::try_from(len) {
        Ok(len) if len <= MAX_ARRAY_ELEMENTS => Ok(len),
        _ => Err(BinaryError::new(BinaryErrorKind::LengthLimitExceeded(
            u32::try_from(len).unwrap_or(u32::MAX),
        ))),
    }
}

/// Loads a stream written by [`save_clump`] into the empty `clump`, with
/// the records of the global registry.
pub fn load_clump<R: Read>(reader: R, clump: &mut Clump, file: &str, line: u32) -> Result<(), ClumpError> {
    let registry = registry::global()?.read();
    load_clump_with(reader, clump, &registry, &ClumpLoadOptions::default(), file, line)
}

/// Loads a stream written by [`save_clump`] into the empty `clump`.
///
/// Objects are constructed once every body has been read, and decoded
/// after all of them are constructed, so references may point forward.
/// On error `clump` is left empty.
pub fn load_clump_with<R: Read>(
    mut reader: R,
    clump: &mut Clump,
    registry: &TypeRegistry,
    options: &ClumpLoadOptions,
    file: &str,
    line: u32,
) -> Result<(), ClumpError> {
    if !clump.is_empty() {
        return Err(ClumpError::NotEmpty(clump.len()));
    }

    let result = read_clump(&mut reader, clump, registry, options).map_err(|err| match err {
        ClumpError::Binary(err) => ClumpError::Binary(err.with_origin(Some(file), line)),
        other => other,
    });
    if result.is_err() {
        clump.clear();
    }
    result
}

fn read_clump<R: Read>(
    reader: &mut R,
    clump: &mut Clump,
    registry: &TypeRegistry,
    options: &ClumpLoadOptions,
) -> Result<(), ClumpError> {
    let header = Header::read(reader, CLUMP_MAGIC)?;

    let mut entries = Vec::new();
    let mut total = 0_u32;
    for _ in 0..header.payload {
        let guid = TypeGuid::from_raw(reader.read_u32::<LittleEndian>()?);
        let count = reader.read_u32::<LittleEndian>()?;
        total = total.saturating_add(count);
        if total > MAX_ARRAY_ELEMENTS {
            return Err(BinaryError::new(BinaryErrorKind::LengthLimitExceeded(total)).into());
        }
        let record = registry
            .record_by_guid(guid)
            .ok_or(ClumpError::UnknownGuid(guid))?;
        entries.push((record, count as usize));
    }

    // Object counts are untrusted until every body has been read.
    let mut bodies = Vec::with_capacity(entries.len());
    for (_, count) in &entries {
        let mut list = Vec::with_capacity((*count).min(BODY_RESERVE));
        for _ in 0..*count {
            let size = reader.read_u32::<LittleEndian>()? as usize;
            let mut body = Vec::new();
            if reader.by_ref().take(size as u64).read_to_end(&mut body)? != size {
                return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
            }
            list.push(body);
        }
        bodies.push(list);
    }

    // Phase one: construct every listed object.
    let mut table = LoadTable::default();
    for (record, count) in entries {
        table.construct(clump, record, count)?;
    }

    // Phase two: decode the bodies, resolving references against phase one.
    for (list, bodies) in table.lists().iter().zip(&bodies) {
        for (index, (handle, body)) in list.handles.iter().zip(bodies).enumerate() {
            let Some((record, target)) = clump.get_dyn_mut(*handle) else {
                continue;
            };
            let mut input = body.as_slice();
            let result = BinaryReader::with_resolver(&mut input, &table)
                .with_max_depth(options.decode.max_depth)
                .read_record(record, target);
            let result = result.and_then(|()| match input.len() {
                0 => Ok(()),
                n => Err(BinaryError::new(BinaryErrorKind::TrailingBytes(n))),
            });

            if let Err(err) = result {
                if !options.skip_failed_objects {
                    return Err(err.into());
                }
                log::error!("skipped object #{index} of `{}`: {err}", record.name());
            }
        }
    }
    log::debug!("loaded {} objects in {} lists", clump.len(), table.lists().len());
    Ok(())
}

/// Writes `clump` to a new file at `path`.
pub fn save_clump_to_file(
    clump: &Clump,
    path: impl AsRef<Path>,
    options: &ClumpSaveOptions,
) -> Result<(), ClumpError> {
    let file = File::create(path)?;
    save_clump(clump, BufWriter::new(file), options)
}

/// Loads the file at `path` into the empty `clump`, with the records of the
/// global registry.
pub fn load_clump_from_file(path: impl AsRef<Path>, clump: &mut Clump) -> Result<(), ClumpError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    load_clump(BufReader::new(file), clump, &path.display().to_string(), 0)
}
