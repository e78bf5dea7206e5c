use alloc::string::String;
use alloc::vec::Vec;
use std::io::{Read, Write};

use crate::binary::FORMAT_VERSION;
use crate::clump::tables::{LoadTable, SaveTable};
use crate::clump::{Clump, ClumpError, ClumpLoadOptions, ClumpSaveOptions};
use crate::codec::{Decoder, Encoder, TYPE_TAG};
use crate::registry::TypeRegistry;
use crate::text::{Parser, TextWriter};
use crate::tree::{NodeId, Tree};

/// Member holding the clump header.
pub const HEAD_TAG: &str = "_HEAD";
/// Member holding the lists of a clump, or the objects of a list.
pub const DATA_TAG: &str = "_DATA";
/// Member holding the object count of a list.
pub const SIZE_TAG: &str = "_SIZE";

const VERSION_TAG: &str = "version";

/// Encodes `clump` into `tree` and returns the root object.
///
/// ```text
/// _HEAD = { version = 1 }
/// _DATA = [
///     { _TYPE = "Record", _SIZE = 2, _DATA = [ { .. }, { .. } ] }
/// ]
/// ```
///
/// References between objects are written as `{ _TYPE, _ID }` pairs.
pub fn encode_clump(clump: &Clump, tree: &mut Tree, options: &ClumpSaveOptions) -> NodeId {
    let table = SaveTable::new(clump, options.skip_empty_lists);
    let encoder = Encoder::with_references(&table);

    let version = tree.number(f64::from(FORMAT_VERSION));
    let head = tree.object(alloc::vec![(String::from(VERSION_TAG), version)]);

    let mut lists = Vec::with_capacity(table.lists().len());
    for list in table.lists() {
        let mut objects = Vec::with_capacity(list.len());
        for handle in list.handles() {
            if let Some((record, value)) = clump.get_dyn(*handle) {
                objects.push(encoder.encode_record(value, record, tree));
            }
        }
        let name = tree.string(list.record().name());
        let size = tree.number(objects.len() as f64);
        let data = tree.sequence(objects);
        lists.push(tree.object(alloc::vec![
            (String::from(TYPE_TAG), name),
            (String::from(SIZE_TAG), size),
            (String::from(DATA_TAG), data),
        ]));
    }

    let data = tree.sequence(lists);
    tree.object(alloc::vec![
        (String::from(HEAD_TAG), head),
        (String::from(DATA_TAG), data),
    ])
}

/// Decodes a tree built by [`encode_clump`] into the empty `clump`.
///
/// Every object is constructed before any is decoded, so references may
/// point forward. On error `clump` is left empty.
pub fn decode_clump(
    tree: &Tree,
    root: NodeId,
    clump: &mut Clump,
    registry: &TypeRegistry,
    options: &ClumpLoadOptions,
) -> Result<(), ClumpError> {
    if !clump.is_empty() {
        return Err(ClumpError::NotEmpty(clump.len()));
    }
    let result = decode_lists(tree, root, clump, registry, options);
    if result.is_err() {
        clump.clear();
    }
    result
}

fn decode_lists(
    tree: &Tree,
    root: NodeId,
    clump: &mut Clump,
    registry: &TypeRegistry,
    options: &ClumpLoadOptions,
) -> Result<(), ClumpError> {
    let version = tree
        .member(root, HEAD_TAG)
        .and_then(|head| tree.member(head, VERSION_TAG))
        .and_then(|id| tree.as_number(id))
        .ok_or(ClumpError::Malformed("missing `_HEAD.version`"))?;
    if version != f64::from(FORMAT_VERSION) {
        return Err(ClumpError::UnsupportedVersion(version as u32));
    }
    let lists = tree
        .member(root, DATA_TAG)
        .and_then(|id| tree.items(id))
        .ok_or(ClumpError::Malformed("`_DATA` is not a sequence"))?;

    // Phase one: construct every listed object.
    let mut table = LoadTable::default();
    let mut bodies = Vec::with_capacity(lists.len());
    for list in lists {
        let name = tree
            .member(*list, TYPE_TAG)
            .and_then(|id| tree.as_str(id))
            .ok_or(ClumpError::Malformed("a list without `_TYPE`"))?;
        let objects = tree
            .member(*list, DATA_TAG)
            .and_then(|id| tree.items(id))
            .ok_or(ClumpError::Malformed("a list without `_DATA`"))?;
        let size = tree.member(*list, SIZE_TAG).and_then(|id| tree.as_number(id));
        if size.is_some_and(|size| size != objects.len() as f64) {
            return Err(ClumpError::Malformed("`_SIZE` does not match `_DATA`"));
        }

        let record = registry
            .record_by_name(name)
            .ok_or_else(|| ClumpError::UnknownRecord(String::from(name)))?;
        table.construct(clump, record, objects.len())?;
        bodies.push(objects);
    }

    // Phase two: decode the objects, resolving references against phase one.
    let decoder = Decoder::new()
        .with_options(options.decode)
        .with_resolver(&table);
    for (list, objects) in table.lists().iter().zip(bodies) {
        for (index, (handle, node)) in list.handles.iter().zip(objects).enumerate() {
            let Some((record, target)) = clump.get_dyn_mut(*handle) else {
                continue;
            };
            if let Err(err) = decoder.decode_record(tree, *node, record, target) {
                if !options.skip_failed_objects {
                    return Err(err.into());
                }
                log::error!("skipped object #{index} of `{}`: {err}", record.name());
            }
        }
    }
    log::debug!("decoded {} objects in {} lists", clump.len(), table.lists().len());
    Ok(())
}

/// Writes `clump` as text to `writer`.
pub fn save_clump_text<W: Write>(
    clump: &Clump,
    writer: &mut W,
    options: &ClumpSaveOptions,
) -> Result<(), ClumpError> {
    let mut tree = Tree::new();
    let root = encode_clump(clump, &mut tree, options);
    let text = TextWriter::new(&tree, &options.writer).to_string(root);
    writer.write_all(text.as_bytes())?;
    Ok(())
}

/// Reads `reader` to the end and loads the text into the empty `clump`.
///
/// `file` and `line` locate the text in diagnostics.
pub fn load_clump_text<R: Read>(
    reader: &mut R,
    clump: &mut Clump,
    registry: &TypeRegistry,
    options: &ClumpLoadOptions,
    file: &str,
    line: u32,
) -> Result<(), ClumpError> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    let (tree, root) = Parser::new(&source).with_file(file).with_line(line).parse()?;
    decode_clump(&tree, root, clump, registry, options)
}
