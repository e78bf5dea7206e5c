use core::any::Any;
use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::binary::{BinaryError, BinaryErrorKind, MAX_ARRAY_ELEMENTS, storage_width};
use crate::codec::{FieldPath, NULL_INDEX, NoReferences, PathSegment, ReferenceTable};
use crate::info::{Described, PrimitiveKind, RecordDescriptor, TypeDescriptor};

/// Writes described values as flat little-endian data, without header.
///
/// - records: the serialized fields in traversal order;
/// - enums and flags: the raw value in the storage width of the type;
/// - strings and arrays: a `u32` length, then the bytes or items;
/// - pointers: the `u32` guid of the target record and its `i32` index in
///   the [`ReferenceTable`], `(0, -1)` for null.
pub struct BinaryWriter<'a, W> {
    out: W,
    references: &'a dyn ReferenceTable,
    path: FieldPath,
}

impl<W: Write> BinaryWriter<'_, W> {
    #[inline]
    pub fn new(out: W) -> Self {
        Self {
            out,
            references: &NoReferences,
            path: FieldPath::new(),
        }
    }
}

impl<'a, W: Write> BinaryWriter<'a, W> {
    /// Writes pointers through `references`.
    pub fn with_references(out: W, references: &'a dyn ReferenceTable) -> Self {
        Self {
            out,
            references,
            path: FieldPath::new(),
        }
    }

    #[inline]
    pub fn into_inner(self) -> W {
        self.out
    }

    #[inline]
    pub fn write<T: Described>(&mut self, value: &T) -> Result<(), BinaryError> {
        self.write_dyn(value, T::descriptor())
    }

    /// Writes a type-erased `value` of the type described by `descriptor`.
    pub fn write_dyn(
        &mut self,
        value: &dyn Any,
        descriptor: &'static TypeDescriptor,
    ) -> Result<(), BinaryError> {
        match descriptor {
            TypeDescriptor::Primitive(info) => self.primitive(value, info.kind(), info.name()),
            TypeDescriptor::Enum(info) => {
                let raw = info.read(value).ok_or_else(|| invalid_target(info.name()))?;
                self.uint(storage_width(info.layout()), raw)
            }
            TypeDescriptor::Flags(info) => {
                let bits = info.read(value).ok_or_else(|| invalid_target(info.name()))?;
                self.uint(storage_width(info.layout()), bits)
            }
            TypeDescriptor::Record(info) => self.write_record(value, info),
            TypeDescriptor::Array(info) => {
                let len = info.len(value).ok_or_else(|| invalid_target(info.name()))?;
                self.length(len)?;
                for index in 0..len {
                    let item = info.get(value, index).ok_or_else(|| invalid_target(info.name()))?;
                    self.nested(PathSegment::Index(index), |this| {
                        this.write_dyn(item, info.item())
                    })?;
                }
                Ok(())
            }
            TypeDescriptor::Pointer(info) => {
                let handle = info.read(value).ok_or_else(|| invalid_target(info.name()))?;
                let location = handle.and_then(|handle| {
                    let location = self.references.locate(handle);
                    if location.is_none() {
                        log::warn!(
                            "`{}` points to an object outside the saved set, written as null",
                            info.name()
                        );
                    }
                    location
                });
                let (guid, index) = match location {
                    Some(location) => (location.record.guid().to_raw(), location.index as i32),
                    None => (0, NULL_INDEX),
                };
                self.out.write_u32::<LittleEndian>(guid)?;
                self.out.write_i32::<LittleEndian>(index)?;
                Ok(())
            }
        }
    }

    /// Writes the serialized fields of `value`, an instance of `record`.
    pub fn write_record(
        &mut self,
        value: &dyn Any,
        record: &'static RecordDescriptor,
    ) -> Result<(), BinaryError> {
        for entry in record.full_fields() {
            if !entry.field.is_serialized() {
                continue;
            }
            let field = record
                .field_value(entry, value)
                .ok_or_else(|| invalid_target(record.name()))?;
            self.nested(PathSegment::Field(entry.field.name()), |this| {
                this.write_dyn(field, entry.field.type_descriptor())
            })?;
        }
        Ok(())
    }

    fn nested(
        &mut self,
        segment: PathSegment,
        f: impl FnOnce(&mut Self) -> Result<(), BinaryError>,
    ) -> Result<(), BinaryError> {
        self.path.push(segment);
        let result = f(self).map_err(|mut err| {
            if err.path.is_empty() {
                err.path = self.path.render();
            }
            err
        });
        self.path.pop();
        result
    }

    fn length(&mut self, len: usize) -> Result<(), BinaryError> {
        match u32::try_from(len) {
            Ok(len) if len <= MAX_ARRAY_ELEMENTS => {
                self.out.write_u32::<LittleEndian>(len)?;
                Ok(())
            }
            _ => Err(BinaryError::new(BinaryErrorKind::LengthLimitExceeded(
                u32::try_from(len).unwrap_or(u32::MAX),
            ))),
        }
    }

    fn uint(&mut self, width: usize, value: u32) -> Result<(), BinaryError> {
        match width {
            1 => self.out.write_u8(value as u8)?,
            2 => self.out.write_u16::<LittleEndian>(value as u16)?,
            _ => self.out.write_u32::<LittleEndian>(value)?,
        }
        Ok(())
    }

    fn primitive(
        &mut self,
        value: &dyn Any,
        kind: PrimitiveKind,
        type_name: &'static str,
    ) -> Result<(), BinaryError> {
        #[inline(always)]
        fn get<T: Any + Copy>(value: &dyn Any, type_name: &'static str) -> Result<T, BinaryError> {
            value.downcast_ref::<T>().copied().ok_or_else(|| invalid_target(type_name))
        }

        let out = &mut self.out;
        match kind {
            PrimitiveKind::Bool => out.write_u8(u8::from(get::<bool>(value, type_name)?))?,
            PrimitiveKind::I8 => out.write_i8(get(value, type_name)?)?,
            PrimitiveKind::I16 => out.write_i16::<LittleEndian>(get(value, type_name)?)?,
            PrimitiveKind::I32 => out.write_i32::<LittleEndian>(get(value, type_name)?)?,
            PrimitiveKind::I64 => out.write_i64::<LittleEndian>(get(value, type_name)?)?,
            PrimitiveKind::U8 => out.write_u8(get(value, type_name)?)?,
            PrimitiveKind::U16 => out.write_u16::<LittleEndian>(get(value, type_name)?)?,
            PrimitiveKind::U32 => out.write_u32::<LittleEndian>(get(value, type_name)?)?,
            PrimitiveKind::U64 => out.write_u64::<LittleEndian>(get(value, type_name)?)?,
            PrimitiveKind::F32 => out.write_f32::<LittleEndian>(get(value, type_name)?)?,
            PrimitiveKind::F64 => out.write_f64::<LittleEndian>(get(value, type_name)?)?,
            PrimitiveKind::String => {
                let text = value
                    .downcast_ref::<alloc::string::String>()
                    .ok_or_else(|| invalid_target(type_name))?;
                self.length(text.len())?;
                self.out.write_all(text.as_bytes())?;
            }
        }
        Ok(())
    }
}

#[cold]
fn invalid_target(expected: &'static str) -> BinaryError {
    BinaryError::new(BinaryErrorKind::InvalidTarget {
        expected,
        found: "a value of another type",
    })
}
