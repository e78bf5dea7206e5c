use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::binary::{BinaryError, BinaryErrorKind, MAX_ARRAY_ELEMENTS, storage_width};
use crate::codec::{DEFAULT_MAX_DEPTH, FieldPath, NULL_INDEX, NoReferences, PathSegment};
use crate::codec::ReferenceResolver;
use crate::info::{Described, PointerDescriptor, PrimitiveKind, RecordDescriptor, TypeDescriptor};
use crate::info::TypeGuid;

/// Reads values written by a [`BinaryWriter`], in place.
///
/// Pointers are resolved by guid through the [`ReferenceResolver`].
///
/// [`BinaryWriter`]: crate::binary::BinaryWriter
pub struct BinaryReader<'a, R> {
    input: R,
    resolver: &'a dyn ReferenceResolver,
    path: FieldPath,
    depth: usize,
    max_depth: usize,
}

impl<R: Read> BinaryReader<'_, R> {
    #[inline]
    pub fn new(input: R) -> Self {
        Self {
            input,
            resolver: &NoReferences,
            path: FieldPath::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl<'a, R: Read> BinaryReader<'a, R> {
    pub fn with_resolver(input: R, resolver: &'a dyn ReferenceResolver) -> Self {
        Self {
            input,
            resolver,
            path: FieldPath::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum nesting of read values.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub fn into_inner(self) -> R {
        self.input
    }

    #[inline]
    pub fn read<T: Described>(&mut self, target: &mut T) -> Result<(), BinaryError> {
        self.read_dyn(T::descriptor(), target)
    }

    /// Reads into a type-erased `target` of the type described by `descriptor`.
    pub fn read_dyn(
        &mut self,
        descriptor: &'static TypeDescriptor,
        target: &mut dyn Any,
    ) -> Result<(), BinaryError> {
        if self.depth >= self.max_depth {
            return Err(BinaryError::new(BinaryErrorKind::RecursionLimitExceeded(
                self.max_depth,
            )));
        }
        self.depth += 1;
        let result = self.value(descriptor, target);
        self.depth -= 1;
        result
    }

    /// Reads the serialized fields of `target`, an instance of `record`.
    pub fn read_record(
        &mut self,
        record: &'static RecordDescriptor,
        target: &mut dyn Any,
    ) -> Result<(), BinaryError> {
        for entry in record.full_fields() {
            if !entry.field.is_serialized() {
                continue;
            }
            let field = record
                .field_value_mut(entry, target)
                .ok_or_else(|| invalid_target(record.name()))?;
            self.nested(PathSegment::Field(entry.field.name()), |this| {
                this.read_dyn(entry.field.type_descriptor(), field)
            })?;
        }
        Ok(())
    }

    fn value(
        &mut self,
        descriptor: &'static TypeDescriptor,
        target: &mut dyn Any,
    ) -> Result<(), BinaryError> {
        match descriptor {
            TypeDescriptor::Primitive(info) => self.primitive(info.kind(), info.name(), target),
            TypeDescriptor::Enum(info) => {
                let raw = self.uint(storage_width(info.layout()))?;
                if info.index_by_value(raw).is_none() {
                    return Err(BinaryError::new(BinaryErrorKind::InvalidEnumValue {
                        type_name: info.name(),
                        value: raw,
                    }));
                }
                checked(info.write(target, raw), info.name())
            }
            TypeDescriptor::Flags(info) => {
                let bits = self.uint(storage_width(info.layout()))?;
                checked(info.write(target, bits), info.name())
            }
            TypeDescriptor::Record(info) => self.read_record(info, target),
            TypeDescriptor::Array(info) => {
                let len = self.length()?;
                // Grow one item at a time so the declared length is only
                // reached when the stream holds that many items.
                checked(info.resize(target, 0), info.name())?;
                for index in 0..len {
                    checked(info.resize(target, index + 1), info.name())?;
                    let item = info
                        .get_mut(target, index)
                        .ok_or_else(|| invalid_target(info.name()))?;
                    let result =
                        self.nested(PathSegment::Index(index), |this| this.read_dyn(info.item(), item));
                    if let Err(err) = result {
                        info.resize(target, index);
                        return Err(err);
                    }
                }
                Ok(())
            }
            TypeDescriptor::Pointer(info) => self.pointer(info, target),
        }
    }

    fn pointer(
        &mut self,
        info: &'static PointerDescriptor,
        target: &mut dyn Any,
    ) -> Result<(), BinaryError> {
        let guid = TypeGuid::from_raw(self.input.read_u32::<LittleEndian>()?);
        let index = self.input.read_i32::<LittleEndian>()?;
        if index == NULL_INDEX {
            return checked(info.write(target, None), info.name());
        }

        let unresolved = || BinaryError::new(BinaryErrorKind::UnresolvedReference { guid, index });
        let index_usize = usize::try_from(index).map_err(|_| unresolved())?;
        let resolved = self
            .resolver
            .resolve_by_guid(guid, index_usize)
            .ok_or_else(unresolved)?;

        let pointee = info.pointee_record().ok_or_else(|| invalid_target(info.name()))?;
        if !resolved.record.is_derived_from(pointee) {
            return Err(BinaryError::new(BinaryErrorKind::InvalidTarget {
                expected: pointee.name(),
                found: resolved.record.name(),
            }));
        }
        checked(info.write(target, Some(resolved.handle)), info.name())
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

    fn length(&mut self) -> Result<usize, BinaryError> {
        let len = self.input.read_u32::<LittleEndian>()?;
        if len > MAX_ARRAY_ELEMENTS {
            return Err(BinaryError::new(BinaryErrorKind::LengthLimitExceeded(len)));
        }
        Ok(len as usize)
    }

    fn uint(&mut self, width: usize) -> Result<u32, BinaryError> {
        let value = match width {
            1 => u32::from(self.input.read_u8()?),
            2 => u32::from(self.input.read_u16::<LittleEndian>()?),
            _ => self.input.read_u32::<LittleEndian>()?,
        };
        Ok(value)
    }

    fn primitive(
        &mut self,
        kind: PrimitiveKind,
        type_name: &'static str,
        target: &mut dyn Any,
    ) -> Result<(), BinaryError> {
        #[inline(always)]
        fn put<T: Any>(target: &mut dyn Any, value: T) -> bool {
            match target.downcast_mut::<T>() {
                Some(target) => {
                    *target = value;
                    true
                }
                None => false,
            }
        }

        let input = &mut self.input;
        let written = match kind {
            PrimitiveKind::Bool => put(target, input.read_u8()? != 0),
            PrimitiveKind::I8 => put(target, input.read_i8()?),
            PrimitiveKind::I16 => put(target, input.read_i16::<LittleEndian>()?),
            PrimitiveKind::I32 => put(target, input.read_i32::<LittleEndian>()?),
            PrimitiveKind::I64 => put(target, input.read_i64::<LittleEndian>()?),
            PrimitiveKind::U8 => put(target, input.read_u8()?),
            PrimitiveKind::U16 => put(target, input.read_u16::<LittleEndian>()?),
            PrimitiveKind::U32 => put(target, input.read_u32::<LittleEndian>()?),
            PrimitiveKind::U64 => put(target, input.read_u64::<LittleEndian>()?),
            PrimitiveKind::F32 => put(target, input.read_f32::<LittleEndian>()?),
            PrimitiveKind::F64 => put(target, input.read_f64::<LittleEndian>()?),
            PrimitiveKind::String => {
                let len = self.length()?;
                let mut bytes = Vec::new();
                if self.input.by_ref().take(len as u64).read_to_end(&mut bytes)? != len {
                    return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
                }
                let text = String::from_utf8(bytes)
                    .map_err(|_| BinaryError::new(BinaryErrorKind::InvalidString))?;
                put(target, text)
            }
        };
        checked(written, type_name)
    }
}

#[inline]
fn checked(written: bool, expected: &'static str) -> Result<(), BinaryError> {
    if written {
        Ok(())
    } else {
        Err(invalid_target(expected))
    }
}

#[cold]
fn invalid_target(expected: &'static str) -> BinaryError {
    BinaryError::new(BinaryErrorKind::InvalidTarget {
        expected,
        found: "a value of another type",
    })
}
