use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::info::{ArrayAccessor, ArrayDescriptor, DescriptorCell, GenericDescriptorCell};
use crate::info::{PrimitiveDescriptor, PrimitiveKind, TypeDescriptor};

// -----------------------------------------------------------------------------
// Described

/// A static accessor to the descriptor of a type.
///
/// Implemented for the primitives, `String` and `Vec<T>`, and for user types
/// through [`impl_described_enum!`], [`impl_described_flags!`] and
/// [`impl_described_record!`], or by hand with a [`DescriptorCell`].
///
/// The descriptor is built on first use and immutable afterwards.
///
/// [`impl_described_enum!`]: crate::impl_described_enum
/// [`impl_described_flags!`]: crate::impl_described_flags
/// [`impl_described_record!`]: crate::impl_described_record
pub trait Described: Any + Send + Sync {
    /// Returns the descriptor of `Self`.
    fn descriptor() -> &'static TypeDescriptor;
}

macro_rules! impl_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Described for $ty {
                fn descriptor() -> &'static TypeDescriptor {
                    static CELL: DescriptorCell = DescriptorCell::new();
                    CELL.get_or_init(|| {
                        TypeDescriptor::Primitive(PrimitiveDescriptor::new::<$ty>(PrimitiveKind::$kind))
                    })
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
}

// -----------------------------------------------------------------------------
// Vec<T>

fn vec_len<T: Any>(array: &dyn Any) -> Option<usize> {
    array.downcast_ref::<Vec<T>>().map(Vec::len)
}

fn vec_get<T: Any>(array: &dyn Any, index: usize) -> Option<&dyn Any> {
    array
        .downcast_ref::<Vec<T>>()?
        .get(index)
        .map(|item| item as &dyn Any)
}

fn vec_get_mut<T: Any>(array: &mut dyn Any, index: usize) -> Option<&mut dyn Any> {
    array
        .downcast_mut::<Vec<T>>()?
        .get_mut(index)
        .map(|item| item as &mut dyn Any)
}

fn vec_resize<T: Any + Default>(array: &mut dyn Any, len: usize) -> bool {
    match array.downcast_mut::<Vec<T>>() {
        Some(vec) => {
            vec.resize_with(len, T::default);
            true
        }
        None => false,
    }
}

impl<T: Described + Default> Described for Vec<T> {
    fn descriptor() -> &'static TypeDescriptor {
        static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
        CELL.get_or_insert::<Self>(|| {
            let name = format!("Vec<{}>", T::descriptor().name());
            TypeDescriptor::Array(ArrayDescriptor::new::<Self>(
                String::leak(name),
                T::descriptor,
                ArrayAccessor {
                    len: vec_len::<T>,
                    get: vec_get::<T>,
                    get_mut: vec_get_mut::<T>,
                    resize: vec_resize::<T>,
                },
            ))
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Described;
    use crate::info::{PrimitiveKind, TypeKind};
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn primitives() {
        let info = u16::descriptor().as_primitive().unwrap();
        assert_eq!(info.kind(), PrimitiveKind::U16);
        assert_eq!(info.layout().size(), 2);
        assert_eq!(String::descriptor().name(), "String");
        assert_eq!(bool::descriptor().kind(), TypeKind::Primitive);
        assert!(core::ptr::eq(f32::descriptor(), f32::descriptor()));
    }

    #[test]
    fn vec_descriptors_are_per_instantiation() {
        let a = <Vec<u32>>::descriptor();
        let b = <Vec<String>>::descriptor();
        assert_eq!(a.name(), "Vec<u32>");
        assert_eq!(b.name(), "Vec<String>");
        assert!(core::ptr::eq(a, <Vec<u32>>::descriptor()));
        assert_eq!(<Vec<Vec<u8>>>::descriptor().name(), "Vec<Vec<u8>>");
    }

    #[test]
    fn vec_accessor() {
        let info = <Vec<u32>>::descriptor().as_array().unwrap();
        let mut items = vec![1_u32, 2];
        assert_eq!(info.len(&items), Some(2));
        assert!(info.resize(&mut items, 3));
        assert_eq!(items, [1, 2, 0]);
        if let Some(item) = info.get_mut(&mut items, 2).and_then(|v| v.downcast_mut::<u32>()) {
            *item = 7;
        }
        assert_eq!(info.get(&items, 2).and_then(|v| v.downcast_ref::<u32>()), Some(&7));
        assert_eq!(info.item().name(), "u32");
    }
}
