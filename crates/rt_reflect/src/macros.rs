/// Implements [`Described`](crate::info::Described) for a fieldless `Copy` enum.
///
/// Member names are the variant names, values are the discriminants.
///
/// ```
/// use rt_reflect::info::Described;
/// use rt_reflect::impl_described_enum;
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Quality { Low = 1, High = 4 }
///
/// impl_described_enum!(Quality { Low, High });
///
/// let info = Quality::descriptor().as_enum().unwrap();
/// assert_eq!(info.value_by_string("high"), 4);
/// ```
#[macro_export]
macro_rules! impl_described_enum {
    ($ty:ident { $($variant:ident),* $(,)? }) => {
        impl $crate::info::Described for $ty {
            fn descriptor() -> &'static $crate::info::TypeDescriptor {
                static CELL: $crate::info::DescriptorCell = $crate::info::DescriptorCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeDescriptor::Enum($crate::info::EnumDescriptor::new::<$ty>(
                        ::core::stringify!($ty),
                        &[$($crate::info::EnumMember::new(::core::stringify!($variant), $ty::$variant as u32)),*],
                        $crate::info::EnumAccessor {
                            get: |value| value.downcast_ref::<$ty>().map(|v| *v as u32),
                            set: |target, raw| {
                                let ::core::option::Option::Some(target) = target.downcast_mut::<$ty>() else {
                                    return false;
                                };
                                $(
                                    if raw == $ty::$variant as u32 {
                                        *target = $ty::$variant;
                                        return true;
                                    }
                                )*
                                false
                            },
                        },
                    ))
                })
            }
        }
    };
}

/// Implements [`Described`](crate::info::Described) for a `bitflags` type.
///
/// Each entry maps an associated flag constant to its persisted name.
/// Masks are stored as `u32`; a flag with a bit above 31 fails to compile.
///
/// ```
/// use bitflags::bitflags;
/// use rt_reflect::info::Described;
/// use rt_reflect::impl_described_flags;
///
/// bitflags! {
///     #[derive(Clone, Copy, Debug, Default, PartialEq)]
///     pub struct Access: u32 {
///         const READ = 1;
///         const WRITE = 2;
///     }
/// }
///
/// impl_described_flags!(Access { READ => "Read", WRITE => "Write" });
///
/// let info = Access::descriptor().as_flags().unwrap();
/// assert_eq!(info.render(3), "Read|Write");
/// ```
///
/// Wider bit types are accepted as long as every flag fits in 32 bits:
///
/// ```compile_fail
/// use bitflags::bitflags;
/// use rt_reflect::info::Described;
/// use rt_reflect::impl_described_flags;
///
/// bitflags! {
///     #[derive(Clone, Copy, Debug, Default, PartialEq)]
///     pub struct Wide: u64 {
///         const LOW = 1;
///         const HIGH = 1 << 40;
///     }
/// }
///
/// impl_described_flags!(Wide { LOW => "Low", HIGH => "High" });
///
/// let _ = Wide::descriptor();
/// ```
#[macro_export]
macro_rules! impl_described_flags {
    ($ty:ident { $($flag:ident => $name:literal),* $(,)? }) => {
        impl $crate::info::Described for $ty {
            fn descriptor() -> &'static $crate::info::TypeDescriptor {
                static CELL: $crate::info::DescriptorCell = $crate::info::DescriptorCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeDescriptor::Flags($crate::info::FlagsDescriptor::new::<$ty>(
                        ::core::stringify!($ty),
                        &[$($crate::info::FlagsMember::new($name, const {
                            ::core::assert!(
                                $ty::$flag.bits() as u128 <= u32::MAX as u128,
                                "flag masks must fit in 32 bits",
                            );
                            $ty::$flag.bits() as u32
                        })),*],
                        $crate::info::FlagsAccessor {
                            get: |value| value.downcast_ref::<$ty>().map(|v| v.bits() as u32),
                            set: |target, bits| match target.downcast_mut::<$ty>() {
                                ::core::option::Option::Some(target) => {
                                    *target = $ty::from_bits_retain(bits as _);
                                    true
                                }
                                ::core::option::Option::None => false,
                            },
                        },
                    ))
                })
            }
        }
    };
}

/// Implements [`Described`](crate::info::Described) for a `Default` struct.
///
/// - `Name { field: Type, .. }` describes a root record.
/// - `Name : base as Parent { .. }` describes a record extending `Parent`,
///   embedded in the field `base`.
/// - `field: Type => FLAGS` attaches [`FieldFlags`](crate::info::FieldFlags).
///
/// ```
/// use rt_reflect::info::{Described, FieldFlags};
/// use rt_reflect::impl_described_record;
///
/// #[derive(Default)]
/// struct Entity { id: u32, cache: Vec<u8> }
///
/// impl_described_record!(Entity {
///     id: u32 => FieldFlags::REQUIRED,
///     cache: Vec<u8> => FieldFlags::NO_SERIALIZE,
/// });
///
/// let info = Entity::descriptor().as_record().unwrap();
/// assert!(info.field("id").unwrap().is_required());
/// assert!(!info.field("cache").unwrap().is_serialized());
/// ```
#[macro_export]
macro_rules! impl_described_record {
    (
        $ty:ident $(: $base:ident as $parent:ty)? {
            $($field:ident : $fty:ty $(=> $flags:expr)?),* $(,)?
        }
    ) => {
        impl $crate::info::Described for $ty {
            fn descriptor() -> &'static $crate::info::TypeDescriptor {
                static CELL: $crate::info::DescriptorCell = $crate::info::DescriptorCell::new();
                CELL.get_or_init(|| {
                    let record = $crate::info::RecordDescriptor::new::<$ty>(::core::stringify!($ty))
                        $(.with_parent::<$parent>(
                            |value| value
                                .downcast_ref::<$ty>()
                                .map(|v| &v.$base as &dyn ::core::any::Any),
                            |value| value
                                .downcast_mut::<$ty>()
                                .map(|v| &mut v.$base as &mut dyn ::core::any::Any),
                        ))?
                        .with_fields([
                            $(
                                $crate::info::Field::new::<$ty, $fty>(
                                    ::core::stringify!($field),
                                    |v| &v.$field,
                                    |v| &mut v.$field,
                                )
                                $(.with_flags($flags))?
                            ),*
                        ])
                        .with_default::<$ty>();
                    $crate::info::TypeDescriptor::Record(record)
                })
            }
        }
    };
}

/// Submits `T` to [`TypeRegistry::auto_register`](crate::registry::TypeRegistry::auto_register).
///
/// Requires the `auto_register` feature.
///
/// ```
/// use rt_reflect::registry::TypeRegistry;
/// use rt_reflect::{auto_register, impl_described_record};
///
/// #[derive(Default)]
/// struct Settings { volume: f32 }
///
/// impl_described_record!(Settings { volume: f32 });
/// auto_register!(Settings);
///
/// fn main() {
///     let mut registry = TypeRegistry::new();
///     registry.auto_register().unwrap();
///     assert!(registry.get_by_name("Settings").is_some());
/// }
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {
        $(
            $crate::__macro_exports::inventory::submit! {
                $crate::__macro_exports::AutoRegisterFn(
                    |registry| registry.register::<$ty>()
                )
            }
        )+
    };
}
