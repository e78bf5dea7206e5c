//! Run-time type descriptors.
//!
//! ## Menu
//!
//! - [`TypeKind`]: the closed set of kinds, `Primitive`, `Enum`, `Flags`,
//!   `Record`, `Pointer` and `Array`.
//! - [`TypeDescriptor`]: a sum type holding one of the descriptors below.
//!     - [`PrimitiveDescriptor`]: scalars, see [`PrimitiveKind`].
//!     - [`EnumDescriptor`]: named integer constants, value and name lookups.
//!     - [`FlagsDescriptor`]: named bit masks, lookups and `|` rendering.
//!     - [`RecordDescriptor`]: named fields, single parent, cached full field list.
//!     - [`PointerDescriptor`]: references to clump objects.
//!     - [`ArrayDescriptor`]: growable sequences.
//! - [`Field`] and [`FieldFlags`]: record fields with type-erased accessors.
//! - [`TypeGuid`]: stable 32-bit identity used by persisted data.
//! - [`Described`]: a trait for obtaining the descriptor of a type.
//! - [`DescriptorCell`] and [`GenericDescriptorCell`]: lazy static storage.

// -----------------------------------------------------------------------------
// Modules

mod array_info;
mod cell;
mod described;
mod enum_info;
mod field_info;
mod flags_info;
mod guid;
mod kind;
mod pointer_info;
mod primitive_info;
mod record_info;
mod type_desc;

// -----------------------------------------------------------------------------
// Exports

pub use array_info::{ArrayAccessor, ArrayDescriptor};
pub use cell::{DescriptorCell, GenericDescriptorCell};
pub use described::Described;
pub use enum_info::{EnumAccessor, EnumDescriptor, EnumMember, INVALID_VALUE};
pub use field_info::{Field, FieldFlags};
pub use flags_info::{FLAG_SEPARATOR, FlagsAccessor, FlagsDescriptor, FlagsMember};
pub use guid::TypeGuid;
pub use kind::{KindError, PrimitiveKind, TypeKind};
pub use pointer_info::{PointerAccessor, PointerDescriptor};
pub use primitive_info::PrimitiveDescriptor;
pub use record_info::{Constructor, FieldRef, ParentLink, RecordDescriptor};
pub use type_desc::TypeDescriptor;
