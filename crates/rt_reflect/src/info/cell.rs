//! Containers for static storage of descriptors.
//!
//! This is usually used to implement [`Described`](crate::info::Described).
//!
//! - [`DescriptorCell`]: for non-generic types, a plain [`OnceLock`].
//! - [`GenericDescriptorCell`]: for generic types. The `static CELL` inside a
//!   generic function is shared by every instantiation, so the cell keeps a
//!   [`TypeIdMap`] behind a [`RwLock`].
//!
//! Both cells serialise first construction: concurrent first uses of the same
//! type build the descriptor once.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use rt_utils::TypeIdMap;

use crate::info::TypeDescriptor;

// -----------------------------------------------------------------------------
// DescriptorCell

/// Static storage for the descriptor of a non-generic type.
///
/// ## Example
///
/// ```
/// use rt_reflect::info::{Described, DescriptorCell, RecordDescriptor, TypeDescriptor};
///
/// struct Marker;
///
/// impl Described for Marker {
///     fn descriptor() -> &'static TypeDescriptor {
///         static CELL: DescriptorCell = DescriptorCell::new();
///         CELL.get_or_init(|| TypeDescriptor::Record(RecordDescriptor::new::<Marker>("Marker")))
///     }
/// }
///
/// assert_eq!(Marker::descriptor().name(), "Marker");
/// ```
pub struct DescriptorCell(OnceLock<TypeDescriptor>);

impl DescriptorCell {
    /// Create a empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored descriptor, building it with `f` on first use.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &TypeDescriptor
    where
        F: FnOnce() -> TypeDescriptor,
    {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericDescriptorCell

/// Static storage for the descriptors of a generic type.
///
/// Descriptors are leaked on insertion and live until process exit.
pub struct GenericDescriptorCell(RwLock<TypeIdMap<&'static TypeDescriptor>>);

impl GenericDescriptorCell {
    /// Create a empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the descriptor stored for `G`, building it with `f` on first use.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(
        &self,
        f: impl FnOnce() -> TypeDescriptor,
    ) -> &'static TypeDescriptor {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    // Separate to reduce code compilation times
    #[inline(never)]
    fn get_or_insert_by_type_id(
        &self,
        type_id: TypeId,
        f: impl FnOnce() -> TypeDescriptor,
    ) -> &'static TypeDescriptor {
        let found = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();
        match found {
            Some(descriptor) => descriptor,
            None => self.insert_by_type_id(type_id, f),
        }
    }

    // `f` runs outside the lock: building a descriptor may request the
    // descriptors of other instantiations stored in this same cell.
    #[inline(never)]
    fn insert_by_type_id(
        &self,
        type_id: TypeId,
        f: impl FnOnce() -> TypeDescriptor,
    ) -> &'static TypeDescriptor {
        let built = f();
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(Box::new(built)))
    }
}

// -----------------------------------------------------------------------------
// Tests
