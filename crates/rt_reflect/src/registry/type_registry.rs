use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use rt_utils::TypeIdMap;
use rt_utils::hash::{FixedHashState, HashMap};

use crate::info::{Described, RecordDescriptor, TypeDescriptor, TypeGuid};
use crate::registry::RegistryError;

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of [described] types.
///
/// Codecs only need the registry when the concrete type of a value is not
/// known statically, that is when loading clump objects and resolving
/// references by guid or by name.
///
/// # Example
///
/// ```
/// use rt_reflect::impl_described_record;
/// use rt_reflect::info::TypeGuid;
/// use rt_reflect::registry::TypeRegistry;
///
/// #[derive(Default)]
/// struct Point { x: f32, y: f32 }
///
/// impl_described_record!(Point { x: f32, y: f32 });
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Point>().unwrap();
///
/// let info = registry.record_by_guid(TypeGuid::from_name("Point")).unwrap();
/// assert_eq!(info.name(), "Point");
/// assert!(registry.get_by_name("f32").is_some());
/// ```
///
/// [described]: crate::info::Described
pub struct TypeRegistry {
    by_type_id: TypeIdMap<&'static TypeDescriptor>,
    by_guid: HashMap<TypeGuid, &'static TypeDescriptor>,
    by_name: HashMap<&'static str, &'static TypeDescriptor>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a empty [`TypeRegistry`].
    #[inline]
    pub const fn empty() -> Self {
        Self {
            by_type_id: TypeIdMap::new(),
            by_guid: HashMap::with_hasher(FixedHashState),
            by_name: HashMap::with_hasher(FixedHashState),
        }
    }

    /// Create a type registry with default registrations for primitive types.
    ///
    /// - `bool`
    /// - `i8 - i64`
    /// - `u8 - u64`
    /// - `f32` `f64`
    /// - `String`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        // Primitive names are distinct, so these cannot collide.
        registry.insert_unchecked(bool::descriptor());
        registry.insert_unchecked(i8::descriptor());
        registry.insert_unchecked(i16::descriptor());
        registry.insert_unchecked(i32::descriptor());
        registry.insert_unchecked(i64::descriptor());
        registry.insert_unchecked(u8::descriptor());
        registry.insert_unchecked(u16::descriptor());
        registry.insert_unchecked(u32::descriptor());
        registry.insert_unchecked(u64::descriptor());
        registry.insert_unchecked(f32::descriptor());
        registry.insert_unchecked(f64::descriptor());
        registry.insert_unchecked(String::descriptor());
        registry
    }

    fn insert_unchecked(&mut self, descriptor: &'static TypeDescriptor) {
        self.by_type_id.insert(descriptor.type_id(), descriptor);
        self.by_guid.insert(descriptor.guid(), descriptor);
        self.by_name.insert(descriptor.name(), descriptor);
    }

    // - Returns `Ok(false)` if the type is already registered.
    // - Returns `Ok(true)` if the type was inserted.
    fn try_insert(&mut self, descriptor: &'static TypeDescriptor) -> Result<bool, RegistryError> {
        let type_id = descriptor.type_id();
        if self.by_type_id.contains(&type_id) {
            return Ok(false);
        }

        if let Some(existing) = self.by_name.get(descriptor.name())
            && existing.type_id() != type_id
        {
            return Err(RegistryError::DuplicateName(descriptor.name()));
        }

        if let Some(existing) = self.by_guid.get(&descriptor.guid())
            && existing.type_id() != type_id
        {
            return Err(RegistryError::GuidCollision {
                guid: descriptor.guid(),
                existing: existing.name(),
                incoming: descriptor.name(),
            });
        }

        log::debug!("registered type `{}` ({})", descriptor.name(), descriptor.guid());
        self.insert_unchecked(descriptor);
        Ok(true)
    }

    /// Registers the type `T` and every type reachable from it.
    ///
    /// Reachable types are the field types and parent of records, the item
    /// type of arrays and the pointee of pointers. Types that are already
    /// registered are skipped along with their dependencies.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateName`] if another type uses the same name.
    /// - [`RegistryError::GuidCollision`] if another type hashes to the same guid.
    ///
    /// Types inserted before the error stay registered.
    #[inline]
    pub fn register<T: Described>(&mut self) -> Result<(), RegistryError> {
        self.register_descriptor(T::descriptor())
    }

    /// Registers `descriptor` and every type reachable from it.
    ///
    /// See [`register`](Self::register).
    pub fn register_descriptor(
        &mut self,
        descriptor: &'static TypeDescriptor,
    ) -> Result<(), RegistryError> {
        // Inserted before recursing: records may reach themselves.
        if !self.try_insert(descriptor)? {
            return Ok(());
        }

        match descriptor {
            TypeDescriptor::Record(info) => {
                if let Some(link) = info.parent_link() {
                    self.register_descriptor(link.descriptor())?;
                }
                for field in info.fields() {
                    self.register_descriptor(field.type_descriptor())?;
                }
            }
            TypeDescriptor::Array(info) => self.register_descriptor(info.item())?,
            TypeDescriptor::Pointer(info) => self.register_descriptor(info.pointee())?,
            TypeDescriptor::Primitive(_) | TypeDescriptor::Enum(_) | TypeDescriptor::Flags(_) => {}
        }
        Ok(())
    }

    /// Registers all types submitted with [`auto_register!`](crate::auto_register).
    ///
    /// Repeated calls are cheap and will not insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `Ok(true)` if the `auto_register` feature is enabled, `Ok(false)`
    /// otherwise. On platforms without static collection support the call
    /// succeeds but registers nothing.
    ///
    /// # Errors
    ///
    /// The first registration error is returned, see [`register`](Self::register).
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> Result<bool, RegistryError> {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::AutoRegisterFn;

            for AutoRegisterFn(register) in inventory::iter::<AutoRegisterFn> {
                register(self)?;
            }
            Ok(true)
        }
        #[cfg(not(feature = "auto_register"))]
        {
            Ok(false)
        }
    }

    /// Whether the type with given [`TypeId`] has been registered in this registry.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.by_type_id.contains(&type_id)
    }

    /// Returns the descriptor of the type with the given [`TypeId`].
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&'static TypeDescriptor> {
        self.by_type_id.get(&type_id).copied()
    }

    /// Returns the descriptor of `T` if it is registered.
    #[inline]
    pub fn get_type<T: ?Sized + 'static>(&self) -> Option<&'static TypeDescriptor> {
        self.by_type_id.get_type::<T>().copied()
    }

    /// Returns the descriptor registered under `guid`.
    #[inline]
    pub fn get_by_guid(&self, guid: TypeGuid) -> Option<&'static TypeDescriptor> {
        self.by_guid.get(&guid).copied()
    }

    /// Returns the descriptor registered under the type name `name`.
    #[inline]
    pub fn get_by_name(&self, name: &str) -> Option<&'static TypeDescriptor> {
        self.by_name.get(name).copied()
    }

    /// Returns the record registered under `guid`.
    ///
    /// `None` if no type has this guid or if it is not a record.
    pub fn record_by_guid(&self, guid: TypeGuid) -> Option<&'static RecordDescriptor> {
        match self.get_by_guid(guid) {
            Some(info) => info.as_record().ok(),
            None => None,
        }
    }

    /// Returns the record registered under the type name `name`.
    pub fn record_by_name(&self, name: &str) -> Option<&'static RecordDescriptor> {
        match self.get_by_name(name) {
            Some(info) => info.as_record().ok(),
            None => None,
        }
    }

    /// Number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.by_type_id.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_type_id.is_empty()
    }

    /// Returns an iterator over the registered descriptors, in no particular order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'static TypeDescriptor> + '_ {
        self.by_type_id.values().copied()
    }

    /// Returns an iterator over the registered records.
    pub fn records(&self) -> impl Iterator<Item = &'static RecordDescriptor> + '_ {
        self.iter().filter_map(|info| info.as_record().ok())
    }

    /// Returns `base` and every registered record derived from it,
    /// sorted by name.
    pub fn descendants_of(&self, base: &RecordDescriptor) -> Vec<&'static RecordDescriptor> {
        let mut list: Vec<_> = self
            .records()
            .filter(|record| record.is_derived_from(base))
            .collect();
        list.sort_by_key(|record| record.name());
        list
    }

    /// Like [`descendants_of`](Self::descendants_of), keeping only records
    /// with a default constructor.
    pub fn concrete_descendants_of(
        &self,
        base: &RecordDescriptor,
    ) -> Vec<&'static RecordDescriptor> {
        let mut list = self.descendants_of(base);
        list.retain(|record| record.is_concrete());
        list
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.by_name.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

use alloc::sync::Arc;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A [`TypeRegistry`] shared between threads.
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    /// Wraps `registry`.
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }

    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read().fmt(f)
    }
}

// -----------------------------------------------------------------------------
// Tests
