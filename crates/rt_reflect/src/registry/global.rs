use std::sync::OnceLock;

use crate::registry::{RegistryError, TypeRegistry, TypeRegistryArc};

static GLOBAL: OnceLock<TypeRegistryArc> = OnceLock::new();

/// Initializes the process-wide registry.
///
/// The registry starts as [`TypeRegistry::new`], then `f` registers the
/// application types. Call this exactly once at startup, before loading
/// any clump through [`load_clump`](crate::clump::load_clump).
///
/// # Errors
///
/// - [`RegistryError::AlreadyInitialized`] on every call after the first
///   successful one.
/// - Any error returned by `f`, in which case the registry stays
///   uninitialized.
///
/// # Example
///
/// ```
/// use rt_reflect::registry;
///
/// let shared = registry::init(|registry| {
///     registry.auto_register()?;
///     Ok(())
/// })
/// .unwrap();
/// assert!(shared.read().get_by_name("u32").is_some());
/// assert!(registry::init(|_| Ok(())).is_err());
/// ```
pub fn init(
    f: impl FnOnce(&mut TypeRegistry) -> Result<(), RegistryError>,
) -> Result<&'static TypeRegistryArc, RegistryError> {
    if GLOBAL.get().is_some() {
        return Err(RegistryError::AlreadyInitialized);
    }

    let mut registry = TypeRegistry::new();
    f(&mut registry)?;

    GLOBAL
        .set(TypeRegistryArc::new(registry))
        .map_err(|_| RegistryError::AlreadyInitialized)?;
    log::debug!("global type registry initialized");
    global()
}

/// Returns the process-wide registry.
///
/// # Errors
///
/// [`RegistryError::NotInitialized`] before [`init`] succeeded.
#[inline]
pub fn global() -> Result<&'static TypeRegistryArc, RegistryError> {
    GLOBAL.get().ok_or(RegistryError::NotInitialized)
}

/// Returns `true` once [`init`] succeeded.
#[inline]
pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

// -----------------------------------------------------------------------------
// Tests
