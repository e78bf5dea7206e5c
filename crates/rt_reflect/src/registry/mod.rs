//! Lookup of descriptors by guid and name.
//!
//! ## Menu
//!
//! - [`TypeRegistry`]: maps `TypeId`, [`TypeGuid`] and type name to descriptors.
//! - [`TypeRegistryArc`]: a registry shared behind `Arc<RwLock<_>>`.
//! - [`init`], [`global`] and [`is_initialized`]: the process-wide registry.
//! - [`RegistryError`]: collisions and lifecycle errors.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, types submitted through
//! [`auto_register!`](crate::auto_register) are collected by the [`inventory`]
//! crate and registered by [`TypeRegistry::auto_register`].
//!
//! Not all platforms support static collection. On those platforms the
//! submitted types are simply missing and must be registered by hand.
//!
//! [`TypeGuid`]: crate::info::TypeGuid
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod error;
mod global;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use error::RegistryError;
pub use global::{global, init, is_initialized};
pub use type_registry::{TypeRegistry, TypeRegistryArc};
