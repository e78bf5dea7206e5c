use thiserror::Error;

use crate::info::TypeGuid;

/// An error returned by [`TypeRegistry`](crate::registry::TypeRegistry)
/// registration and by the process-wide registry lifecycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    /// Two distinct types hash to the same guid.
    #[error("guid {guid} of `{incoming}` is already used by `{existing}`")]
    GuidCollision {
        guid: TypeGuid,
        existing: &'static str,
        incoming: &'static str,
    },
    /// Two distinct types share a name.
    #[error("type name `{0}` is registered by another type")]
    DuplicateName(&'static str),
    /// [`init`](crate::registry::init) was called more than once.
    #[error("the global type registry is already initialized")]
    AlreadyInitialized,
    /// [`global`](crate::registry::global) was called before [`init`](crate::registry::init).
    #[error("the global type registry is not initialized")]
    NotInitialized,
}
