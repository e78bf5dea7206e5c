//! Items referenced by exported macros.

#[cfg(feature = "auto_register")]
pub use inventory;

#[cfg(feature = "auto_register")]
pub use auto_register::AutoRegisterFn;

#[cfg(feature = "auto_register")]
mod auto_register {
    use crate::registry::{RegistryError, TypeRegistry};

    /// A registration function submitted by [`auto_register!`](crate::auto_register).
    pub struct AutoRegisterFn(pub fn(&mut TypeRegistry) -> Result<(), RegistryError>);

    inventory::collect!(AutoRegisterFn);
}
