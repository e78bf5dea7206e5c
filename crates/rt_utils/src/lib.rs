//! Small shared utilities for the `rt` crates.
//!
//! ## Menu
//!
//! - [`hash`]: hash containers with a fixed, platform independent seed.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId).
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
