//! Run-time type descriptors, a type-directed tree codec and clump persistence.
//!
//! ## Menu
//!
//! - [`utils`]: hash containers and the `TypeId` map shared by the crates.
//! - [`reflect`]: descriptors, registry, tree, text and binary codecs, clumps.
#![no_std]

pub use rt_reflect as reflect;
pub use rt_utils as utils;
