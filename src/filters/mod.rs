//! Filter module.
//!
//! Contains the filter registry and the built-in pixel filters.

pub mod builtin;
pub mod registry;

pub use registry::{FilterFactory, FilterRegistry, RegistryEntry};
