#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Modules

mod macros;
mod reflection;
mod type_ref;

pub mod impls;
pub mod info;
pub mod ops;
pub mod registry;
pub mod walk;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use reflection::{Amber, Shape};
pub use type_ref::{DEFAULT_LIBRARY, Named, TEXT_TYPE, TypeRef, short_name};
