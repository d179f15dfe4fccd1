//! The type registry: name resolution and value construction.
//!
//! ## Menu
//!
//! - [`Registrable`]: A trait connecting a type to its registry entry.
//! - [`TypeEntry`]: Identity, descriptor and construction hooks for one type.
//! - [`TextConverter`]: Round-trips a scalar value through its text form.
//! - [`FromBinary`]: Opt-in construction from a decoded binary payload.
//! - [`TypeRegistry`]: The concurrent store deserializers resolve against.
//!
//! Registration happens once at startup through [`TypeRegistry::register`];
//! after that the registry is shared freely across threads. Deserializers
//! resolve wire names with [`TypeRegistry::resolve`] and build values through
//! the `construct` family, never touching type machinery directly.

// -----------------------------------------------------------------------------
// Modules

mod error;
mod traits;
mod type_entry;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use error::{ConvertError, CreateError, ResolveError};
pub use traits::{FromBinary, Registrable};
pub use type_entry::{TextConverter, TypeEntry};
pub use type_registry::TypeRegistry;
