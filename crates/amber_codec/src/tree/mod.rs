//! The document tree codec.
//!
//! ## Menu
//!
//! - [`TreeSerializer`]: renders object graphs as `object` document trees.
//! - [`TreeDeserializer`]: reads documents back, typed or self-describing.
//! - [`ObjectInfo`]: what one node declares about its value.
//! - [`TypeRecord`]: one entry of an embedded type dictionary.
//! - [`TreeError`]: how a read or write fails.
//!
//! Documents keep structure in the markup and values in converter text. A
//! composite becomes an `object` node holding a `properties` block, each
//! property a named child carrying its declared type; collections hold
//! their elements in an `items` block. The writer spells out what a reader
//! could not infer and leaves everything else off the wire, so the readers
//! fall back to the same defaults the writer omits.

mod de;
mod error;
mod ser;

pub use de::{ObjectInfo, TreeDeserializer, TypeRecord};
pub use error::TreeError;
pub use ser::TreeSerializer;
