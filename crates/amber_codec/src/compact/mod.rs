//! The compact record format: brace-delimited records of quoted pairs.
//!
//! ## Menu
//!
//! - [`encode`]: Renders a value as compact text.
//! - [`decode`] / [`decode_all`]: Bind records onto declared composites.
//! - [`decode_with`] / [`decode_all_with`]: The same with a fallback binder.
//! - [`scan`]: The restartable record and property scanners underneath.
//!
//! A record reads like `{ "label" : "boot", "count" : "2" }`: property
//! names and scalar values are quoted, nested records and bracketed
//! element runs stand unquoted after the `" : "` separator. The format
//! carries no type attributes; a decoder brings the target type and binds
//! by property name, which keeps the text legible in logs and diffable in
//! version control.
//!
//! Streams hold any number of records separated by arbitrary text. That
//! looseness is deliberate: entries are routinely embedded in surrounding
//! prose, and the scanners pick records out of it rather than demanding a
//! clean document.

// -----------------------------------------------------------------------------
// Modules

mod decode;
mod encode;
mod error;

pub mod scan;

// -----------------------------------------------------------------------------
// Exports

pub use decode::{decode, decode_all, decode_all_with, decode_with};
pub use encode::encode;
pub use error::CompactError;
