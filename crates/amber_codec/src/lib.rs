#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Modules

pub mod compact;
pub mod dom;
pub mod legacy;
pub mod tags;
pub mod tree;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use compact::CompactError;
pub use dom::DomError;
pub use tree::TreeError;
