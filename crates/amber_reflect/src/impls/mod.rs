//! [`Amber`] implementations for standard types, and utilities for writing
//! your own.
//!
//! - [`TypeInfoCell`]: Used to implement [`Described`] for non-generic types.
//! - [`GenericTypeInfoCell`]: Used to implement [`Described`] for generic types.
//! - [`GenericNameCell`]: Used to implement [`Named`] for generic types.
//!
//! ## Implemented Menu
//!
//! - scalars: `bool`, `char`, `i8`-`i128`, `u8`-`u128`, `isize`, `usize`,
//!   `f32`, `f64`, `String`
//! - sequences: `Vec<T>`, `Box<[T]>`
//! - keyed: `HashMap<K, V>`
//! - shared: `Arc<T>`, transparent over `T`
//!
//! `Option<T>` is deliberately absent: optionality lives in composite
//! property slots, not in values.
//!
//! [`Amber`]: crate::Amber
//! [`Described`]: crate::info::Described
//! [`Named`]: crate::Named

// -----------------------------------------------------------------------------
// Modules

mod cell;

mod arc;
mod boxed_slice;
mod hash_map;
mod scalar;
mod vec;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericNameCell, GenericTypeInfoCell, TypeInfoCell};
