#![doc = include_str!("../README.md")]

pub use amber_codec as codec;
pub use amber_reflect as reflect;
