//! Static type descriptors.
//!
//! Every serializable type exposes one [`TypeInfo`] describing its shape and,
//! for containers and composites, what it holds. Descriptors are built once
//! per type (per generic instantiation) and interned for the process
//! lifetime, so all accessors hand out `&'static` data.

mod array_info;
mod composite_info;
mod list_info;
mod map_info;
mod property_info;
mod scalar_info;
mod type_info;

pub use array_info::ArrayInfo;
pub use composite_info::CompositeInfo;
pub use list_info::ListInfo;
pub use map_info::MapInfo;
pub use property_info::PropertyInfo;
pub use scalar_info::ScalarInfo;
pub use type_info::{Described, TypeInfo};
