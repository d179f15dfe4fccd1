use std::any::TypeId;

use crate::info::{ArrayInfo, CompositeInfo, ListInfo, MapInfo, ScalarInfo};
use crate::{Named, Shape, TypeRef};

// -----------------------------------------------------------------------------
// Described

/// Compile-time access to a type's descriptor.
///
/// Implementations intern their descriptor on first access, either in a
/// dedicated static cell (non-generic types) or in a per-instantiation map
/// (generic containers); see the cells in [`crate::impls`].
pub trait Described: Named {
    /// The interned descriptor of this type.
    fn type_info() -> &'static TypeInfo;
}

// -----------------------------------------------------------------------------
// TypeInfo

/// A type's compile-time description, one variant per [`Shape`].
#[derive(Debug)]
pub enum TypeInfo {
    Scalar(ScalarInfo),
    Array(ArrayInfo),
    List(ListInfo),
    Map(MapInfo),
    Composite(CompositeInfo),
}

impl TypeInfo {
    pub fn shape(&self) -> Shape {
        match self {
            TypeInfo::Scalar(_) => Shape::Scalar,
            TypeInfo::Array(_) => Shape::Array,
            TypeInfo::List(_) => Shape::List,
            TypeInfo::Map(_) => Shape::Map,
            TypeInfo::Composite(_) => Shape::Composite,
        }
    }

    pub fn type_ref(&self) -> &TypeRef {
        match self {
            TypeInfo::Scalar(info) => info.type_ref(),
            TypeInfo::Array(info) => info.type_ref(),
            TypeInfo::List(info) => info.type_ref(),
            TypeInfo::Map(info) => info.type_ref(),
            TypeInfo::Composite(info) => info.type_ref(),
        }
    }

    pub fn ty_id(&self) -> TypeId {
        match self {
            TypeInfo::Scalar(info) => info.ty_id(),
            TypeInfo::Array(info) => info.ty_id(),
            TypeInfo::List(info) => info.ty_id(),
            TypeInfo::Map(info) => info.ty_id(),
            TypeInfo::Composite(info) => info.ty_id(),
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarInfo> {
        match self {
            TypeInfo::Scalar(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayInfo> {
        match self {
            TypeInfo::Array(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListInfo> {
        match self {
            TypeInfo::List(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapInfo> {
        match self {
            TypeInfo::Map(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeInfo> {
        match self {
            TypeInfo::Composite(info) => Some(info),
            _ => None,
        }
    }
}
