//! Structural views and per-shape operation traits.
//!
//! [`ShapeRef`]/[`ShapeMut`] are what a codec matches on after erasing the
//! concrete type; each variant exposes the operations of one [`Shape`]. The
//! `Dynamic*` carriers implement the same traits for values whose structure
//! is only discovered at runtime, e.g. while deserializing a document with
//! per-item type attributes.
//!
//! [`Shape`]: crate::Shape

mod array_ops;
mod composite_ops;
mod list_ops;
mod map_ops;

pub use array_ops::{Array, ArrayIter};
pub use composite_ops::{Composite, DynamicComposite, PropertyIter};
pub use list_ops::{DynamicList, List, ListIter};
pub use map_ops::{DynamicMap, Map};

use crate::{Amber, Shape};

// -----------------------------------------------------------------------------
// ShapeRef

/// An immutable structural view of a value, one variant per [`Shape`].
///
/// [`Shape`]: crate::Shape
pub enum ShapeRef<'a> {
    Scalar(&'a dyn Amber),
    Array(&'a dyn Array),
    List(&'a dyn List),
    Map(&'a dyn Map),
    Composite(&'a dyn Composite),
}

impl<'a> ShapeRef<'a> {
    pub fn shape(&self) -> Shape {
        match self {
            ShapeRef::Scalar(_) => Shape::Scalar,
            ShapeRef::Array(_) => Shape::Array,
            ShapeRef::List(_) => Shape::List,
            ShapeRef::Map(_) => Shape::Map,
            ShapeRef::Composite(_) => Shape::Composite,
        }
    }

    pub fn as_array(&self) -> Option<&'a dyn Array> {
        match self {
            ShapeRef::Array(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&'a dyn List> {
        match self {
            ShapeRef::List(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&'a dyn Map> {
        match self {
            ShapeRef::Map(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&'a dyn Composite> {
        match self {
            ShapeRef::Composite(value) => Some(*value),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// ShapeMut

/// A mutable structural view of a value, one variant per [`Shape`].
///
/// [`Shape`]: crate::Shape
pub enum ShapeMut<'a> {
    Scalar(&'a mut dyn Amber),
    Array(&'a mut dyn Array),
    List(&'a mut dyn List),
    Map(&'a mut dyn Map),
    Composite(&'a mut dyn Composite),
}

impl<'a> ShapeMut<'a> {
    pub fn shape(&self) -> Shape {
        match self {
            ShapeMut::Scalar(_) => Shape::Scalar,
            ShapeMut::Array(_) => Shape::Array,
            ShapeMut::List(_) => Shape::List,
            ShapeMut::Map(_) => Shape::Map,
            ShapeMut::Composite(_) => Shape::Composite,
        }
    }
}
