use std::any::TypeId;

use crate::info::{Described, TypeInfo};
use crate::{Shape, TypeRef};

/// Descriptor of one named property of a composite.
///
/// The property's own descriptor is reached through a function pointer rather
/// than stored eagerly, so a composite's info can be built without touching
/// other types' cells (which may include its own, for self-referential
/// composites).
#[derive(Clone, Debug)]
pub struct PropertyInfo {
    name: &'static str,
    type_ref: TypeRef,
    ty: TypeId,
    info: fn() -> &'static TypeInfo,
}

impl PropertyInfo {
    /// Describes a property holding a `T`.
    ///
    /// Optional and shared carriers are unwrapped by the caller: a property
    /// declared `Option<Arc<T>>` is described as holding `T`.
    pub fn of<T: Described>(name: &'static str) -> Self {
        Self {
            name,
            type_ref: TypeRef::of::<T>(),
            ty: TypeId::of::<T>(),
            info: T::type_info,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn ty_id(&self) -> TypeId {
        self.ty
    }

    pub fn info(&self) -> &'static TypeInfo {
        (self.info)()
    }

    pub fn shape(&self) -> Shape {
        self.info().shape()
    }
}
