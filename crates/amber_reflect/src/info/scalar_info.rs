use std::any::TypeId;

use crate::{Named, TypeRef};

/// Descriptor of a text-convertible type.
///
/// Scalars carry no structural metadata; their registry entry supplies the
/// converter that does the actual text work.
#[derive(Debug)]
pub struct ScalarInfo {
    type_ref: TypeRef,
    ty: TypeId,
}

impl ScalarInfo {
    pub fn new<T: Named>() -> Self {
        Self {
            type_ref: TypeRef::of::<T>(),
            ty: TypeId::of::<T>(),
        }
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn ty_id(&self) -> TypeId {
        self.ty
    }
}
