use std::any::TypeId;

use crate::{Named, TypeRef};

/// Descriptor of a fixed-size indexed sequence.
///
/// Arrays are the one shape whose instances need their length before
/// construction; deserializers count serialized items first and ask the
/// registry for a sized instance.
#[derive(Debug)]
pub struct ArrayInfo {
    type_ref: TypeRef,
    ty: TypeId,
    element: TypeRef,
}

impl ArrayInfo {
    pub fn new<T: Named, E: Named>() -> Self {
        Self {
            type_ref: TypeRef::of::<T>(),
            ty: TypeId::of::<T>(),
            element: TypeRef::of::<E>(),
        }
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn ty_id(&self) -> TypeId {
        self.ty
    }

    /// The element type's reference. Always sufficient: there is no dynamic
    /// array carrier.
    pub fn element(&self) -> &TypeRef {
        &self.element
    }
}
