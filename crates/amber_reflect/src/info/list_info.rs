use std::any::TypeId;

use crate::{Named, TypeRef};

/// Descriptor of a growable ordered sequence.
#[derive(Debug)]
pub struct ListInfo {
    type_ref: TypeRef,
    ty: TypeId,
    element: TypeRef,
}

impl ListInfo {
    pub fn new<T: Named, E: Named>() -> Self {
        Self {
            type_ref: TypeRef::of::<T>(),
            ty: TypeId::of::<T>(),
            element: TypeRef::of::<E>(),
        }
    }

    /// Descriptor for a list whose element type is only known per value,
    /// as with [`DynamicList`](crate::ops::DynamicList).
    pub fn untyped<T: Named>() -> Self {
        Self {
            type_ref: TypeRef::of::<T>(),
            ty: TypeId::of::<T>(),
            element: TypeRef::unspecified(),
        }
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn ty_id(&self) -> TypeId {
        self.ty
    }

    /// The element type's reference. Not [sufficient] for untyped lists,
    /// which is how codecs decide to carry per-item type attributes.
    ///
    /// [sufficient]: TypeRef::is_sufficient
    pub fn element(&self) -> &TypeRef {
        &self.element
    }
}
