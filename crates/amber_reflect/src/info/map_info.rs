use std::any::TypeId;

use crate::{Named, TypeRef};

/// Descriptor of a keyed collection.
#[derive(Debug)]
pub struct MapInfo {
    type_ref: TypeRef,
    ty: TypeId,
    key: TypeRef,
    value: TypeRef,
}

impl MapInfo {
    pub fn new<T: Named, K: Named, V: Named>() -> Self {
        Self {
            type_ref: TypeRef::of::<T>(),
            ty: TypeId::of::<T>(),
            key: TypeRef::of::<K>(),
            value: TypeRef::of::<V>(),
        }
    }

    /// Descriptor for a map whose entry types are only known per value,
    /// as with [`DynamicMap`](crate::ops::DynamicMap).
    pub fn untyped<T: Named>() -> Self {
        Self {
            type_ref: TypeRef::of::<T>(),
            ty: TypeId::of::<T>(),
            key: TypeRef::unspecified(),
            value: TypeRef::unspecified(),
        }
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn ty_id(&self) -> TypeId {
        self.ty
    }

    /// The key type's reference; not [sufficient] for untyped maps.
    ///
    /// [sufficient]: TypeRef::is_sufficient
    pub fn key(&self) -> &TypeRef {
        &self.key
    }

    /// The value type's reference; not [sufficient] for untyped maps.
    ///
    /// [sufficient]: TypeRef::is_sufficient
    pub fn value(&self) -> &TypeRef {
        &self.value
    }
}
