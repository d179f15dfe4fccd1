use std::sync::Arc;

use crate::info::{Described, TypeInfo};
use crate::ops::{ShapeMut, ShapeRef};
use crate::registry::{Registrable, TextConverter, TypeEntry, TypeRegistry};
use crate::{Amber, Named, Shape, TypeRef};

// `Arc<T>` is transparent: it reports `T`'s name, descriptor and shape, so a
// shared composite serializes exactly like an owned one. What it adds is
// graph identity. `identity` returns the shared allocation's address, which
// is how a serializer recognizes the same object arriving twice.

impl<T: Registrable + Clone> Named for Arc<T> {
    #[inline]
    fn type_name() -> &'static str {
        T::type_name()
    }

    #[inline]
    fn library() -> &'static str {
        T::library()
    }
}

impl<T: Registrable + Clone> Described for Arc<T> {
    #[inline]
    fn type_info() -> &'static TypeInfo {
        T::type_info()
    }
}

impl<T: Registrable + Clone> Amber for Arc<T> {
    #[inline]
    fn type_ref(&self) -> TypeRef {
        (**self).type_ref()
    }

    #[inline]
    fn info(&self) -> &'static TypeInfo {
        (**self).info()
    }

    #[inline]
    fn ty_id(&self) -> std::any::TypeId {
        (**self).ty_id()
    }

    #[inline]
    fn identity(&self) -> *const () {
        Arc::as_ptr(self).cast()
    }

    #[inline]
    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }

    #[inline]
    fn shape(&self) -> Shape {
        (**self).shape()
    }

    #[inline]
    fn shape_ref(&self) -> ShapeRef<'_> {
        (**self).shape_ref()
    }

    #[inline]
    fn shape_mut(&mut self) -> ShapeMut<'_> {
        Arc::make_mut(self).shape_mut()
    }

    fn set(&mut self, value: Box<dyn Amber>) -> Result<(), Box<dyn Amber>> {
        let value = match value.downcast::<Self>() {
            Ok(shared) => {
                *self = *shared;
                return Ok(());
            }
            Err(value) => value,
        };
        *self = Arc::new(*value.downcast::<T>()?);
        Ok(())
    }
}

impl<T: Registrable + Clone> Registrable for Arc<T> {
    #[inline]
    fn type_entry() -> TypeEntry {
        T::type_entry()
    }

    #[inline]
    fn converter() -> Option<TextConverter> {
        T::converter()
    }

    #[inline]
    fn register_dependencies(registry: &TypeRegistry) {
        T::register_dependencies(registry);
    }
}
