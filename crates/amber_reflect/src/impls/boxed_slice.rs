use crate::impls::{GenericNameCell, GenericTypeInfoCell};
use crate::info::{ArrayInfo, Described, TypeInfo};
use crate::ops::{Array, ArrayIter, ShapeMut, ShapeRef};
use crate::registry::{Registrable, TypeEntry, TypeRegistry};
use crate::{Amber, Named, Shape, TypeRef};

impl<T: Registrable> Named for Box<[T]> {
    fn type_name() -> &'static str {
        static CELL: GenericNameCell = GenericNameCell::new();
        CELL.get_or_insert::<Self>(|| format!("Array<{}>", T::type_name()))
    }
}

impl<T: Registrable> Described for Box<[T]> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Array(ArrayInfo::new::<Self, T>()))
    }
}

impl<T: Registrable> Amber for Box<[T]> {
    #[inline]
    fn type_ref(&self) -> TypeRef {
        TypeRef::of::<Self>()
    }

    #[inline]
    fn info(&self) -> &'static TypeInfo {
        <Self as Described>::type_info()
    }

    #[inline]
    fn shape(&self) -> Shape {
        Shape::Array
    }

    #[inline]
    fn shape_ref(&self) -> ShapeRef<'_> {
        ShapeRef::Array(self)
    }

    #[inline]
    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Array(self)
    }

    fn set(&mut self, value: Box<dyn Amber>) -> Result<(), Box<dyn Amber>> {
        *self = *value.downcast::<Self>()?;
        Ok(())
    }
}

impl<T: Registrable> Array for Box<[T]> {
    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Amber> {
        <[T]>::get(self, index).map(|value| value as &dyn Amber)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Amber> {
        <[T]>::get_mut(self, index).map(|value| value as &mut dyn Amber)
    }

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn element(&self) -> TypeRef {
        TypeRef::of::<T>()
    }

    fn try_set(&mut self, index: usize, value: Box<dyn Amber>) -> Result<(), Box<dyn Amber>> {
        if index >= <[T]>::len(self) {
            return Err(value);
        }
        self[index] = *value.downcast::<T>()?;
        Ok(())
    }

    #[inline]
    fn iter(&self) -> ArrayIter<'_> {
        ArrayIter::new(self)
    }
}

impl<T: Registrable> Registrable for Box<[T]> {
    fn type_entry() -> TypeEntry {
        TypeEntry::of::<Self>().with_sized(|len| {
            let values: Box<[T]> = (0..len).map(|_| T::default()).collect();
            Box::new(values)
        })
    }

    fn register_dependencies(registry: &TypeRegistry) {
        registry.register::<T>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxed_slice_reports_array_shape() {
        let values: Box<[u32]> = vec![1, 2].into_boxed_slice();
        assert_eq!(values.shape(), Shape::Array);
        assert_eq!(<Box<[u32]> as Named>::type_name(), "Array<u32>");

        let info = values.info().as_array().unwrap();
        assert_eq!(info.element().name(), "u32");
    }

    #[test]
    fn sized_factory_builds_default_filled_arrays() {
        let entry = <Box<[i64]> as Registrable>::type_entry();
        let value = entry.create_sized(3).unwrap();
        let array = value.shape_ref().as_array().map(Array::len);
        assert_eq!(array, Some(3));
    }
}
