use crate::impls::{GenericNameCell, GenericTypeInfoCell};
use crate::info::{Described, ListInfo, TypeInfo};
use crate::ops::{List, ListIter, ShapeMut, ShapeRef};
use crate::registry::{Registrable, TypeEntry, TypeRegistry};
use crate::{Amber, Named, Shape, TypeRef};

impl<T: Registrable> Named for Vec<T> {
    fn type_name() -> &'static str {
        static CELL: GenericNameCell = GenericNameCell::new();
        CELL.get_or_insert::<Self>(|| format!("List<{}>", T::type_name()))
    }
}

impl<T: Registrable> Described for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, T>()))
    }
}

impl<T: Registrable> Amber for Vec<T> {
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
        Shape::List
    }

    #[inline]
    fn shape_ref(&self) -> ShapeRef<'_> {
        ShapeRef::List(self)
    }

    #[inline]
    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::List(self)
    }

    fn set(&mut self, value: Box<dyn Amber>) -> Result<(), Box<dyn Amber>> {
        *self = *value.downcast::<Self>()?;
        Ok(())
    }
}

impl<T: Registrable> List for Vec<T> {
    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Amber> {
        self.as_slice().get(index).map(|value| value as &dyn Amber)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Amber> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|value| value as &mut dyn Amber)
    }

    #[inline]
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn try_push(&mut self, value: Box<dyn Amber>) -> Result<(), Box<dyn Amber>> {
        self.push(*value.downcast::<T>()?);
        Ok(())
    }

    #[inline]
    fn iter(&self) -> ListIter<'_> {
        ListIter::new(self)
    }
}

impl<T: Registrable> Registrable for Vec<T> {
    fn type_entry() -> TypeEntry {
        TypeEntry::of::<Self>()
    }

    fn register_dependencies(registry: &TypeRegistry) {
        registry.register::<T>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_reports_list_shape_and_element() {
        let values = vec![1_u32, 2, 3];
        assert_eq!(values.shape(), Shape::List);
        assert_eq!(<Vec<u32> as Named>::type_name(), "List<u32>");

        let info = values.info().as_list().unwrap();
        assert_eq!(info.element().name(), "u32");
    }

    #[test]
    fn vec_try_push_checks_element_type() {
        let mut values = vec![1_u32];
        let list: &mut dyn List = &mut values;

        assert!(list.try_push(Box::new(2_u32)).is_ok());
        assert!(list.try_push(Box::new(2.0_f64)).is_err());
        assert_eq!(values, [1, 2]);
    }

    #[test]
    fn nested_vec_names_compose() {
        assert_eq!(<Vec<Vec<u32>> as Named>::type_name(), "List<List<u32>>");
    }
}
