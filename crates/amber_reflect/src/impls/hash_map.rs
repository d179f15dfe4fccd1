use std::collections::HashMap;
use std::hash::Hash;

use crate::impls::{GenericNameCell, GenericTypeInfoCell};
use crate::info::{Described, MapInfo, TypeInfo};
use crate::ops::{Map, ShapeMut, ShapeRef};
use crate::registry::{Registrable, TypeEntry, TypeRegistry};
use crate::{Amber, Named, Shape, TypeRef};

impl<K, V> Named for HashMap<K, V>
where
    K: Registrable + Eq + Hash,
    V: Registrable,
{
    fn type_name() -> &'static str {
        static CELL: GenericNameCell = GenericNameCell::new();
        CELL.get_or_insert::<Self>(|| format!("Map<{}, {}>", K::type_name(), V::type_name()))
    }
}

impl<K, V> Described for HashMap<K, V>
where
    K: Registrable + Eq + Hash,
    V: Registrable,
{
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Map(MapInfo::new::<Self, K, V>()))
    }
}

impl<K, V> Amber for HashMap<K, V>
where
    K: Registrable + Eq + Hash,
    V: Registrable,
{
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
        Shape::Map
    }

    #[inline]
    fn shape_ref(&self) -> ShapeRef<'_> {
        ShapeRef::Map(self)
    }

    #[inline]
    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Map(self)
    }

    fn set(&mut self, value: Box<dyn Amber>) -> Result<(), Box<dyn Amber>> {
        *self = *value.downcast::<Self>()?;
        Ok(())
    }
}

impl<K, V> Map for HashMap<K, V>
where
    K: Registrable + Eq + Hash,
    V: Registrable,
{
    #[inline]
    fn len(&self) -> usize {
        Self::len(self)
    }

    #[inline]
    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Amber, &dyn Amber)> + '_> {
        Box::new(Self::iter(self).map(|(key, value)| (key as &dyn Amber, value as &dyn Amber)))
    }

    fn try_insert(
        &mut self,
        key: Box<dyn Amber>,
        value: Box<dyn Amber>,
    ) -> Result<Option<Box<dyn Amber>>, (Box<dyn Amber>, Box<dyn Amber>)> {
        let key = match key.downcast::<K>() {
            Ok(key) => key,
            Err(key) => return Err((key, value)),
        };
        let value = match value.downcast::<V>() {
            Ok(value) => value,
            Err(value) => return Err((key as Box<dyn Amber>, value)),
        };
        let old = Self::insert(self, *key, *value);
        Ok(old.map(|value| Box::new(value) as Box<dyn Amber>))
    }
}

impl<K, V> Registrable for HashMap<K, V>
where
    K: Registrable + Eq + Hash,
    V: Registrable,
{
    fn type_entry() -> TypeEntry {
        TypeEntry::of::<Self>()
    }

    fn register_dependencies(registry: &TypeRegistry) {
        registry.register::<K>();
        registry.register::<V>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_map_reports_map_shape_and_entry_types() {
        let map: HashMap<String, u32> = HashMap::new();
        assert_eq!(map.shape(), Shape::Map);
        assert_eq!(
            <HashMap<String, u32> as Named>::type_name(),
            "Map<String, u32>"
        );

        let info = map.info().as_map().unwrap();
        assert_eq!(info.key().name(), "String");
        assert_eq!(info.value().name(), "u32");
    }

    #[test]
    fn try_insert_checks_both_types() {
        let mut map: HashMap<String, u32> = HashMap::new();
        let erased: &mut dyn Map = &mut map;

        assert!(erased
            .try_insert(Box::new(String::from("a")), Box::new(1_u32))
            .is_ok());
        assert!(erased
            .try_insert(Box::new(2_u32), Box::new(1_u32))
            .is_err());
        assert!(erased
            .try_insert(Box::new(String::from("b")), Box::new(false))
            .is_err());

        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn try_insert_returns_replaced_value() {
        let mut map: HashMap<String, u32> = HashMap::new();
        map.insert("a".to_string(), 1);

        let erased: &mut dyn Map = &mut map;
        let old = erased
            .try_insert(Box::new(String::from("a")), Box::new(2_u32))
            .ok()
            .flatten()
            .and_then(|value| value.take::<u32>().ok());
        assert_eq!(old, Some(1));
    }
}
