use crate::impls::TypeInfoCell;
use crate::info::{Described, MapInfo, TypeInfo};
use crate::ops::{ShapeMut, ShapeRef};
use crate::registry::{Registrable, TypeEntry};
use crate::{Amber, Named, Shape, TypeRef};

// -----------------------------------------------------------------------------
// Map trait

/// A trait for type-erased access to keyed collections.
///
/// Implemented by `HashMap<K, V>` for key and value types that implement
/// [`Amber`], and by [`DynamicMap`] for entries whose types are only known
/// at runtime.
///
/// The erased surface covers what codecs need: walking entries and inserting
/// them. Keyed lookup stays on the concrete type, reachable through
/// [`downcast_ref`](crate::Amber#method.downcast_ref).
pub trait Map: Amber {
    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the map holds no entries.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the `(key, value)` entries.
    ///
    /// The order is unspecified for hash-based maps.
    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Amber, &dyn Amber)> + '_>;

    /// Attempts to insert an entry into the map.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(old_value))` if the key already existed
    /// - `Ok(None)` if a new entry was inserted
    /// - `Err((key, value))` if either type does not fit the map
    fn try_insert(
        &mut self,
        key: Box<dyn Amber>,
        value: Box<dyn Amber>,
    ) -> Result<Option<Box<dyn Amber>>, (Box<dyn Amber>, Box<dyn Amber>)>;
}

// -----------------------------------------------------------------------------
// Dynamic Map

/// A dynamic keyed collection of boxed [`Amber`] entries.
///
/// Entries are kept in insertion order and duplicate keys are not collapsed;
/// the carrier preserves exactly what a document said. Its
/// [`type_ref`](Amber::type_ref) reports the represented identity rather
/// than `DynamicMap` itself.
#[derive(Debug)]
pub struct DynamicMap {
    type_ref: TypeRef,
    entries: Vec<(Box<dyn Amber>, Box<dyn Amber>)>,
}

impl DynamicMap {
    /// Creates an empty `DynamicMap` representing its own type.
    #[inline]
    pub fn new() -> Self {
        Self {
            type_ref: TypeRef::of::<Self>(),
            entries: Vec::new(),
        }
    }

    /// Creates an empty `DynamicMap` representing the given type.
    #[inline]
    pub fn with_type_ref(type_ref: TypeRef) -> Self {
        Self {
            type_ref,
            entries: Vec::new(),
        }
    }

    /// Sets the type identity this map represents.
    #[inline]
    pub fn set_type_ref(&mut self, type_ref: TypeRef) {
        self.type_ref = type_ref;
    }

    /// Appends a boxed entry.
    #[inline]
    pub fn insert_boxed(&mut self, key: Box<dyn Amber>, value: Box<dyn Amber>) {
        self.entries.push((key, value));
    }

    /// Appends an entry.
    #[inline]
    pub fn insert<K: Amber, V: Amber>(&mut self, key: K, value: V) {
        self.insert_boxed(Box::new(key), Box::new(value));
    }
}

impl Default for DynamicMap {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Named for DynamicMap {
    #[inline]
    fn type_name() -> &'static str {
        "DynamicMap"
    }
}

impl Described for DynamicMap {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Map(MapInfo::untyped::<Self>()))
    }
}

impl Amber for DynamicMap {
    #[inline]
    fn type_ref(&self) -> TypeRef {
        self.type_ref.clone()
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

impl Registrable for DynamicMap {
    fn type_entry() -> TypeEntry {
        TypeEntry::of::<Self>()
    }
}

impl Map for DynamicMap {
    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Amber, &dyn Amber)> + '_> {
        let iter = self.entries.iter().map(|(key, value)| (&**key, &**value));
        Box::new(iter)
    }

    #[inline]
    fn try_insert(
        &mut self,
        key: Box<dyn Amber>,
        value: Box<dyn Amber>,
    ) -> Result<Option<Box<dyn Amber>>, (Box<dyn Amber>, Box<dyn Amber>)> {
        self.insert_boxed(key, value);
        Ok(None)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_map_keeps_entry_order() {
        let mut dynamic = DynamicMap::new();
        dynamic.insert(String::from("b"), 2_u32);
        dynamic.insert(String::from("a"), 1_u32);

        let map: &dyn Map = &dynamic;
        assert_eq!(map.len(), 2);

        let keys: Vec<&String> = map
            .iter()
            .filter_map(|(key, _)| key.downcast_ref::<String>())
            .collect();
        assert_eq!(keys, [&"b".to_string(), &"a".to_string()]);
    }

    #[test]
    fn dynamic_map_try_insert_accepts_mixed_entries() {
        let mut dynamic = DynamicMap::new();
        let map: &mut dyn Map = &mut dynamic;

        assert!(map
            .try_insert(Box::new(String::from("k")), Box::new(1_u32))
            .is_ok());
        assert!(map
            .try_insert(Box::new(7_i64), Box::new(String::from("v")))
            .is_ok());
        assert_eq!(map.len(), 2);
    }
}
