use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use crate::impls::TypeInfoCell;
use crate::info::{CompositeInfo, Described, TypeInfo};
use crate::ops::{ShapeMut, ShapeRef};
use crate::registry::{Registrable, TypeEntry};
use crate::{Amber, Named, Shape, TypeRef};

// -----------------------------------------------------------------------------
// Composite trait

/// A trait for type-erased access to named property slots.
///
/// This trait represents any value with a fixed set of named properties,
/// including:
/// - structs declared through [`composite!`](crate::composite)
/// - runtime-shaped records held in a [`DynamicComposite`]
///
/// A property slot can be *absent*: an `Option` carrier whose value is `None`
/// still occupies its declaration position but yields no value. Codecs treat
/// absent slots the same way they treat properties missing from a document.
///
/// # Examples
///
/// ```
/// use amber_reflect::{composite, ops::Composite};
///
/// composite!(Device["demo"] {
///     id: u32,
///     name: String,
/// });
///
/// let device = Device { id: 7, name: "relay".into() };
/// let device_ref: &dyn Composite = &device;
///
/// assert_eq!(device_ref.property_len(), 2);
/// assert_eq!(device_ref.property_name_at(0), Some("id"));
/// assert_eq!(device_ref.property_as::<u32>("id"), Some(&7));
/// ```
pub trait Composite: Amber {
    /// Returns a reference to the value of the property named `name`.
    ///
    /// Returns `None` if the property does not exist or is absent.
    ///
    /// If the property type is known, can use `<dyn Composite>::property_as`
    /// instead.
    fn property(&self, name: &str) -> Option<&dyn Amber>;

    /// Returns a mutable reference to the value of the property named `name`.
    ///
    /// Returns `None` if the property does not exist or is absent.
    fn property_mut(&mut self, name: &str) -> Option<&mut dyn Amber>;

    /// Returns a reference to the value of the property at declaration
    /// position `index`.
    ///
    /// Returns `None` if `index` is out of bounds or the slot is absent;
    /// [`property_name_at`](Composite::property_name_at) distinguishes the
    /// two.
    fn property_at(&self, index: usize) -> Option<&dyn Amber>;

    /// Returns a mutable reference to the value of the property at
    /// declaration position `index`.
    fn property_at_mut(&mut self, index: usize) -> Option<&mut dyn Amber>;

    /// Returns the name of the property at declaration position `index`.
    ///
    /// Returns `None` only when `index` is out of bounds.
    fn property_name_at(&self, index: usize) -> Option<&str>;

    /// Returns the number of property slots, absent ones included.
    fn property_len(&self) -> usize;

    /// Stores `value` into the property slot named `name`.
    ///
    /// Returns `Ok(true)` if the value was bound, `Ok(false)` if no slot
    /// with that name exists, and `Err(value)` if the slot exists but the
    /// value's type does not fit it. `Option` carriers accept their inner
    /// type and become occupied.
    fn set_property(&mut self, name: &str, value: Box<dyn Amber>) -> Result<bool, Box<dyn Amber>>;

    /// Returns an iterator over `(name, value)` pairs in declaration order.
    ///
    /// Absent slots are yielded with a `None` value.
    fn iter_properties(&self) -> PropertyIter<'_>;
}

impl dyn Composite {
    /// Returns a typed reference to the property with the given name.
    ///
    /// Returns `None` if:
    /// - The property does not exist or is absent.
    /// - The property cannot be downcast to type `T`
    #[inline]
    pub fn property_as<T: Amber>(&self, name: &str) -> Option<&T> {
        self.property(name).and_then(<dyn Amber>::downcast_ref)
    }

    /// Returns a typed mutable reference to the property with the given name.
    ///
    /// Returns `None` if:
    /// - The property does not exist or is absent.
    /// - The property cannot be downcast to type `T`
    #[inline]
    pub fn property_mut_as<T: Amber>(&mut self, name: &str) -> Option<&mut T> {
        self.property_mut(name).and_then(<dyn Amber>::downcast_mut)
    }
}

// -----------------------------------------------------------------------------
// Property Iterator

/// An iterator over the named property slots of a composite.
///
/// This is an [`ExactSizeIterator`] yielding `(name, value)` pairs in
/// declaration order; absent slots come through with a `None` value.
///
/// # Examples
///
/// ```
/// use amber_reflect::{composite, ops::{Composite, PropertyIter}};
///
/// composite!(Device["demo"] {
///     id: u32,
///     name: String,
/// });
///
/// let device = Device { id: 7, name: "relay".into() };
/// let mut iter = PropertyIter::new(&device);
///
/// assert_eq!(iter.len(), 2);
/// let (name, value) = iter.next().unwrap();
/// assert_eq!(name, "id");
/// assert_eq!(value.and_then(|v| v.downcast_ref::<u32>()), Some(&7));
/// ```
pub struct PropertyIter<'a> {
    composite: &'a dyn Composite,
    index: usize,
}

impl<'a> PropertyIter<'a> {
    /// Creates a new iterator for the given composite.
    #[inline(always)]
    pub const fn new(value: &'a dyn Composite) -> Self {
        PropertyIter {
            composite: value,
            index: 0,
        }
    }
}

impl<'a> Iterator for PropertyIter<'a> {
    type Item = (&'a str, Option<&'a dyn Amber>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let name = self.composite.property_name_at(self.index)?;
        let value = self.composite.property_at(self.index);
        self.index += 1;
        Some((name, value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.composite.property_len();
        (size - self.index, Some(size))
    }
}

impl<'a> ExactSizeIterator for PropertyIter<'a> {}

// -----------------------------------------------------------------------------
// Dynamic Composite

/// A dynamic container representing a composite.
///
/// `DynamicComposite` is a type-erased record that can hold any values
/// implementing [`Amber`] under runtime-chosen property names. Deserializers
/// use it to carry records whose declared type is not registered as a static
/// composite, and its [`type_ref`](Amber::type_ref) reports the represented
/// identity rather than `DynamicComposite` itself.
///
/// # Examples
///
/// ```
/// use amber_reflect::ops::{Composite, DynamicComposite};
///
/// let mut dynamic = DynamicComposite::new();
/// dynamic.insert("Id", 1_u32);
/// dynamic.insert("Name", String::from("relay"));
///
/// assert_eq!(dynamic.property_len(), 2);
/// assert_eq!(dynamic.index_of("Name"), Some(1));
/// ```
#[derive(Debug)]
pub struct DynamicComposite {
    type_ref: TypeRef,
    values: Vec<Box<dyn Amber>>,
    names: Vec<Cow<'static, str>>,
    indices: HashMap<Cow<'static, str>, usize>,
}

impl DynamicComposite {
    /// Creates an empty `DynamicComposite` representing its own type.
    #[inline]
    pub fn new() -> Self {
        Self {
            type_ref: TypeRef::of::<Self>(),
            values: Vec::new(),
            names: Vec::new(),
            indices: HashMap::new(),
        }
    }

    /// Creates an empty `DynamicComposite` representing the given type.
    #[inline]
    pub fn with_type_ref(type_ref: TypeRef) -> Self {
        Self {
            type_ref,
            values: Vec::new(),
            names: Vec::new(),
            indices: HashMap::new(),
        }
    }

    /// Sets the type identity this record represents.
    #[inline]
    pub fn set_type_ref(&mut self, type_ref: TypeRef) {
        self.type_ref = type_ref;
    }

    /// Appends a boxed value as the property `name`.
    ///
    /// If the property name already exists, this will overwrite its value.
    pub fn insert_boxed(&mut self, name: impl Into<Cow<'static, str>>, value: Box<dyn Amber>) {
        let name: Cow<'static, str> = name.into();
        if let Some(index) = self.indices.get(&name) {
            self.values[*index] = value;
        } else {
            self.values.push(value);
            self.indices.insert(name.clone(), self.values.len() - 1);
            self.names.push(name);
        }
    }

    /// Appends a value as the property `name`.
    ///
    /// If the property name already exists, this will overwrite its value.
    #[inline]
    pub fn insert<T: Amber>(&mut self, name: impl Into<Cow<'static, str>>, value: T) {
        self.insert_boxed(name, Box::new(value));
    }

    /// Gets the declaration position of the property with the given name.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }
}

impl Default for DynamicComposite {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Named for DynamicComposite {
    #[inline]
    fn type_name() -> &'static str {
        "DynamicComposite"
    }
}

impl Described for DynamicComposite {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Composite(CompositeInfo::new::<Self>(&[])))
    }
}

impl Amber for DynamicComposite {
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
        Shape::Composite
    }

    #[inline]
    fn shape_ref(&self) -> ShapeRef<'_> {
        ShapeRef::Composite(self)
    }

    #[inline]
    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Composite(self)
    }

    fn set(&mut self, value: Box<dyn Amber>) -> Result<(), Box<dyn Amber>> {
        *self = *value.downcast::<Self>()?;
        Ok(())
    }
}

impl Registrable for DynamicComposite {
    fn type_entry() -> TypeEntry {
        TypeEntry::of::<Self>()
    }
}

impl Composite for DynamicComposite {
    #[inline]
    fn property(&self, name: &str) -> Option<&dyn Amber> {
        self.indices.get(name).map(|index| &*self.values[*index])
    }

    #[inline]
    fn property_mut(&mut self, name: &str) -> Option<&mut dyn Amber> {
        self.indices
            .get(name)
            .map(|index| &mut *self.values[*index])
    }

    #[inline]
    fn property_at(&self, index: usize) -> Option<&dyn Amber> {
        self.values.get(index).map(Deref::deref)
    }

    #[inline]
    fn property_at_mut(&mut self, index: usize) -> Option<&mut dyn Amber> {
        self.values.get_mut(index).map(DerefMut::deref_mut)
    }

    #[inline]
    fn property_name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(AsRef::as_ref)
    }

    #[inline]
    fn property_len(&self) -> usize {
        self.values.len()
    }

    fn set_property(&mut self, name: &str, value: Box<dyn Amber>) -> Result<bool, Box<dyn Amber>> {
        self.insert_boxed(name.to_owned(), value);
        Ok(true)
    }

    #[inline]
    fn iter_properties(&self) -> PropertyIter<'_> {
        PropertyIter::new(self)
    }
}

impl<'a> IntoIterator for &'a DynamicComposite {
    type Item = (&'a str, Option<&'a dyn Amber>);
    type IntoIter = PropertyIter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_properties()
    }
}

// -----------------------------------------------------------------------------
// Tests
