use std::ops::{Deref, DerefMut};

use crate::impls::TypeInfoCell;
use crate::info::{Described, ListInfo, TypeInfo};
use crate::ops::{ShapeMut, ShapeRef};
use crate::registry::{Registrable, TypeEntry};
use crate::{Amber, Named, Shape, TypeRef};

// -----------------------------------------------------------------------------
// List trait

/// A trait for type-erased access to growable sequences.
///
/// Implemented by `Vec<T>` for element types that implement [`Amber`], and by
/// [`DynamicList`] for sequences whose element type is only known at runtime.
///
/// # Examples
///
/// ```
/// use amber_reflect::ops::List;
///
/// let values = vec![1_i32, 2, 3];
/// let list: &dyn List = &values;
///
/// assert_eq!(list.len(), 3);
/// assert_eq!(list.get_as::<i32>(2), Some(&3));
/// ```
pub trait List: Amber {
    /// Returns a reference to the element at `index`, or `None` if out of
    /// bounds.
    fn get(&self, index: usize) -> Option<&dyn Amber>;

    /// Returns a mutable reference to the element at `index`, or `None` if
    /// out of bounds.
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Amber>;

    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if the sequence holds no elements.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attempts to append `value` to the end of the sequence.
    ///
    /// Returns `Err(value)` if the value's type does not match the element
    /// type.
    fn try_push(&mut self, value: Box<dyn Amber>) -> Result<(), Box<dyn Amber>>;

    /// Returns an iterator over the elements in order.
    fn iter(&self) -> ListIter<'_>;
}

impl dyn List {
    /// Returns a typed reference to the element at `index`.
    ///
    /// Returns `None` if the index is out of bounds or the element cannot be
    /// downcast to `T`.
    #[inline]
    pub fn get_as<T: Amber>(&self, index: usize) -> Option<&T> {
        self.get(index).and_then(<dyn Amber>::downcast_ref)
    }
}

// -----------------------------------------------------------------------------
// List Iterator

/// An [`ExactSizeIterator`] over the elements of a [`List`].
pub struct ListIter<'a> {
    list: &'a dyn List,
    index: usize,
}

impl<'a> ListIter<'a> {
    /// Creates a new iterator for the given list.
    #[inline(always)]
    pub const fn new(value: &'a dyn List) -> Self {
        ListIter {
            list: value,
            index: 0,
        }
    }
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a dyn Amber;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let value = self.list.get(self.index);
        self.index += value.is_some() as usize;
        value
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.list.len();
        (size - self.index, Some(size))
    }
}

impl<'a> ExactSizeIterator for ListIter<'a> {}

// -----------------------------------------------------------------------------
// Dynamic List

/// A dynamic sequence of boxed [`Amber`] values.
///
/// Deserializers use it when a document's sequence carries per-item type
/// attributes and no registered static sequence fits; the elements may then
/// be of mixed types. Its [`type_ref`](Amber::type_ref) reports the
/// represented identity from the document rather than `DynamicList` itself.
#[derive(Debug)]
pub struct DynamicList {
    type_ref: TypeRef,
    values: Vec<Box<dyn Amber>>,
}

impl DynamicList {
    /// Creates an empty `DynamicList` representing its own type.
    #[inline]
    pub fn new() -> Self {
        Self {
            type_ref: TypeRef::of::<Self>(),
            values: Vec::new(),
        }
    }

    /// Creates an empty `DynamicList` representing the given type.
    #[inline]
    pub fn with_type_ref(type_ref: TypeRef) -> Self {
        Self {
            type_ref,
            values: Vec::new(),
        }
    }

    /// Sets the type identity this sequence represents.
    #[inline]
    pub fn set_type_ref(&mut self, type_ref: TypeRef) {
        self.type_ref = type_ref;
    }

    /// Appends a boxed value to the end of the sequence.
    #[inline]
    pub fn push_boxed(&mut self, value: Box<dyn Amber>) {
        self.values.push(value);
    }

    /// Appends a value to the end of the sequence.
    #[inline]
    pub fn push<T: Amber>(&mut self, value: T) {
        self.push_boxed(Box::new(value));
    }
}

impl Default for DynamicList {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Named for DynamicList {
    #[inline]
    fn type_name() -> &'static str {
        "DynamicList"
    }
}

impl Described for DynamicList {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::List(ListInfo::untyped::<Self>()))
    }
}

impl Amber for DynamicList {
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

impl Registrable for DynamicList {
    fn type_entry() -> TypeEntry {
        TypeEntry::of::<Self>()
    }
}

impl List for DynamicList {
    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Amber> {
        self.values.get(index).map(Deref::deref)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Amber> {
        self.values.get_mut(index).map(DerefMut::deref_mut)
    }

    #[inline]
    fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    fn try_push(&mut self, value: Box<dyn Amber>) -> Result<(), Box<dyn Amber>> {
        self.values.push(value);
        Ok(())
    }

    #[inline]
    fn iter(&self) -> ListIter<'_> {
        ListIter::new(self)
    }
}

impl<'a> IntoIterator for &'a DynamicList {
    type Item = &'a dyn Amber;
    type IntoIter = ListIter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// -----------------------------------------------------------------------------
// Tests
