use crate::{Amber, TypeRef};

// -----------------------------------------------------------------------------
// Array trait

/// A trait for type-erased access to fixed-length sequences.
///
/// Implemented by `Box<[T]>` for element types that implement [`Amber`].
/// Unlike [`List`](crate::ops::List), an array's length is decided when the
/// value is constructed; deserializers size one ahead of time through a
/// registry sized factory and then fill it in place with
/// [`try_set`](Array::try_set). There is no dynamic array carrier, so
/// [`element`](Array::element) always names a concrete type.
pub trait Array: Amber {
    /// Returns a reference to the element at `index`, or `None` if out of
    /// bounds.
    fn get(&self, index: usize) -> Option<&dyn Amber>;

    /// Returns a mutable reference to the element at `index`, or `None` if
    /// out of bounds.
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Amber>;

    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if the array holds no elements.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element type of the array.
    fn element(&self) -> TypeRef;

    /// Attempts to store `value` at position `index`.
    ///
    /// Returns `Err(value)` if `index` is out of bounds or the value's type
    /// does not match the element type.
    fn try_set(&mut self, index: usize, value: Box<dyn Amber>) -> Result<(), Box<dyn Amber>>;

    /// Returns an iterator over the elements in order.
    fn iter(&self) -> ArrayIter<'_>;
}

impl dyn Array {
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
// Array Iterator

/// An [`ExactSizeIterator`] over the elements of an [`Array`].
pub struct ArrayIter<'a> {
    array: &'a dyn Array,
    index: usize,
}

impl<'a> ArrayIter<'a> {
    /// Creates a new iterator for the given array.
    #[inline(always)]
    pub const fn new(value: &'a dyn Array) -> Self {
        ArrayIter {
            array: value,
            index: 0,
        }
    }
}

impl<'a> Iterator for ArrayIter<'a> {
    type Item = &'a dyn Amber;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let value = self.array.get(self.index);
        self.index += value.is_some() as usize;
        value
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.array.len();
        (size - self.index, Some(size))
    }
}

impl<'a> ExactSizeIterator for ArrayIter<'a> {}

// -----------------------------------------------------------------------------
// Tests
