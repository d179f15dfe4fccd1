use std::any::{Any, TypeId};
use std::fmt;

use crate::TypeRef;
use crate::info::TypeInfo;
use crate::ops::{ShapeMut, ShapeRef};

// -----------------------------------------------------------------------------
// Shape

/// The closed set of structural categories a serializable value can have.
///
/// Every value is exactly one of these; the codecs dispatch on it and nothing
/// else. There is no "other" category: a type that fits none of the shapes
/// does not participate in serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A value represented by a single piece of text via its converter.
    Scalar,
    /// A fixed-size indexed sequence. Created with its final length up front.
    Array,
    /// A growable ordered sequence.
    List,
    /// A keyed collection.
    Map,
    /// A named-property aggregate.
    Composite,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Scalar => "scalar",
            Shape::Array => "array",
            Shape::List => "list",
            Shape::Map => "map",
            Shape::Composite => "composite",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// Amber

/// The foundational trait for values that can travel through the codecs.
///
/// `Amber` erases the concrete type while keeping three things reachable at
/// runtime: the value's wire identity ([`type_ref`]), its static descriptor
/// ([`info`]), and a structural view ([`shape_ref`]/[`shape_mut`]) that the
/// codecs traverse without knowing the concrete type.
///
/// # Identity
///
/// [`Any::type_id`] on a `Box<dyn Amber>` returns the box's own type id, not
/// the boxed value's. Use [`Amber::ty_id`] instead:
///
/// ```
/// use amber_reflect::Amber;
/// use std::any::TypeId;
///
/// let x: Box<dyn Amber> = Box::new(32_i32);
/// assert_eq!(x.ty_id(), TypeId::of::<i32>());
/// ```
///
/// # Implementation
///
/// Composites normally go through the [`composite!`](crate::composite) macro
/// rather than a manual implementation. Manual implementations follow a fixed
/// pattern:
///
/// ```rust,ignore
/// fn set(&mut self, value: Box<dyn Amber>) -> Result<(), Box<dyn Amber>> {
///     *self = value.take::<Self>()?;
///     Ok(())
/// }
///
/// fn shape(&self) -> Shape {
///     Shape::List // the one fitting category
/// }
///
/// fn shape_ref(&self) -> ShapeRef<'_> {
///     ShapeRef::List(self)
/// }
/// ```
///
/// [`type_ref`]: Amber::type_ref
/// [`info`]: Amber::info
/// [`shape_ref`]: Amber::shape_ref
/// [`shape_mut`]: Amber::shape_mut
pub trait Amber: Any + Send + Sync {
    /// The wire identity of this value.
    ///
    /// For ordinary types this is the type's own [`TypeRef`]. Dynamic
    /// containers report the reference of the type they currently represent,
    /// which is what ends up in `type`/`assembly` attributes.
    fn type_ref(&self) -> TypeRef;

    /// The static descriptor of this value's type.
    ///
    /// Dynamic containers return their own descriptor, whose element or
    /// property metadata is deliberately unspecified; codecs treat that as
    /// "inspect each element at runtime".
    fn info(&self) -> &'static TypeInfo;

    /// The structural category of this value.
    fn shape(&self) -> Shape;

    /// An immutable structural view for traversal.
    fn shape_ref(&self) -> ShapeRef<'_>;

    /// A mutable structural view for reconstruction.
    fn shape_mut(&mut self) -> ShapeMut<'_>;

    /// Replaces this value with `value` if the types match, returning the
    /// box untouched otherwise.
    fn set(&mut self, value: Box<dyn Amber>) -> Result<(), Box<dyn Amber>>;

    /// The [`TypeId`] of the underlying value, seen through any indirection.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// A stable address identifying this value during one traversal, used for
    /// cycle detection. Shared handles report the address of their target so
    /// every handle to one value agrees.
    #[inline]
    fn identity(&self) -> *const () {
        (self as *const Self).cast()
    }

    /// Whether this value serializes as nothing at all. Empty text is the
    /// only case: absent and empty strings are not written, matching the
    /// formats' treatment of missing data.
    #[inline]
    fn is_empty_value(&self) -> bool {
        false
    }
}

// -----------------------------------------------------------------------------
// dyn Amber

impl dyn Amber {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use amber_reflect::Amber;
    ///
    /// let x: Box<dyn Amber> = Box::new(10_i32);
    /// assert_eq!(x.downcast_ref::<i32>(), Some(&10));
    /// ```
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to type `T`, consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    #[inline]
    pub fn downcast<T: Any>(self: Box<dyn Amber>) -> Result<Box<T>, Box<dyn Amber>> {
        if self.is::<T>() {
            // TODO: replace with `downcast_unchecked` when it's stable.
            #[expect(unsafe_code, reason = "type is already checked")]
            Ok(unsafe { <Box<dyn Any>>::downcast::<T>(self).unwrap_unchecked() })
        } else {
            Err(self)
        }
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait
    /// object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use amber_reflect::Amber;
    ///
    /// let x: Box<dyn Amber> = Box::new(String::from("ok"));
    /// assert_eq!(x.take::<String>().unwrap(), "ok");
    /// ```
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Amber>) -> Result<T, Box<dyn Amber>> {
        self.downcast::<T>().map(|boxed| *boxed)
    }
}

impl fmt::Debug for dyn Amber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dyn Amber({})", self.type_ref())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_roundtrip() {
        let boxed: Box<dyn Amber> = Box::new(7_u32);
        assert!(boxed.is::<u32>());
        assert!(!boxed.is::<i32>());

        let back = boxed.take::<u32>().unwrap();
        assert_eq!(back, 7);
    }

    #[test]
    fn downcast_wrong_type_returns_value() {
        let boxed: Box<dyn Amber> = Box::new(7_u32);
        let err = boxed.downcast::<String>().unwrap_err();
        assert!(err.is::<u32>());
    }

    #[test]
    fn ty_id_sees_through_the_box() {
        let boxed: Box<dyn Amber> = Box::new(String::from("x"));
        assert_eq!(boxed.ty_id(), TypeId::of::<String>());
    }

    #[test]
    fn set_replaces_matching_type() {
        let mut target = 1_i64;
        target.set(Box::new(9_i64)).unwrap();
        assert_eq!(target, 9);

        let rejected = target.set(Box::new("no".to_string())).unwrap_err();
        assert!(rejected.is::<String>());
        assert_eq!(target, 9);
    }

    #[test]
    fn empty_string_is_empty_value() {
        assert!(String::new().is_empty_value());
        assert!(!String::from("x").is_empty_value());
        assert!(!0_i32.is_empty_value());
    }
}
