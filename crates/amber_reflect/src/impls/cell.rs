//! Containers for static storage of type descriptors.
//!
//! These back [`Described`](crate::info::Described) implementations.
//!
//! For non-generic types, [`TypeInfoCell`] wraps an [`OnceLock`] and costs
//! almost nothing. For generic types the `static CELL` inside the function is
//! shared by every instantiation, so [`GenericTypeInfoCell`] and
//! [`GenericNameCell`] key their storage by [`TypeId`] behind an [`RwLock`].

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::info::TypeInfo;

mod sealed {
    use super::TypeInfo;
    pub trait DescribedProperty: 'static {}

    impl DescribedProperty for String {}
    impl DescribedProperty for TypeInfo {}
}

use sealed::DescribedProperty;

/// Container for static storage of a non-generic type's descriptor.
///
/// ## Example
///
/// ```ignore
/// impl Described for Device {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: TypeInfoCell = TypeInfoCell::new();
///         CELL.get_or_init(|| {
///             TypeInfo::Composite(CompositeInfo::new::<Device>(&[
///                 PropertyInfo::of::<u32>("id"),
///             ]))
///         })
///     }
/// }
/// ```
pub struct TypeInfoCell(OnceLock<TypeInfo>);

impl TypeInfoCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns a reference to the stored descriptor.
    ///
    /// If there is no entry yet, a new one is generated from the given
    /// function.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &TypeInfo
    where
        F: FnOnce() -> TypeInfo,
    {
        self.0.get_or_init(f)
    }
}

/// Container for static storage of type descriptors of a generic type.
///
/// One entry per instantiation, keyed by [`TypeId`].
///
/// ## Example
///
/// ```ignore
/// impl<T: Registrable> Described for Vec<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, T>()))
///     }
/// }
/// ```
pub type GenericTypeInfoCell = GenericCell<TypeInfo>;

/// Container for static storage of interned type names of a generic type.
///
/// ## Example
///
/// ```ignore
/// impl<T: Registrable> Named for Vec<T> {
///     fn type_name() -> &'static str {
///         static CELL: GenericNameCell = GenericNameCell::new();
///         CELL.get_or_insert::<Self>(|| format!("List<{}>", T::type_name()))
///     }
/// }
/// ```
pub type GenericNameCell = GenericCell<String>;

/// Shared storage behind [`GenericTypeInfoCell`] and [`GenericNameCell`].
pub struct GenericCell<T: DescribedProperty>(RwLock<BTreeMap<TypeId, &'static T>>);

impl<T: DescribedProperty> GenericCell<T> {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(BTreeMap::new()))
    }

    /// Returns a reference to the value stored for the instantiation `G`.
    ///
    /// If there is no entry yet, a new one is generated from the given
    /// function and leaked into static storage.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &T {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> T) -> &T {
        match self.get_by_type_id(type_id) {
            Some(value) => value,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&T> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: T) -> &T {
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert_with(|| Box::leak(Box::new(value)))
    }
}
