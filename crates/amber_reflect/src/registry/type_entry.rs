use std::any::TypeId;
use std::fmt;
use std::fmt::Display;
use std::str::FromStr;

use crate::info::{Described, TypeInfo};
use crate::registry::FromBinary;
use crate::{Amber, Named, Shape, TypeRef};

// -----------------------------------------------------------------------------
// TypeEntry

/// Identity, descriptor and construction hooks for one registered type.
///
/// An entry is what a deserializer gets back from
/// [`resolve`](crate::registry::TypeRegistry::resolve): enough to build a
/// default value of the type, size a fixed-length sequence ahead of filling
/// it, or feed a binary constructor payload to the type.
pub struct TypeEntry {
    type_ref: TypeRef,
    ty: TypeId,
    info: &'static TypeInfo,
    create: fn() -> Box<dyn Amber>,
    create_sized: Option<fn(usize) -> Box<dyn Amber>>,
    from_bytes: Option<fn(&[u8]) -> Result<Box<dyn Amber>, String>>,
}

impl TypeEntry {
    /// Creates the entry for `T` with a [`Default`]-based factory.
    pub fn of<T: Amber + Named + Described + Default>() -> Self {
        Self {
            type_ref: TypeRef::of::<T>(),
            ty: TypeId::of::<T>(),
            info: T::type_info(),
            create: || Box::new(T::default()),
            create_sized: None,
            from_bytes: None,
        }
    }

    /// Adds a factory that builds the type at a given length.
    pub fn with_sized(mut self, create_sized: fn(usize) -> Box<dyn Amber>) -> Self {
        self.create_sized = Some(create_sized);
        self
    }

    /// Adds a binary constructor backed by `T`'s [`FromBinary`] hook.
    pub fn with_binary<T: FromBinary + Amber>(mut self) -> Self {
        self.from_bytes = Some(|bytes| {
            T::from_bytes(bytes).map(|value| Box::new(value) as Box<dyn Amber>)
        });
        self
    }

    /// The wire identity of the type.
    #[inline]
    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    /// The runtime identity of the type.
    #[inline]
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    /// The structural descriptor of the type.
    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        self.info
    }

    /// The structural shape of the type.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.info.shape()
    }

    /// Builds a default value of the type.
    #[inline]
    pub fn create(&self) -> Box<dyn Amber> {
        (self.create)()
    }

    /// Builds a value of the type at the given length, or `None` if the type
    /// has no sized factory.
    #[inline]
    pub fn create_sized(&self, len: usize) -> Option<Box<dyn Amber>> {
        self.create_sized.map(|create| create(len))
    }

    /// Whether the type accepts a binary constructor payload.
    #[inline]
    pub fn has_binary(&self) -> bool {
        self.from_bytes.is_some()
    }

    /// Builds a value from decoded constructor bytes.
    ///
    /// Returns `None` if the type has no binary constructor; the inner
    /// `Result` carries the constructor's own rejection.
    #[inline]
    pub fn from_bytes(&self, bytes: &[u8]) -> Option<Result<Box<dyn Amber>, String>> {
        self.from_bytes.map(|from_bytes| from_bytes(bytes))
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("type_ref", &self.type_ref)
            .field("shape", &self.shape())
            .field("sized", &self.create_sized.is_some())
            .field("binary", &self.from_bytes.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TextConverter

/// Round-trips a scalar value through its text form.
///
/// Converters power both documents formats: attribute values and record
/// fields are written with [`print`](TextConverter::print) and read back
/// with [`parse`](TextConverter::parse). A type without a converter simply
/// has no text form; codecs treat it structurally instead.
pub struct TextConverter {
    parse: fn(&str) -> Result<Box<dyn Amber>, String>,
    print: fn(&dyn Amber) -> Option<String>,
}

impl TextConverter {
    /// Creates the converter for `T` from its [`FromStr`] and [`Display`]
    /// implementations.
    pub fn of<T>() -> Self
    where
        T: Amber + FromStr + Display,
        <T as FromStr>::Err: Display,
    {
        Self {
            parse: |text| {
                text.parse::<T>()
                    .map(|value| Box::new(value) as Box<dyn Amber>)
                    .map_err(|cause| cause.to_string())
            },
            print: |value| value.downcast_ref::<T>().map(ToString::to_string),
        }
    }

    /// Parses `text` into a boxed value, or the parse failure's message.
    #[inline]
    pub fn parse(&self, text: &str) -> Result<Box<dyn Amber>, String> {
        (self.parse)(text)
    }

    /// Prints `value` to text, or `None` if it is not this converter's type.
    #[inline]
    pub fn print(&self, value: &dyn Amber) -> Option<String> {
        (self.print)(value)
    }
}

// -----------------------------------------------------------------------------
// Tests
