use std::borrow::Cow;
use std::fmt;

/// Library name assumed when a serialized value carries no `assembly`
/// attribute, and the default for [`Named::library`].
pub const DEFAULT_LIBRARY: &str = "amber";

/// Type name assumed when a serialized value carries no `type` attribute.
///
/// Plain text is by far the most common payload, so the wire format treats
/// `String` as the implicit type and omits its attributes entirely.
pub const TEXT_TYPE: &str = "String";

// -----------------------------------------------------------------------------
// Named

/// Static naming for types that participate in serialization.
///
/// The pair `(library, type name)` is the type's wire identity; it must be
/// stable across builds and unique within the processes exchanging documents.
/// Generic containers derive their name from their arguments
/// (`Vec<u32>` is `"List<u32>"`), interned once per instantiation.
pub trait Named: 'static {
    /// The type's serialized name, without any library qualifier.
    fn type_name() -> &'static str;

    /// The library the type belongs to. Types of the base library are written
    /// without an `assembly` attribute.
    fn library() -> &'static str {
        DEFAULT_LIBRARY
    }
}

// -----------------------------------------------------------------------------
// TypeRef

/// A textual reference to a registered type: a `(library, type name)` pair.
///
/// This is the identity that travels inside serialized documents. It is
/// deliberately *not* a [`TypeId`]: two processes exchanging documents only
/// share these names, and the [`TypeRegistry`] maps them back to local
/// constructible handles.
///
/// Library names may carry a versioned suffix (`"backoffice, 1.4.0"`); lookup
/// falls back to the [short name](TypeRef::short_library) before the first
/// comma, so references written by different builds still resolve.
///
/// [`TypeId`]: core::any::TypeId
/// [`TypeRegistry`]: crate::registry::TypeRegistry
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TypeRef {
    name: Cow<'static, str>,
    library: Cow<'static, str>,
}

impl TypeRef {
    /// Creates a reference from owned or borrowed parts.
    pub fn new(name: impl Into<Cow<'static, str>>, library: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            library: library.into(),
        }
    }

    /// Creates a reference from static parts, usable in `const` contexts.
    pub const fn from_static(name: &'static str, library: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            library: Cow::Borrowed(library),
        }
    }

    /// The reference of a [`Named`] type.
    pub fn of<T: Named + ?Sized>() -> Self {
        Self {
            name: Cow::Borrowed(T::type_name()),
            library: Cow::Borrowed(T::library()),
        }
    }

    /// The implicit reference used when a document omits type attributes:
    /// `String` in the base library.
    pub const fn text() -> Self {
        Self::from_static(TEXT_TYPE, DEFAULT_LIBRARY)
    }

    /// A reference carrying no information, as found on values that do not
    /// represent any registered type.
    pub const fn unspecified() -> Self {
        Self::from_static("", "")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    /// Whether both parts are present. Name and library are enough to attempt
    /// resolution; anything less is rejected up front.
    pub fn is_sufficient(&self) -> bool {
        !self.name.is_empty() && !self.library.is_empty()
    }

    /// The library name with any versioned suffix stripped: everything before
    /// the first comma, trimmed.
    pub fn short_library(&self) -> &str {
        short_name(&self.library)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.library)
    }
}

/// Strips a versioned library suffix: `"backoffice, 1.4.0"` becomes
/// `"backoffice"`.
pub fn short_name(library: &str) -> &str {
    match library.split_once(',') {
        Some((short, _)) => short.trim(),
        None => library.trim(),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    impl Named for Widget {
        fn type_name() -> &'static str {
            "Widget"
        }

        fn library() -> &'static str {
            "toolkit"
        }
    }

    #[test]
    fn of_named_type() {
        let r = TypeRef::of::<Widget>();
        assert_eq!(r.name(), "Widget");
        assert_eq!(r.library(), "toolkit");
        assert!(r.is_sufficient());
    }

    #[test]
    fn text_default_is_sufficient() {
        let r = TypeRef::text();
        assert_eq!(r.name(), TEXT_TYPE);
        assert_eq!(r.library(), DEFAULT_LIBRARY);
        assert!(r.is_sufficient());
    }

    #[test]
    fn insufficient_when_any_part_missing() {
        assert!(!TypeRef::new("Widget", "").is_sufficient());
        assert!(!TypeRef::new("", "toolkit").is_sufficient());
        assert!(!TypeRef::unspecified().is_sufficient());
    }

    #[test]
    fn short_library_strips_version_suffix() {
        let r = TypeRef::new("Order", "backoffice, 1.4.0, neutral");
        assert_eq!(r.short_library(), "backoffice");

        let plain = TypeRef::new("Order", "backoffice");
        assert_eq!(plain.short_library(), "backoffice");
    }

    #[test]
    fn display_is_name_comma_library() {
        let r = TypeRef::new("Widget", "toolkit");
        assert_eq!(r.to_string(), "Widget, toolkit");
    }
}
