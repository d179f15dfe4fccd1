use std::any::{Any, TypeId};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use dashmap::DashMap;

use crate::ops::{DynamicComposite, DynamicList, DynamicMap};
use crate::registry::{
    ConvertError, CreateError, Registrable, ResolveError, TextConverter, TypeEntry,
};
use crate::type_ref::short_name;
use crate::{Amber, TypeRef};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of serializable types.
///
/// This struct is the central store deserializers resolve wire names
/// against. [Registering] a type generates a [`TypeEntry`] from its
/// [`Registrable`] implementation and recursively registers everything the
/// type is built from, so registering the roots of an object graph is
/// enough.
///
/// The registry is safe to share: registration typically happens in a burst
/// at startup, and all lookups take `&self`.
///
/// # Example
///
/// ```
/// use amber_reflect::{registry::TypeRegistry, TypeRef};
///
/// let registry = TypeRegistry::new();
/// registry.register::<Vec<u32>>();
///
/// let entry = registry.resolve(&TypeRef::new("List<u32>", "amber")).unwrap();
/// let list = entry.create();
/// assert_eq!(list.downcast_ref::<Vec<u32>>(), Some(&Vec::new()));
/// ```
///
/// [Registering]: TypeRegistry::register
pub struct TypeRegistry {
    entries: DashMap<TypeId, Arc<TypeEntry>>,
    names: DashMap<(String, String), TypeId>,
    converters: DashMap<TypeId, Arc<TextConverter>>,
    aliases: DashMap<String, String>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty `TypeRegistry`.
    #[inline]
    pub fn empty() -> Self {
        Self {
            entries: DashMap::new(),
            names: DashMap::new(),
            converters: DashMap::new(),
            aliases: DashMap::new(),
        }
    }

    /// Creates a type registry with default registrations.
    ///
    /// - `bool` `char`
    /// - `i8 - i128` `isize`
    /// - `u8 - u128` `usize`
    /// - `f32` `f64`
    /// - `String`
    /// - the dynamic carriers
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<u128>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<i128>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry.register::<DynamicComposite>();
        registry.register::<DynamicList>();
        registry.register::<DynamicMap>();
        registry
    }

    /// Registers the type `T` if it has not been registered already.
    ///
    /// This also recursively registers any type dependencies as specified by
    /// [`Registrable::register_dependencies`]; for a declared composite that
    /// is every property type. A type that already has an entry is not
    /// registered again and neither are its dependencies.
    pub fn register<T: Registrable>(&self) {
        if self.register_entry(T::type_entry(), T::converter()) {
            T::register_dependencies(self);
        }
    }

    /// Registers a hand-built entry, returning whether it was inserted.
    ///
    /// Does nothing when an entry for the same runtime type already exists.
    /// This does not register dependencies; prefer
    /// [`register`](Self::register) for ordinary types.
    pub fn register_entry(&self, entry: TypeEntry, converter: Option<TextConverter>) -> bool {
        use dashmap::mapref::entry::Entry;

        match self.entries.entry(entry.ty()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                let type_ref = entry.type_ref();
                self.names.insert(
                    (type_ref.library().to_string(), type_ref.name().to_string()),
                    entry.ty(),
                );
                if let Some(converter) = converter {
                    self.converters.insert(entry.ty(), Arc::new(converter));
                }
                slot.insert(Arc::new(entry));
                true
            }
        }
    }

    /// Whether an entry exists for the given runtime type.
    #[inline]
    pub fn contains(&self, ty: TypeId) -> bool {
        self.entries.contains_key(&ty)
    }

    /// Returns the entry for the given runtime type.
    #[inline]
    pub fn entry(&self, ty: TypeId) -> Option<Arc<TypeEntry>> {
        self.entries.get(&ty).map(|entry| Arc::clone(&entry))
    }

    /// Returns the entry for `T`.
    #[inline]
    pub fn entry_of<T: Any>(&self) -> Option<Arc<TypeEntry>> {
        self.entry(TypeId::of::<T>())
    }

    /// Returns the text converter for the given runtime type.
    #[inline]
    pub fn converter_for(&self, ty: TypeId) -> Option<Arc<TextConverter>> {
        self.converters.get(&ty).map(|converter| Arc::clone(&converter))
    }

    /// Registers `alias` as another name for `library`.
    ///
    /// The alias is stored in its short form, so references carrying version
    /// qualifiers behind the alias still resolve.
    pub fn register_library(&self, alias: &str, library: impl Into<String>) {
        self.aliases
            .insert(short_name(alias).to_string(), library.into());
    }

    /// Returns a snapshot of every registered entry.
    pub fn registered(&self) -> Vec<Arc<TypeEntry>> {
        self.entries
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Resolves a wire reference to its registered entry.
    ///
    /// The library is first matched literally, then in its short form with
    /// any `,`-separated qualifiers dropped, which is how references written
    /// by older tooling carry version noise, then through the registered
    /// library aliases.
    pub fn resolve(&self, type_ref: &TypeRef) -> Result<Arc<TypeEntry>, ResolveError> {
        if !type_ref.is_sufficient() {
            return Err(ResolveError::Insufficient(type_ref.clone()));
        }
        let short = short_name(type_ref.library());
        self.lookup(type_ref.library(), type_ref.name())
            .or_else(|| self.lookup(short, type_ref.name()))
            .or_else(|| {
                let library = self.aliases.get(short)?.clone();
                self.lookup(&library, type_ref.name())
            })
            .ok_or_else(|| ResolveError::NotFound(type_ref.clone()))
    }

    fn lookup(&self, library: &str, name: &str) -> Option<Arc<TypeEntry>> {
        let ty = *self.names.get(&(library.to_string(), name.to_string()))?;
        self.entry(ty)
    }

    /// Builds a value for the entry, parsing `text` when possible.
    ///
    /// Construction never fails: when there is no usable text, no converter,
    /// or the text does not parse, the entry's default factory is used. A
    /// parse failure is logged since it usually means a damaged document.
    pub fn construct(&self, entry: &TypeEntry, text: Option<&str>) -> Box<dyn Amber> {
        if let Some(text) = text {
            if !text.is_empty() {
                if let Some(converter) = self.converter_for(entry.ty()) {
                    match converter.parse(text) {
                        Ok(value) => return value,
                        Err(cause) => log::debug!(
                            "failed to parse `{text}` as `{}`: {cause}",
                            entry.type_ref()
                        ),
                    }
                }
            }
        }
        entry.create()
    }

    /// Builds a value for the entry at the given length.
    pub fn construct_sized(
        &self,
        entry: &TypeEntry,
        len: usize,
    ) -> Result<Box<dyn Amber>, CreateError> {
        entry.create_sized(len).ok_or_else(|| CreateError::NotSizable {
            type_ref: entry.type_ref().clone(),
        })
    }

    /// Builds a value from a base64 constructor payload.
    pub fn construct_binary(
        &self,
        entry: &TypeEntry,
        payload: &str,
    ) -> Result<Box<dyn Amber>, CreateError> {
        let bytes = BASE64
            .decode(payload.trim().as_bytes())
            .map_err(|cause| CreateError::Payload {
                type_ref: entry.type_ref().clone(),
                cause: cause.to_string(),
            })?;
        match entry.from_bytes(&bytes) {
            Some(Ok(value)) => Ok(value),
            Some(Err(cause)) => Err(CreateError::Payload {
                type_ref: entry.type_ref().clone(),
                cause,
            }),
            None => Err(CreateError::NoBinaryConstructor {
                type_ref: entry.type_ref().clone(),
            }),
        }
    }

    /// Prints a value through its registered converter.
    #[inline]
    pub fn try_print(&self, value: &dyn Amber) -> Option<String> {
        self.converter_for(value.ty_id())
            .and_then(|converter| converter.print(value))
    }

    /// Prints a value through its registered converter, as an error when the
    /// value has no text form.
    pub fn convert_to_text(&self, value: &dyn Amber) -> Result<String, ConvertError> {
        self.try_print(value).ok_or_else(|| ConvertError::ToText {
            type_ref: value.type_ref(),
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_registers_the_scalar_menu() {
        let registry = TypeRegistry::new();

        assert!(registry.contains(TypeId::of::<u32>()));
        assert!(registry.contains(TypeId::of::<String>()));
        assert!(registry.contains(TypeId::of::<DynamicComposite>()));

        let entry = registry.resolve(&TypeRef::new("i64", "amber")).unwrap();
        assert_eq!(entry.ty(), TypeId::of::<i64>());
    }

    #[test]
    fn register_pulls_in_dependencies() {
        let registry = TypeRegistry::new();
        registry.register::<Vec<Vec<u32>>>();

        assert!(registry.contains(TypeId::of::<Vec<Vec<u32>>>()));
        assert!(registry.contains(TypeId::of::<Vec<u32>>()));

        let entry = registry
            .resolve(&TypeRef::new("List<List<u32>>", "amber"))
            .unwrap();
        assert_eq!(entry.shape(), crate::Shape::List);
    }

    #[test]
    fn resolve_requires_a_sufficient_reference() {
        let registry = TypeRegistry::new();

        let missing_library = TypeRef::new("u32", "");
        assert!(matches!(
            registry.resolve(&missing_library),
            Err(ResolveError::Insufficient(_))
        ));

        let unknown = TypeRef::new("Widget", "amber");
        assert!(matches!(
            registry.resolve(&unknown),
            Err(ResolveError::NotFound(_))
        ));
    }

    #[test]
    fn resolve_drops_library_qualifiers() {
        let registry = TypeRegistry::new();

        let versioned = TypeRef::new("u32", "amber, Version=1.0.0, Culture=neutral");
        let entry = registry.resolve(&versioned).unwrap();
        assert_eq!(entry.ty(), TypeId::of::<u32>());
    }

    #[test]
    fn resolve_follows_library_aliases() {
        let registry = TypeRegistry::new();
        registry.register_library("mscorlib, Version=4.0.0.0", "amber");

        let aliased = TypeRef::new("u32", "mscorlib");
        let entry = registry.resolve(&aliased).unwrap();
        assert_eq!(entry.ty(), TypeId::of::<u32>());
    }

    #[test]
    fn registered_snapshots_every_entry() {
        let registry = TypeRegistry::empty();
        registry.register::<u32>();
        registry.register::<String>();

        let entries = registry.registered();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|entry| entry.ty() == TypeId::of::<u32>()));
    }

    #[test]
    fn construct_parses_or_falls_back_to_default() {
        let registry = TypeRegistry::new();
        let entry = registry.entry_of::<u32>().unwrap();

        let parsed = registry.construct(&entry, Some("42"));
        assert_eq!(parsed.downcast_ref::<u32>(), Some(&42));

        let fallback = registry.construct(&entry, Some("forty-two"));
        assert_eq!(fallback.downcast_ref::<u32>(), Some(&0));

        let empty = registry.construct(&entry, None);
        assert_eq!(empty.downcast_ref::<u32>(), Some(&0));
    }

    #[test]
    fn construct_binary_requires_a_hook() {
        let registry = TypeRegistry::new();
        let entry = registry.entry_of::<u32>().unwrap();

        assert!(matches!(
            registry.construct_binary(&entry, "AAEC"),
            Err(CreateError::NoBinaryConstructor { .. })
        ));
    }

    #[test]
    fn print_uses_registered_converters() {
        let registry = TypeRegistry::new();

        assert_eq!(registry.try_print(&7_u32), Some("7".to_string()));
        assert_eq!(
            registry.convert_to_text(&String::from("hi")).ok(),
            Some("hi".to_string())
        );

        let unprintable = DynamicComposite::new();
        assert!(registry.try_print(&unprintable).is_none());
    }
}
