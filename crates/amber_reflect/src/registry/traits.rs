use crate::info::Described;
use crate::registry::{TextConverter, TypeEntry, TypeRegistry};
use crate::{Amber, Named};

/// A trait connecting a type to its registry entry.
///
/// Implemented by every built-in [`Amber`] type and generated by
/// [`composite!`](crate::composite) for declared composites. Registering a
/// type through [`TypeRegistry::register`] pulls in everything it depends on,
/// so registering the root of an object graph is enough.
pub trait Registrable: Amber + Named + Described + Default {
    /// The registry entry for this type.
    fn type_entry() -> TypeEntry;

    /// The text converter for this type, if it has a text form.
    fn converter() -> Option<TextConverter> {
        None
    }

    /// Registers the types this one is built from.
    fn register_dependencies(_registry: &TypeRegistry) {}
}

/// Opt-in construction from a decoded binary constructor payload.
///
/// A document can carry an opaque payload for a type instead of properties;
/// the deserializer decodes it and hands the bytes here. Pair an
/// implementation with [`TypeEntry::with_binary`] when registering:
///
/// ```ignore
/// impl Registrable for Snapshot {
///     fn type_entry() -> TypeEntry {
///         TypeEntry::of::<Snapshot>().with_binary::<Snapshot>()
///     }
/// }
/// ```
pub trait FromBinary: Sized {
    /// Builds a value from the decoded payload bytes.
    ///
    /// The error message surfaces as the cause of the construction failure.
    fn from_bytes(bytes: &[u8]) -> Result<Self, String>;
}
