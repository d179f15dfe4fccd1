use amber_reflect::registry::{ConvertError, CreateError, ResolveError};
use amber_reflect::{Shape, TypeRef};
use thiserror::Error;

/// An error produced while encoding or decoding compact records.
///
/// Unlike the tree codec, which papers over damaged values with defaults,
/// the compact decoder fails fast: a record a scanner cannot finish or a
/// value a converter rejects stops the whole call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompactError {
    /// A scanner could not finish the record it was inside.
    #[error("malformed record at byte {offset}: {reason}")]
    MalformedRecord { offset: usize, reason: &'static str },

    /// A bound property has a shape the record grammar cannot carry.
    #[error("property `{name}` of shape {shape} has no compact form")]
    UnsupportedProperty { name: String, shape: Shape },

    /// A top-level value has a shape the record grammar cannot carry.
    #[error("value of type `{type_ref}` with shape {shape} has no compact form")]
    UnsupportedValue { type_ref: TypeRef, shape: Shape },

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Create(#[from] CreateError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
