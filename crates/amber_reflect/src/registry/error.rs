use thiserror::Error;

use crate::TypeRef;

/// An error produced while resolving a wire name against the registry.
///
/// Resolution failures are fatal to the surrounding deserialization: a
/// document naming an unknown type cannot be partially loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The reference does not carry both a name and a library.
    #[error("type reference `{0}` is missing its name or library")]
    Insufficient(TypeRef),

    /// No registered type matches the reference.
    #[error("type `{0}` is not registered")]
    NotFound(TypeRef),
}

/// An error produced while moving a scalar between value and text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The text could not be parsed as the target type.
    #[error("cannot parse `{text}` as `{type_ref}`: {cause}")]
    FromText {
        type_ref: TypeRef,
        text: String,
        cause: String,
    },

    /// The value has no registered text form.
    #[error("value of type `{type_ref}` has no text form")]
    ToText { type_ref: TypeRef },
}

/// An error produced while constructing a value through the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
    /// The type has no length-taking factory, but the document describes a
    /// sized sequence.
    #[error("type `{type_ref}` cannot be constructed with a length")]
    NotSizable { type_ref: TypeRef },

    /// The document carries a constructor payload, but the type has no
    /// binary constructor.
    #[error("type `{type_ref}` has no binary constructor")]
    NoBinaryConstructor { type_ref: TypeRef },

    /// The constructor payload could not be decoded or rejected the bytes.
    #[error("invalid binary payload for `{type_ref}`: {cause}")]
    Payload { type_ref: TypeRef, cause: String },
}
