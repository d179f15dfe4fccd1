use amber_reflect::registry::{ConvertError, CreateError, ResolveError};
use thiserror::Error;

use crate::dom::DomError;

/// An error raised while writing or reading a document tree.
///
/// The tree readers are deliberately tolerant: a property that does not
/// parse, bind or fit is logged and dropped rather than failing the whole
/// document. What does surface as an error is structural damage, a type the
/// registry cannot resolve, and creation failures the caller did not ask to
/// ignore.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The document does not have the expected structure.
    #[error("malformed document: {0}")]
    Malformed(&'static str),

    /// The document text is not well-formed markup.
    #[error(transparent)]
    Dom(#[from] DomError),

    /// A declared type is unknown to the registry.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A value could not be created.
    #[error(transparent)]
    Create(#[from] CreateError),

    /// A value has no text form.
    #[error(transparent)]
    Convert(#[from] ConvertError),
}
