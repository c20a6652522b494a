//! Define error types for document transforms.
//!
//! These are the *hard* failures: they abort the transform of one file and no output is produced for it. Failures of a
//! generator itself are not represented here; they are reported as diagnostics and the transform carries on.

use thiserror::Error;

/// A generator binding was well-formed but could not be satisfied by the module loader.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionFailure {
    #[error("generator module `{module}` required by attribute `{attribute}` could not be loaded")]
    ModuleNotFound { module: String, attribute: String },
    #[error("generator `{type_name}` required by attribute `{attribute}` is not registered in module `{module}`")]
    GeneratorNotFound {
        type_name: String,
        module: String,
        attribute: String,
    },
}

/// Error while transforming one source file.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A required input was not supplied.
    #[error("missing required input: {0}")]
    Precondition(&'static str),
    /// The generator binding on an attribute type is malformed.
    #[error("invalid generator binding on attribute `{attribute}`: {reason}")]
    InvalidBinding { attribute: String, reason: String },
    #[error(transparent)]
    Resolution(#[from] ResolutionFailure),
    /// Generated output cannot be placed in the lexical scope of its trigger.
    #[error("generator `{generator}` produced {item} which cannot be placed inside `{scope}`")]
    ScopeMismatch {
        generator: String,
        item: String,
        scope: String,
    },
    #[error("transform cancelled")]
    Cancelled,
}

impl TransformError {
    pub(crate) fn invalid_binding(attribute: &str, reason: impl Into<String>) -> Self {
        TransformError::InvalidBinding {
            attribute: attribute.to_string(),
            reason: reason.into(),
        }
    }
}
