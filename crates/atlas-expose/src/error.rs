//! Error types for field-exposure resolution.

use thiserror::Error;

use atlas_core::MetadataError;

/// Errors raised while resolving field exposure.
#[derive(Error, Debug)]
pub enum ExposeError {
    /// The client projection string is malformed.
    #[error("invalid expose syntax: {reason}")]
    InvalidSyntax {
        /// What was wrong with the input.
        reason: String,
    },

    /// A push payload was collection-shaped; only single-resource payloads
    /// can be filtered.
    #[error("cannot push a collection payload")]
    CollectionPush,

    /// The metadata graph does not know the entity being resolved.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl ExposeError {
    /// Creates an invalid-syntax error.
    #[must_use]
    pub fn invalid_syntax(reason: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            reason: reason.into(),
        }
    }
}
