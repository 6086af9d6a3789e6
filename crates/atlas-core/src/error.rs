//! Error types for entity metadata lookups.

use thiserror::Error;

/// Errors raised when the metadata graph is asked about an entity it does
/// not contain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    /// The requested entity type is not part of the graph.
    #[error("unknown entity type: {name}")]
    UnknownEntity {
        /// The entity type name that was looked up.
        name: String,
    },
}

impl MetadataError {
    /// Creates an unknown-entity error.
    #[must_use]
    pub fn unknown_entity(name: impl Into<String>) -> Self {
        Self::UnknownEntity { name: name.into() }
    }
}
