//! # Atlas Core
//!
//! Core types and traits for the Atlas resource exposure engine.
//!
//! This crate provides the foundational types shared by the routing and
//! field-exposure crates:
//!
//! - [`RestRequest`] - The request abstraction the engine consumes
//! - [`Request`] - An owned request implementation with a fluent builder
//! - [`EntityGraph`] - Directed entity-relationship metadata graph
//! - [`MetadataProvider`] - Trait describing an entity's fields and relations
//! - [`FieldSpecTree`] - Nested field-specification trees

#![doc(html_root_url = "https://docs.rs/atlas-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod fieldset;
mod metadata;
mod request;

pub use error::MetadataError;
pub use fieldset::FieldSpecTree;
pub use metadata::{EntityGraph, EntityId, FetchKind, MetadataProvider, Relation};
pub use request::{Request, RestRequest};
