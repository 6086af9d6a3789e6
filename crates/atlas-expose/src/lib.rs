//! Field-exposure resolution for Atlas.
//!
//! Decides, per matched route, which fields of an entity relationship graph
//! may cross the wire:
//!
//! - **Default resolution**: depth-limited traversal of the entity graph
//!   with cycle avoidance ([`DefaultExposeResolver`])
//! - **Client projections**: a compact pipe/bracket grammar
//!   (`username|profile[id|lastname]`) parsed into a field tree
//!   ([`parse_projection`])
//! - **Filtering**: requested and submitted trees narrowed against the
//!   allowed tree, dropping ungranted fields silently ([`filter_tree`])
//! - **Orchestration**: override short-circuit, pull channels, and push
//!   payload filtering ([`ExposeFieldsResolver`])
//!
//! # Example
//!
//! ```rust
//! use atlas_core::{EntityGraph, FetchKind, Request};
//! use atlas_expose::{ExposeFieldsResolver, ProjectionChannel};
//! use atlas_router::RouteDefinition;
//! use http::Method;
//!
//! let mut graph = EntityGraph::new();
//! let user = graph.add_entity("User", ["id", "username", "email"], ["id"]);
//! let profile = graph.add_entity("Profile", ["id", "lastname"], ["id"]);
//! graph.to_one(user, "profile", profile, FetchKind::Eager);
//!
//! let route = RouteDefinition::builder("get_user", "/user/:id")
//!     .verb(Method::GET)
//!     .entity("User")
//!     .build()
//!     .unwrap();
//!
//! let resolver = ExposeFieldsResolver::new(&graph, 2)
//!     .with_channel(ProjectionChannel::default().with_header("X-Expose"));
//!
//! let request = Request::get("/user/5").header("X-Expose", "username|profile[lastname]");
//! let exposed = resolver.resolve_pull(&route, &request).unwrap();
//! assert!(exposed.has_field("username"));
//! assert!(exposed.child("profile").unwrap().has_field("lastname"));
//! ```

#![doc(html_root_url = "https://docs.rs/atlas-expose/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod default;
mod error;
mod filter;
mod grammar;
mod resolver;

pub use default::DefaultExposeResolver;
pub use error::ExposeError;
pub use filter::{filter_tree, push_payload_tree};
pub use grammar::parse_projection;
pub use resolver::{ExposeFieldsResolver, ProjectionChannel};
