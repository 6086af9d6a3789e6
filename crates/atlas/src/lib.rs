//! # Atlas
//!
//! **Resource-to-route mapping and field exposure engine**
//!
//! Atlas maps stored resources to HTTP routes and decides, per request,
//! which fields of a resource graph may cross the wire:
//!
//! - **Route matching** - declarative patterns (`/user/:id`, greedy
//!   `:path+`, optional sections) compiled to matchable predicates, with
//!   per-parameter conditions, verb filtering, base paths, and typed
//!   not-found/ambiguity outcomes
//! - **Field exposure** - depth-limited default traversal of a cyclic
//!   entity relationship graph, a compact client projection grammar
//!   (`username|profile[id|lastname]`), and silent narrowing of requested
//!   or submitted fields against the allowed tree
//!
//! Persistence, serialization, and transport stay outside: Atlas consumes
//! a request abstraction and an entity metadata provider, and hands typed
//! outcomes back to the embedding application.
//!
//! ## Quick Start
//!
//! ```rust
//! use atlas::prelude::*;
//!
//! // Describe the entity graph (normally fed from ORM metadata).
//! let mut graph = EntityGraph::new();
//! let user = graph.add_entity("User", ["id", "username", "email"], ["id"]);
//! let profile = graph.add_entity("Profile", ["id", "lastname"], ["id"]);
//! graph.to_one(user, "profile", profile, FetchKind::Eager);
//!
//! // Register routes.
//! let mut router = Router::new();
//! router.register(
//!     RouteDefinition::builder("get_user", "/user/:id")
//!         .verb(http::Method::GET)
//!         .condition("id", r"\d+")
//!         .entity("User")
//!         .operation("getUser")
//!         .build()
//!         .unwrap(),
//! );
//!
//! // Dispatch and resolve exposure.
//! let request = Request::get("/user/42").header("X-Expose", "username|profile[lastname]");
//! let matched = router.dispatch(&request, true).unwrap();
//!
//! let resolver = ExposeFieldsResolver::new(&graph, 2)
//!     .with_channel(ProjectionChannel::default().with_header("X-Expose"));
//! let exposed = resolver.resolve_pull(matched.route, &request).unwrap();
//!
//! assert_eq!(matched.outcome.params().get("id"), Some("42"));
//! assert!(exposed.has_field("username"));
//! assert!(!exposed.has_field("email"));
//! ```

#![doc(html_root_url = "https://docs.rs/atlas/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use atlas_core as core;

// Re-export router types
pub use atlas_router as router;

// Re-export exposure types
pub use atlas_expose as expose;

// Re-export configuration types
pub use atlas_config as config;

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use atlas_config::{AtlasConfig, ConfigLoader};
    pub use atlas_core::{
        EntityGraph, FetchKind, FieldSpecTree, MetadataProvider, Relation, Request, RestRequest,
    };
    pub use atlas_expose::{
        filter_tree, parse_projection, DefaultExposeResolver, ExposeError, ExposeFieldsResolver,
        ProjectionChannel,
    };
    pub use atlas_router::{
        DispatchError, MatchOutcome, OptionsExposure, RouteDefinition, RouteMatch, RouteParams,
        Router,
    };
}
