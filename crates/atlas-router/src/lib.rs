//! Pattern-based route matching for Atlas.
//!
//! This crate maps declarative route patterns onto incoming requests:
//!
//! - **Pattern compilation**: `:name` single-segment and `:name+` greedy
//!   parameters, optional parenthesised sections, optional trailing slash,
//!   all compiled to an anchored regular expression
//! - **Per-parameter conditions**: extracted values must fully match a
//!   configured regex, or the whole match is discarded
//! - **Verb filtering**: an empty verb set means "any verb"
//! - **Base paths**: a registry-level list of prefixes tried per route
//! - **Typed dispatch**: zero candidates and multiple candidates are
//!   values ([`DispatchError`]), not panics or logs
//!
//! # Example
//!
//! ```rust
//! use atlas_router::{RouteDefinition, Router};
//! use atlas_core::Request;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.register(
//!     RouteDefinition::builder("get_user", "/user/:id")
//!         .verb(Method::GET)
//!         .condition("id", r"\d+")
//!         .entity("User")
//!         .build()
//!         .unwrap(),
//! );
//!
//! let matched = router.dispatch(&Request::get("/user/42"), true).unwrap();
//! assert_eq!(matched.route.name(), "get_user");
//! assert_eq!(matched.outcome.params().get("id"), Some("42"));
//! ```

#![doc(html_root_url = "https://docs.rs/atlas-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod matcher;
mod params;
mod pattern;
mod route;
mod router;

pub use matcher::{match_route, MatchOutcome};
pub use params::RouteParams;
pub use pattern::{CompiledPattern, ParamSpec, PatternError};
pub use route::{OptionsExposure, RouteBuilder, RouteDefinition};
pub use router::{DispatchError, RouteMatch, Router};
