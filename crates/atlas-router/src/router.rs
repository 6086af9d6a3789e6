//! Route registry and dispatch.
//!
//! The [`Router`] holds routes in registration order and is built once at
//! boot; after that it is read-only and safe to share across concurrently
//! handled requests. Candidate collection ([`Router::matched_routes`]) and
//! the typed not-found/ambiguity decision ([`Router::dispatch`]) are kept
//! separate so callers that want the raw candidate list (OPTIONS
//! aggregation, diagnostics) can have it.

use http::Method;
use indexmap::IndexMap;
use thiserror::Error;

use atlas_core::RestRequest;

use crate::matcher::{self, MatchOutcome};
use crate::route::{OptionsExposure, RouteDefinition};

/// A matched route together with its extraction outcome.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    /// The route that matched.
    pub route: &'a RouteDefinition,
    /// Extracted parameters and unmapped segments.
    pub outcome: MatchOutcome,
}

/// Typed dispatch outcomes for zero or multiple candidates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No registered route matched the request.
    #[error("no route matched path '{path}'")]
    NoMatch {
        /// The request path that failed to match.
        path: String,
    },

    /// More than one route matched; never auto-resolved.
    #[error("ambiguous route match for path '{path}': {}", names.join(", "))]
    Ambiguous {
        /// The request path.
        path: String,
        /// Names of every matching route, in match order.
        names: Vec<String>,
    },
}

/// Registration-ordered route registry.
///
/// # Example
///
/// ```
/// use atlas_router::{RouteDefinition, Router};
/// use atlas_core::Request;
/// use http::Method;
///
/// let mut router = Router::new();
/// router.register(
///     RouteDefinition::builder("get_user", "/user/:id")
///         .verb(Method::GET)
///         .build()
///         .unwrap(),
/// );
///
/// let matched = router.dispatch(&Request::get("/user/5"), true).unwrap();
/// assert_eq!(matched.route.name(), "get_user");
/// assert_eq!(matched.outcome.params().get("id"), Some("5"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: IndexMap<String, RouteDefinition>,
    base_paths: Vec<String>,
    expose_unset_options: bool,
}

impl Router {
    /// Creates an empty router with no base paths.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: IndexMap::new(),
            base_paths: Vec::new(),
            expose_unset_options: true,
        }
    }

    /// Adds a base-path prefix tried during matching, builder style.
    #[must_use]
    pub fn with_base_path(mut self, base: impl Into<String>) -> Self {
        self.base_paths.push(base.into());
        self
    }

    /// Adds several base-path prefixes, builder style.
    #[must_use]
    pub fn with_base_paths<I>(mut self, bases: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.base_paths.extend(bases.into_iter().map(Into::into));
        self
    }

    /// Controls whether routes with [`OptionsExposure::Unset`] count as
    /// exposable in [`Router::allowed_verbs`]. Defaults to true.
    #[must_use]
    pub fn with_expose_unset_options(mut self, expose: bool) -> Self {
        self.expose_unset_options = expose;
        self
    }

    /// Registers a route by name; re-registering an existing name
    /// overwrites it (last-write-wins).
    ///
    /// Name uniqueness across collaborators is the registrar's concern
    /// upstream; the registry itself never raises.
    pub fn register(&mut self, route: RouteDefinition) {
        tracing::debug!(route = %route.name(), pattern = %route.pattern(), "registering route");
        if let Some(previous) = self.routes.insert(route.name().to_string(), route) {
            tracing::debug!(route = %previous.name(), "replaced previously registered route");
        }
    }

    /// Returns a route by name.
    #[must_use]
    pub fn route(&self, name: &str) -> Option<&RouteDefinition> {
        self.routes.get(name)
    }

    /// Iterates routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteDefinition> {
        self.routes.values()
    }

    /// The configured base paths.
    #[must_use]
    pub fn base_paths(&self) -> &[String] {
        &self.base_paths
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Collects every route matching the request.
    ///
    /// Routes are tried in registration order. When base paths are
    /// configured, each route is tried against every base path (base-path
    /// order nested within route order) and the bare path is *not* tried;
    /// without base paths each route is matched directly.
    #[must_use]
    pub fn matched_routes(&self, request: &dyn RestRequest, match_verb: bool) -> Vec<RouteMatch<'_>> {
        let mut hits = Vec::new();
        for route in self.routes.values() {
            if self.base_paths.is_empty() {
                if let Some(outcome) = matcher::match_route(route, request, match_verb, None) {
                    hits.push(RouteMatch { route, outcome });
                }
            } else {
                for base in &self.base_paths {
                    if let Some(outcome) =
                        matcher::match_route(route, request, match_verb, Some(base))
                    {
                        hits.push(RouteMatch { route, outcome });
                    }
                }
            }
        }
        hits
    }

    /// Resolves the request to exactly one route, or a typed outcome.
    ///
    /// # Errors
    ///
    /// [`DispatchError::NoMatch`] when no candidate matched;
    /// [`DispatchError::Ambiguous`] with every candidate name when more
    /// than one did.
    pub fn dispatch(
        &self,
        request: &dyn RestRequest,
        match_verb: bool,
    ) -> Result<RouteMatch<'_>, DispatchError> {
        tracing::debug!(method = %request.method(), path = %request.path(), "dispatching request");
        let hits = self.matched_routes(request, match_verb);
        let mut iter = hits.into_iter();
        match (iter.next(), iter.next()) {
            (None, _) => Err(DispatchError::NoMatch {
                path: request.path().to_string(),
            }),
            (Some(hit), None) => Ok(hit),
            (Some(first), Some(second)) => {
                let names = std::iter::once(&first)
                    .chain(std::iter::once(&second))
                    .map(|hit| hit.route.name().to_string())
                    .chain(iter.map(|hit| hit.route.name().to_string()))
                    .collect();
                Err(DispatchError::Ambiguous {
                    path: request.path().to_string(),
                    names,
                })
            }
        }
    }

    /// Unions the verbs of every route whose pattern matches the path,
    /// ignoring the request verb, honoring each route's
    /// [`OptionsExposure`]. Feeds an `Allow:` response built upstream.
    #[must_use]
    pub fn allowed_verbs(&self, request: &dyn RestRequest) -> Vec<Method> {
        let mut verbs: Vec<Method> = Vec::new();
        for hit in self.matched_routes(request, false) {
            let exposed = match hit.route.options_exposure() {
                OptionsExposure::Allowed => true,
                OptionsExposure::Forbidden => false,
                OptionsExposure::Unset => self.expose_unset_options,
            };
            if !exposed {
                continue;
            }
            for verb in hit.route.verbs() {
                if !verbs.contains(verb) {
                    verbs.push(verb.clone());
                }
            }
        }
        verbs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::Request;

    fn route(name: &str, pattern: &str, verbs: &[Method]) -> RouteDefinition {
        RouteDefinition::builder(name, pattern)
            .verbs(verbs.iter().cloned())
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut router = Router::new();
        router.register(route("users", "/users", &[Method::GET]));

        assert_eq!(router.len(), 1);
        assert!(router.route("users").is_some());
        assert!(router.route("missing").is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let mut router = Router::new();
        router.register(route("users", "/users", &[Method::GET]));
        router.register(route("users", "/people", &[Method::GET]));

        assert_eq!(router.len(), 1);
        assert_eq!(router.route("users").unwrap().pattern(), "/people");
    }

    #[test]
    fn test_dispatch_single_match() {
        let mut router = Router::new();
        router.register(route("get_user", "/user/:id", &[Method::GET]));
        router.register(route("create_user", "/user", &[Method::POST]));

        let matched = router.dispatch(&Request::get("/user/5"), true).unwrap();
        assert_eq!(matched.route.name(), "get_user");
    }

    #[test]
    fn test_dispatch_no_match() {
        let router = Router::new();
        let err = router.dispatch(&Request::get("/nothing"), true).unwrap_err();
        assert_eq!(
            err,
            DispatchError::NoMatch {
                path: "/nothing".to_string()
            }
        );
    }

    #[test]
    fn test_dispatch_ambiguous_lists_all_names() {
        let mut router = Router::new();
        router.register(route("a", "/user/:id", &[Method::GET]));
        router.register(route("b", "/user/:name", &[Method::GET]));

        let err = router.dispatch(&Request::get("/user/5"), true).unwrap_err();
        match err {
            DispatchError::Ambiguous { names, .. } => {
                assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
            }
            DispatchError::NoMatch { .. } => panic!("expected ambiguous"),
        }
    }

    #[test]
    fn test_verb_disambiguates() {
        let mut router = Router::new();
        router.register(route("read", "/user/:id", &[Method::GET]));
        router.register(route("write", "/user/:id", &[Method::PUT]));

        let matched = router.dispatch(&Request::get("/user/5"), true).unwrap();
        assert_eq!(matched.route.name(), "read");

        let matched = router.dispatch(&Request::put("/user/5"), true).unwrap();
        assert_eq!(matched.route.name(), "write");
    }

    #[test]
    fn test_base_paths_replace_bare_matching() {
        let mut router = Router::new().with_base_paths(["v1", "v2"]);
        router.register(route("get_user", "/user/:id", &[Method::GET]));

        assert!(router.dispatch(&Request::get("/v1/user/9"), true).is_ok());
        assert!(router.dispatch(&Request::get("/v2/user/9"), true).is_ok());
        // The bare path is not tried once base paths are configured.
        assert!(router.dispatch(&Request::get("/user/9"), true).is_err());
    }

    #[test]
    fn test_base_path_order_nested_within_route_order() {
        let mut router = Router::new().with_base_paths(["v1", "v2"]);
        // One pattern matching under both base paths produces two hits,
        // in base-path order.
        router.register(route("a", "/:rest+", &[]));
        router.register(route("b", "/:rest+", &[]));

        let hits = router.matched_routes(&Request::get("/v1/x"), true);
        // Route a under v1, then route b under v1; v2 never matches /v1/x.
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].route.name(), "a");
        assert_eq!(hits[1].route.name(), "b");
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut router = Router::new();
        router.register(route("a", "/x", &[]));
        router.register(route("b", "/x", &[]));

        let hits = router.matched_routes(&Request::get("/x"), true);
        let names: Vec<_> = hits.iter().map(|h| h.route.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_allowed_verbs_unions_and_filters() {
        let mut router = Router::new();
        router.register(route("read", "/user/:id", &[Method::GET, Method::HEAD]));
        router.register(route("write", "/user/:id", &[Method::PUT]));
        router.register(
            RouteDefinition::builder("hidden", "/user/:id")
                .verb(Method::DELETE)
                .options_exposure(OptionsExposure::Forbidden)
                .build()
                .unwrap(),
        );

        let verbs = router.allowed_verbs(&Request::options("/user/5"));
        assert_eq!(verbs, vec![Method::GET, Method::HEAD, Method::PUT]);
    }

    #[test]
    fn test_allowed_verbs_unset_respects_registry_default() {
        let mut router = Router::new().with_expose_unset_options(false);
        router.register(route("read", "/user/:id", &[Method::GET]));
        router.register(
            RouteDefinition::builder("explicit", "/user/:id")
                .verb(Method::PUT)
                .options_exposure(OptionsExposure::Allowed)
                .build()
                .unwrap(),
        );

        let verbs = router.allowed_verbs(&Request::options("/user/5"));
        assert_eq!(verbs, vec![Method::PUT]);
    }
}
