//! Per-route field-exposure orchestration.
//!
//! [`ExposeFieldsResolver`] ties the pieces together for a matched route:
//! an explicit per-route override wins outright; otherwise the default
//! allowed tree is computed from the entity graph, and for pull requests a
//! client-supplied projection (header or query parameter) narrows it.

use serde_json::Value;

use atlas_core::{FetchKind, FieldSpecTree, MetadataProvider, RestRequest};
use atlas_router::RouteDefinition;

use crate::default::DefaultExposeResolver;
use crate::error::ExposeError;
use crate::filter::{filter_tree, push_payload_tree};
use crate::grammar::parse_projection;

/// Where a client's projection string is read from.
///
/// When both channels are configured and present on a request, the header
/// wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionChannel {
    header: Option<String>,
    query_param: Option<String>,
}

impl ProjectionChannel {
    /// A channel reading from neither source (clients cannot narrow).
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Sets the header name to read, builder style.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>) -> Self {
        self.header = Some(name.into());
        self
    }

    /// Sets the query parameter name to read, builder style.
    #[must_use]
    pub fn with_query_param(mut self, name: impl Into<String>) -> Self {
        self.query_param = Some(name.into());
        self
    }

    /// The configured header name, if any.
    #[must_use]
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// The configured query parameter name, if any.
    #[must_use]
    pub fn query_param(&self) -> Option<&str> {
        self.query_param.as_deref()
    }
}

/// Resolves the final field-exposure tree for pull and push requests.
///
/// # Example
///
/// ```
/// use atlas_core::{EntityGraph, FetchKind, Request};
/// use atlas_expose::{ExposeFieldsResolver, ProjectionChannel};
/// use atlas_router::RouteDefinition;
/// use http::Method;
///
/// let mut graph = EntityGraph::new();
/// let user = graph.add_entity("User", ["id", "username", "email"], ["id"]);
/// let profile = graph.add_entity("Profile", ["id", "lastname"], ["id"]);
/// graph.to_one(user, "profile", profile, FetchKind::Eager);
///
/// let route = RouteDefinition::builder("get_user", "/user/:id")
///     .verb(Method::GET)
///     .entity("User")
///     .build()
///     .unwrap();
///
/// let resolver = ExposeFieldsResolver::new(&graph, 2)
///     .with_channel(ProjectionChannel::default().with_header("X-Expose"));
///
/// let request = Request::get("/user/5").header("X-Expose", "username|profile[lastname]");
/// let exposed = resolver.resolve_pull(&route, &request).unwrap();
/// assert!(exposed.has_field("username"));
/// assert!(!exposed.has_field("email"));
/// ```
#[derive(Clone)]
pub struct ExposeFieldsResolver<'a> {
    metadata: &'a dyn MetadataProvider,
    depth: usize,
    fetch_filter: Option<FetchKind>,
    channel: ProjectionChannel,
}

impl<'a> ExposeFieldsResolver<'a> {
    /// Creates a resolver with the given default traversal depth and no
    /// client channel.
    #[must_use]
    pub fn new(metadata: &'a dyn MetadataProvider, depth: usize) -> Self {
        Self {
            metadata,
            depth,
            fetch_filter: None,
            channel: ProjectionChannel::disabled(),
        }
    }

    /// Restricts default traversal to relations of one fetch kind.
    #[must_use]
    pub fn with_fetch_filter(mut self, kind: FetchKind) -> Self {
        self.fetch_filter = Some(kind);
        self
    }

    /// Configures where client projections are read from.
    #[must_use]
    pub fn with_channel(mut self, channel: ProjectionChannel) -> Self {
        self.channel = channel;
        self
    }

    /// Computes the allowed tree for a route: the explicit override when
    /// present, otherwise the depth-limited default for the route's
    /// entity. A route with neither exposes nothing.
    pub fn allowed_tree(&self, route: &RouteDefinition) -> Result<FieldSpecTree, ExposeError> {
        if let Some(tree) = route.expose_override() {
            return Ok(tree.clone());
        }
        let Some(entity) = route.entity() else {
            tracing::debug!(route = %route.name(), "route has no entity; exposing nothing");
            return Ok(FieldSpecTree::new());
        };
        let tree = DefaultExposeResolver::new(self.metadata).resolve(
            entity,
            self.depth,
            self.fetch_filter,
        )?;
        Ok(tree)
    }

    /// Resolves the exposure tree for a read request.
    ///
    /// With an explicit route override, the override is returned verbatim
    /// and no parsing or default resolution runs. Otherwise the default
    /// allowed tree applies, narrowed by the client's projection string
    /// when one arrives on the configured channel.
    ///
    /// # Errors
    ///
    /// [`ExposeError::InvalidSyntax`] for a malformed projection string,
    /// [`ExposeError::Metadata`] when the route's entity is unknown.
    pub fn resolve_pull(
        &self,
        route: &RouteDefinition,
        request: &dyn RestRequest,
    ) -> Result<FieldSpecTree, ExposeError> {
        if let Some(tree) = route.expose_override() {
            return Ok(tree.clone());
        }
        let allowed = self.allowed_tree(route)?;
        match self.client_projection(request) {
            Some(raw) => {
                let requested = parse_projection(raw)?;
                Ok(filter_tree(&requested, &allowed))
            }
            None => Ok(allowed),
        }
    }

    /// Resolves the writable-field tree for a write request by filtering
    /// the submitted payload's fields against the allowed tree.
    ///
    /// # Errors
    ///
    /// [`ExposeError::CollectionPush`] for collection-shaped payloads,
    /// [`ExposeError::Metadata`] when the route's entity is unknown.
    pub fn resolve_push(
        &self,
        route: &RouteDefinition,
        payload: &Value,
    ) -> Result<FieldSpecTree, ExposeError> {
        let allowed = self.allowed_tree(route)?;
        let submitted = push_payload_tree(payload)?;
        Ok(filter_tree(&submitted, &allowed))
    }

    fn client_projection<'r>(&self, request: &'r dyn RestRequest) -> Option<&'r str> {
        if let Some(name) = self.channel.header() {
            if let Some(value) = request.header(name) {
                return Some(value);
            }
        }
        if let Some(name) = self.channel.query_param() {
            if let Some(value) = request.query_param(name) {
                return Some(value);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::{EntityGraph, Request};
    use http::Method;
    use serde_json::json;

    fn graph() -> EntityGraph {
        let mut graph = EntityGraph::new();
        let user = graph.add_entity("User", ["id", "username", "email"], ["id"]);
        let profile = graph.add_entity("Profile", ["id", "lastname"], ["id"]);
        let phone = graph.add_entity("Phone", ["id", "number"], ["id"]);
        graph.to_one(user, "profile", profile, FetchKind::Eager);
        graph.to_many(user, "phone_numbers", phone, FetchKind::Lazy);
        graph
    }

    fn user_route() -> RouteDefinition {
        RouteDefinition::builder("get_user", "/user/:id")
            .verb(Method::GET)
            .entity("User")
            .build()
            .unwrap()
    }

    fn channel() -> ProjectionChannel {
        ProjectionChannel::default()
            .with_header("X-Expose")
            .with_query_param("expose")
    }

    #[test]
    fn test_pull_without_projection_returns_allowed() {
        let graph = graph();
        let resolver = ExposeFieldsResolver::new(&graph, 2).with_channel(channel());

        let tree = resolver.resolve_pull(&user_route(), &Request::get("/user/5")).unwrap();
        assert!(tree.has_field("username"));
        assert!(tree.has_field("email"));
        assert!(tree.child("profile").unwrap().has_field("lastname"));
    }

    #[test]
    fn test_pull_with_header_projection_narrows() {
        let graph = graph();
        let resolver = ExposeFieldsResolver::new(&graph, 2).with_channel(channel());

        let request = Request::get("/user/5").header("X-Expose", "username|profile[id]");
        let tree = resolver.resolve_pull(&user_route(), &request).unwrap();
        assert!(tree.has_field("username"));
        assert!(!tree.has_field("email"));
        let profile = tree.child("profile").unwrap();
        assert!(profile.has_field("id"));
        assert!(!profile.has_field("lastname"));
    }

    #[test]
    fn test_header_wins_over_query_param() {
        let graph = graph();
        let resolver = ExposeFieldsResolver::new(&graph, 2).with_channel(channel());

        let request = Request::get("/user/5")
            .header("X-Expose", "username")
            .query("expose", "email");
        let tree = resolver.resolve_pull(&user_route(), &request).unwrap();
        assert!(tree.has_field("username"));
        assert!(!tree.has_field("email"));
    }

    #[test]
    fn test_query_param_used_when_header_absent() {
        let graph = graph();
        let resolver = ExposeFieldsResolver::new(&graph, 2).with_channel(channel());

        let request = Request::get("/user/5").query("expose", "email");
        let tree = resolver.resolve_pull(&user_route(), &request).unwrap();
        assert!(tree.has_field("email"));
        assert!(!tree.has_field("username"));
    }

    #[test]
    fn test_invalid_projection_is_a_client_error() {
        let graph = graph();
        let resolver = ExposeFieldsResolver::new(&graph, 2).with_channel(channel());

        let request = Request::get("/user/5").header("X-Expose", "user name");
        let err = resolver.resolve_pull(&user_route(), &request).unwrap_err();
        assert!(matches!(err, ExposeError::InvalidSyntax { .. }));
    }

    #[test]
    fn test_override_short_circuits_pull() {
        let graph = graph();
        let resolver = ExposeFieldsResolver::new(&graph, 2).with_channel(channel());
        let override_tree = FieldSpecTree::new().field("id");
        let route = RouteDefinition::builder("get_user", "/user/:id")
            .entity("User")
            .expose_override(override_tree.clone())
            .build()
            .unwrap();

        // Even a client projection is ignored: the override is verbatim.
        let request = Request::get("/user/5").header("X-Expose", "username");
        let tree = resolver.resolve_pull(&route, &request).unwrap();
        assert_eq!(tree, override_tree);
    }

    #[test]
    fn test_route_without_entity_exposes_nothing() {
        let graph = graph();
        let resolver = ExposeFieldsResolver::new(&graph, 2).with_channel(channel());
        let route = RouteDefinition::builder("ping", "/ping").build().unwrap();

        let tree = resolver.resolve_pull(&route, &Request::get("/ping")).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_push_filters_submitted_fields() {
        let graph = graph();
        let resolver = ExposeFieldsResolver::new(&graph, 2).with_channel(channel());

        let payload = json!({
            "user": {
                "username": "alice",
                "is_admin": true,
                "profile": { "lastname": "Smith", "secret": "x" }
            }
        });
        let tree = resolver.resolve_push(&user_route(), &payload).unwrap();
        assert!(tree.has_field("username"));
        assert!(!tree.has_field("is_admin"));
        let profile = tree.child("profile").unwrap();
        assert!(profile.has_field("lastname"));
        assert!(!profile.has_field("secret"));
    }

    #[test]
    fn test_push_collection_rejected() {
        let graph = graph();
        let resolver = ExposeFieldsResolver::new(&graph, 2).with_channel(channel());

        let payload = json!([{ "user": { "username": "alice" } }]);
        let err = resolver.resolve_push(&user_route(), &payload).unwrap_err();
        assert!(matches!(err, ExposeError::CollectionPush));
    }

    #[test]
    fn test_fetch_filter_threads_through() {
        let graph = graph();
        let resolver = ExposeFieldsResolver::new(&graph, 2)
            .with_fetch_filter(FetchKind::Eager)
            .with_channel(channel());

        let tree = resolver.resolve_pull(&user_route(), &Request::get("/user/5")).unwrap();
        assert!(tree.has_child("profile"));
        assert!(!tree.has_child("phone_numbers"));
    }
}
