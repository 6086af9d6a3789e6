//! Declarative route definitions.
//!
//! A [`RouteDefinition`] is immutable data built once at boot: the pattern,
//! allowed verbs, per-parameter conditions, and exposure metadata. The
//! pattern and all conditions are compiled at build time, so a registry
//! never holds a route that cannot be matched.

use atlas_core::{FieldSpecTree, RestRequest};
use http::Method;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::matcher::{self, MatchOutcome};
use crate::pattern::{self, CompiledPattern, PatternError};

/// Whether a route's verbs appear in an OPTIONS response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionsExposure {
    /// No explicit choice; the registry default applies.
    #[default]
    Unset,
    /// Never advertised.
    Forbidden,
    /// Always advertised.
    Allowed,
}

/// An immutable route: pattern, verbs, conditions, and exposure metadata.
///
/// # Example
///
/// ```
/// use atlas_router::RouteDefinition;
/// use http::Method;
///
/// let route = RouteDefinition::builder("get_user", "/user/:id")
///     .verb(Method::GET)
///     .condition("id", r"\d+")
///     .entity("User")
///     .operation("getUser")
///     .build()
///     .unwrap();
///
/// assert_eq!(route.name(), "get_user");
/// assert!(route.allows_verb(&Method::GET));
/// assert!(!route.allows_verb(&Method::DELETE));
/// ```
#[derive(Debug, Clone)]
pub struct RouteDefinition {
    name: String,
    pattern: String,
    compiled: CompiledPattern,
    conditions: Vec<(String, Regex)>,
    verbs: Vec<Method>,
    is_collection: bool,
    options_exposure: OptionsExposure,
    expose_override: Option<FieldSpecTree>,
    entity: Option<String>,
    operation_id: Option<String>,
}

impl RouteDefinition {
    /// Starts building a route with a name and pattern.
    #[must_use]
    pub fn builder(name: impl Into<String>, pattern: impl Into<String>) -> RouteBuilder {
        RouteBuilder {
            name: name.into(),
            pattern: pattern.into(),
            conditions: Vec::new(),
            verbs: Vec::new(),
            is_collection: false,
            options_exposure: OptionsExposure::Unset,
            expose_override: None,
            entity: None,
            operation_id: None,
        }
    }

    /// The unique route name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw pattern string.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The allowed verbs; empty means any verb.
    #[must_use]
    pub fn verbs(&self) -> &[Method] {
        &self.verbs
    }

    /// True when the route denotes a plural resource.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.is_collection
    }

    /// Whether the route's verbs appear in an OPTIONS response.
    #[must_use]
    pub fn options_exposure(&self) -> OptionsExposure {
        self.options_exposure
    }

    /// The explicit field-exposure override, if configured.
    #[must_use]
    pub fn expose_override(&self) -> Option<&FieldSpecTree> {
        self.expose_override.as_ref()
    }

    /// The entity type this route serves, if declared.
    #[must_use]
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// The opaque handler reference, resolved upstream via a lookup table.
    #[must_use]
    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// True when the verb is allowed (an empty verb set allows any verb).
    #[must_use]
    pub fn allows_verb(&self, method: &Method) -> bool {
        self.verbs.is_empty() || self.verbs.contains(method)
    }

    /// Attempts to match a request against this route.
    ///
    /// Pure function of (route, request, flags); see
    /// [`matcher::match_route`] for the matching rules.
    #[must_use]
    pub fn matches(
        &self,
        request: &dyn RestRequest,
        match_verb: bool,
        base_path: Option<&str>,
    ) -> Option<MatchOutcome> {
        matcher::match_route(self, request, match_verb, base_path)
    }

    pub(crate) fn compiled(&self) -> &CompiledPattern {
        &self.compiled
    }

    pub(crate) fn conditions(&self) -> impl Iterator<Item = (&str, &Regex)> {
        self.conditions.iter().map(|(n, r)| (n.as_str(), r))
    }
}

/// Fluent builder for [`RouteDefinition`].
#[derive(Debug, Clone)]
pub struct RouteBuilder {
    name: String,
    pattern: String,
    conditions: Vec<(String, String)>,
    verbs: Vec<Method>,
    is_collection: bool,
    options_exposure: OptionsExposure,
    expose_override: Option<FieldSpecTree>,
    entity: Option<String>,
    operation_id: Option<String>,
}

impl RouteBuilder {
    /// Adds an allowed verb.
    #[must_use]
    pub fn verb(mut self, method: Method) -> Self {
        if !self.verbs.contains(&method) {
            self.verbs.push(method);
        }
        self
    }

    /// Adds several allowed verbs.
    #[must_use]
    pub fn verbs(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        for method in methods {
            if !self.verbs.contains(&method) {
                self.verbs.push(method);
            }
        }
        self
    }

    /// Requires a parameter's extracted value to fully match a regex.
    #[must_use]
    pub fn condition(mut self, param: impl Into<String>, regex: impl Into<String>) -> Self {
        self.conditions.push((param.into(), regex.into()));
        self
    }

    /// Marks the route as a collection (plural) resource.
    #[must_use]
    pub fn collection(mut self, is_collection: bool) -> Self {
        self.is_collection = is_collection;
        self
    }

    /// Sets whether the route's verbs appear in an OPTIONS response.
    #[must_use]
    pub fn options_exposure(mut self, exposure: OptionsExposure) -> Self {
        self.options_exposure = exposure;
        self
    }

    /// Uses an explicit field-exposure tree instead of computing a default.
    #[must_use]
    pub fn expose_override(mut self, tree: FieldSpecTree) -> Self {
        self.expose_override = Some(tree);
        self
    }

    /// Declares the entity type the route serves.
    #[must_use]
    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Sets the opaque handler reference.
    #[must_use]
    pub fn operation(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    /// Compiles the pattern and all conditions and builds the route.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when the pattern or any condition regex
    /// fails to compile.
    pub fn build(self) -> Result<RouteDefinition, PatternError> {
        let compiled = CompiledPattern::compile(&self.pattern)?;
        let mut conditions = Vec::with_capacity(self.conditions.len());
        for (param, raw) in self.conditions {
            let regex = pattern::compile_condition(&param, &raw)?;
            conditions.push((param, regex));
        }
        Ok(RouteDefinition {
            name: self.name,
            pattern: self.pattern,
            compiled,
            conditions,
            verbs: self.verbs,
            is_collection: self.is_collection,
            options_exposure: self.options_exposure,
            expose_override: self.expose_override,
            entity: self.entity,
            operation_id: self.operation_id,
        })
    }
}
