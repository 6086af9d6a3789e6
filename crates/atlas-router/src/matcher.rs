//! Request-against-route matching.
//!
//! Matching is a pure function of (route, request, flags): it never mutates
//! the route, and a failed attempt leaves no partial state behind. The verb
//! check runs first as a cheap rejection; only then is the pattern matched
//! against the request path (query string, fragment, and extension are
//! excluded), parameters URL-decoded, and per-parameter conditions
//! evaluated. Any failing condition discards the entire outcome.

use percent_encoding::percent_decode_str;
use regex::Regex;

use atlas_core::RestRequest;

use crate::params::RouteParams;
use crate::route::RouteDefinition;

/// The result of a successful match attempt.
///
/// Created fresh per attempt and discarded wholesale when any condition
/// fails, so no partial extraction leaks to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchOutcome {
    params: RouteParams,
    unmapped: Vec<String>,
}

impl MatchOutcome {
    /// The extracted, URL-decoded route parameters.
    #[must_use]
    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    /// Path segments beyond a greedy capture, in path order.
    #[must_use]
    pub fn unmapped(&self) -> &[String] {
        &self.unmapped
    }

    /// Consumes the outcome into its parts.
    #[must_use]
    pub fn into_parts(self) -> (RouteParams, Vec<String>) {
        (self.params, self.unmapped)
    }
}

/// Attempts to match a request against a route.
///
/// With `match_verb` set and a non-empty verb set on the route, the
/// request's method must be a member; otherwise the pattern is not even
/// compiled. `base_path`, when given, is prefixed (escaped) to the route's
/// pattern before matching.
#[must_use]
pub fn match_route(
    route: &RouteDefinition,
    request: &dyn RestRequest,
    match_verb: bool,
    base_path: Option<&str>,
) -> Option<MatchOutcome> {
    if match_verb && !route.verbs().is_empty() && !route.verbs().contains(request.method()) {
        return None;
    }

    let path = match_target(request.path());
    let caps = match base_path {
        Some(base) => {
            let anchored = format!(
                "^{}{}$",
                regex::escape(&normalize_base(base)),
                route.compiled().body()
            );
            let regex = match Regex::new(&anchored) {
                Ok(regex) => regex,
                Err(error) => {
                    tracing::error!(
                        route = %route.name(),
                        base,
                        %error,
                        "base-prefixed pattern failed to compile"
                    );
                    return None;
                }
            };
            regex.captures(path)?
        }
        None => route.compiled().regex().captures(path)?,
    };

    let mut params = RouteParams::new();
    let mut unmapped = Vec::new();

    for spec in route.compiled().params() {
        // Optional groups may legitimately not participate in the match.
        let Some(capture) = caps.name(&spec.name) else {
            continue;
        };
        let decoded = percent_decode_str(capture.as_str())
            .decode_utf8_lossy()
            .into_owned();
        if spec.greedy {
            let mut segments = decoded.split('/');
            if let Some(first) = segments.next() {
                params.insert(&spec.name, first);
            }
            unmapped.extend(segments.filter(|s| !s.is_empty()).map(ToOwned::to_owned));
        } else {
            params.insert(&spec.name, decoded);
        }
    }

    for (name, condition) in route.conditions() {
        match params.get(name) {
            Some(value) if condition.is_match(value) => {}
            _ => return None,
        }
    }

    Some(MatchOutcome { params, unmapped })
}

/// Reduces a raw request path to the matchable portion: everything before
/// the query string or fragment, with a trailing extension on the last
/// segment removed (`/user/5.json` matches like `/user/5`).
fn match_target(raw: &str) -> &str {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let path = &raw[..end];

    let tail_start = path.rfind('/').map_or(0, |idx| idx + 1);
    let tail = &path[tail_start..];
    match tail.rfind('.') {
        Some(dot) if dot > 0 => &path[..tail_start + dot],
        _ => path,
    }
}

fn normalize_base(base: &str) -> String {
    format!("/{}", base.trim_matches('/'))
}
