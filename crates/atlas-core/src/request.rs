//! Request abstraction consumed by the matching and exposure engines.
//!
//! The engine never touches a transport: it sees requests only through
//! [`RestRequest`]. [`Request`] is the owned implementation used by tests
//! and by embedders that already hold the request data in decomposed form;
//! adapters over framework request types implement the trait at the
//! boundary.

use http::Method;
use indexmap::IndexMap;

/// The request surface the engine consumes.
///
/// Only path, method, headers, and query/body parameters are visible;
/// bodies, streams, and transport details stay with the caller.
pub trait RestRequest {
    /// The request path, possibly still carrying a query string or
    /// extension suffix (the matcher strips both).
    fn path(&self) -> &str;

    /// The HTTP method.
    fn method(&self) -> &Method;

    /// A header value by case-insensitive name.
    fn header(&self, name: &str) -> Option<&str>;

    /// A query-string parameter by name.
    fn query_param(&self, name: &str) -> Option<&str>;

    /// A body parameter by name (form-style payloads).
    fn body_param(&self, name: &str) -> Option<&str>;
}

/// Owned request with a fluent builder.
///
/// # Example
///
/// ```
/// use atlas_core::{Request, RestRequest};
/// use http::Method;
///
/// let request = Request::get("/user/5")
///     .header("X-Expose", "username|profile[id]")
///     .query("page", "2");
///
/// assert_eq!(request.path(), "/user/5");
/// assert_eq!(request.method(), &Method::GET);
/// assert_eq!(request.header("x-expose"), Some("username|profile[id]"));
/// assert_eq!(request.query_param("page"), Some("2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    path: String,
    headers: IndexMap<String, String>,
    query: IndexMap<String, String>,
    body: IndexMap<String, String>,
}

impl Request {
    /// Creates a request with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: IndexMap::new(),
            query: IndexMap::new(),
            body: IndexMap::new(),
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Creates an OPTIONS request.
    #[must_use]
    pub fn options(path: impl Into<String>) -> Self {
        Self::new(Method::OPTIONS, path)
    }

    /// Adds a header, builder style.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a query parameter, builder style.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Adds a body parameter, builder style.
    #[must_use]
    pub fn body_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.body.insert(name.into(), value.into());
        self
    }
}

impl RestRequest for Request {
    fn path(&self) -> &str {
        &self.path
    }

    fn method(&self) -> &Method {
        &self.method
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    fn body_param(&self, name: &str) -> Option<&str> {
        self.body.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let request = Request::post("/user")
            .header("Content-Type", "application/json")
            .body_field("username", "alice");

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.path(), "/user");
        assert_eq!(request.body_param("username"), Some("alice"));
        assert_eq!(request.body_param("missing"), None);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = Request::get("/").header("X-Expose", "id");
        assert_eq!(request.header("x-expose"), Some("id"));
        assert_eq!(request.header("X-EXPOSE"), Some("id"));
        assert_eq!(request.header("X-Other"), None);
    }

    #[test]
    fn test_query_params() {
        let request = Request::get("/user").query("page", "1").query("limit", "50");
        assert_eq!(request.query_param("page"), Some("1"));
        assert_eq!(request.query_param("limit"), Some("50"));
        assert_eq!(request.query_param("offset"), None);
    }
}
