//! Extracted route-parameter storage.
//!
//! Uses small-vector storage so the common case (one or two parameters per
//! route) stays off the heap.

use smallvec::SmallVec;

/// Parameters stored inline before spilling to the heap.
const INLINE_PARAMS: usize = 4;

/// Route parameters extracted from a successful match, URL-decoded.
///
/// # Example
///
/// ```
/// use atlas_router::RouteParams;
///
/// let mut params = RouteParams::new();
/// params.insert("id", "5");
/// params.insert("section", "profile");
///
/// assert_eq!(params.get("id"), Some("5"));
/// assert_eq!(params.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteParams {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl RouteParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter, replacing any existing value for the name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.inner.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.inner.push((name, value));
        }
    }

    /// Returns the value for a parameter name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the parameter is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|(n, _)| n == name)
    }

    /// Returns true if no parameters were extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of extracted parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates parameters in extraction order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<'a> IntoIterator for &'a RouteParams {
    type Item = (&'a str, &'a str);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, String)>,
        fn(&'a (String, String)) -> (&'a str, &'a str),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}
