//! Route-pattern compilation.
//!
//! Patterns are declarative path templates with named parameter
//! placeholders:
//!
//! - `:name` matches a single path segment (`[^/]+`)
//! - `:name+` is greedy and consumes the rest of the path (`.+`)
//! - `(` opens a group and every literal `)` closes it as *optional*
//! - a trailing `/` is itself optional
//!
//! Compilation rewrites the pattern into an anchored regular expression with
//! one named capture group per parameter.

use regex::Regex;
use thiserror::Error;

/// Errors raised while compiling a pattern or a parameter condition.
#[derive(Error, Debug)]
pub enum PatternError {
    /// The rewritten pattern is not a valid regular expression.
    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The raw pattern string.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: Box<regex::Error>,
    },

    /// A per-parameter condition is not a valid regular expression.
    #[error("invalid condition for parameter '{param}': {source}")]
    InvalidCondition {
        /// The parameter the condition applies to.
        param: String,
        /// Underlying regex error.
        #[source]
        source: Box<regex::Error>,
    },
}

/// A named parameter extracted from a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    /// The parameter name (the `name` in `:name`).
    pub name: String,
    /// True when the parameter was declared greedy (`:name+`).
    pub greedy: bool,
}

/// A compiled route pattern.
///
/// Holds the anchored regex for the bare pattern plus the rewritten body so
/// the matcher can re-anchor it behind a base-path prefix.
///
/// # Example
///
/// ```
/// use atlas_router::CompiledPattern;
///
/// let compiled = CompiledPattern::compile("/user/:id").unwrap();
/// assert!(compiled.regex().is_match("/user/5"));
/// assert!(!compiled.regex().is_match("/user/5/extra"));
/// assert_eq!(compiled.params()[0].name, "id");
/// ```
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    body: String,
    regex: Regex,
    params: Vec<ParamSpec>,
}

impl CompiledPattern {
    /// Compiles a pattern string.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidPattern`] when the rewritten regex
    /// does not compile (for example duplicate parameter names, or an
    /// unbalanced `(` with no closing `)`).
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let (body, params) = rewrite(pattern);
        let regex = Regex::new(&format!("^{body}$")).map_err(|source| {
            PatternError::InvalidPattern {
                pattern: pattern.to_string(),
                source: Box::new(source),
            }
        })?;
        Ok(Self { body, regex, params })
    }

    /// The anchored regex for the bare pattern (no base-path prefix).
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The parameters in pattern order.
    #[must_use]
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// The rewritten, unanchored regex body.
    ///
    /// The matcher prepends an escaped base-path prefix to this and
    /// re-anchors the result.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Rewrites a pattern into a regex body and collects its parameters.
///
/// Every literal `)` becomes `)?`: all parenthesised sections are optional,
/// including close-parens the author may have meant literally. This matches
/// the long-standing behavior of the pattern dialect and is kept for
/// compatibility.
fn rewrite(pattern: &str) -> (String, Vec<ParamSpec>) {
    let chars: Vec<char> = pattern.chars().collect();
    let mut body = String::with_capacity(pattern.len() + 16);
    let mut params = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            ':' => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && is_param_char(chars[end]) {
                    end += 1;
                }
                if end == start {
                    // Stray ':' with no name stays literal.
                    body.push(':');
                    i += 1;
                    continue;
                }
                let name: String = chars[start..end].iter().collect();
                let greedy = chars.get(end) == Some(&'+');
                if greedy {
                    body.push_str(&format!("(?P<{name}>.+)"));
                } else {
                    body.push_str(&format!("(?P<{name}>[^/]+)"));
                }
                params.push(ParamSpec { name, greedy });
                i = end + usize::from(greedy);
            }
            ')' => {
                body.push_str(")?");
                i += 1;
            }
            c => {
                body.push(c);
                i += 1;
            }
        }
    }

    if body.ends_with('/') {
        body.push('?');
    }

    (body, params)
}

fn is_param_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Compiles a per-parameter condition as a full-match regex (`^cond$`).
pub(crate) fn compile_condition(param: &str, condition: &str) -> Result<Regex, PatternError> {
    Regex::new(&format!("^(?:{condition})$")).map_err(|source| PatternError::InvalidCondition {
        param: param.to_string(),
        source: Box::new(source),
    })
}
