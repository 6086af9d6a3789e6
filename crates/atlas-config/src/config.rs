//! Typed configuration structs.

use serde::{Deserialize, Serialize};

use atlas_core::FetchKind;

use crate::error::ConfigError;

/// Traversal depths beyond this are almost certainly misconfiguration.
const MAX_DEPTH: usize = 32;

/// Top-level Atlas configuration.
///
/// ```toml
/// [router]
/// base_paths = ["v1", "v2"]
/// expose_unset_options = true
///
/// [expose]
/// default_depth = 2
/// fetch_filter = "eager"
/// projection_header = "X-Expose"
/// projection_query_param = "expose"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields, default)]
pub struct AtlasConfig {
    /// Route registry settings.
    pub router: RouterConfig,
    /// Field-exposure settings.
    pub expose: ExposeConfig,
}

impl AtlasConfig {
    /// Validates cross-field constraints after loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] when a value is out of
    /// range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.expose.default_depth > MAX_DEPTH {
            return Err(ConfigError::validation_error(format!(
                "expose.default_depth must be at most {MAX_DEPTH}"
            )));
        }
        for base in &self.router.base_paths {
            if base.trim_matches('/').is_empty() {
                return Err(ConfigError::validation_error(
                    "router.base_paths entries must not be empty",
                ));
            }
        }
        Ok(())
    }
}

/// Route registry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RouterConfig {
    /// Base-path prefixes tried during matching; empty means routes match
    /// against the bare path.
    pub base_paths: Vec<String>,
    /// Whether routes without an explicit OPTIONS-exposure choice are
    /// advertised in OPTIONS responses.
    pub expose_unset_options: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base_paths: Vec::new(),
            expose_unset_options: true,
        }
    }
}

/// Field-exposure settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ExposeConfig {
    /// Default traversal depth for computed exposure trees.
    pub default_depth: usize,
    /// Restricts default traversal to relations of one fetch kind.
    pub fetch_filter: Option<FetchKind>,
    /// Header carrying a client projection string, if enabled.
    pub projection_header: Option<String>,
    /// Query parameter carrying a client projection string, if enabled.
    pub projection_query_param: Option<String>,
}

impl Default for ExposeConfig {
    fn default() -> Self {
        Self {
            default_depth: 2,
            fetch_filter: None,
            projection_header: Some("X-Expose".to_string()),
            projection_query_param: Some("expose".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AtlasConfig::default();
        assert!(config.router.base_paths.is_empty());
        assert!(config.router.expose_unset_options);
        assert_eq!(config.expose.default_depth, 2);
        assert_eq!(config.expose.fetch_filter, None);
        assert_eq!(config.expose.projection_header.as_deref(), Some("X-Expose"));
        assert_eq!(
            config.expose.projection_query_param.as_deref(),
            Some("expose")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_src = r#"
            [router]
            base_paths = ["v1", "v2"]

            [expose]
            default_depth = 3
            fetch_filter = "eager"
        "#;
        let config: AtlasConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(config.router.base_paths, vec!["v1", "v2"]);
        assert_eq!(config.expose.default_depth, 3);
        assert_eq!(config.expose.fetch_filter, Some(FetchKind::Eager));
        // Unspecified fields keep their defaults.
        assert!(config.router.expose_unset_options);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let toml_src = r#"
            [router]
            base_path = "v1"
        "#;
        assert!(toml::from_str::<AtlasConfig>(toml_src).is_err());
    }

    #[test]
    fn test_validate_depth_cap() {
        let config = AtlasConfig {
            expose: ExposeConfig {
                default_depth: 100,
                ..ExposeConfig::default()
            },
            ..AtlasConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_base_path() {
        let config = AtlasConfig {
            router: RouterConfig {
                base_paths: vec!["//".to_string()],
                ..RouterConfig::default()
            },
            ..AtlasConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
