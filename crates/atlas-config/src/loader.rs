//! Configuration loader with layered approach.
//!
//! Layers apply in order, later layers overriding earlier ones:
//! 1. Default values (built into the code)
//! 2. Configuration file (TOML or JSON, by extension)
//! 3. Environment variables (`PREFIX__SECTION__KEY`)

use std::env;
use std::fs;
use std::path::Path;

use atlas_core::FetchKind;

use crate::config::AtlasConfig;
use crate::error::ConfigError;

/// Layered configuration loader.
///
/// # Example
///
/// ```no_run
/// use atlas_config::ConfigLoader;
///
/// # fn main() -> Result<(), atlas_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_file("atlas.toml")?
///     .with_env_prefix("ATLAS")
///     .load()?;
///
/// println!("default depth: {}", config.expose.default_depth);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: AtlasConfig,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Create a new configuration loader with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from default configuration values.
    ///
    /// Called implicitly by `new()`; chainable for clarity.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = AtlasConfig::default();
        self
    }

    /// Load configuration from a TOML or JSON file (by extension).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, unreadable,
    /// malformed, or carries unknown fields.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let contents =
            fs::read_to_string(path).map_err(|source| ConfigError::read_error(path, source))?;

        self.config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&contents)?,
            Some("json") => serde_json::from_str(&contents)?,
            _ => return Err(ConfigError::UnsupportedFormat { path: path.into() }),
        };
        Ok(self)
    }

    /// Apply environment variable overrides with the given prefix at load
    /// time, using the `PREFIX__SECTION__KEY` convention.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Finalize the configuration: apply env overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on unparseable overrides or failed
    /// validation.
    pub fn load(mut self) -> Result<AtlasConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }
        self.config.validate()?;
        Ok(self.config)
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let vars: Vec<(String, String)> = env::vars()
            .filter(|(key, _)| key.starts_with(prefix))
            .collect();
        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let stripped = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = stripped.split("__").collect();
        match parts.as_slice() {
            ["ROUTER", "BASE_PATHS"] => {
                self.config.router.base_paths = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToOwned::to_owned)
                    .collect();
            }
            ["ROUTER", "EXPOSE_UNSET_OPTIONS"] => {
                self.config.router.expose_unset_options = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["EXPOSE", "DEFAULT_DEPTH"] => {
                self.config.expose.default_depth = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }
            ["EXPOSE", "FETCH_FILTER"] => {
                self.config.expose.fetch_filter = match value.to_ascii_lowercase().as_str() {
                    "none" | "" => None,
                    "eager" => Some(FetchKind::Eager),
                    "lazy" => Some(FetchKind::Lazy),
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'eager', 'lazy', or 'none'",
                        ))
                    }
                };
            }
            ["EXPOSE", "PROJECTION_HEADER"] => {
                self.config.expose.projection_header = optional_string(value);
            }
            ["EXPOSE", "PROJECTION_QUERY_PARAM"] => {
                self.config.expose.projection_query_param = optional_string(value);
            }
            // Unknown keys under the prefix are ignored so unrelated
            // variables sharing it do not break startup.
            _ => {}
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn optional_string(value: &str) -> Option<String> {
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(value.to_string())
    }
}
