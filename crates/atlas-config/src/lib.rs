//! Typed configuration for Atlas.
//!
//! Configuration is layered: built-in defaults, then an optional TOML or
//! JSON file, then environment variable overrides using the
//! `PREFIX__SECTION__KEY` convention. Unknown file fields are rejected.
//!
//! # Example
//!
//! ```no_run
//! use atlas_config::{AtlasConfig, ConfigLoader};
//!
//! # fn main() -> Result<(), atlas_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_file("atlas.toml")?
//!     .with_env_prefix("ATLAS")
//!     .load()?;
//!
//! assert!(config.expose.default_depth >= 1 || config.expose.default_depth == 0);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration file format
//!
//! ```toml
//! [router]
//! base_paths = ["v1"]
//! expose_unset_options = true
//!
//! [expose]
//! default_depth = 2
//! fetch_filter = "eager"
//! projection_header = "X-Expose"
//! projection_query_param = "expose"
//! ```

#![doc(html_root_url = "https://docs.rs/atlas-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::{AtlasConfig, ExposeConfig, RouterConfig};
pub use error::ConfigError;
pub use loader::ConfigLoader;
