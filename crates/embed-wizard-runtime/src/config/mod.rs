//! Configuration for wizard applications.
//!
//! Loads an [`AppConfig`] (wizard settings plus logging) from TOML/YAML
//! files and `WIZARD_*` environment variables, and validates it.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, ENV_PREFIX, Profile, load_config, load_config_from_file};
pub use schema::{
    AppConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, SpanEventConfig,
};
pub use validation::{validate_config, validate_wizard_config};
