//! Embed Wizard Runtime - application setup for wizard-driven bots.
//!
//! This crate provides:
//! - Layered configuration (`ConfigLoader`): defaults, profile files, config
//!   files, `WIZARD_*` environment variables
//! - Validation of wizard and logging settings
//! - Logging configuration (`LoggingBuilder`, `init_from_config`)
//!
//! ```ignore
//! use embed_wizard_runtime::{ConfigLoader, init_from_config};
//!
//! let config = ConfigLoader::new().load_validated()?;
//! init_from_config(&config.logging);
//!
//! let wizard = EmbedWizard::builder(host, channel, user)
//!     .config(config.wizard.clone())
//!     .prompt(name_prompt)
//!     .build()?;
//! ```

pub mod config;
pub mod logging;

// Re-exports
pub use config::{AppConfig, ConfigError, ConfigLoader, ConfigResult, Profile};
pub use logging::{LoggingBuilder, SpanEvents, init_from_config};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides the commonly used logging macros and `Level`.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
