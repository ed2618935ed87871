//! Configuration loader using figment.
//!
//! Sources are layered, later ones overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. Profile-specific config file (`wizard.{profile}.toml` / `wizard.{profile}.yaml`)
//! 3. Main config file (`wizard.toml` / `wizard.yaml`)
//! 4. Environment variables (`WIZARD_*`)
//! 5. Programmatic overrides
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: searches `wizard.toml` and `config.toml`
//! - `yaml-config`: searches `wizard.yaml`, `wizard.yml`, `config.yaml` and `config.yml`
//!
//! # Environment Variable Mapping
//!
//! Variables use the `WIZARD_` prefix with `__` as the key separator:
//!
//! - `WIZARD_WIZARD__TITLE=Setup` sets `wizard.title`
//! - `WIZARD_WIZARD__DEFAULT_TIMEOUT_SECS=120` sets `wizard.default_timeout_secs`
//! - `WIZARD_LOGGING__LEVEL=debug` sets `logging.level`
//!
//! # Example
//!
//! ```rust,ignore
//! use embed_wizard_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .file("./config/wizard.toml")
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::AppConfig;
use super::validation::validate_config;

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "WIZARD_";

/// Directory name under the user config directory.
const APP_DIR: &str = "embed-wizard";

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Development,
    Production,
    Custom(String),
}

impl Profile {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name; unknown names become [`Profile::Custom`].
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads `WIZARD_PROFILE`, defaulting to development.
    pub fn from_env() -> Self {
        std::env::var("WIZARD_PROFILE")
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    figment: Figment,
    profile: Profile,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables loading environment variables (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges configuration programmatically, above every other source.
    pub fn merge(mut self, config: AppConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Loads the configuration without validating it.
    pub fn load(self) -> ConfigResult<AppConfig> {
        let profile = self.profile.clone();
        let figment = self.build_figment()?;

        let config: AppConfig = figment.extract()?;

        debug!(
            profile = %profile,
            title = %config.wizard.title,
            logging_level = %config.logging.level,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Loads and validates the configuration.
    pub fn load_validated(self) -> ConfigResult<AppConfig> {
        let config = self.load()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn build_figment(mut self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if let Some(path) = self.config_file.take() {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = Self::merge_config_file(figment, &path)?;
        } else {
            figment = self.load_config_files(figment);
        }

        if self.load_env {
            trace!(prefix = ENV_PREFIX, "Loading environment variables");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        let overrides = std::mem::take(&mut self.figment);
        Ok(figment.merge(overrides))
    }

    /// Merges a single config file, dispatching on its extension.
    fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            #[cfg(feature = "toml-config")]
            "toml" => Ok(figment.merge(Toml::file(path))),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
            _ => Err(ConfigError::ParseError(format!(
                "Unsupported or disabled configuration file format: .{ext}"
            ))),
        }
    }

    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join(APP_DIR));
        }
        paths
    }

    /// Searches `search_paths × base_names` for one format.
    ///
    /// The profile-specific variant of a base name is merged before the base
    /// file itself. Stops at the first base file found.
    #[cfg(any(feature = "toml-config", feature = "yaml-config"))]
    fn load_format_files<F>(
        &self,
        mut figment: Figment,
        search_paths: &[PathBuf],
        base_names: &[&str],
        merge_fn: F,
    ) -> (Figment, bool)
    where
        F: Fn(Figment, &Path) -> Figment,
    {
        for search_path in search_paths {
            for base_name in base_names {
                let Some((stem, ext)) = base_name.rsplit_once('.') else {
                    continue;
                };

                let profile_path =
                    search_path.join(format!("{stem}.{}.{ext}", self.profile.as_str()));
                if profile_path.exists() {
                    debug!(path = %profile_path.display(), "Loading profile-specific config");
                    figment = merge_fn(figment, &profile_path);
                }

                let base_path = search_path.join(base_name);
                if base_path.exists() {
                    info!(path = %base_path.display(), "Loading configuration file");
                    return (merge_fn(figment, &base_path), true);
                }
            }
        }
        (figment, false)
    }

    fn load_config_files(&self, mut figment: Figment) -> Figment {
        let search_paths = self.resolve_search_paths();
        let mut found = false;

        #[cfg(feature = "toml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                &["wizard.toml", "config.toml"],
                |fig, path| fig.merge(Toml::file(path)),
            );
            figment = f;
            found |= ok;
        }

        #[cfg(feature = "yaml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                &["wizard.yaml", "wizard.yml", "config.yaml", "config.yml"],
                |fig, path| fig.merge(Yaml::file(path)),
            );
            figment = f;
            found |= ok;
        }

        if !found {
            warn!("No configuration file found, using defaults");
        }
        figment
    }
}

/// Loads and validates the configuration from the default locations.
pub fn load_config() -> ConfigResult<AppConfig> {
    ConfigLoader::new().load_validated()
}

/// Loads and validates the configuration from one file.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<AppConfig> {
    ConfigLoader::new().file(path).load_validated()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;
    use figment::Jail;

    #[test]
    fn test_defaults_without_sources() {
        Jail::expect_with(|jail| {
            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(config.wizard.title, "Wizard");
            assert_eq!(config.logging.level, LogLevel::Info);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = ConfigLoader::new()
            .without_env()
            .file("/nonexistent/wizard.toml")
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_file_then_env_then_merge() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "wizard.toml",
                r#"
                [wizard]
                title = "Server setup"
                cancel_text = "stop"

                [logging]
                level = "debug"
                "#,
            )?;
            jail.set_env("WIZARD_WIZARD__DEFAULT_TIMEOUT_SECS", "120");
            jail.set_env("WIZARD_WIZARD__CANCEL_TEXT", "quit");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .load_validated()
                .map_err(|e| e.to_string())?;
            assert_eq!(config.wizard.title, "Server setup");
            assert_eq!(config.wizard.cancel_text, "quit");
            assert_eq!(config.wizard.default_timeout_secs, 120);
            assert_eq!(config.logging.level, LogLevel::Debug);
            // Untouched keys keep their defaults.
            assert_eq!(config.wizard.yes_emoji, "\u{2705}");

            let mut overrides = config.clone();
            overrides.wizard.title = "Override".into();
            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .merge(overrides)
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(config.wizard.title, "Override");
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_profile_file_is_layered_under_base() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "wizard.production.toml",
                "[wizard]\ntitle = \"Prod\"\ndefault_timeout_secs = 30\n",
            )?;
            jail.create_file("wizard.toml", "[wizard]\ntitle = \"Base\"\n")?;
            jail.set_env("WIZARD_PROFILE", "prod");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(config.wizard.title, "Base");
            assert_eq!(config.wizard.default_timeout_secs, 30);
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_invalid_values_fail_validation() {
        Jail::expect_with(|jail| {
            jail.create_file("wizard.toml", "[wizard]\ndefault_timeout_secs = 0\n")?;
            let err = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load_validated()
                .unwrap_err();
            assert!(matches!(err, ConfigError::ValidationError { .. }));
            Ok(())
        });
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!(Profile::parse("PROD"), Profile::Production);
        assert_eq!(Profile::parse("dev"), Profile::Development);
        assert_eq!(Profile::parse("staging"), Profile::Custom("staging".into()));
    }
}
