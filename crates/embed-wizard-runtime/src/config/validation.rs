//! Configuration validation utilities.

use embed_wizard::WizardConfig;

use super::error::{ConfigError, ConfigResult};
use super::schema::{AppConfig, LogOutput, LoggingConfig};

/// Largest value of a `0xRRGGBB` color.
const MAX_COLOR: u32 = 0xFF_FF_FF;

/// Validates the entire configuration.
pub fn validate_config(config: &AppConfig) -> ConfigResult<()> {
    validate_wizard_config(&config.wizard)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates wizard settings.
pub fn validate_wizard_config(wizard: &WizardConfig) -> ConfigResult<()> {
    if wizard.title.trim().is_empty() {
        return Err(ConfigError::validation("Wizard title cannot be empty"));
    }

    wizard
        .validate()
        .map_err(|e| ConfigError::validation(e.to_string()))?;

    for (name, color) in [
        ("waiting_color", wizard.waiting_color),
        ("success_color", wizard.success_color),
    ] {
        if color > MAX_COLOR {
            return Err(ConfigError::validation(format!(
                "Invalid {name}: {color:#X} is not a 0xRRGGBB value"
            )));
        }
    }

    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "File output requires logging.file_path",
        ));
    }

    for module in logging.filters.keys() {
        if module.is_empty() || module.contains(char::is_whitespace) {
            return Err(ConfigError::validation(format!(
                "Invalid log filter target: '{module}'"
            )));
        }
    }

    Ok(())
}
