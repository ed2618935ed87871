//! Wizard settings.

use std::time::Duration;

use embed_wizard_core::{Color, Emoji};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Presentation and timing settings of a wizard.
///
/// Every field has a default, so a partial TOML/YAML table deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Title of the wizard embed.
    #[serde(default = "default_title")]
    pub title: String,

    /// Message (compared lowercased) that cancels the run.
    #[serde(default = "default_cancel_text")]
    pub cancel_text: String,

    /// Timeout for prompts without their own, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,

    /// Reaction meaning "yes" for boolean reaction prompts.
    #[serde(default = "default_yes_emoji")]
    pub yes_emoji: String,

    /// Reaction meaning "no" for boolean reaction prompts.
    #[serde(default = "default_no_emoji")]
    pub no_emoji: String,

    /// Embed color while the wizard runs (`0xRRGGBB`).
    #[serde(default = "default_waiting_color")]
    pub waiting_color: u32,

    /// Embed color once all prompts are answered.
    #[serde(default = "default_success_color")]
    pub success_color: u32,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            cancel_text: default_cancel_text(),
            default_timeout_secs: default_timeout_secs(),
            yes_emoji: default_yes_emoji(),
            no_emoji: default_no_emoji(),
            waiting_color: default_waiting_color(),
            success_color: default_success_color(),
        }
    }
}

fn default_title() -> String {
    "Wizard".to_string()
}

fn default_cancel_text() -> String {
    "cancel".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_yes_emoji() -> String {
    "\u{2705}".to_string()
}

fn default_no_emoji() -> String {
    "\u{274c}".to_string()
}

fn default_waiting_color() -> u32 {
    Color::DARK_ORANGE.value()
}

fn default_success_color() -> u32 {
    Color::GREEN.value()
}

impl WizardConfig {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn cancel_text(mut self, cancel_text: impl Into<String>) -> Self {
        self.cancel_text = cancel_text.into();
        self
    }

    /// Sets the default prompt timeout, rounded up to whole seconds.
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout_secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self
    }

    pub fn emojis(mut self, yes: impl Into<String>, no: impl Into<String>) -> Self {
        self.yes_emoji = yes.into();
        self.no_emoji = no.into();
        self
    }

    pub fn colors(mut self, waiting: impl Into<Color>, success: impl Into<Color>) -> Self {
        self.waiting_color = waiting.into().value();
        self.success_color = success.into().value();
        self
    }

    /// Returns the prompt timeout used when a prompt sets none.
    pub fn default_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }

    pub fn yes(&self) -> Emoji {
        Emoji::unicode(&self.yes_emoji)
    }

    pub fn no(&self) -> Emoji {
        Emoji::unicode(&self.no_emoji)
    }

    pub fn waiting(&self) -> Color {
        Color(self.waiting_color)
    }

    pub fn success(&self) -> Color {
        Color(self.success_color)
    }

    /// Rejects settings a wizard cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::InvalidConfig(reason));

        if self.cancel_text.is_empty() {
            return invalid("Cancel text cannot be empty".into());
        }
        // Input is lowercased before the comparison.
        if self.cancel_text != self.cancel_text.to_lowercase() {
            return invalid(format!("Cancel text must be lowercase: {}", self.cancel_text));
        }
        if self.default_timeout_secs == 0 {
            return invalid("Default timeout must be greater than 0".into());
        }
        if self.yes_emoji.is_empty() || self.no_emoji.is_empty() {
            return invalid("Yes/no emojis cannot be empty".into());
        }
        if self.yes_emoji == self.no_emoji {
            return invalid("Yes and no emojis must be different".into());
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WizardConfig::default();
        assert_eq!(config.title, "Wizard");
        assert_eq!(config.cancel_text, "cancel");
        assert_eq!(config.default_timeout_duration(), Duration::from_secs(60));
        assert_eq!(config.yes(), Emoji::unicode("\u{2705}"));
        assert_eq!(config.no(), Emoji::unicode("\u{274c}"));
        assert_eq!(config.waiting(), Color(0xC27C0E));
        assert_eq!(config.success(), Color(0x2ECC71));
    }

    #[test]
    fn test_builder_overrides() {
        let config = WizardConfig::default()
            .title("Setup")
            .cancel_text("stop")
            .default_timeout(Duration::from_secs(5))
            .colors(Color::RED, 0x00FF00_u32);
        assert_eq!(config.title, "Setup");
        assert_eq!(config.cancel_text, "stop");
        assert_eq!(config.default_timeout_secs, 5);
        assert_eq!(config.waiting(), Color::RED);
        assert_eq!(config.success(), Color(0x00FF00));
    }

    #[test]
    fn test_default_timeout_rounds_up() {
        let secs = |ms| {
            WizardConfig::default()
                .default_timeout(Duration::from_millis(ms))
                .default_timeout_secs
        };
        assert_eq!(secs(500), 1);
        assert_eq!(secs(1500), 2);
        assert_eq!(secs(2000), 2);
    }

    #[test]
    fn test_validate() {
        assert_eq!(WizardConfig::default().validate(), Ok(()));

        let reason = |config: WizardConfig| match config.validate() {
            Err(ConfigError::InvalidConfig(reason)) => reason,
            other => panic!("expected invalid config, got {other:?}"),
        };
        assert!(reason(WizardConfig::default().cancel_text("")).contains("empty"));
        assert!(reason(WizardConfig::default().cancel_text("Stop")).contains("lowercase"));
        assert!(reason(WizardConfig::default().emojis("x", "x")).contains("different"));
        assert!(reason(WizardConfig::default().emojis("", "x")).contains("empty"));

        let mut zero = WizardConfig::default();
        zero.default_timeout_secs = 0;
        assert!(reason(zero).contains("timeout"));
    }
}
