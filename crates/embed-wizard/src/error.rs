//! Error types for embed wizards.
//!
//! The taxonomy follows how far an error travels:
//!
//! - [`InputError`] is recovered inside the wizard: it is shown to the user
//!   and costs one retry.
//! - [`ConfigError`] means the wizard was set up wrong and is raised before
//!   (or instead of) talking to anyone.
//! - [`WizardFailure`] is the terminal outcome of a run that could not finish.
//!
//! [`WizardError`] wraps all of them for the `?` operator.

use embed_wizard_core::ApiError;
use thiserror::Error;

use crate::prompt::ResultType;

// =============================================================================
// User Input Errors
// =============================================================================

/// A user's answer could not be accepted.
///
/// The `Display` output is sent to the channel verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The text could not be converted.
    #[error("{0}")]
    BadArgument(String),

    /// The text is not a recognised boolean.
    #[error("'{0}' is not a recognised boolean option")]
    BadBool(String),

    /// The referenced object does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A check rejected the value.
    #[error("{0}")]
    Check(String),
}

impl InputError {
    /// Creates a check failure.
    pub fn check(msg: impl Into<String>) -> Self {
        Self::Check(msg.into())
    }

    /// Creates a conversion failure.
    pub fn bad_argument(msg: impl Into<String>) -> Self {
        Self::BadArgument(msg.into())
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// The wizard or one of its parts was set up incorrectly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A wizard needs at least one prompt.
    #[error("wizard has no prompts")]
    NoPrompts,

    /// A prompt is malformed.
    #[error("invalid prompt '{title}': {reason}")]
    InvalidPrompt {
        /// Prompt title.
        title: String,
        /// What is wrong with it.
        reason: String,
    },

    /// No converter is registered for a result type.
    #[error("couldn't find valid converter for {0}")]
    NoConverter(ResultType),

    /// A range or length check has unusable bounds.
    #[error("invalid check bounds: {0}")]
    InvalidBounds(String),

    /// The wizard settings are unusable.
    #[error("invalid wizard config: {0}")]
    InvalidConfig(String),

    /// `start` was called on a running wizard.
    #[error("wizard already started")]
    AlreadyStarted,

    /// The wizard message was accessed before `start`.
    #[error("wizard hasn't started")]
    NotStarted,
}

// =============================================================================
// Terminal Failures
// =============================================================================

/// Why a wizard run ended without a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WizardFailure {
    /// A prompt exhausted its retries.
    #[error("Maximum retries reached")]
    MaxRetries,

    /// The user typed the cancel keyword or the run was cancelled externally.
    #[error("Cancelled by user")]
    Cancelled,

    /// No qualifying input arrived before the prompt timeout.
    #[error("The wizard has failed due to no response for a long time.")]
    TimedOut,
}

// =============================================================================
// Wizard Error
// =============================================================================

/// Any error a wizard operation can produce.
#[derive(Debug, Clone, Error)]
pub enum WizardError {
    /// Rejected user input; retried by the wizard.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The prompt asks for an input mode that cannot produce its result type.
    #[error("{0}")]
    NotImplemented(String),

    /// Setup error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Terminal failure of the run.
    #[error(transparent)]
    Failure(#[from] WizardFailure),

    /// A host call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The event source ended while the wizard was waiting.
    #[error("event source closed")]
    EventsClosed,
}

impl WizardError {
    /// Returns the terminal failure, if this is one.
    pub fn failure(&self) -> Option<WizardFailure> {
        match self {
            Self::Failure(failure) => Some(*failure),
            _ => None,
        }
    }

    /// Returns `true` for terminal failures.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns `true` for rejected user input.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

/// Result type for wizard operations.
pub type WizardResult<T> = Result<T, WizardError>;
