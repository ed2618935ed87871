//! Prompt definitions.
//!
//! A [`Prompt`] describes one question of a wizard: its title, how the answer
//! is collected ([`InputKind`]), which converter turns it into a value
//! ([`ResultType`]), and how it is validated.
//!
//! ```rust,ignore
//! use embed_wizard::{Prompt, RangeCheck, ResultType};
//!
//! let age = Prompt::new("How old are you?")
//!     .key("age")
//!     .result_type(ResultType::Int)
//!     .post_check(RangeCheck::between(13, 120)?)
//!     .max_retries(3);
//!
//! let confirm = Prompt::new("Save these settings?")
//!     .result_type(ResultType::Bool)
//!     .reaction_interface();
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use embed_wizard_core::InboundEvent;

use crate::answer::Answer;
use crate::check::Check;

/// Text shown under a prompt while the wizard waits for its answer.
pub const WAITING_TEXT: &str = "Waiting....";

/// Default number of attempts per prompt.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// The kind of value a prompt produces; the key of the converter mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultType {
    Int,
    Bool,
    Text,
    Emoji,
    Reaction,
    Role,
    Member,
    Channel,
    /// A type with an application-provided converter.
    Custom(&'static str),
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("int"),
            Self::Bool => f.write_str("bool"),
            Self::Text => f.write_str("str"),
            Self::Emoji => f.write_str("Emoji"),
            Self::Reaction => f.write_str("Reaction"),
            Self::Role => f.write_str("Role"),
            Self::Member => f.write_str("Member"),
            Self::Channel => f.write_str("Channel"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// How the answer to a prompt is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputKind {
    /// A chat message, passed through the converter of the result type.
    #[default]
    Text,
    /// A yes/no reaction on the wizard message.
    BooleanReaction,
    /// Any reaction on the wizard message; the answer is its emoji.
    EmojiReaction,
    /// Any reaction on the wizard message; the answer is the reaction.
    GenericReaction,
}

impl InputKind {
    /// Returns `true` for the reaction-based kinds.
    pub fn is_reaction(self) -> bool {
        !matches!(self, Self::Text)
    }
}

/// Extra filter on the raw inbound event, on top of the same channel/user rule.
pub type InputCheck = Arc<dyn Fn(&InboundEvent) -> bool + Send + Sync>;

/// Custom stringifier for the answer shown in the wizard message.
pub type Formatter = Arc<dyn Fn(&Answer) -> String + Send + Sync>;

/// One question of a wizard.
#[derive(Clone)]
pub struct Prompt {
    pub title: String,
    pub max_retries: u32,
    /// Optional key to look the answer up by after the run.
    pub key: Option<String>,
    pub description: Option<String>,
    /// Filter applied to inbound events before they count as an answer.
    pub check: Option<InputCheck>,
    /// Validation applied to the converted value; failures are retried.
    pub post_check: Option<Arc<dyn Check>>,
    /// Overrides the wizard's default timeout.
    pub timeout: Option<Duration>,
    pub input: InputKind,
    pub result_type: ResultType,
    pub to_str: Option<Formatter>,
}

impl Prompt {
    /// Creates a text prompt with default settings.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            key: None,
            description: None,
            check: None,
            post_check: None,
            timeout: None,
            input: InputKind::Text,
            result_type: ResultType::Text,
            to_str: None,
        }
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the inbound event filter.
    pub fn check<F>(mut self, f: F) -> Self
    where
        F: Fn(&InboundEvent) -> bool + Send + Sync + 'static,
    {
        self.check = Some(Arc::new(f));
        self
    }

    /// Sets the value check run after conversion.
    pub fn post_check<C: Check + 'static>(mut self, check: C) -> Self {
        self.post_check = Some(Arc::new(check));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the result type.
    ///
    /// `Emoji` and `Reaction` switch the input to the matching reaction kind;
    /// call [`input`](Self::input) afterwards to collect them as text instead.
    pub fn result_type(mut self, result_type: ResultType) -> Self {
        self.result_type = result_type;
        match result_type {
            ResultType::Emoji => self.input = InputKind::EmojiReaction,
            ResultType::Reaction => self.input = InputKind::GenericReaction,
            _ => {}
        }
        self
    }

    /// Sets the input kind explicitly.
    pub fn input(mut self, input: InputKind) -> Self {
        self.input = input;
        self
    }

    /// Collects the answer through reactions instead of a message.
    ///
    /// Only `Bool` prompts have a reaction form besides emoji and reaction
    /// prompts; any other result type fails when the prompt is asked.
    pub fn reaction_interface(mut self) -> Self {
        self.input = match self.result_type {
            ResultType::Emoji => InputKind::EmojiReaction,
            ResultType::Reaction => InputKind::GenericReaction,
            _ => InputKind::BooleanReaction,
        };
        self
    }

    /// Sets a custom stringifier for the answer.
    pub fn to_str<F>(mut self, f: F) -> Self
    where
        F: Fn(&Answer) -> String + Send + Sync + 'static,
    {
        self.to_str = Some(Arc::new(f));
        self
    }

    /// Returns the text shown while waiting for this prompt's answer.
    pub fn get_waiting_message(&self) -> String {
        match &self.description {
            Some(description) => format!("{description}\n{WAITING_TEXT}"),
            None => WAITING_TEXT.to_string(),
        }
    }

    /// Returns the prompt timeout, or `default` when unset.
    pub fn timeout_or(&self, default: Duration) -> Duration {
        self.timeout.unwrap_or(default)
    }

    /// Returns `true` if the raw event passes the prompt's filter.
    pub(crate) fn accepts(&self, event: &InboundEvent) -> bool {
        self.check.as_ref().is_none_or(|check| check(event))
    }
}

impl fmt::Debug for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompt")
            .field("title", &self.title)
            .field("key", &self.key)
            .field("max_retries", &self.max_retries)
            .field("input", &self.input)
            .field("result_type", &self.result_type)
            .field("timeout", &self.timeout)
            .field("has_check", &self.check.is_some())
            .field("has_post_check", &self.post_check.is_some())
            .finish_non_exhaustive()
    }
}
