//! # Embed Wizard
//!
//! Multi-step question flows for chat bots.
//!
//! A wizard posts one embed, asks the user a sequence of questions and keeps
//! the embed up to date as the answers arrive. This crate provides:
//! - [`Prompt`] definitions with explicit [`InputKind`]s and [`ResultType`]s
//! - Converters from message text to [`Answer`]s ([`ConverterMapping`])
//! - Reusable value [`Check`]s and their combinator
//! - Strategy hooks for consumed input ([`InputHandler`]) and progress
//!   display ([`ProgressDisplay`])
//! - The [`EmbedWizard`] run loop with retries, timeouts and cancellation
//!
//! Platform access goes through the traits of [`embed_wizard_core`], which is
//! re-exported here.

pub mod answer;
pub mod check;
pub mod config;
pub mod converter;
pub mod error;
pub mod hooks;
pub mod prompt;
pub mod wizard;

#[cfg(test)]
mod test_support;

pub use embed_wizard_core;

pub use answer::{Answer, CustomAnswer};
pub use check::{
    AllChecks, Check, CheckContext, CurrentGuildEmojiCheck, CurrentGuildReactionCheck, FnCheck,
    LengthCheck, RangeCheck, RoleBelowMemberCheck, check_fn, combine_checks,
};
pub use config::WizardConfig;
pub use converter::{
    BoolConverter, ChannelConverter, Converter, ConverterMapping, EmojiConverter, FnConverter,
    IntConverter, MemberConverter, RoleConverter, TextConverter, convert_bool, convert_int,
    converter_fn,
};
pub use error::{ConfigError, InputError, WizardError, WizardFailure, WizardResult};
pub use hooks::{
    ClearInputReactions, DeleteInputMessage, EditInPlace, IgnoreInput, InputHandler,
    InputHandlers, ProgressDisplay, ResendMessage,
};
pub use prompt::{DEFAULT_MAX_RETRIES, InputKind, Prompt, ResultType, WAITING_TEXT};
pub use wizard::{EmbedWizard, EmbedWizardBuilder};
