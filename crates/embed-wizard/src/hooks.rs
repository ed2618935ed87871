//! Pluggable wizard behavior.
//!
//! Two strategy traits let an application change what a wizard does around
//! each answer without touching the run loop:
//!
//! - [`InputHandler`] reacts to the user's input once it was consumed, for
//!   example by deleting the answer message to keep the channel tidy.
//! - [`ProgressDisplay`] decides how the updated embed reaches the channel:
//!   edited in place or posted again.
//!
//! ```rust,ignore
//! let wizard = EmbedWizard::builder(host, channel, user)
//!     .prompts(prompts)
//!     .input_handler(InputHandlers::new().with(DeleteInputMessage).with(ClearInputReactions))
//!     .progress_display(ResendMessage)
//!     .build()?;
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use embed_wizard_core::{
    ApiResult, ChatHost, Embed, InboundMessage, MessageRef, OutgoingMessage, Reaction,
};

use crate::error::InputError;

// ============================================================================
// Input Handlers
// ============================================================================

/// Called after the wizard consumed a piece of user input.
///
/// Each hook runs exactly once per consumed input. Errors are logged by the
/// wizard and do not end the run.
#[async_trait]
pub trait InputHandler: Send + Sync {
    /// A message was read as an answer. `error` is set when it was rejected.
    async fn on_message_input(
        &self,
        _host: &dyn ChatHost,
        _message: &InboundMessage,
        _error: Option<&InputError>,
    ) -> ApiResult<()> {
        Ok(())
    }

    /// A reaction on the wizard message was read as an answer.
    async fn on_reaction_input(
        &self,
        _host: &dyn ChatHost,
        _displayed: MessageRef,
        _reaction: &Reaction,
    ) -> ApiResult<()> {
        Ok(())
    }
}

/// Leaves input untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreInput;

#[async_trait]
impl InputHandler for IgnoreInput {}

/// Deletes every answer message, accepted or not.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteInputMessage;

#[async_trait]
impl InputHandler for DeleteInputMessage {
    async fn on_message_input(
        &self,
        host: &dyn ChatHost,
        message: &InboundMessage,
        _error: Option<&InputError>,
    ) -> ApiResult<()> {
        host.delete_message(MessageRef::new(message.channel_id, message.id))
            .await
    }
}

/// Clears the reactions of the wizard message after a reaction answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearInputReactions;

#[async_trait]
impl InputHandler for ClearInputReactions {
    async fn on_reaction_input(
        &self,
        host: &dyn ChatHost,
        displayed: MessageRef,
        _reaction: &Reaction,
    ) -> ApiResult<()> {
        host.clear_reactions(displayed).await
    }
}

/// Runs several handlers in order, stopping at the first error.
#[derive(Clone, Default)]
pub struct InputHandlers {
    handlers: Vec<Arc<dyn InputHandler>>,
}

impl InputHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler (builder pattern).
    pub fn with<H: InputHandler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for InputHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputHandlers")
            .field("len", &self.handlers.len())
            .finish()
    }
}

#[async_trait]
impl InputHandler for InputHandlers {
    async fn on_message_input(
        &self,
        host: &dyn ChatHost,
        message: &InboundMessage,
        error: Option<&InputError>,
    ) -> ApiResult<()> {
        for handler in &self.handlers {
            handler.on_message_input(host, message, error).await?;
        }
        Ok(())
    }

    async fn on_reaction_input(
        &self,
        host: &dyn ChatHost,
        displayed: MessageRef,
        reaction: &Reaction,
    ) -> ApiResult<()> {
        for handler in &self.handlers {
            handler.on_reaction_input(host, displayed, reaction).await?;
        }
        Ok(())
    }
}

// ============================================================================
// Progress Display
// ============================================================================

/// Publishes the updated wizard embed.
#[async_trait]
pub trait ProgressDisplay: Send + Sync {
    /// Shows `embed` and returns the message that now displays the wizard.
    async fn publish(
        &self,
        host: &dyn ChatHost,
        current: MessageRef,
        embed: &Embed,
    ) -> ApiResult<MessageRef>;
}

/// Edits the wizard message in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditInPlace;

#[async_trait]
impl ProgressDisplay for EditInPlace {
    async fn publish(
        &self,
        host: &dyn ChatHost,
        current: MessageRef,
        embed: &Embed,
    ) -> ApiResult<MessageRef> {
        host.edit_message(current, OutgoingMessage::Embed(embed.clone()))
            .await?;
        Ok(current)
    }
}

/// Posts the embed as a new message every step.
///
/// The old message stays in the channel; reactions are read from the new one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResendMessage;

#[async_trait]
impl ProgressDisplay for ResendMessage {
    async fn publish(
        &self,
        host: &dyn ChatHost,
        current: MessageRef,
        embed: &Embed,
    ) -> ApiResult<MessageRef> {
        host.send_message(current.channel_id, OutgoingMessage::Embed(embed.clone()))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_support::{CHANNEL, HostCall, MockHost, message};
    use embed_wizard_core::{Emoji, MessageId, UserId};

    fn reaction() -> Reaction {
        Reaction {
            message_id: MessageId(900),
            channel_id: CHANNEL,
            user_id: UserId(100),
            emoji: Emoji::unicode("\u{2705}"),
        }
    }

    #[tokio::test]
    async fn test_ignore_input_does_nothing() {
        let host = MockHost::new();
        let displayed = MessageRef::new(CHANNEL, MessageId(900));
        IgnoreInput
            .on_message_input(&host, &message(5, "hi"), None)
            .await
            .unwrap();
        IgnoreInput
            .on_reaction_input(&host, displayed, &reaction())
            .await
            .unwrap();
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn test_composed_handlers_run_in_order() {
        let host = MockHost::new();
        let handlers = InputHandlers::new()
            .with(DeleteInputMessage)
            .with(ClearInputReactions);
        assert_eq!(handlers.len(), 2);

        let err = InputError::check("nope");
        handlers
            .on_message_input(&host, &message(5, "hi"), Some(&err))
            .await
            .unwrap();
        let displayed = MessageRef::new(CHANNEL, MessageId(900));
        handlers
            .on_reaction_input(&host, displayed, &reaction())
            .await
            .unwrap();

        assert_eq!(
            host.calls(),
            vec![
                HostCall::Delete(MessageRef::new(CHANNEL, MessageId(5))),
                HostCall::ClearReactions(displayed),
            ]
        );
    }

    #[tokio::test]
    async fn test_resend_returns_new_message() {
        let host = MockHost::new();
        let current = MessageRef::new(CHANNEL, MessageId(900));
        let embed = Embed::new("Wizard");

        let same = EditInPlace.publish(&host, current, &embed).await.unwrap();
        assert_eq!(same, current);

        let fresh = ResendMessage.publish(&host, current, &embed).await.unwrap();
        assert_ne!(fresh, current);
        assert_eq!(fresh.channel_id, CHANNEL);
        assert_eq!(host.sent_embeds().len(), 1);
    }
}
