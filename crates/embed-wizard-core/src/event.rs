//! Inbound events and the sources they are read from.
//!
//! The host forwards the platform's gateway events into an [`EventSource`].
//! A wizard only ever looks at two kinds of events: new messages and added
//! reactions.
//!
//! ```rust,ignore
//! use tokio::sync::broadcast;
//! use embed_wizard_core::InboundEvent;
//!
//! // One sender owned by the gateway loop, one receiver per running wizard.
//! let (tx, _) = broadcast::channel::<InboundEvent>(256);
//! let mut events = tx.subscribe();
//! wizard.run(&mut events).await?;
//! ```

use std::fmt;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tracing::warn;

use crate::emoji::Emoji;
use crate::id::{ChannelId, GuildId, MessageId, UserId};
use crate::model::User;

// ============================================================================
// Event Payloads
// ============================================================================

/// A message posted by someone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Message ID.
    pub id: MessageId,
    /// Channel the message was posted in.
    pub channel_id: ChannelId,
    /// Guild of the channel; `None` in direct messages.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    /// Message author.
    pub author: User,
    /// Raw text content.
    pub content: String,
}

/// A reaction added to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// The message that was reacted to.
    pub message_id: MessageId,
    /// Channel of that message.
    pub channel_id: ChannelId,
    /// The user who reacted.
    pub user_id: UserId,
    /// The emoji used.
    pub emoji: Emoji,
}

// ============================================================================
// Inbound Event
// ============================================================================

/// Classification of inbound events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A new message.
    Message,
    /// A reaction was added.
    ReactionAdd,
}

impl EventKind {
    /// Returns the gateway name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::ReactionAdd => "reaction_add",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event delivered by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A new message.
    Message(InboundMessage),
    /// A reaction was added to a message.
    ReactionAdd(Reaction),
}

impl InboundEvent {
    /// Returns the event classification.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Message(_) => EventKind::Message,
            Self::ReactionAdd(_) => EventKind::ReactionAdd,
        }
    }

    /// Returns the gateway name of this event.
    pub fn event_name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Returns the channel the event happened in.
    pub fn channel_id(&self) -> ChannelId {
        match self {
            Self::Message(m) => m.channel_id,
            Self::ReactionAdd(r) => r.channel_id,
        }
    }

    /// Returns the user that caused the event.
    pub fn user_id(&self) -> UserId {
        match self {
            Self::Message(m) => m.author.id,
            Self::ReactionAdd(r) => r.user_id,
        }
    }

    /// Borrows the message payload.
    pub fn as_message(&self) -> Option<&InboundMessage> {
        match self {
            Self::Message(m) => Some(m),
            Self::ReactionAdd(_) => None,
        }
    }

    /// Borrows the reaction payload.
    pub fn as_reaction(&self) -> Option<&Reaction> {
        match self {
            Self::ReactionAdd(r) => Some(r),
            Self::Message(_) => None,
        }
    }

    /// Takes the message payload.
    pub fn into_message(self) -> Option<InboundMessage> {
        match self {
            Self::Message(m) => Some(m),
            Self::ReactionAdd(_) => None,
        }
    }

    /// Takes the reaction payload.
    pub fn into_reaction(self) -> Option<Reaction> {
        match self {
            Self::ReactionAdd(r) => Some(r),
            Self::Message(_) => None,
        }
    }
}

impl From<InboundMessage> for InboundEvent {
    fn from(message: InboundMessage) -> Self {
        Self::Message(message)
    }
}

impl From<Reaction> for InboundEvent {
    fn from(reaction: Reaction) -> Self {
        Self::ReactionAdd(reaction)
    }
}

// ============================================================================
// Event Sources
// ============================================================================

/// An ordered supply of inbound events.
///
/// `next_event` resolves with the next event, or `None` once the source is
/// exhausted. It must be cancel-safe: a wizard drops the pending future
/// whenever a deadline or cancellation fires first.
#[async_trait]
pub trait EventSource: Send {
    /// Waits for the next event.
    async fn next_event(&mut self) -> Option<InboundEvent>;
}

#[async_trait]
impl EventSource for mpsc::Receiver<InboundEvent> {
    async fn next_event(&mut self) -> Option<InboundEvent> {
        self.recv().await
    }
}

#[async_trait]
impl EventSource for mpsc::UnboundedReceiver<InboundEvent> {
    async fn next_event(&mut self) -> Option<InboundEvent> {
        self.recv().await
    }
}

#[async_trait]
impl EventSource for broadcast::Receiver<InboundEvent> {
    async fn next_event(&mut self) -> Option<InboundEvent> {
        loop {
            match self.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event source lagged, skipping events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Adapts any [`Stream`] of events into an [`EventSource`].
#[derive(Debug)]
pub struct StreamSource<S> {
    stream: S,
}

impl<S> StreamSource<S> {
    /// Wraps a stream.
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Returns the wrapped stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

#[async_trait]
impl<S> EventSource for StreamSource<S>
where
    S: Stream<Item = InboundEvent> + Unpin + Send,
{
    async fn next_event(&mut self) -> Option<InboundEvent> {
        self.stream.next().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn reaction() -> InboundEvent {
        InboundEvent::ReactionAdd(Reaction {
            message_id: MessageId(1),
            channel_id: ChannelId(2),
            user_id: UserId(3),
            emoji: Emoji::unicode("\u{2705}"),
        })
    }

    #[test]
    fn test_event_accessors() {
        let event = reaction();
        assert_eq!(event.kind(), EventKind::ReactionAdd);
        assert_eq!(event.event_name(), "reaction_add");
        assert_eq!(event.channel_id(), ChannelId(2));
        assert_eq!(event.user_id(), UserId(3));
        assert!(event.as_message().is_none());
        assert!(event.into_reaction().is_some());
    }

    #[tokio::test]
    async fn test_stream_source_yields_then_ends() {
        let mut source = StreamSource::new(futures::stream::iter(vec![reaction()]));
        assert!(source.next_event().await.is_some());
        assert!(source.next_event().await.is_none());
    }

    #[tokio::test]
    async fn test_broadcast_source_ends_when_closed() {
        let (tx, mut rx) = broadcast::channel(4);
        let _ = tx.send(reaction());
        drop(tx);
        assert!(rx.next_event().await.is_some());
        assert!(rx.next_event().await.is_none());
    }

    #[tokio::test]
    async fn test_broadcast_source_skips_lagged_events() {
        let (tx, mut rx) = broadcast::channel(1);
        for message_id in 1..=3 {
            let mut event = reaction();
            if let InboundEvent::ReactionAdd(inner) = &mut event {
                inner.message_id = MessageId(message_id);
            }
            tx.send(event).unwrap();
        }

        let event = rx.next_event().await.unwrap();
        assert_eq!(
            event.as_reaction().map(|reaction| reaction.message_id),
            Some(MessageId(3))
        );
    }
}
