//! The chat host trait and related types.
//!
//! A [`ChatHost`] is the platform as seen by a wizard: it can post and edit
//! messages, react to them, and look up guild objects. Adapters implement it
//! on top of their own API client.

use std::sync::Arc;

use async_trait::async_trait;

use crate::embed::Embed;
use crate::emoji::{CustomEmoji, Emoji};
use crate::error::{ApiError, ApiResult};
use crate::event::InboundMessage;
use crate::id::{ChannelId, GuildId, MessageId, UserId};
use crate::model::{Channel, Role, User};

/// Content of an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingMessage {
    /// Plain text.
    Text(String),
    /// A rich embed.
    Embed(Embed),
}

impl OutgoingMessage {
    /// Creates a plain text message.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }
}

impl From<Embed> for OutgoingMessage {
    fn from(embed: Embed) -> Self {
        Self::Embed(embed)
    }
}

impl From<String> for OutgoingMessage {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for OutgoingMessage {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Address of a posted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    /// Channel the message lives in.
    pub channel_id: ChannelId,
    /// Message ID.
    pub message_id: MessageId,
}

impl MessageRef {
    /// Creates a message reference.
    pub fn new(channel_id: ChannelId, message_id: MessageId) -> Self {
        Self {
            channel_id,
            message_id,
        }
    }
}

/// The chat platform as seen by a wizard.
///
/// Sending and editing are required; guild lookups have default
/// implementations returning [`ApiError::Unsupported`] so that hosts only
/// implement what their converters need.
///
/// # Example Implementation
///
/// ```rust,ignore
/// #[async_trait]
/// impl ChatHost for MyHost {
///     async fn send_message(&self, channel: ChannelId, content: OutgoingMessage) -> ApiResult<MessageRef> {
///         let id = self.client.post(channel, &content).await?;
///         Ok(MessageRef::new(channel, id))
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait ChatHost: Send + Sync {
    /// Posts a new message.
    async fn send_message(
        &self,
        channel: ChannelId,
        content: OutgoingMessage,
    ) -> ApiResult<MessageRef>;

    /// Replaces the content of a posted message.
    async fn edit_message(&self, message: MessageRef, content: OutgoingMessage) -> ApiResult<()>;

    /// Deletes a message.
    async fn delete_message(&self, message: MessageRef) -> ApiResult<()>;

    /// Adds a reaction to a message as the bot.
    async fn add_reaction(&self, message: MessageRef, emoji: &Emoji) -> ApiResult<()>;

    /// Removes every reaction from a message.
    async fn clear_reactions(&self, message: MessageRef) -> ApiResult<()>;

    /// Lists the roles of a guild.
    async fn guild_roles(&self, _guild: GuildId) -> ApiResult<Vec<Role>> {
        Err(ApiError::Unsupported("guild_roles"))
    }

    /// Looks up a guild member.
    async fn fetch_member(&self, _guild: GuildId, _user: UserId) -> ApiResult<Option<User>> {
        Err(ApiError::Unsupported("fetch_member"))
    }

    /// Looks up a channel.
    async fn fetch_channel(&self, _channel: ChannelId) -> ApiResult<Option<Channel>> {
        Err(ApiError::Unsupported("fetch_channel"))
    }

    /// Lists the custom emoji of a guild.
    async fn guild_emojis(&self, _guild: GuildId) -> ApiResult<Vec<CustomEmoji>> {
        Err(ApiError::Unsupported("guild_emojis"))
    }
}

/// A shared chat host trait object.
pub type BoxedHost = Arc<dyn ChatHost>;

/// The invocation context derived from an inbound message.
///
/// Converters receive this instead of the bare text so they can resolve
/// mentions and names against the guild the message was posted in.
#[derive(Clone, Copy)]
pub struct InvocationContext<'a> {
    host: &'a dyn ChatHost,
    message: &'a InboundMessage,
}

impl<'a> InvocationContext<'a> {
    /// Derives the context of a message.
    pub fn from_message(host: &'a dyn ChatHost, message: &'a InboundMessage) -> Self {
        Self { host, message }
    }

    /// Returns the host.
    pub fn host(&self) -> &'a dyn ChatHost {
        self.host
    }

    /// Returns the message being converted.
    pub fn message(&self) -> &'a InboundMessage {
        self.message
    }

    /// Returns the message author.
    pub fn author(&self) -> &'a User {
        &self.message.author
    }

    /// Returns the channel the message was posted in.
    pub fn channel_id(&self) -> ChannelId {
        self.message.channel_id
    }

    /// Returns the guild of the invocation, if any.
    ///
    /// Falls back to the author's membership when the message carries no guild.
    pub fn guild_id(&self) -> Option<GuildId> {
        self.message
            .guild_id
            .or_else(|| self.message.author.guild().map(|g| g.id))
    }
}

impl std::fmt::Debug for InvocationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationContext")
            .field("message_id", &self.message.id)
            .field("channel_id", &self.message.channel_id)
            .field("author", &self.message.author.id)
            .finish_non_exhaustive()
    }
}
