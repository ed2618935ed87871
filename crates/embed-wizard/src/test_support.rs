//! In-memory host and fixtures shared by the unit tests.

use async_trait::async_trait;
use embed_wizard_core::{
    ApiError, ApiResult, Channel, ChannelId, ChatHost, CustomEmoji, Embed, Emoji, Guild, GuildId,
    InboundEvent, InboundMessage, Member, MessageId, MessageRef, OutgoingMessage, Reaction, Role,
    RoleId, User, UserId,
};
use parking_lot::Mutex;

/// The channel every fixture lives in.
pub const CHANNEL: ChannelId = ChannelId(1);

/// The user the test wizards talk to.
pub const INVOKER: UserId = UserId(100);

/// A recorded host call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Send {
        message: MessageRef,
        content: OutgoingMessage,
    },
    Edit {
        message: MessageRef,
        content: OutgoingMessage,
    },
    Delete(MessageRef),
    AddReaction(MessageRef, Emoji),
    ClearReactions(MessageRef),
}

#[derive(Default)]
struct MockState {
    calls: Vec<HostCall>,
    next_id: u64,
}

/// A [`ChatHost`] that records every call and serves canned lookups.
#[derive(Default)]
pub struct MockHost {
    state: Mutex<MockState>,
    roles: Vec<Role>,
    members: Vec<User>,
    channels: Vec<Channel>,
    emojis: Vec<CustomEmoji>,
    failing_deletes: bool,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                calls: Vec::new(),
                next_id: 1000,
            }),
            ..Default::default()
        }
    }

    pub fn with_roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_members(mut self, members: Vec<User>) -> Self {
        self.members = members;
        self
    }

    pub fn with_channels(mut self, channels: Vec<Channel>) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_emojis(mut self, emojis: Vec<CustomEmoji>) -> Self {
        self.emojis = emojis;
        self
    }

    /// Makes `delete_message` fail with [`ApiError::Forbidden`].
    pub fn with_failing_deletes(mut self) -> Self {
        self.failing_deletes = true;
        self
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().calls.clone()
    }

    /// Plain text messages sent, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Send {
                    content: OutgoingMessage::Text(text),
                    ..
                } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Embeds posted as new messages, in order.
    pub fn sent_embeds(&self) -> Vec<Embed> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Send {
                    content: OutgoingMessage::Embed(embed),
                    ..
                } => Some(embed),
                _ => None,
            })
            .collect()
    }

    /// The embed last sent or edited.
    pub fn last_embed(&self) -> Option<Embed> {
        self.calls().into_iter().rev().find_map(|call| match call {
            HostCall::Send {
                content: OutgoingMessage::Embed(embed),
                ..
            }
            | HostCall::Edit {
                content: OutgoingMessage::Embed(embed),
                ..
            } => Some(embed),
            _ => None,
        })
    }

    pub fn edit_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, HostCall::Edit { .. }))
            .count()
    }

    fn record(&self, call: HostCall) {
        self.state.lock().calls.push(call);
    }
}

#[async_trait]
impl ChatHost for MockHost {
    async fn send_message(
        &self,
        channel: ChannelId,
        content: OutgoingMessage,
    ) -> ApiResult<MessageRef> {
        let mut state = self.state.lock();
        let message = MessageRef::new(channel, MessageId(state.next_id));
        state.next_id += 1;
        state.calls.push(HostCall::Send { message, content });
        Ok(message)
    }

    async fn edit_message(&self, message: MessageRef, content: OutgoingMessage) -> ApiResult<()> {
        self.record(HostCall::Edit { message, content });
        Ok(())
    }

    async fn delete_message(&self, message: MessageRef) -> ApiResult<()> {
        if self.failing_deletes {
            return Err(ApiError::Forbidden);
        }
        self.record(HostCall::Delete(message));
        Ok(())
    }

    async fn add_reaction(&self, message: MessageRef, emoji: &Emoji) -> ApiResult<()> {
        self.record(HostCall::AddReaction(message, emoji.clone()));
        Ok(())
    }

    async fn clear_reactions(&self, message: MessageRef) -> ApiResult<()> {
        self.record(HostCall::ClearReactions(message));
        Ok(())
    }

    async fn guild_roles(&self, _guild: GuildId) -> ApiResult<Vec<Role>> {
        Ok(self.roles.clone())
    }

    async fn fetch_member(&self, _guild: GuildId, user: UserId) -> ApiResult<Option<User>> {
        Ok(self.members.iter().find(|m| m.id == user).cloned())
    }

    async fn fetch_channel(&self, channel: ChannelId) -> ApiResult<Option<Channel>> {
        Ok(self.channels.iter().find(|c| c.id == channel).cloned())
    }

    async fn guild_emojis(&self, guild: GuildId) -> ApiResult<Vec<CustomEmoji>> {
        Ok(self
            .emojis
            .iter()
            .filter(|e| e.guild_id == guild)
            .cloned()
            .collect())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn guild() -> Guild {
    Guild {
        id: GuildId(1),
        name: "guild".into(),
        owner_id: UserId(10),
    }
}

pub fn role(id: u64, position: i64) -> Role {
    Role {
        id: RoleId(id),
        guild_id: guild().id,
        name: format!("role-{id}"),
        position,
    }
}

/// A member of [`guild`].
pub fn member(user_id: u64, roles: Vec<Role>) -> User {
    User::new(user_id, format!("user-{user_id}")).with_member(Member {
        guild: guild(),
        roles,
        nick: None,
    })
}

/// The owner of [`guild`].
pub fn owner(roles: Vec<Role>) -> User {
    member(guild().owner_id.get(), roles)
}

/// The invoking user, as a member of [`guild`].
pub fn invoker() -> User {
    member(INVOKER.get(), vec![role(1, 5)])
}

/// A message from the invoker in [`CHANNEL`], outside any guild.
pub fn message(id: u64, content: &str) -> InboundMessage {
    InboundMessage {
        id: MessageId(id),
        channel_id: CHANNEL,
        guild_id: None,
        author: User::new(INVOKER, "invoker"),
        content: content.to_string(),
    }
}

/// A reaction by the invoker on `target`.
pub fn reaction(target: MessageRef, emoji: &str) -> InboundEvent {
    InboundEvent::ReactionAdd(Reaction {
        message_id: target.message_id,
        channel_id: target.channel_id,
        user_id: INVOKER,
        emoji: Emoji::unicode(emoji),
    })
}
