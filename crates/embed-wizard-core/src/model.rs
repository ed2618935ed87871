//! Users, guild members, roles and channels.
//!
//! These are snapshots handed over by the host. The wizard only reads them:
//! checks compare guild membership, role positions and ownership.

use serde::{Deserialize, Serialize};

use crate::id::{ChannelId, GuildId, RoleId, UserId};

/// A guild (server).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    /// Guild ID.
    pub id: GuildId,
    /// Guild name.
    pub name: String,
    /// The user owning the guild.
    pub owner_id: UserId,
}

/// A guild role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role ID.
    pub id: RoleId,
    /// The guild this role belongs to.
    pub guild_id: GuildId,
    /// Role name.
    pub name: String,
    /// Position in the role hierarchy. Higher is more powerful.
    pub position: i64,
}

impl Role {
    /// Returns the mention markup for this role.
    pub fn mention(&self) -> String {
        format!("<@&{}>", self.id)
    }
}

/// Guild-specific data of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The guild the user is a member of.
    pub guild: Guild,
    /// Roles assigned to the member, excluding the implicit default role.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Guild nickname.
    #[serde(default)]
    pub nick: Option<String>,
}

impl Member {
    /// Returns the member's highest role, if any.
    pub fn top_role(&self) -> Option<&Role> {
        self.roles.iter().max_by_key(|role| role.position)
    }

    /// Position of the top role; members without roles sit at `0`.
    pub fn top_role_position(&self) -> i64 {
        self.top_role().map_or(0, |role| role.position)
    }
}

/// A user, optionally carrying guild membership.
///
/// Equality of users is identity: two snapshots of the same account compare
/// equal even if their names differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Account name.
    pub name: String,
    /// Whether the account is a bot.
    #[serde(default)]
    pub bot: bool,
    /// Membership in the guild the interaction happens in.
    #[serde(default)]
    pub member: Option<Member>,
}

impl User {
    /// Creates a user without guild membership.
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            bot: false,
            member: None,
        }
    }

    /// Attaches guild membership (builder pattern).
    pub fn with_member(mut self, member: Member) -> Self {
        self.member = Some(member);
        self
    }

    /// Returns the mention markup for this user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    /// Returns `true` if the user is known as a guild member.
    pub fn is_member(&self) -> bool {
        self.member.is_some()
    }

    /// Returns the guild the user is a member of.
    pub fn guild(&self) -> Option<&Guild> {
        self.member.as_ref().map(|m| &m.guild)
    }

    /// Returns the name shown in the guild (nickname first).
    pub fn display_name(&self) -> &str {
        self.member
            .as_ref()
            .and_then(|m| m.nick.as_deref())
            .unwrap_or(&self.name)
    }

    /// Returns `true` if this user owns the guild they are a member of.
    pub fn is_guild_owner(&self) -> bool {
        self.guild().is_some_and(|g| g.owner_id == self.id)
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

/// A text channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel ID.
    pub id: ChannelId,
    /// Guild the channel belongs to; `None` for direct messages.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    /// Channel name.
    pub name: String,
}

impl Channel {
    /// Returns the mention markup for this channel.
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }
}
