//! Collected answers.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use embed_wizard_core::{Channel, Emoji, Reaction, Role, User};

/// A value produced by a custom converter.
///
/// Implement this for domain types that don't fit the built-in [`Answer`]
/// variants.
pub trait CustomAnswer: fmt::Debug + Send + Sync + 'static {
    /// Plain string form.
    fn display(&self) -> String;

    /// Mention markup, for values that refer to a platform entity.
    fn mention(&self) -> Option<String> {
        None
    }

    /// Returns self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// The converted result of one prompt.
#[derive(Debug, Clone)]
pub enum Answer {
    /// An integer.
    Int(i64),
    /// A yes/no choice.
    Bool(bool),
    /// Free text.
    Text(String),
    /// An emoji, typed or reacted.
    Emoji(Emoji),
    /// A full reaction.
    Reaction(Reaction),
    /// A guild role.
    Role(Role),
    /// A guild member.
    Member(User),
    /// A channel.
    Channel(Channel),
    /// A value of a custom converter.
    Custom(Arc<dyn CustomAnswer>),
}

impl Answer {
    /// Wraps a custom value.
    pub fn custom<T: CustomAnswer>(value: T) -> Self {
        Self::Custom(Arc::new(value))
    }

    /// Returns the mention markup of entity answers.
    pub fn mention(&self) -> Option<String> {
        match self {
            Self::Role(role) => Some(role.mention()),
            Self::Member(user) => Some(user.mention()),
            Self::Channel(channel) => Some(channel.mention()),
            Self::Custom(value) => value.mention(),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the emoji of emoji and reaction answers.
    pub fn as_emoji(&self) -> Option<&Emoji> {
        match self {
            Self::Emoji(emoji) => Some(emoji),
            Self::Reaction(reaction) => Some(&reaction.emoji),
            _ => None,
        }
    }

    pub fn as_reaction(&self) -> Option<&Reaction> {
        match self {
            Self::Reaction(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_role(&self) -> Option<&Role> {
        match self {
            Self::Role(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_member(&self) -> Option<&User> {
        match self {
            Self::Member(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_channel(&self) -> Option<&Channel> {
        match self {
            Self::Channel(v) => Some(v),
            _ => None,
        }
    }

    /// Downcasts a custom answer.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            Self::Custom(value) => value.as_any().downcast_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Emoji(emoji) => write!(f, "{emoji}"),
            Self::Reaction(reaction) => write!(f, "{}", reaction.emoji),
            Self::Role(role) => f.write_str(&role.name),
            Self::Member(user) => f.write_str(user.display_name()),
            Self::Channel(channel) => write!(f, "#{}", channel.name),
            Self::Custom(value) => f.write_str(&value.display()),
        }
    }
}

impl From<i64> for Answer {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for Answer {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embed_wizard_core::{GuildId, RoleId};

    #[derive(Debug)]
    struct Color(&'static str);

    impl CustomAnswer for Color {
        fn display(&self) -> String {
            self.0.to_uppercase()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_mention_only_for_entities() {
        let role = Answer::Role(Role {
            id: RoleId(5),
            guild_id: GuildId(1),
            name: "mods".into(),
            position: 2,
        });
        assert_eq!(role.mention().as_deref(), Some("<@&5>"));
        assert_eq!(role.to_string(), "mods");
        assert_eq!(Answer::Int(3).mention(), None);
    }

    #[test]
    fn test_custom_answer_display_and_downcast() {
        let answer = Answer::custom(Color("teal"));
        assert_eq!(answer.to_string(), "TEAL");
        assert_eq!(answer.downcast_ref::<Color>().map(|c| c.0), Some("teal"));
        assert!(answer.mention().is_none());
    }
}
