//! Emoji as they appear in reactions and message text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{EmojiId, GuildId};

/// A custom emoji whose owning guild is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomEmoji {
    /// Emoji ID.
    pub id: EmojiId,
    /// Emoji name.
    pub name: String,
    /// Whether the emoji is animated.
    #[serde(default)]
    pub animated: bool,
    /// The guild the emoji was uploaded to.
    pub guild_id: GuildId,
}

/// An emoji.
///
/// - `Unicode` is a plain unicode emoji (e.g. `✅`).
/// - `Partial` is a custom emoji seen only by id and name, e.g. one used in a
///   reaction from a guild the host cannot see.
/// - `Custom` is a custom emoji resolved against its guild.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Emoji {
    /// Unicode emoji.
    Unicode {
        /// The emoji text.
        name: String,
    },
    /// Custom emoji without guild information.
    Partial {
        /// Emoji ID.
        id: EmojiId,
        /// Emoji name.
        name: String,
        /// Whether the emoji is animated.
        #[serde(default)]
        animated: bool,
    },
    /// Custom emoji with guild information.
    Custom(CustomEmoji),
}

impl Emoji {
    /// Creates a unicode emoji.
    pub fn unicode(name: impl Into<String>) -> Self {
        Self::Unicode { name: name.into() }
    }

    /// Returns `true` for unicode emoji.
    pub fn is_unicode(&self) -> bool {
        matches!(self, Self::Unicode { .. })
    }

    /// Returns the custom emoji id, if this is not a unicode emoji.
    pub fn id(&self) -> Option<EmojiId> {
        match self {
            Self::Unicode { .. } => None,
            Self::Partial { id, .. } => Some(*id),
            Self::Custom(custom) => Some(custom.id),
        }
    }

    /// Returns the emoji name (the text itself for unicode emoji).
    pub fn name(&self) -> &str {
        match self {
            Self::Unicode { name } | Self::Partial { name, .. } => name,
            Self::Custom(custom) => &custom.name,
        }
    }

    /// Returns the owning guild, when known.
    pub fn guild_id(&self) -> Option<GuildId> {
        match self {
            Self::Custom(custom) => Some(custom.guild_id),
            _ => None,
        }
    }

    /// Returns `true` if this emoji is the given unicode text.
    pub fn is(&self, text: &str) -> bool {
        matches!(self, Self::Unicode { name } if name == text)
    }
}

impl fmt::Display for Emoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (id, name, animated) = match self {
            Self::Unicode { name } => return f.write_str(name),
            Self::Partial { id, name, animated } => (*id, name, *animated),
            Self::Custom(custom) => (custom.id, &custom.name, custom.animated),
        };
        if animated {
            write!(f, "<a:{name}:{id}>")
        } else {
            write!(f, "<:{name}:{id}>")
        }
    }
}

impl From<CustomEmoji> for Emoji {
    fn from(emoji: CustomEmoji) -> Self {
        Self::Custom(emoji)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(Emoji::unicode("\u{2705}").to_string(), "\u{2705}");

        let partial = Emoji::Partial {
            id: EmojiId(42),
            name: "blob".into(),
            animated: true,
        };
        assert_eq!(partial.to_string(), "<a:blob:42>");

        let custom = Emoji::from(CustomEmoji {
            id: EmojiId(7),
            name: "wave".into(),
            animated: false,
            guild_id: GuildId(1),
        });
        assert_eq!(custom.to_string(), "<:wave:7>");
        assert_eq!(custom.guild_id(), Some(GuildId(1)));
    }

    #[test]
    fn test_is_matches_unicode_only() {
        assert!(Emoji::unicode("\u{274c}").is("\u{274c}"));
        assert!(!Emoji::unicode("\u{274c}").is("\u{2705}"));
        let partial = Emoji::Partial {
            id: EmojiId(1),
            name: "\u{274c}".into(),
            animated: false,
        };
        assert!(!partial.is("\u{274c}"));
    }
}
