//! Snowflake-style identifiers.
//!
//! Every platform object is addressed by a `u64`. Distinct newtypes keep a
//! role id from being passed where a channel id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($($(#[$meta:meta])* $name:ident;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(pub u64);

            impl $name {
                /// Returns the raw numeric value.
                pub const fn get(self) -> u64 {
                    self.0
                }
            }

            impl From<u64> for $name {
                fn from(value: u64) -> Self {
                    Self(value)
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl FromStr for $name {
                type Err = std::num::ParseIntError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    s.parse().map(Self)
                }
            }
        )*
    };
}

id_type! {
    /// Identifies a user account.
    UserId;
    /// Identifies a text channel.
    ChannelId;
    /// Identifies a guild (server).
    GuildId;
    /// Identifies a guild role.
    RoleId;
    /// Identifies a posted message.
    MessageId;
    /// Identifies a custom emoji.
    EmojiId;
}
