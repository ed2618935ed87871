//! # Embed Wizard Core
//!
//! The host-facing half of embed-wizard.
//!
//! A wizard never talks to a chat platform directly. Everything it needs from
//! the platform is expressed here as plain data and two traits:
//!
//! - **Model**: users, guild members, roles, channels, emoji and reactions
//!   ([`User`], [`Member`], [`Role`], [`Emoji`], [`Reaction`])
//! - **Rich content**: [`Embed`] with ordered fields and a [`Color`]
//! - **Events**: [`InboundEvent`] and the [`EventSource`] the wizard reads them from
//! - **Host**: [`ChatHost`], the send/edit/react/lookup surface of the platform
//!
//! ```text
//! ┌──────────────┐  InboundEvent   ┌──────────────┐
//! │   Platform   │────────────────▶│    Wizard    │
//! │  (adapter)   │◀────────────────│              │
//! └──────────────┘    ChatHost     └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use embed_wizard_core::{ChatHost, ChannelId, Embed, OutgoingMessage};
//!
//! async fn announce(host: &dyn ChatHost, channel: ChannelId) {
//!     let embed = Embed::new("Setup").field("Step 1", "Waiting....", false);
//!     host.send_message(channel, OutgoingMessage::Embed(embed)).await.ok();
//! }
//! ```

pub mod embed;
pub mod emoji;
pub mod error;
pub mod event;
pub mod host;
pub mod id;
pub mod model;

pub use embed::{Color, Embed, EmbedField};
pub use emoji::{CustomEmoji, Emoji};
pub use error::{ApiError, ApiResult};
pub use event::{EventKind, EventSource, InboundEvent, InboundMessage, Reaction, StreamSource};
pub use host::{BoxedHost, ChatHost, InvocationContext, MessageRef, OutgoingMessage};
pub use id::{ChannelId, EmojiId, GuildId, MessageId, RoleId, UserId};
pub use model::{Channel, Guild, Member, Role, User};

/// Prelude for common imports.
pub mod prelude {
    pub use super::embed::*;
    pub use super::emoji::*;
    pub use super::event::*;
    pub use super::host::*;
    pub use super::id::*;
    pub use super::model::*;
}
