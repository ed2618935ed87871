//! Converters from message text to [`Answer`]s.
//!
//! A [`Converter`] turns the content of an inbound message into a typed
//! answer. The [`ConverterMapping`] picks the converter for a prompt's
//! [`ResultType`]:
//!
//! 1. a converter registered by the application for that exact type,
//! 2. the built-in preset for `Int`, `Bool` and `Text`,
//! 3. otherwise a [`ConfigError::NoConverter`].
//!
//! Entity converters ([`RoleConverter`], [`MemberConverter`],
//! [`ChannelConverter`], [`EmojiConverter`]) resolve mentions through the
//! host and are registered explicitly:
//!
//! ```rust,ignore
//! let converters = ConverterMapping::new()
//!     .with_entity_converters()
//!     .with(ResultType::Custom("hex"), converter_fn(|text| async move {
//!         u32::from_str_radix(text.trim_start_matches('#'), 16)
//!             .map(|v| Answer::Int(v.into()))
//!             .map_err(|_| InputError::bad_argument(format!("Invalid color: {text}")).into())
//!     }));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use embed_wizard_core::{
    ApiError, ChannelId, Emoji, EmojiId, InvocationContext, RoleId, UserId,
};

use crate::answer::Answer;
use crate::error::{ConfigError, InputError, WizardResult};
use crate::prompt::ResultType;

/// Turns message text into an [`Answer`].
///
/// Returning [`WizardError::Input`](crate::WizardError::Input) marks the text
/// as a bad answer; the wizard reports it and asks again. Any other error
/// aborts the run.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Converts `content`, posted in the context `ctx`.
    async fn convert(&self, ctx: &InvocationContext<'_>, content: &str) -> WizardResult<Answer>;
}

// =============================================================================
// Presets
// =============================================================================

/// Parses an integer.
pub fn convert_int(content: &str) -> Result<i64, InputError> {
    content
        .trim()
        .parse()
        .map_err(|_| InputError::BadArgument(format!("Invalid int value: {content}")))
}

/// Parses a boolean from the yes/no vocabulary, ignoring case.
pub fn convert_bool(content: &str) -> Result<bool, InputError> {
    match content.to_lowercase().as_str() {
        "yes" | "y" | "1" | "true" | "t" => Ok(true),
        "no" | "n" | "0" | "false" | "f" => Ok(false),
        _ => Err(InputError::BadBool(content.to_string())),
    }
}

/// Built-in converter for [`ResultType::Int`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IntConverter;

#[async_trait]
impl Converter for IntConverter {
    async fn convert(&self, _ctx: &InvocationContext<'_>, content: &str) -> WizardResult<Answer> {
        Ok(Answer::Int(convert_int(content)?))
    }
}

/// Built-in converter for [`ResultType::Bool`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolConverter;

#[async_trait]
impl Converter for BoolConverter {
    async fn convert(&self, _ctx: &InvocationContext<'_>, content: &str) -> WizardResult<Answer> {
        Ok(Answer::Bool(convert_bool(content)?))
    }
}

/// Built-in converter for [`ResultType::Text`]; returns the content unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextConverter;

#[async_trait]
impl Converter for TextConverter {
    async fn convert(&self, _ctx: &InvocationContext<'_>, content: &str) -> WizardResult<Answer> {
        Ok(Answer::Text(content.to_string()))
    }
}

// =============================================================================
// Mention Parsing
// =============================================================================

/// Extracts the id of `<{prefix}ID>` markup or a bare numeric id.
fn parse_mention(text: &str, prefixes: &[&str]) -> Option<u64> {
    let text = text.trim();
    if let Ok(id) = text.parse() {
        return Some(id);
    }
    let inner = text.strip_suffix('>')?;
    prefixes
        .iter()
        .find_map(|prefix| inner.strip_prefix(prefix))
        .and_then(|id| id.parse().ok())
}

/// Parses `<:name:id>` / `<a:name:id>` markup.
fn parse_custom_emoji(text: &str) -> Option<(EmojiId, String, bool)> {
    let inner = text.trim().strip_prefix('<')?.strip_suffix('>')?;
    let (animated, rest) = match inner.strip_prefix("a:") {
        Some(rest) => (true, rest),
        None => (false, inner.strip_prefix(':')?),
    };
    let (name, id) = rest.split_once(':')?;
    if name.is_empty() {
        return None;
    }
    Some((EmojiId(id.parse().ok()?), name.to_string(), animated))
}

fn not_found(kind: &str, text: &str) -> InputError {
    InputError::NotFound(format!("{kind} \"{text}\" not found."))
}

// =============================================================================
// Entity Converters
// =============================================================================

/// Resolves a role mention, id, or name in the invocation guild.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleConverter;

#[async_trait]
impl Converter for RoleConverter {
    async fn convert(&self, ctx: &InvocationContext<'_>, content: &str) -> WizardResult<Answer> {
        let text = content.trim();
        let Some(guild) = ctx.guild_id() else {
            return Err(not_found("Role", text).into());
        };
        let roles = ctx.host().guild_roles(guild).await?;

        let found = match parse_mention(text, &["<@&"]) {
            Some(id) => roles.into_iter().find(|role| role.id == RoleId(id)),
            None => {
                let exact = roles.iter().position(|role| role.name == text);
                let index = exact.or_else(|| {
                    roles
                        .iter()
                        .position(|role| role.name.eq_ignore_ascii_case(text))
                });
                index.map(|i| roles[i].clone())
            }
        };

        found
            .map(Answer::Role)
            .ok_or_else(|| not_found("Role", text).into())
    }
}

/// Resolves a member mention or id in the invocation guild.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberConverter;

#[async_trait]
impl Converter for MemberConverter {
    async fn convert(&self, ctx: &InvocationContext<'_>, content: &str) -> WizardResult<Answer> {
        let text = content.trim();
        let (Some(guild), Some(id)) = (ctx.guild_id(), parse_mention(text, &["<@!", "<@"])) else {
            return Err(not_found("Member", text).into());
        };

        ctx.host()
            .fetch_member(guild, UserId(id))
            .await?
            .map(Answer::Member)
            .ok_or_else(|| not_found("Member", text).into())
    }
}

/// Resolves a channel mention or id.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelConverter;

#[async_trait]
impl Converter for ChannelConverter {
    async fn convert(&self, ctx: &InvocationContext<'_>, content: &str) -> WizardResult<Answer> {
        let text = content.trim();
        let Some(id) = parse_mention(text, &["<#"]) else {
            return Err(not_found("Channel", text).into());
        };

        ctx.host()
            .fetch_channel(ChannelId(id))
            .await?
            .map(Answer::Channel)
            .ok_or_else(|| not_found("Channel", text).into())
    }
}

/// Reads a typed emoji.
///
/// Custom emoji markup is resolved against the invocation guild's emoji list
/// when the host supports it; unresolved custom emoji stay partial. Text
/// made only of ASCII characters is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmojiConverter;

#[async_trait]
impl Converter for EmojiConverter {
    async fn convert(&self, ctx: &InvocationContext<'_>, content: &str) -> WizardResult<Answer> {
        let text = content.trim();

        if let Some((id, name, animated)) = parse_custom_emoji(text) {
            let known = match ctx.guild_id() {
                Some(guild) => match ctx.host().guild_emojis(guild).await {
                    Ok(emojis) => emojis.into_iter().find(|emoji| emoji.id == id),
                    Err(ApiError::Unsupported(_)) => None,
                    Err(e) => return Err(e.into()),
                },
                None => None,
            };
            let emoji = match known {
                Some(custom) => Emoji::Custom(custom),
                None => Emoji::Partial { id, name, animated },
            };
            return Ok(Answer::Emoji(emoji));
        }

        if text.is_empty() || text.is_ascii() {
            return Err(not_found("Emoji", text).into());
        }
        Ok(Answer::Emoji(Emoji::unicode(text)))
    }
}

// =============================================================================
// Closure Converters
// =============================================================================

/// A converter backed by an async closure over the owned content.
///
/// Created with [`converter_fn`].
#[derive(Clone)]
pub struct FnConverter<F> {
    f: F,
}

/// Adapts an async closure into a [`Converter`].
///
/// The closure receives the message content; use a [`Converter`]
/// implementation when the invocation context is needed.
pub fn converter_fn<F, Fut>(f: F) -> FnConverter<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = WizardResult<Answer>> + Send,
{
    FnConverter { f }
}

#[async_trait]
impl<F, Fut> Converter for FnConverter<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = WizardResult<Answer>> + Send,
{
    async fn convert(&self, _ctx: &InvocationContext<'_>, content: &str) -> WizardResult<Answer> {
        (self.f)(content.to_string()).await
    }
}

// =============================================================================
// Converter Mapping
// =============================================================================

/// Resolves result types to converters.
#[derive(Clone, Default)]
pub struct ConverterMapping {
    converters: HashMap<ResultType, Arc<dyn Converter>>,
}

impl ConverterMapping {
    /// Creates a mapping with only the presets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a converter (builder pattern).
    pub fn with<C: Converter + 'static>(mut self, result_type: ResultType, converter: C) -> Self {
        self.insert(result_type, Arc::new(converter));
        self
    }

    /// Registers a converter, replacing any previous one for the type.
    pub fn insert(&mut self, result_type: ResultType, converter: Arc<dyn Converter>) {
        self.converters.insert(result_type, converter);
    }

    /// Registers the role, member, channel and emoji converters.
    pub fn with_entity_converters(self) -> Self {
        self.with(ResultType::Role, RoleConverter)
            .with(ResultType::Member, MemberConverter)
            .with(ResultType::Channel, ChannelConverter)
            .with(ResultType::Emoji, EmojiConverter)
    }

    /// Returns the built-in converter for a type.
    pub fn preset(result_type: ResultType) -> Option<Arc<dyn Converter>> {
        match result_type {
            ResultType::Int => Some(Arc::new(IntConverter)),
            ResultType::Bool => Some(Arc::new(BoolConverter)),
            ResultType::Text => Some(Arc::new(TextConverter)),
            _ => None,
        }
    }

    /// Resolves the converter for a type.
    pub fn get(&self, result_type: ResultType) -> Result<Arc<dyn Converter>, ConfigError> {
        self.converters
            .get(&result_type)
            .cloned()
            .or_else(|| Self::preset(result_type))
            .ok_or(ConfigError::NoConverter(result_type))
    }

    /// Returns `true` if `get` would succeed.
    pub fn contains(&self, result_type: ResultType) -> bool {
        self.converters.contains_key(&result_type) || Self::preset(result_type).is_some()
    }
}

impl fmt::Debug for ConverterMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterMapping")
            .field("overrides", &self.converters.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_support::{MockHost, guild, member, message, role};
    use crate::WizardError;
    use embed_wizard_core::{Channel, CustomEmoji, GuildId};

    #[test]
    fn test_bool_vocabulary_any_case() {
        for token in ["yes", "Y", "1", "TRUE", "t", "YeS"] {
            assert_eq!(convert_bool(token), Ok(true), "{token}");
        }
        for token in ["no", "N", "0", "False", "f", "NO"] {
            assert_eq!(convert_bool(token), Ok(false), "{token}");
        }
        for token in ["", "maybe", "2", "yess", " yes"] {
            assert!(matches!(convert_bool(token), Err(InputError::BadBool(_))), "{token}");
        }
        assert_eq!(
            convert_bool("maybe").unwrap_err().to_string(),
            "'maybe' is not a recognised boolean option"
        );
    }

    #[test]
    fn test_int_conversion() {
        assert_eq!(convert_int("42"), Ok(42));
        assert_eq!(convert_int("-7"), Ok(-7));
        let err = convert_int("abc").unwrap_err();
        assert_eq!(err.to_string(), "Invalid int value: abc");
    }

    #[test]
    fn test_parse_mentions() {
        assert_eq!(parse_mention("<@&55>", &["<@&"]), Some(55));
        assert_eq!(parse_mention("55", &["<@&"]), Some(55));
        assert_eq!(parse_mention("<@!9>", &["<@!", "<@"]), Some(9));
        assert_eq!(parse_mention("<@9>", &["<@!", "<@"]), Some(9));
        assert_eq!(parse_mention("<#9>", &["<@"]), None);
        assert_eq!(parse_mention("mods", &["<@&"]), None);
    }

    #[test]
    fn test_parse_custom_emoji() {
        assert_eq!(
            parse_custom_emoji("<:blob:12>"),
            Some((EmojiId(12), "blob".to_string(), false))
        );
        assert_eq!(
            parse_custom_emoji("<a:dance:3>"),
            Some((EmojiId(3), "dance".to_string(), true))
        );
        assert_eq!(parse_custom_emoji("<:blob:x>"), None);
        assert_eq!(parse_custom_emoji("blob"), None);
    }

    #[test]
    fn test_mapping_resolution_order() {
        let mapping = ConverterMapping::new();
        assert!(mapping.get(ResultType::Int).is_ok());
        assert!(mapping.get(ResultType::Bool).is_ok());
        assert!(mapping.get(ResultType::Text).is_ok());
        assert!(matches!(
            mapping.get(ResultType::Role),
            Err(ConfigError::NoConverter(ResultType::Role))
        ));
        assert!(!mapping.contains(ResultType::Custom("hex")));

        let mapping = mapping.with_entity_converters();
        assert!(mapping.contains(ResultType::Role));
        assert!(mapping.contains(ResultType::Channel));
    }

    #[tokio::test]
    async fn test_override_beats_preset() {
        let mapping = ConverterMapping::new().with(
            ResultType::Int,
            converter_fn(|text| async move { Ok(Answer::Int(text.len() as i64)) }),
        );
        let host = MockHost::new();
        let msg = message(1, "hello");
        let ctx = InvocationContext::from_message(&host, &msg);

        let answer = mapping
            .get(ResultType::Int)
            .unwrap()
            .convert(&ctx, "hello")
            .await
            .unwrap();
        assert_eq!(answer.as_int(), Some(5));
    }

    #[tokio::test]
    async fn test_role_converter_by_mention_and_name() {
        let host = MockHost::new().with_roles(vec![role(3, 1), role(4, 2)]);
        let mut msg = message(1, "");
        msg.guild_id = Some(guild().id);
        let ctx = InvocationContext::from_message(&host, &msg);

        let by_mention = RoleConverter.convert(&ctx, "<@&4>").await.unwrap();
        assert_eq!(by_mention.as_role().map(|r| r.id), Some(RoleId(4)));

        let by_name = RoleConverter.convert(&ctx, "ROLE-3").await.unwrap();
        assert_eq!(by_name.as_role().map(|r| r.id), Some(RoleId(3)));

        let missing = RoleConverter.convert(&ctx, "ghost").await.unwrap_err();
        assert_eq!(missing.to_string(), "Role \"ghost\" not found.");
        assert!(missing.is_input());
    }

    #[tokio::test]
    async fn test_member_converter_requires_guild() {
        let host = MockHost::new().with_members(vec![member(7, vec![])]);
        let msg = message(1, "");
        let dm = InvocationContext::from_message(&host, &msg);
        assert!(MemberConverter.convert(&dm, "<@7>").await.unwrap_err().is_input());

        let mut msg = message(1, "");
        msg.guild_id = Some(guild().id);
        let ctx = InvocationContext::from_message(&host, &msg);
        let found = MemberConverter.convert(&ctx, "<@!7>").await.unwrap();
        assert_eq!(found.mention().as_deref(), Some("<@7>"));
    }

    #[tokio::test]
    async fn test_channel_converter_propagates_unsupported_host() {
        struct Bare;

        #[async_trait]
        impl embed_wizard_core::ChatHost for Bare {
            async fn send_message(
                &self,
                _channel: ChannelId,
                _content: embed_wizard_core::OutgoingMessage,
            ) -> embed_wizard_core::ApiResult<embed_wizard_core::MessageRef> {
                Err(ApiError::NotConnected)
            }
            async fn edit_message(
                &self,
                _message: embed_wizard_core::MessageRef,
                _content: embed_wizard_core::OutgoingMessage,
            ) -> embed_wizard_core::ApiResult<()> {
                Err(ApiError::NotConnected)
            }
            async fn delete_message(
                &self,
                _message: embed_wizard_core::MessageRef,
            ) -> embed_wizard_core::ApiResult<()> {
                Err(ApiError::NotConnected)
            }
            async fn add_reaction(
                &self,
                _message: embed_wizard_core::MessageRef,
                _emoji: &Emoji,
            ) -> embed_wizard_core::ApiResult<()> {
                Err(ApiError::NotConnected)
            }
            async fn clear_reactions(
                &self,
                _message: embed_wizard_core::MessageRef,
            ) -> embed_wizard_core::ApiResult<()> {
                Err(ApiError::NotConnected)
            }
        }

        let msg = message(1, "");
        let ctx = InvocationContext::from_message(&Bare, &msg);
        let err = ChannelConverter.convert(&ctx, "<#5>").await.unwrap_err();
        assert!(matches!(err, WizardError::Api(ApiError::Unsupported("fetch_channel"))));

        let host = MockHost::new().with_channels(vec![Channel {
            id: ChannelId(5),
            guild_id: Some(GuildId(1)),
            name: "general".into(),
        }]);
        let ctx = InvocationContext::from_message(&host, &msg);
        let found = ChannelConverter.convert(&ctx, "<#5>").await.unwrap();
        assert_eq!(found.mention().as_deref(), Some("<#5>"));
    }

    #[tokio::test]
    async fn test_emoji_converter() {
        let host = MockHost::new().with_emojis(vec![CustomEmoji {
            id: EmojiId(12),
            name: "blob".into(),
            animated: false,
            guild_id: guild().id,
        }]);
        let mut msg = message(1, "");
        msg.guild_id = Some(guild().id);
        let ctx = InvocationContext::from_message(&host, &msg);

        let known = EmojiConverter.convert(&ctx, "<:blob:12>").await.unwrap();
        assert_eq!(known.as_emoji().and_then(Emoji::guild_id), Some(guild().id));

        let foreign = EmojiConverter.convert(&ctx, "<:other:99>").await.unwrap();
        assert!(matches!(foreign.as_emoji(), Some(Emoji::Partial { .. })));

        let unicode = EmojiConverter.convert(&ctx, "\u{1f600}").await.unwrap();
        assert!(unicode.as_emoji().is_some_and(Emoji::is_unicode));

        assert!(EmojiConverter.convert(&ctx, "smile").await.unwrap_err().is_input());
    }
}
