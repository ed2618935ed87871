//! Reusable value checks.
//!
//! A [`Check`] validates a converted [`Answer`] and rejects it with an
//! [`InputError`]; the wizard shows the message and asks again. Checks are
//! attached to prompts with [`Prompt::post_check`](crate::Prompt::post_check)
//! and compose with [`combine_checks`].
//!
//! ```rust,ignore
//! use embed_wizard::{combine_checks, check_fn, LengthCheck, InputError};
//!
//! let username = combine_checks(vec![
//!     Arc::new(LengthCheck::between(3, 32)?),
//!     Arc::new(check_fn(|_, value| match value.as_text() {
//!         Some(text) if text.contains(' ') => Err(InputError::check("No spaces, please")),
//!         _ => Ok(()),
//!     })),
//! ]);
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use embed_wizard_core::{ChannelId, ChatHost, Emoji, Role, User};

use crate::answer::Answer;
use crate::error::{ConfigError, InputError};

/// What a check can see of the running wizard.
#[derive(Clone, Copy)]
pub struct CheckContext<'a> {
    /// The user the wizard is talking to.
    pub user: &'a User,
    /// The wizard channel.
    pub channel: ChannelId,
    /// Answers collected so far, in prompt order.
    pub results: &'a [Answer],
    /// The chat host.
    pub host: &'a dyn ChatHost,
}

/// Validates a converted answer.
#[async_trait]
pub trait Check: Send + Sync {
    /// Returns an error when `value` is not acceptable.
    async fn check(&self, ctx: &CheckContext<'_>, value: &Answer) -> Result<(), InputError>;
}

// =============================================================================
// Combinators
// =============================================================================

/// Runs checks in order and stops at the first failure.
#[derive(Clone, Default)]
pub struct AllChecks {
    checks: Vec<Arc<dyn Check>>,
}

impl AllChecks {
    /// Appends a check (builder pattern).
    pub fn and<C: Check + 'static>(mut self, check: C) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    /// Returns the number of checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns `true` if there are no checks.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

#[async_trait]
impl Check for AllChecks {
    async fn check(&self, ctx: &CheckContext<'_>, value: &Answer) -> Result<(), InputError> {
        for check in &self.checks {
            check.check(ctx, value).await?;
        }
        Ok(())
    }
}

/// Combines checks into one that fails fast.
pub fn combine_checks(checks: impl IntoIterator<Item = Arc<dyn Check>>) -> AllChecks {
    AllChecks {
        checks: checks.into_iter().collect(),
    }
}

/// A check backed by a synchronous closure. Created with [`check_fn`].
#[derive(Clone)]
pub struct FnCheck<F> {
    f: F,
}

/// Adapts a closure into a [`Check`].
pub fn check_fn<F>(f: F) -> FnCheck<F>
where
    F: Fn(&CheckContext<'_>, &Answer) -> Result<(), InputError> + Send + Sync,
{
    FnCheck { f }
}

#[async_trait]
impl<F> Check for FnCheck<F>
where
    F: Fn(&CheckContext<'_>, &Answer) -> Result<(), InputError> + Send + Sync,
{
    async fn check(&self, ctx: &CheckContext<'_>, value: &Answer) -> Result<(), InputError> {
        (self.f)(ctx, value)
    }
}

// =============================================================================
// Range Checks
// =============================================================================

/// Inclusive bounds on an integer answer.
#[derive(Debug, Clone)]
pub struct RangeCheck {
    min: Option<i64>,
    max: Option<i64>,
    too_small_message: String,
    too_large_message: String,
}

impl RangeCheck {
    /// Creates a range check. At least one bound is required.
    pub fn new(min: Option<i64>, max: Option<i64>) -> Result<Self, ConfigError> {
        match (min, max) {
            (None, None) => {
                return Err(ConfigError::InvalidBounds(
                    "both min and max can't be None".into(),
                ));
            }
            (Some(min), Some(max)) if min > max => {
                return Err(ConfigError::InvalidBounds(format!(
                    "min ({min}) is greater than max ({max})"
                )));
            }
            _ => {}
        }
        Ok(Self {
            min,
            max,
            too_small_message: "Value too small, must be more than {}".into(),
            too_large_message: "Value too large, must be less than {}".into(),
        })
    }

    pub fn between(min: i64, max: i64) -> Result<Self, ConfigError> {
        Self::new(Some(min), Some(max))
    }

    pub fn at_least(min: i64) -> Self {
        Self {
            min: Some(min),
            ..Self::unbounded()
        }
    }

    pub fn at_most(max: i64) -> Self {
        Self {
            max: Some(max),
            ..Self::unbounded()
        }
    }

    fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
            too_small_message: "Value too small, must be more than {}".into(),
            too_large_message: "Value too large, must be less than {}".into(),
        }
    }

    /// Template used below the minimum; `{}` is replaced by the bound.
    pub fn too_small_message(mut self, template: impl Into<String>) -> Self {
        self.too_small_message = template.into();
        self
    }

    /// Template used above the maximum; `{}` is replaced by the bound.
    pub fn too_large_message(mut self, template: impl Into<String>) -> Self {
        self.too_large_message = template.into();
        self
    }

    /// Checks a raw number against the bounds.
    pub fn check_value(&self, value: i64) -> Result<(), InputError> {
        if let Some(min) = self.min
            && value < min
        {
            return Err(InputError::Check(render(&self.too_small_message, min)));
        }
        if let Some(max) = self.max
            && value > max
        {
            return Err(InputError::Check(render(&self.too_large_message, max)));
        }
        Ok(())
    }
}

fn render(template: &str, bound: i64) -> String {
    template.replacen("{}", &bound.to_string(), 1)
}

#[async_trait]
impl Check for RangeCheck {
    async fn check(&self, _ctx: &CheckContext<'_>, value: &Answer) -> Result<(), InputError> {
        let number = value
            .as_int()
            .ok_or_else(|| InputError::check("Value must be a whole number"))?;
        self.check_value(number)
    }
}

/// Inclusive bounds on the length of a text answer, in characters.
#[derive(Debug, Clone)]
pub struct LengthCheck {
    range: RangeCheck,
}

impl LengthCheck {
    /// Creates a length check. At least one bound is required.
    pub fn new(min_len: Option<usize>, max_len: Option<usize>) -> Result<Self, ConfigError> {
        let as_i64 = |len: usize| i64::try_from(len).unwrap_or(i64::MAX);
        let range = RangeCheck::new(min_len.map(as_i64), max_len.map(as_i64))?
            .too_small_message("Value too short, must be more than {}")
            .too_large_message("Value too long, must be less than {}");
        Ok(Self { range })
    }

    pub fn between(min_len: usize, max_len: usize) -> Result<Self, ConfigError> {
        Self::new(Some(min_len), Some(max_len))
    }

    pub fn too_small_message(mut self, template: impl Into<String>) -> Self {
        self.range = self.range.too_small_message(template);
        self
    }

    pub fn too_large_message(mut self, template: impl Into<String>) -> Self {
        self.range = self.range.too_large_message(template);
        self
    }
}

#[async_trait]
impl Check for LengthCheck {
    async fn check(&self, _ctx: &CheckContext<'_>, value: &Answer) -> Result<(), InputError> {
        let text = value
            .as_text()
            .ok_or_else(|| InputError::check("Value must be text"))?;
        let len = i64::try_from(text.chars().count()).unwrap_or(i64::MAX);
        self.range.check_value(len)
    }
}

// =============================================================================
// Guild Checks
// =============================================================================

/// Rejects custom emoji that don't belong to the user's guild.
///
/// Unicode emoji always pass. Partial emoji (guild unknown) are rejected.
#[derive(Debug, Clone)]
pub struct CurrentGuildEmojiCheck {
    error_message: String,
}

impl Default for CurrentGuildEmojiCheck {
    fn default() -> Self {
        Self {
            error_message: "The emoji is from a different server!".into(),
        }
    }
}

impl CurrentGuildEmojiCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    /// Checks one emoji for `user`.
    pub fn check_emoji(&self, user: &User, emoji: &Emoji) -> Result<(), InputError> {
        let allowed = match emoji {
            Emoji::Unicode { .. } => true,
            Emoji::Partial { .. } => false,
            Emoji::Custom(custom) => user.guild().is_some_and(|g| g.id == custom.guild_id),
        };
        if allowed {
            Ok(())
        } else {
            Err(InputError::Check(self.error_message.clone()))
        }
    }
}

#[async_trait]
impl Check for CurrentGuildEmojiCheck {
    async fn check(&self, ctx: &CheckContext<'_>, value: &Answer) -> Result<(), InputError> {
        match value {
            // Plain text stands in for a literal emoji.
            Answer::Text(_) => Ok(()),
            Answer::Emoji(emoji) => self.check_emoji(ctx.user, emoji),
            _ => Err(InputError::check("Value must be an emoji")),
        }
    }
}

/// Applies [`CurrentGuildEmojiCheck`] to the emoji of a reaction.
#[derive(Debug, Clone)]
pub struct CurrentGuildReactionCheck {
    inner: CurrentGuildEmojiCheck,
}

impl Default for CurrentGuildReactionCheck {
    fn default() -> Self {
        Self {
            inner: CurrentGuildEmojiCheck::new()
                .error_message("The emoji used in the reaction is from a different server!"),
        }
    }
}

impl CurrentGuildReactionCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.inner = self.inner.error_message(message);
        self
    }
}

#[async_trait]
impl Check for CurrentGuildReactionCheck {
    async fn check(&self, ctx: &CheckContext<'_>, value: &Answer) -> Result<(), InputError> {
        let reaction = value
            .as_reaction()
            .ok_or_else(|| InputError::check("Value must be a reaction"))?;
        self.inner.check_emoji(ctx.user, &reaction.emoji)
    }
}

/// Rejects roles at or above the user's top role, unless the user owns the guild.
#[derive(Debug, Clone)]
pub struct RoleBelowMemberCheck {
    error_message: String,
}

impl Default for RoleBelowMemberCheck {
    fn default() -> Self {
        Self {
            error_message: "The role selected is above your highest role!".into(),
        }
    }
}

impl RoleBelowMemberCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    /// Checks `role` against `user`'s hierarchy position.
    pub fn check_role(&self, user: &User, role: &Role) -> Result<(), InputError> {
        let Some(member) = &user.member else {
            return Err(InputError::Check(self.error_message.clone()));
        };
        if user.is_guild_owner() {
            return Ok(());
        }
        if role.position >= member.top_role_position() {
            return Err(InputError::Check(self.error_message.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl Check for RoleBelowMemberCheck {
    async fn check(&self, ctx: &CheckContext<'_>, value: &Answer) -> Result<(), InputError> {
        let role = value
            .as_role()
            .ok_or_else(|| InputError::check("Value must be a role"))?;
        self.check_role(ctx.user, role)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_support::{MockHost, guild, member, owner, role};
    use embed_wizard_core::{CustomEmoji, EmojiId, GuildId, MessageId, Reaction, UserId};
    use tokio_test::{assert_err, assert_ok};

    fn ctx<'a>(user: &'a User, host: &'a MockHost) -> CheckContext<'a> {
        CheckContext {
            user,
            channel: ChannelId(1),
            results: &[],
            host,
        }
    }

    #[test]
    fn test_range_requires_a_bound() {
        assert!(matches!(
            RangeCheck::new(None, None),
            Err(ConfigError::InvalidBounds(_))
        ));
        assert!(LengthCheck::new(None, None).is_err());
        assert!(RangeCheck::between(5, 1).is_err());
        assert!(RangeCheck::new(Some(1), None).is_ok());
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = RangeCheck::between(1, 10).unwrap();
        assert_ok!(range.check_value(1));
        assert_ok!(range.check_value(10));

        let below = range.check_value(0).unwrap_err();
        assert_eq!(below.to_string(), "Value too small, must be more than 1");
        let above = range.check_value(11).unwrap_err();
        assert_eq!(above.to_string(), "Value too large, must be less than 10");
    }

    #[test]
    fn test_range_custom_templates() {
        let range = RangeCheck::at_most(3).too_large_message("At most {} slots");
        assert_eq!(range.check_value(4).unwrap_err().to_string(), "At most 3 slots");
        assert_ok!(RangeCheck::at_least(-2).check_value(-2));
    }

    #[tokio::test]
    async fn test_length_check_counts_chars() {
        let host = MockHost::new();
        let user = member(100, vec![]);
        let check = LengthCheck::between(2, 3).unwrap();

        assert_ok!(check.check(&ctx(&user, &host), &Answer::from("\u{e9}t\u{e9}")).await);
        let err = check
            .check(&ctx(&user, &host), &Answer::from("a"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Value too short, must be more than 2");
        let err = check
            .check(&ctx(&user, &host), &Answer::from("abcd"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Value too long, must be less than 3");
        assert_err!(check.check(&ctx(&user, &host), &Answer::Int(2)).await);
    }

    #[tokio::test]
    async fn test_emoji_check() {
        let host = MockHost::new();
        let user = member(100, vec![]);
        let check = CurrentGuildEmojiCheck::new();
        let custom = |guild_id| {
            Answer::Emoji(Emoji::Custom(CustomEmoji {
                id: EmojiId(1),
                name: "blob".into(),
                animated: false,
                guild_id,
            }))
        };

        assert_ok!(check.check(&ctx(&user, &host), &Answer::from(":)")).await);
        assert_ok!(
            check
                .check(&ctx(&user, &host), &Answer::Emoji(Emoji::unicode("\u{1f600}")))
                .await
        );
        assert_ok!(check.check(&ctx(&user, &host), &custom(guild().id)).await);

        let err = check
            .check(&ctx(&user, &host), &custom(GuildId(999)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "The emoji is from a different server!");

        let partial = Answer::Emoji(Emoji::Partial {
            id: EmojiId(1),
            name: "blob".into(),
            animated: false,
        });
        assert_err!(check.check(&ctx(&user, &host), &partial).await);

        let stranger = User::new(5, "stranger");
        assert_err!(check.check(&ctx(&stranger, &host), &custom(guild().id)).await);
    }

    #[tokio::test]
    async fn test_reaction_check_uses_reaction_emoji() {
        let host = MockHost::new();
        let user = member(100, vec![]);
        let reaction = |emoji| {
            Answer::Reaction(Reaction {
                message_id: MessageId(1),
                channel_id: ChannelId(1),
                user_id: UserId(100),
                emoji,
            })
        };
        let check = CurrentGuildReactionCheck::new();

        assert_ok!(
            check
                .check(&ctx(&user, &host), &reaction(Emoji::unicode("\u{2705}")))
                .await
        );
        let err = check
            .check(
                &ctx(&user, &host),
                &reaction(Emoji::Partial {
                    id: EmojiId(3),
                    name: "x".into(),
                    animated: false,
                }),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The emoji used in the reaction is from a different server!"
        );
    }

    #[test]
    fn test_role_below_member() {
        let check = RoleBelowMemberCheck::new();
        let user = member(100, vec![role(1, 5)]);

        assert_ok!(check.check_role(&user, &role(2, 4)));
        assert_err!(check.check_role(&user, &role(3, 5)));
        assert_err!(check.check_role(&user, &role(4, 9)));

        let boss = owner(vec![role(1, 5)]);
        assert_ok!(check.check_role(&boss, &role(4, 3)));
        assert_ok!(check.check_role(&boss, &role(5, 9)));

        let outsider = User::new(7, "outsider");
        let err = check.check_role(&outsider, &role(2, 1)).unwrap_err();
        assert_eq!(err.to_string(), "The role selected is above your highest role!");
    }

    #[tokio::test]
    async fn test_combined_checks_fail_fast() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let host = MockHost::new();
        let user = member(100, vec![]);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let combined = combine_checks([
            Arc::new(RangeCheck::at_most(10)) as Arc<dyn Check>,
            Arc::new(check_fn(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })),
        ]);
        assert_eq!(combined.len(), 2);

        assert_ok!(combined.check(&ctx(&user, &host), &Answer::Int(3)).await);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let err = combined
            .check(&ctx(&user, &host), &Answer::Int(11))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Value too large, must be less than 10");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
