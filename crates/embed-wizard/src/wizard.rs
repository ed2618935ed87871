//! The wizard run loop.
//!
//! An [`EmbedWizard`] walks a user through its prompts one at a time. It
//! posts a single embed, waits for each answer on an [`EventSource`],
//! converts and checks it, and rewrites the embed as answers come in.
//!
//! ```text
//!  not started ──start──▶ running ──all answered──▶ completed
//!                            │
//!                            ├── retries exhausted ──▶ failed (MaxRetries)
//!                            ├── cancel keyword/token ─▶ failed (Cancelled)
//!                            └── no input in time ───▶ failed (TimedOut)
//! ```
//!
//! Waiting is one biased `select!` over the cancellation token, the prompt
//! deadline and the next event, so a cancel request always beats an answer
//! that arrives with it. The run returns as soon as the last answer is
//! recorded; cancel requests after that are never read.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut wizard = EmbedWizard::builder(host, channel, user)
//!     .config(WizardConfig::default().title("Server setup"))
//!     .prompt(Prompt::new("Welcome channel").result_type(ResultType::Channel))
//!     .prompt(Prompt::new("Enable greetings?").result_type(ResultType::Bool).reaction_interface())
//!     .converters(ConverterMapping::new().with_entity_converters())
//!     .build()?;
//!
//! match wizard.run(&mut events).await {
//!     Ok(answers) => save(answers),
//!     Err(e) if e.is_failure() => reply(e.to_string()),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use embed_wizard_core::{
    BoxedHost, ChannelId, Embed, EventSource, InboundEvent, InboundMessage, InvocationContext,
    MessageRef, OutgoingMessage, Reaction, User,
};
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Level, debug, info, span, trace, warn};

use crate::answer::Answer;
use crate::check::CheckContext;
use crate::config::WizardConfig;
use crate::converter::ConverterMapping;
use crate::error::{ConfigError, InputError, WizardError, WizardFailure, WizardResult};
use crate::hooks::{EditInPlace, IgnoreInput, InputHandler, ProgressDisplay};
use crate::prompt::{InputKind, Prompt, ResultType};

/// Field name of the closing marker.
pub const END_FIELD_NAME: &str = "End";

/// Field value of the closing marker.
pub const END_FIELD_VALUE: &str = "Wizard has ended";

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`EmbedWizard`].
pub struct EmbedWizardBuilder {
    host: BoxedHost,
    channel: ChannelId,
    user: User,
    config: WizardConfig,
    prompts: Vec<Prompt>,
    converters: ConverterMapping,
    input_handler: Arc<dyn InputHandler>,
    progress: Arc<dyn ProgressDisplay>,
    cancel: Option<CancellationToken>,
}

impl EmbedWizardBuilder {
    pub fn config(mut self, config: WizardConfig) -> Self {
        self.config = config;
        self
    }

    /// Appends a prompt.
    pub fn prompt(mut self, prompt: Prompt) -> Self {
        self.prompts.push(prompt);
        self
    }

    /// Appends several prompts in order.
    pub fn prompts(mut self, prompts: impl IntoIterator<Item = Prompt>) -> Self {
        self.prompts.extend(prompts);
        self
    }

    /// Replaces the converter mapping.
    pub fn converters(mut self, converters: ConverterMapping) -> Self {
        self.converters = converters;
        self
    }

    /// Registers a single converter.
    pub fn converter<C>(mut self, result_type: ResultType, converter: C) -> Self
    where
        C: crate::converter::Converter + 'static,
    {
        self.converters.insert(result_type, Arc::new(converter));
        self
    }

    pub fn input_handler<H: InputHandler + 'static>(mut self, handler: H) -> Self {
        self.input_handler = Arc::new(handler);
        self
    }

    pub fn progress_display<D: ProgressDisplay + 'static>(mut self, display: D) -> Self {
        self.progress = Arc::new(display);
        self
    }

    /// Uses an existing token, e.g. a child of an application-wide one.
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Validates the setup and creates the wizard.
    pub fn build(self) -> Result<EmbedWizard, ConfigError> {
        if self.prompts.is_empty() {
            return Err(ConfigError::NoPrompts);
        }
        self.config.validate()?;
        for prompt in &self.prompts {
            if prompt.max_retries == 0 {
                return Err(ConfigError::InvalidPrompt {
                    title: prompt.title.clone(),
                    reason: "max_retries must be at least 1".into(),
                });
            }
            if !prompt.input.is_reaction() {
                self.converters.get(prompt.result_type)?;
            }
        }

        Ok(EmbedWizard {
            config: self.config,
            prompts: self.prompts,
            host: self.host,
            channel: self.channel,
            user: self.user,
            converters: self.converters,
            input_handler: self.input_handler,
            progress: self.progress,
            cancel: self.cancel.unwrap_or_default(),
            message: None,
            embed: Embed::default(),
            results: Vec::new(),
            completed: false,
        })
    }
}

// ============================================================================
// Wizard
// ============================================================================

/// A multi-step conversation with one user in one channel.
pub struct EmbedWizard {
    config: WizardConfig,
    prompts: Vec<Prompt>,
    host: BoxedHost,
    channel: ChannelId,
    user: User,
    converters: ConverterMapping,
    input_handler: Arc<dyn InputHandler>,
    progress: Arc<dyn ProgressDisplay>,
    cancel: CancellationToken,
    message: Option<MessageRef>,
    embed: Embed,
    results: Vec<Answer>,
    completed: bool,
}

impl EmbedWizard {
    /// Starts building a wizard that talks to `user` in `channel`.
    pub fn builder(host: BoxedHost, channel: ChannelId, user: User) -> EmbedWizardBuilder {
        EmbedWizardBuilder {
            host,
            channel,
            user,
            config: WizardConfig::default(),
            prompts: Vec::new(),
            converters: ConverterMapping::new(),
            input_handler: Arc::new(IgnoreInput),
            progress: Arc::new(EditInPlace),
            cancel: None,
        }
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// The message currently displaying the wizard.
    pub fn message(&self) -> Result<MessageRef, ConfigError> {
        self.message.ok_or(ConfigError::NotStarted)
    }

    /// The embed as last published.
    pub fn embed(&self) -> &Embed {
        &self.embed
    }

    /// Answers collected so far, in prompt order.
    pub fn results(&self) -> &[Answer] {
        &self.results
    }

    /// Looks up the answer of the prompt with `key`.
    pub fn answer(&self, key: &str) -> Option<&Answer> {
        self.prompts
            .iter()
            .zip(&self.results)
            .find(|(prompt, _)| prompt.key.as_deref() == Some(key))
            .map(|(_, answer)| answer)
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns a handle that cancels the run from outside.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Posts the wizard embed with the first prompt waiting.
    pub async fn start(&mut self) -> WizardResult<MessageRef> {
        if self.message.is_some() {
            return Err(ConfigError::AlreadyStarted.into());
        }
        let first = self.prompts.first().ok_or(ConfigError::NoPrompts)?;

        let embed = Embed::new(self.config.title.clone())
            .color(self.config.waiting())
            .field(first.title.clone(), first.get_waiting_message(), false);
        let message = self
            .host
            .send_message(self.channel, OutgoingMessage::Embed(embed.clone()))
            .await?;

        debug!(message_id = %message.message_id, "Wizard started");
        self.embed = embed;
        self.message = Some(message);
        Ok(message)
    }

    /// Runs every prompt in order and returns the answers.
    ///
    /// Terminal outcomes are [`WizardError::Failure`]; the timeout notice is
    /// posted before [`WizardFailure::TimedOut`] is returned.
    pub async fn run<E>(&mut self, events: &mut E) -> WizardResult<Vec<Answer>>
    where
        E: EventSource + ?Sized,
    {
        let span = span!(
            Level::DEBUG,
            "wizard",
            title = %self.config.title,
            channel = %self.channel,
            user = %self.user.id
        );
        self.run_prompts(events).instrument(span).await
    }

    async fn run_prompts<E>(&mut self, events: &mut E) -> WizardResult<Vec<Answer>>
    where
        E: EventSource + ?Sized,
    {
        self.start().await?;

        for index in 0..self.prompts.len() {
            let prompt = &self.prompts[index];
            debug!(index, prompt = %prompt.title, input = ?prompt.input, "Waiting for answer");

            let answer = match self.get_input(prompt, events).await {
                Ok(answer) => answer,
                Err(WizardError::Failure(WizardFailure::TimedOut)) => {
                    return Err(self.on_timeout(prompt).await);
                }
                Err(e) => {
                    if let Some(failure) = e.failure() {
                        info!(index, reason = %failure, "Wizard failed");
                    }
                    return Err(e);
                }
            };

            self.results.push(answer);
            self.update_message(index).await?;
        }

        self.completed = true;
        info!(answers = self.results.len(), "Wizard completed");
        Ok(self.results.clone())
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    /// Asks for one answer, retrying rejected input up to `max_retries` times.
    async fn get_input<E>(&self, prompt: &Prompt, events: &mut E) -> WizardResult<Answer>
    where
        E: EventSource + ?Sized,
    {
        for attempt in 1..=prompt.max_retries {
            let result = match self.get_actual_input(prompt, events).await {
                Ok(answer) => self.post_check(prompt, answer).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(answer) => return Ok(answer),
                Err(WizardError::Input(e)) => {
                    warn!(
                        attempt,
                        max_retries = prompt.max_retries,
                        error = %e,
                        "Answer rejected"
                    );
                    self.handle_error(&e.to_string()).await?;
                }
                Err(e) => return Err(e),
            }
        }
        Err(WizardFailure::MaxRetries.into())
    }

    async fn get_actual_input<E>(&self, prompt: &Prompt, events: &mut E) -> WizardResult<Answer>
    where
        E: EventSource + ?Sized,
    {
        if prompt.input.is_reaction() {
            self.get_reaction_input(prompt, events).await
        } else {
            self.get_message_input(prompt, events).await
        }
    }

    async fn post_check(&self, prompt: &Prompt, answer: Answer) -> WizardResult<Answer> {
        if let Some(check) = &prompt.post_check {
            let ctx = CheckContext {
                user: &self.user,
                channel: self.channel,
                results: &self.results,
                host: self.host.as_ref(),
            };
            check.check(&ctx, &answer).await?;
        }
        Ok(answer)
    }

    async fn get_message_input<E>(&self, prompt: &Prompt, events: &mut E) -> WizardResult<Answer>
    where
        E: EventSource + ?Sized,
    {
        let converter = self.converters.get(prompt.result_type)?;
        let message = self
            .wait_for(events, self.timeout(prompt), |event| {
                let own = event
                    .as_message()
                    .is_some_and(|message| self.is_own_message(message));
                if !own || !prompt.accepts(&event) {
                    return None;
                }
                event.into_message()
            })
            .await?;
        trace!(message_id = %message.id, "Message input received");

        let ctx = InvocationContext::from_message(self.host.as_ref(), &message);
        let result = converter.convert(&ctx, &message.content).await;

        let input_error = match &result {
            Err(WizardError::Input(e)) => Some(e),
            _ => None,
        };
        self.handle_message_input(&message, input_error).await;
        result
    }

    async fn get_reaction_input<E>(&self, prompt: &Prompt, events: &mut E) -> WizardResult<Answer>
    where
        E: EventSource + ?Sized,
    {
        match (prompt.input, prompt.result_type) {
            (InputKind::BooleanReaction, ResultType::Bool)
            | (InputKind::EmojiReaction, ResultType::Emoji)
            | (InputKind::GenericReaction, ResultType::Reaction) => {}
            _ => {
                return Err(WizardError::NotImplemented(format!(
                    "Reaction input for given result type {} is unavailable!",
                    prompt.result_type
                )));
            }
        }

        let displayed = self.message()?;
        let boolean = prompt.input == InputKind::BooleanReaction;
        if boolean {
            self.host.add_reaction(displayed, &self.config.yes()).await?;
            self.host.add_reaction(displayed, &self.config.no()).await?;
        }

        let reaction = self
            .wait_for(events, self.timeout(prompt), |event| {
                let wanted = event.as_reaction().is_some_and(|reaction| {
                    reaction.user_id == self.user.id
                        && reaction.message_id == displayed.message_id
                        && (!boolean
                            || reaction.emoji.is(&self.config.yes_emoji)
                            || reaction.emoji.is(&self.config.no_emoji))
                });
                if !wanted || !prompt.accepts(&event) {
                    return None;
                }
                event.into_reaction()
            })
            .await?;
        trace!(emoji = %reaction.emoji, "Reaction input received");

        self.handle_reaction_input(displayed, &reaction).await;

        Ok(match prompt.input {
            InputKind::BooleanReaction => {
                Answer::Bool(reaction.emoji.is(&self.config.yes_emoji))
            }
            InputKind::EmojiReaction => Answer::Emoji(reaction.emoji),
            _ => Answer::Reaction(reaction),
        })
    }

    /// Waits for the first event `select` maps to a value.
    ///
    /// Fails on cancellation (token or keyword), at the deadline, or when the
    /// source closes.
    async fn wait_for<E, T>(
        &self,
        events: &mut E,
        timeout: Duration,
        mut select: impl FnMut(InboundEvent) -> Option<T>,
    ) -> WizardResult<T>
    where
        E: EventSource + ?Sized,
    {
        let deadline = Instant::now() + timeout;
        loop {
            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    return Err(WizardFailure::Cancelled.into());
                }
                _ = sleep_until(deadline) => {
                    return Err(WizardFailure::TimedOut.into());
                }
                event = events.next_event() => event,
            };

            let Some(event) = event else {
                return Err(WizardError::EventsClosed);
            };
            if self.is_cancel_request(&event) {
                debug!("Cancel keyword received");
                return Err(WizardFailure::Cancelled.into());
            }

            let name = event.event_name();
            match select(event) {
                Some(value) => return Ok(value),
                None => trace!(event = name, "Ignoring event"),
            }
        }
    }

    fn timeout(&self, prompt: &Prompt) -> Duration {
        prompt.timeout_or(self.config.default_timeout_duration())
    }

    fn is_own_message(&self, message: &InboundMessage) -> bool {
        message.channel_id == self.channel && message.author == self.user
    }

    fn is_cancel_request(&self, event: &InboundEvent) -> bool {
        event.as_message().is_some_and(|message| {
            self.is_own_message(message) && message.content.to_lowercase() == self.config.cancel_text
        })
    }

    // ------------------------------------------------------------------------
    // Hooks
    // ------------------------------------------------------------------------

    async fn handle_message_input(&self, message: &InboundMessage, error: Option<&InputError>) {
        if let Err(e) = self
            .input_handler
            .on_message_input(self.host.as_ref(), message, error)
            .await
        {
            warn!(error = %e, message_id = %message.id, "Message input hook failed");
        }
    }

    async fn handle_reaction_input(&self, displayed: MessageRef, reaction: &Reaction) {
        if let Err(e) = self
            .input_handler
            .on_reaction_input(self.host.as_ref(), displayed, reaction)
            .await
        {
            warn!(error = %e, "Reaction input hook failed");
        }
    }

    /// Posts an error notice to the wizard channel.
    async fn handle_error(&self, text: &str) -> WizardResult<()> {
        self.host
            .send_message(self.channel, OutgoingMessage::text(text))
            .await?;
        Ok(())
    }

    async fn on_timeout(&self, prompt: &Prompt) -> WizardError {
        info!(prompt = %prompt.title, "Wizard timed out");
        let failure = WizardFailure::TimedOut;
        match self.handle_error(&failure.to_string()).await {
            Ok(()) => failure.into(),
            Err(e) => e,
        }
    }

    // ------------------------------------------------------------------------
    // Progress
    // ------------------------------------------------------------------------

    /// Returns the text shown for an answer.
    ///
    /// Prefers the prompt's formatter, then the mention of entity answers,
    /// then the plain string form.
    pub fn to_str(&self, prompt: &Prompt, answer: &Answer) -> String {
        if let Some(format) = &prompt.to_str {
            return format(answer);
        }
        answer.mention().unwrap_or_else(|| answer.to_string())
    }

    /// Replaces the waiting field of prompt `index` with its answer and
    /// appends the next waiting field or the closing marker.
    fn update_embed(&mut self, index: usize) {
        let (Some(prompt), Some(answer)) = (self.prompts.get(index), self.results.get(index)) else {
            return;
        };
        let value = self.to_str(prompt, answer);

        self.embed.pop_field();
        self.embed.add_field(prompt.title.clone(), value, false);
        match self.prompts.get(index + 1) {
            Some(next) => {
                self.embed
                    .add_field(next.title.clone(), next.get_waiting_message(), false);
            }
            None => {
                self.embed.set_color(self.config.success());
                self.embed.add_field(END_FIELD_NAME, END_FIELD_VALUE, false);
            }
        }
    }

    async fn update_message(&mut self, index: usize) -> WizardResult<()> {
        self.update_embed(index);
        let current = self.message()?;
        let shown = self
            .progress
            .publish(self.host.as_ref(), current, &self.embed)
            .await?;
        if shown != current {
            debug!(message_id = %shown.message_id, "Wizard message moved");
        }
        self.message = Some(shown);
        Ok(())
    }
}

impl fmt::Debug for EmbedWizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbedWizard")
            .field("title", &self.config.title)
            .field("channel", &self.channel)
            .field("user", &self.user.id)
            .field("prompts", &self.prompts.len())
            .field("results", &self.results.len())
            .field("message", &self.message)
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}
