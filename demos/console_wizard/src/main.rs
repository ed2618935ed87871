//! Console Wizard Example
//!
//! Runs an embed wizard in the terminal. Every line typed on stdin becomes a
//! chat message from the invoking user; embeds and notices the wizard posts
//! are printed as JSON.
//!
//! # Input
//!
//! ```text
//! Alice            answer a text prompt
//! 42               answer a number prompt
//! :react 🎉        react to the wizard message
//! cancel           cancel the wizard
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --package console-wizard -- --title "Profile" --timeout 120
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use embed_wizard::{EmbedWizard, LengthCheck, Prompt, RangeCheck, ResultType, WizardError};
use embed_wizard_core::{
    ApiResult, ChannelId, ChatHost, Emoji, InboundEvent, InboundMessage, MessageId, MessageRef,
    OutgoingMessage, Reaction, User, UserId,
};
use embed_wizard_runtime::{ConfigLoader, init_from_config};
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// The one channel of the console.
const CONSOLE_CHANNEL: ChannelId = ChannelId(1);

/// The user typing on stdin.
const CONSOLE_USER: UserId = UserId(1);

/// Prefix of the reaction command.
const REACT_PREFIX: &str = ":react ";

#[derive(Debug, Parser)]
#[command(about = "Answer an embed wizard from the terminal")]
struct Args {
    /// Configuration file (TOML or YAML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wizard title, overriding the configuration.
    #[arg(long)]
    title: Option<String>,

    /// Prompt timeout in seconds, overriding the configuration.
    #[arg(long)]
    timeout: Option<u64>,
}

// ============================================================================
// Console Host
// ============================================================================

#[derive(Debug, Default)]
struct HostState {
    next_id: u64,
    /// The last embed posted; reactions typed on stdin target it.
    current: Option<MessageRef>,
}

/// A chat host that prints to stdout.
#[derive(Debug, Default)]
struct ConsoleHost {
    state: Mutex<HostState>,
}

impl ConsoleHost {
    fn current_message(&self) -> Option<MessageRef> {
        self.state.lock().current
    }

    fn print(label: &str, message: MessageRef, content: &OutgoingMessage) {
        match content {
            OutgoingMessage::Text(text) => println!("[{label} #{}] {text}", message.message_id),
            OutgoingMessage::Embed(embed) => {
                let json = serde_json::to_string_pretty(embed)
                    .unwrap_or_else(|e| format!("<unprintable embed: {e}>"));
                println!("[{label} #{}]\n{json}", message.message_id);
            }
        }
    }
}

#[async_trait]
impl ChatHost for ConsoleHost {
    async fn send_message(
        &self,
        channel: ChannelId,
        content: OutgoingMessage,
    ) -> ApiResult<MessageRef> {
        let message = {
            let mut state = self.state.lock();
            state.next_id += 1;
            let message = MessageRef::new(channel, MessageId(state.next_id));
            if matches!(content, OutgoingMessage::Embed(_)) {
                state.current = Some(message);
            }
            message
        };
        Self::print("send", message, &content);
        Ok(message)
    }

    async fn edit_message(&self, message: MessageRef, content: OutgoingMessage) -> ApiResult<()> {
        Self::print("edit", message, &content);
        Ok(())
    }

    async fn delete_message(&self, message: MessageRef) -> ApiResult<()> {
        println!("[delete #{}]", message.message_id);
        Ok(())
    }

    async fn add_reaction(&self, message: MessageRef, emoji: &Emoji) -> ApiResult<()> {
        println!("[react #{}] {emoji}", message.message_id);
        Ok(())
    }

    async fn clear_reactions(&self, message: MessageRef) -> ApiResult<()> {
        println!("[clear reactions #{}]", message.message_id);
        Ok(())
    }
}

// ============================================================================
// Stdin Events
// ============================================================================

/// Turns one input line into an event.
fn parse_line(host: &ConsoleHost, author: &User, id: u64, line: &str) -> Option<InboundEvent> {
    if let Some(emoji) = line.strip_prefix(REACT_PREFIX) {
        let Some(target) = host.current_message() else {
            println!("Nothing to react to yet");
            return None;
        };
        return Some(
            Reaction {
                message_id: target.message_id,
                channel_id: target.channel_id,
                user_id: author.id,
                emoji: Emoji::unicode(emoji.trim()),
            }
            .into(),
        );
    }

    Some(
        InboundMessage {
            id: MessageId(id),
            channel_id: CONSOLE_CHANNEL,
            guild_id: None,
            author: author.clone(),
            content: line.to_string(),
        }
        .into(),
    )
}

/// Forwards stdin lines until EOF or until the wizard stops listening.
async fn read_stdin(
    host: Arc<ConsoleHost>,
    author: User,
    tx: mpsc::UnboundedSender<InboundEvent>,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    // Inbound ids live in their own range so they never collide with posted ones.
    let mut next_id = 1_000_000;

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                next_id += 1;
                let Some(event) = parse_line(&host, &author, next_id, &line) else {
                    continue;
                };
                debug!(kind = %event.kind(), "Forwarding console input");
                if tx.send(event).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn profile_prompts() -> Result<Vec<Prompt>> {
    Ok(vec![
        Prompt::new("Name")
            .key("name")
            .description("What should we call you?")
            .post_check(LengthCheck::between(2, 32)?),
        Prompt::new("Age")
            .key("age")
            .description("How old are you?")
            .result_type(ResultType::Int)
            .post_check(RangeCheck::between(1, 150)?),
        Prompt::new("Favourite emoji")
            .key("emoji")
            .description("React to this message with your favourite emoji (`:react <emoji>`).")
            .result_type(ResultType::Emoji),
        Prompt::new("Subscribe")
            .key("subscribe")
            .description("Receive the weekly digest?")
            .result_type(ResultType::Bool)
            .reaction_interface()
            .to_str(|answer| match answer.as_bool() {
                Some(true) => "Yes".to_string(),
                _ => "No".to_string(),
            }),
    ])
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    let mut config = loader
        .load_validated()
        .context("failed to load configuration")?;

    if let Some(title) = args.title {
        config.wizard = config.wizard.title(title);
    }
    if let Some(secs) = args.timeout {
        config.wizard = config.wizard.default_timeout(Duration::from_secs(secs));
    }
    embed_wizard_runtime::config::validate_wizard_config(&config.wizard)?;

    init_from_config(&config.logging);

    let host = Arc::new(ConsoleHost::default());
    let author = User::new(CONSOLE_USER, "console");

    let (tx, mut events) = mpsc::unbounded_channel();
    tokio::spawn(read_stdin(host.clone(), author.clone(), tx));

    let mut wizard = EmbedWizard::builder(host, CONSOLE_CHANNEL, author)
        .config(config.wizard)
        .prompts(profile_prompts()?)
        .build()?;

    info!(prompts = wizard.prompts().len(), "Starting wizard");
    println!(
        "Type your answers, `{REACT_PREFIX}<emoji>` to react, `{}` to stop.",
        wizard.config().cancel_text
    );

    match wizard.run(&mut events).await {
        Ok(answers) => {
            println!("Wizard finished:");
            for (prompt, answer) in wizard.prompts().iter().zip(&answers) {
                println!("  {}: {}", prompt.title, wizard.to_str(prompt, answer));
            }
        }
        Err(WizardError::Failure(failure)) => println!("{failure}"),
        Err(WizardError::EventsClosed) => println!("Input closed before the wizard finished"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
