mod command;
mod render;

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use lingua_application::{ChatService, SendOutcome, SummarizeOutcome, TranslateOutcome};
use lingua_core::config::LanguagesConfig;
use lingua_core::message::MessageId;
use lingua_core::storage::KeyValueStore;
use lingua_infrastructure::{
    ConfigService, FileKeyValueStore, LinguaPaths, SlotHistoryRepository, SlotPreferenceRepository,
};
use lingua_interaction::OpenAiCompatProvider;

use crate::command::{COMMANDS, Command, parse_command};
use crate::render::{Palette, render_languages, render_message};

/// rustyline helper: slash command completion, highlighting and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Shared state handed to background tasks.
struct Session {
    chat: ChatService,
    languages: LanguagesConfig,
}

impl Session {
    fn palette(&self) -> Palette {
        Palette::for_mode(self.chat.dark_mode())
    }

    async fn render_id(&self, id: MessageId) -> Vec<String> {
        match self.chat.store().find(id).await {
            Some(message) => render_message(&message, &self.palette(), &self.languages),
            None => Vec::new(),
        }
    }

    fn error_line(&self, message: impl std::fmt::Display) -> Vec<String> {
        vec![format!("{}", message).color(self.palette().error).to_string()]
    }

    async fn run(&self, command: Command) -> Vec<String> {
        match command {
            Command::Send(text) => match self.chat.send_text(&text).await {
                Ok(SendOutcome::Detected {
                    user_message_id,
                    result_message_id,
                    ..
                }) => {
                    let mut lines = self.render_id(user_message_id).await;
                    lines.extend(self.render_id(result_message_id).await);
                    lines
                }
                Ok(SendOutcome::Failed { error, .. }) => self.error_line(error),
                Ok(SendOutcome::Ignored) => Vec::new(),
                Err(e) => self.error_line(e),
            },
            Command::Translate { id, language } => {
                match self.chat.translate_to(id, &language).await {
                    Ok(TranslateOutcome::Busy { current }) => self.error_line(format!(
                        "Still translating message {}, try again shortly",
                        current
                    )),
                    Ok(outcome) => {
                        tracing::debug!("Translation anchor {:?}", outcome.anchor());
                        self.render_id(id).await
                    }
                    Err(e) => self.error_line(e),
                }
            }
            Command::Summarize(id) => match self.chat.summarize(id).await {
                Ok(SummarizeOutcome::Summarized { .. } | SummarizeOutcome::Failed { .. }) => {
                    self.render_id(id).await
                }
                Err(e) => self.error_line(e),
            },
            Command::Dismiss { id, error_id } => {
                match self.chat.dismiss_translation_error(id, &error_id).await {
                    Ok(()) => self.render_id(id).await,
                    Err(e) => self.error_line(e),
                }
            }
            Command::Clear => match self.chat.clear_chat().await {
                Ok(()) => vec!["Chat cleared.".color(self.palette().muted).to_string()],
                Err(e) => self.error_line(e),
            },
            Command::Dark => match self.chat.toggle_dark_mode().await {
                Ok(enabled) => vec![
                    format!("Dark mode {}", if enabled { "on" } else { "off" })
                        .color(self.palette().accent)
                        .to_string(),
                ],
                Err(e) => self.error_line(e),
            },
            Command::History => {
                let palette = self.palette();
                let messages = self.chat.messages().await;
                if messages.is_empty() {
                    return vec!["No messages yet.".color(palette.muted).to_string()];
                }
                messages
                    .iter()
                    .flat_map(|m| render_message(m, &palette, &self.languages))
                    .collect()
            }
            Command::Languages => render_languages(&self.languages, &self.palette()),
            Command::Help => help_lines(),
            Command::Invalid(hint) => self.error_line(hint),
            Command::Quit => Vec::new(),
        }
    }
}

fn help_lines() -> Vec<String> {
    [
        "Type any text to detect its language.",
        "/translate <id> <language>  translate a detected message",
        "/summarize <id>             summarize a long English message",
        "/dismiss <id> <error-id>    remove a failed translation",
        "/history                    show the conversation",
        "/languages                  list translation targets",
        "/dark                       toggle dark mode",
        "/clear                      clear the conversation",
        "quit                        exit",
    ]
    .iter()
    .map(|line| line.bright_black().to_string())
    .collect()
}

fn init_tracing() -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("").add_directive("lingua=info".parse()?),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    // ===== Backend Initialization =====
    let config = ConfigService::new()?.get_config()?;
    let slots: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(LinguaPaths::slots_dir()?));
    let provider = OpenAiCompatProvider::from_config(&config)?;

    let chat = ChatService::open(
        Arc::new(SlotHistoryRepository::new(slots.clone())),
        Arc::new(SlotPreferenceRepository::new(slots)),
        provider.capabilities(),
        &config,
    )
    .await;
    let session = Arc::new(Session {
        chat,
        languages: config.languages.clone(),
    });

    // Rendered output from background tasks
    let (output_tx, mut output_rx) = mpsc::channel::<Vec<String>>(32);
    let printer = tokio::spawn(async move {
        while let Some(lines) = output_rx.recv().await {
            for line in lines {
                println!("{}", line);
            }
        }
    });

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Lingua ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message to detect its language, '/help' for commands, or 'quit' to exit."
            .bright_black()
    );
    if let Some(banner) = session.chat.error() {
        println!("{}", banner.red());
    }
    if !session.chat.store().is_empty().await {
        for line in session.run(Command::History).await {
            println!("{}", line);
        }
    }
    println!();

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let Some(command) = parse_command(&line) else {
                    continue;
                };
                if command == Command::Quit {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                let _ = rl.add_history_entry(line.as_str());

                let tx = output_tx.clone();
                let session = Arc::clone(&session);
                tokio::spawn(async move {
                    let lines = session.run(command).await;
                    if !lines.is_empty() {
                        let _ = tx.send(lines).await;
                    }
                });
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    drop(output_tx);
    let _ = printer.await;

    Ok(())
}
