//! REPL input parsing.

use lingua_core::message::MessageId;

pub const COMMANDS: &[&str] = &[
    "/translate",
    "/summarize",
    "/dismiss",
    "/clear",
    "/dark",
    "/history",
    "/languages",
    "/help",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Translate { id: MessageId, language: String },
    Summarize(MessageId),
    /// Drops a failed translation entry.
    Dismiss { id: MessageId, error_id: String },
    Clear,
    Dark,
    History,
    Languages,
    Help,
    Quit,
    /// A malformed slash command, with a usage hint.
    Invalid(String),
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed == "quit" || trimmed == "exit" {
        return Some(Command::Quit);
    }
    if !trimmed.starts_with('/') {
        return Some(Command::Send(line.to_string()));
    }

    let mut words = trimmed.split_whitespace();
    let name = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let command = match (name, args.as_slice()) {
        ("/translate", [id, language]) => match id.parse() {
            Ok(id) => Command::Translate {
                id,
                language: language.to_string(),
            },
            Err(_) => Command::Invalid(format!("'{}' is not a message id", id)),
        },
        ("/translate", _) => Command::Invalid("usage: /translate <id> <language>".into()),
        ("/summarize", [id]) => match id.parse() {
            Ok(id) => Command::Summarize(id),
            Err(_) => Command::Invalid(format!("'{}' is not a message id", id)),
        },
        ("/summarize", _) => Command::Invalid("usage: /summarize <id>".into()),
        ("/dismiss", [id, error_id]) => match id.parse() {
            Ok(id) => Command::Dismiss {
                id,
                error_id: error_id.to_string(),
            },
            Err(_) => Command::Invalid(format!("'{}' is not a message id", id)),
        },
        ("/dismiss", _) => Command::Invalid("usage: /dismiss <id> <error-id>".into()),
        ("/clear", []) => Command::Clear,
        ("/dark", []) => Command::Dark,
        ("/history", []) => Command::History,
        ("/languages", []) => Command::Languages,
        ("/help", []) => Command::Help,
        (other, _) => Command::Invalid(format!("unknown command {}", other)),
    };
    Some(command)
}
