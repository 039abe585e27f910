//! Slash-command parsing.
//!
//! A line starting with [`COMMAND_PREFIX`] is split on the first run of
//! whitespace into a command name and its argument string; the name is
//! matched exactly and case-sensitively. Any other line is an implicit ask.

/// Marks a line as a command rather than an implicit ask.
pub const COMMAND_PREFIX: char = '/';

/// Parsed command variants handled by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Remember(String),
    Clear,
    Quit,
    Help { error: Option<String> },
    Unknown(String),
}

/// Registered command metadata, used for `/help` output. Names are unique
/// and must stay in sync with the `parse` match below.
#[derive(Debug, Clone, Copy)]
pub struct CommandEntry {
    pub name: &'static str,
    pub help: &'static str,
}

pub const COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        name: "ask",
        help: "[query] Ask the knowledge base a question. This is the default command so you don't have to specify it",
    },
    CommandEntry {
        name: "remember",
        help: "[data] Give the knowledge base context to remember for future conversations",
    },
    CommandEntry {
        name: "clear",
        help: "clears the screen",
    },
    CommandEntry {
        name: "quit",
        help: "exit the application",
    },
    CommandEntry {
        name: "help",
        help: "print this help message",
    },
];

/// Parse a submitted input line into a Command.
pub fn parse(input: &str) -> Command {
    let Some(rest) = input.strip_prefix(COMMAND_PREFIX) else {
        return Command::Ask(input.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim_start()),
        None => (rest, ""),
    };

    if name.is_empty() {
        return Command::Help {
            error: Some("prefix should be followed by a command".to_string()),
        };
    }

    match name {
        "ask" => Command::Ask(arg.to_string()),
        "remember" => Command::Remember(arg.to_string()),
        "clear" => Command::Clear,
        "quit" => Command::Quit,
        "help" => Command::Help { error: None },
        other => Command::Unknown(other.to_string()),
    }
}
