//! Command table and handler results.

pub mod cd;
pub mod info;
pub mod ls;
pub mod read;
pub mod shutdown;
pub mod systemctl;

use thiserror::Error;

pub use crate::core::host::{GameKind, HostOps, PowerAction};
use crate::core::state::TerminalState;

/// What the session should do with a dispatch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Output(String),
    Silent,
    ClearHistory,
    ExitTerminal,
    OpenGame(GameKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub outcome: CommandOutcome,
    /// Replacement state for the session to adopt, when navigation happened.
    pub state: Option<TerminalState>,
}

impl CommandResult {
    pub fn outcome(outcome: CommandOutcome) -> Self {
        Self {
            outcome,
            state: None,
        }
    }

    pub fn output(text: impl Into<String>) -> Self {
        Self::outcome(CommandOutcome::Output(text.into()))
    }

    pub fn silent() -> Self {
        Self::outcome(CommandOutcome::Silent)
    }

    #[must_use]
    pub fn with_state(mut self, state: TerminalState) -> Self {
        self.state = Some(state);
        self
    }

    /// Output text, if any. Convenience for tests and logging.
    pub fn text(&self) -> Option<&str> {
        match &self.outcome {
            CommandOutcome::Output(text) => Some(text),
            _ => None,
        }
    }
}

/// Failures that are not user mistakes. User errors are plain output text.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{operation} failed: {message}")]
    Host {
        operation: &'static str,
        message: String,
    },
    #[error("{path}: file has no content")]
    UntaggedFile { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandName {
    Help,
    Clear,
    Whoami,
    Status,
    Cd,
    Ls,
    Pwd,
    Read,
    Echo,
    Date,
    History,
    Systemctl,
    Shutdown,
    Reboot,
    Poweroff,
    Halt,
    Reload,
    Exit,
    Quit,
    Tetris,
    Snake,
}

impl CommandName {
    pub const ALL: [CommandName; 21] = [
        Self::Help,
        Self::Clear,
        Self::Whoami,
        Self::Status,
        Self::Cd,
        Self::Ls,
        Self::Pwd,
        Self::Read,
        Self::Echo,
        Self::Date,
        Self::History,
        Self::Systemctl,
        Self::Shutdown,
        Self::Reboot,
        Self::Poweroff,
        Self::Halt,
        Self::Reload,
        Self::Exit,
        Self::Quit,
        Self::Tetris,
        Self::Snake,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Clear => "clear",
            Self::Whoami => "whoami",
            Self::Status => "status",
            Self::Cd => "cd",
            Self::Ls => "ls",
            Self::Pwd => "pwd",
            Self::Read => "read",
            Self::Echo => "echo",
            Self::Date => "date",
            Self::History => "history",
            Self::Systemctl => "systemctl",
            Self::Shutdown => "shutdown",
            Self::Reboot => "reboot",
            Self::Poweroff => "poweroff",
            Self::Halt => "halt",
            Self::Reload => "reload",
            Self::Exit => "exit",
            Self::Quit => "quit",
            Self::Tetris => "tetris",
            Self::Snake => "snake",
        }
    }

    /// Case-insensitive lookup of a command word.
    pub fn parse(word: &str) -> Option<Self> {
        let lowered = word.to_lowercase();
        Self::ALL.into_iter().find(|name| name.as_str() == lowered)
    }
}

/// Every command word, in table order.
pub const COMMAND_NAMES: [&str; 21] = {
    let mut names = [""; 21];
    let mut idx = 0;
    while idx < CommandName::ALL.len() {
        names[idx] = CommandName::ALL[idx].as_str();
        idx += 1;
    }
    names
};

/// Splits a line on the first run of whitespace into the command word and the remainder.
pub fn split_command(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (input, ""),
    }
}
