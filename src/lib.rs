//! Cyberpunk portfolio terminal core.
//!
//! Invariant: command handlers never mutate navigation state in place. Every dispatch takes a
//! [`TerminalState`] and may hand back a new one, which only the session adopts.
//!
//! # Public API Overview
//! - Build the file system with [`initialize_file_system`] from any [`ContentSource`].
//! - Drive a [`TerminalSession`] with key events or the `on_*` handlers; host effects go
//!   through [`HostOps`].
//! - Query completions with [`get_tab_completions`] and route global chords with
//!   [`handle_keyboard_shortcuts`].
//! - Use [`CommandDispatcher`] directly for one-off command execution.

pub mod commands;
pub mod config;
pub mod core;
pub mod logging;
pub mod runtime;

/// Commands and their results.
pub use crate::commands::{
    CommandError, CommandName, CommandOutcome, CommandResult, GameKind, HostOps, PowerAction,
};

/// Paths, the virtual file system and navigation state.
pub use crate::core::path::{display_path, prompt_path, resolve};
pub use crate::core::state::TerminalState;
pub use crate::core::vfs::{initialize_file_system, FileContent, FileSystemNode, LookupError, Vfs};

/// Completion and keyboard handling.
pub use crate::core::autocomplete::{complete, get_tab_completions, Completion, CompletionKind};
pub use crate::core::keys::{HostPlatform, Key, KeyEvent};
pub use crate::core::shortcuts::handle_keyboard_shortcuts;

/// Session runtime.
pub use crate::runtime::{
    Clock, CommandDispatcher, DispatchContext, ManualClock, RescueControl, RescueMode,
    SystemClock, TerminalSession,
};

/// Environment configuration and logging.
pub use crate::config::EnvConfig;
pub use crate::logging::{init_file_logging, LoggingError};

pub use content_source::ContentSource;
