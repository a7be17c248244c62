//! The terminal session: display history, command recall, dispatch and completion.
//!
//! The session is the only stateful orchestrator. Hosts feed it key events (or call the
//! `on_*` handlers directly), pass their [`HostOps`] and rescue flag in, and render
//! [`TerminalSession::history`] plus [`TerminalSession::prompt`] + [`TerminalSession::input`].

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use content_source::ContentSource;
use session_store::KeyValueStore;
use unicode_segmentation::UnicodeSegmentation;

use crate::commands::shutdown::broadcast;
use crate::commands::{CommandOutcome, GameKind, HostOps};
use crate::core::autocomplete::{common_prefix, complete};
use crate::core::keys::{HostPlatform, Key, KeyEvent};
use crate::core::path::prompt_path;
use crate::core::state::TerminalState;
use crate::core::vfs::{initialize_file_system, Vfs};
use crate::runtime::clock::Clock;
use crate::runtime::dispatcher::{CommandDispatcher, DispatchContext};
use crate::runtime::persistence::HistoryPersistence;
use crate::runtime::rescue::RescueControl;

pub const WELCOME_BANNER: &str = "\
CYBERDECK OS v2.077 // NEURAL LINK ESTABLISHED
Welcome, netrunner. You are jacked into the portfolio mainframe.
Type 'help' to list commands, 'ls' to look around, 'cd blog' to start reading.";

/// Recall over submitted commands. `cursor` counts back from the most recent entry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CommandRecall {
    cursor: Option<usize>,
}

impl CommandRecall {
    fn reset(&mut self) {
        self.cursor = None;
    }

    fn previous<'a>(&mut self, entries: &'a [String]) -> Option<&'a str> {
        if entries.is_empty() {
            return None;
        }
        let cursor = match self.cursor {
            Some(index) => (index + 1).min(entries.len() - 1),
            None => 0,
        };
        self.cursor = Some(cursor);
        Some(&entries[entries.len() - 1 - cursor])
    }

    /// `Some("")` when stepping past the newest entry back to an empty line.
    fn next<'a>(&mut self, entries: &'a [String]) -> Option<&'a str> {
        match self.cursor? {
            0 => {
                self.cursor = None;
                Some("")
            }
            index => {
                let cursor = (index - 1).min(entries.len().saturating_sub(1));
                self.cursor = Some(cursor);
                entries.get(entries.len().saturating_sub(1 + cursor)).map(String::as_str)
            }
        }
    }
}

pub struct TerminalSession<S: KeyValueStore> {
    persistence: HistoryPersistence<S>,
    dispatcher: CommandDispatcher,
    clock: Arc<dyn Clock>,
    platform: HostPlatform,
    state: Option<TerminalState>,
    history: Vec<String>,
    command_history: Vec<String>,
    recall: CommandRecall,
    input: String,
    is_open: bool,
    open_game: Option<GameKind>,
}

impl<S: KeyValueStore> TerminalSession<S> {
    /// Restores persisted history, seeding the welcome banner on the very first run.
    pub fn new(store: S, platform: HostPlatform, clock: Arc<dyn Clock>) -> Self {
        let mut persistence = HistoryPersistence::new(store);
        let history = match persistence.load_history() {
            Some(history) => history,
            None if !persistence.banner_shown() => {
                let seeded = vec![WELCOME_BANNER.to_string()];
                persistence.save_history(&seeded);
                persistence.mark_banner_shown();
                seeded
            }
            None => Vec::new(),
        };
        let command_history = persistence.load_command_history();

        Self {
            persistence,
            dispatcher: CommandDispatcher::new(),
            clock,
            platform,
            state: None,
            history,
            command_history,
            recall: CommandRecall::default(),
            input: String::new(),
            is_open: false,
            open_game: None,
        }
    }

    /// Builds the VFS. A failing content source still leaves a usable, empty tree.
    pub async fn initialize<C: ContentSource>(&mut self, source: &C) {
        let vfs = match initialize_file_system(source).await {
            Ok(vfs) => vfs,
            Err(err) => {
                tracing::warn!(error = %err, "content unavailable, continuing with an empty file system");
                Vfs::default()
            }
        };
        self.initialize_with(vfs);
    }

    pub fn initialize_with(&mut self, vfs: Vfs) {
        self.state = Some(TerminalState::new(vfs));
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&TerminalState> {
        self.state.as_ref()
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn persistence(&self) -> &HistoryPersistence<S> {
        &self.persistence
    }

    pub fn platform(&self) -> HostPlatform {
        self.platform
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn command_history(&self) -> &[String] {
        &self.command_history
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn history_cursor(&self) -> Option<usize> {
        self.recall.cursor
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn open_game(&self) -> Option<GameKind> {
        self.open_game
    }

    pub fn close_game(&mut self) {
        self.open_game = None;
    }

    pub fn prompt(&self, rescue: &dyn RescueControl) -> String {
        let path = prompt_path(self.state.as_ref().map_or(&[][..], |state| state.current_path.as_slice()));
        if rescue.is_active() {
            format!("root@rescue:{path}# ")
        } else {
            format!("guest@cyberdeck:{path}$ ")
        }
    }

    pub fn on_input_replace(&mut self, text: String) {
        self.input = text;
        self.recall.reset();
    }

    pub fn on_history_previous(&mut self) {
        if let Some(previous) = self.recall.previous(&self.command_history) {
            self.input = previous.to_string();
        }
    }

    pub fn on_history_next(&mut self) {
        if let Some(next) = self.recall.next(&self.command_history) {
            self.input = next.to_string();
        }
    }

    pub fn on_submit(&mut self, host: &mut dyn HostOps, rescue: &mut dyn RescueControl) {
        let Some(state) = self.state.clone() else {
            tracing::debug!("input ignored until the file system is ready");
            return;
        };

        let submitted = std::mem::take(&mut self.input);
        let command = submitted.trim().to_string();
        self.recall.reset();
        if command.is_empty() {
            return;
        }

        let prompt = self.prompt(&*rescue);
        self.push_history(format!("{prompt}{command}"));
        self.command_history.push(command.clone());
        self.persistence.save_command_history(&self.command_history);

        let now = self.clock.now();
        let platform = self.platform;
        let dispatcher = &mut self.dispatcher;
        let command_history = &self.command_history;
        let dispatched = catch_unwind(AssertUnwindSafe(|| {
            let mut ctx = DispatchContext {
                host: &mut *host,
                rescue: &mut *rescue,
                platform,
                command_history,
                now,
            };
            dispatcher.execute(&command, &state, &mut ctx)
        }));

        match dispatched {
            Ok(Ok(result)) => {
                if let Some(next_state) = result.state {
                    self.state = Some(next_state);
                }
                self.apply_outcome(result.outcome, host);
            }
            Ok(Err(err)) => {
                tracing::warn!(command = %command, error = %err, "command failed");
                self.push_history(format!("Error: {err}"));
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(command = %command, message = %message, "command panicked");
                self.push_history(format!("Error: {message}"));
            }
        }
    }

    fn apply_outcome(&mut self, outcome: CommandOutcome, host: &mut dyn HostOps) {
        match outcome {
            CommandOutcome::Output(text) => {
                if !text.is_empty() {
                    self.push_history(text);
                }
            }
            CommandOutcome::Silent => {}
            CommandOutcome::ClearHistory => {
                self.history.clear();
                self.persistence.save_history(&self.history);
            }
            CommandOutcome::ExitTerminal => {
                self.is_open = false;
                host.close_terminal();
            }
            CommandOutcome::OpenGame(game) => {
                self.open_game = Some(game);
                host.open_game(game);
                self.push_history(format!("Launching {}...", game.title()));
            }
        }
    }

    /// Single candidate: insert it. Several: list them and extend the input to their common
    /// prefix.
    pub fn on_tab(&mut self, rescue: &dyn RescueControl) {
        let Some(state) = &self.state else {
            return;
        };
        let completions = complete(&self.input, state);

        match completions.as_slice() {
            [] => {}
            [only] => {
                self.input = only.inserted();
                self.recall.reset();
            }
            many => {
                let listing = many
                    .iter()
                    .map(|completion| completion.display())
                    .collect::<Vec<_>>()
                    .join("  ");
                let values: Vec<&str> = many.iter().map(|completion| completion.value.as_str()).collect();
                let prefix = common_prefix(&values);
                let echoed = format!("{}{}", self.prompt(rescue), self.input);
                self.push_history(echoed);
                self.push_history(listing);
                if prefix.chars().count() > self.input.chars().count() {
                    self.input = prefix;
                    self.recall.reset();
                }
            }
        }
    }

    /// Drains due timers: a fired shutdown and any rescue-mode warning.
    pub fn tick(&mut self, host: &mut dyn HostOps, rescue: &mut dyn RescueControl) {
        let now = self.clock.now();
        if let Some(fired) = self.dispatcher.poll_shutdown(now) {
            let mut line = broadcast(fired.action);
            if let Some(message) = fired.message {
                line.push('\n');
                line.push_str(&message);
            }
            self.push_history(line);
            host.power(fired.action);
        }
        if let Some(warning) = rescue.due_warning(now) {
            self.push_history(warning);
        }
    }

    /// Routes a key event while the terminal is open. Returns `true` when consumed.
    pub fn handle_key(
        &mut self,
        event: &KeyEvent,
        host: &mut dyn HostOps,
        rescue: &mut dyn RescueControl,
    ) -> bool {
        if !self.is_open {
            return false;
        }
        if event.matches("escape") {
            self.is_open = false;
            host.close_terminal();
            return true;
        }
        if event.matches("ctrl+l") {
            self.history.clear();
            self.persistence.save_history(&self.history);
            return true;
        }
        if event.matches("ctrl+c") {
            self.on_input_replace(String::new());
            return true;
        }
        if event.ctrl || event.alt || event.meta {
            return false;
        }

        match &event.key {
            Key::Enter => self.on_submit(host, rescue),
            Key::Tab => self.on_tab(&*rescue),
            Key::Up => self.on_history_previous(),
            Key::Down => self.on_history_next(),
            Key::Backspace => {
                let mut input = std::mem::take(&mut self.input);
                if let Some((offset, _)) = input.grapheme_indices(true).next_back() {
                    input.truncate(offset);
                }
                self.on_input_replace(input);
            }
            Key::Char(ch) => {
                let mut input = std::mem::take(&mut self.input);
                input.push(*ch);
                self.on_input_replace(input);
            }
            Key::Escape | Key::Left | Key::Right => return false,
        }
        true
    }

    fn push_history(&mut self, line: String) {
        self.history.push(line);
        self.persistence.save_history(&self.history);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unknown error".to_string()
    }
}
