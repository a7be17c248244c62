//! Session persistence over a [`KeyValueStore`].
//!
//! Three flat JSON entries: the display history, the command recall buffer and the
//! "banner shown" flag. Write failures are logged and otherwise ignored; the session keeps
//! running on its in-memory copy.

use session_store::{load_json, persist_json, KeyValueStore};

pub const HISTORY_KEY: &str = "terminal-history";
pub const COMMAND_HISTORY_KEY: &str = "terminal-command-history";
pub const BANNER_SHOWN_KEY: &str = "terminal-initial-message-shown";

#[derive(Debug)]
pub struct HistoryPersistence<S> {
    store: S,
}

impl<S: KeyValueStore> HistoryPersistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// `None` when nothing was ever saved (or the entry is unreadable); `Some(vec![])` after a
    /// `clear`.
    pub fn load_history(&self) -> Option<Vec<String>> {
        self.load_lines(HISTORY_KEY)
    }

    pub fn save_history(&mut self, history: &[String]) {
        self.save(HISTORY_KEY, history);
    }

    pub fn load_command_history(&self) -> Vec<String> {
        self.load_lines(COMMAND_HISTORY_KEY).unwrap_or_default()
    }

    pub fn save_command_history(&mut self, command_history: &[String]) {
        self.save(COMMAND_HISTORY_KEY, command_history);
    }

    pub fn banner_shown(&self) -> bool {
        match load_json::<bool, _>(&self.store, BANNER_SHOWN_KEY) {
            Ok(shown) => shown.unwrap_or(false),
            Err(err) => {
                tracing::warn!(error = %err, "banner flag unreadable");
                false
            }
        }
    }

    pub fn mark_banner_shown(&mut self) {
        self.save(BANNER_SHOWN_KEY, &true);
    }

    fn load_lines(&self, key: &str) -> Option<Vec<String>> {
        match load_json::<Vec<String>, _>(&self.store, key) {
            Ok(lines) => lines,
            Err(err) => {
                tracing::warn!(key, error = %err, "discarding unreadable history entry");
                None
            }
        }
    }

    fn save<T: serde::Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        if let Err(err) = persist_json(&mut self.store, key, value) {
            tracing::warn!(key, error = %err, "failed to persist terminal state");
        }
    }
}
