use std::sync::Arc;

use crate::core::path::display_path;
use crate::core::vfs::Vfs;

/// Navigation state: the current directory stack over a shared, immutable VFS.
///
/// Commands never mutate a state in place; they hand back a new one for the session to adopt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalState {
    pub current_path: Vec<String>,
    pub file_system: Arc<Vfs>,
}

impl TerminalState {
    pub fn new(file_system: Vfs) -> Self {
        Self {
            current_path: Vec::new(),
            file_system: Arc::new(file_system),
        }
    }

    #[must_use]
    pub fn with_path(&self, current_path: Vec<String>) -> Self {
        Self {
            current_path,
            file_system: Arc::clone(&self.file_system),
        }
    }

    pub fn is_root(&self) -> bool {
        self.current_path.is_empty()
    }

    /// `true` when the current directory is exactly `/<name>`.
    pub fn is_in(&self, name: &str) -> bool {
        self.current_path.len() == 1 && self.current_path[0] == name
    }

    pub fn cwd(&self) -> String {
        display_path(&self.current_path)
    }
}
