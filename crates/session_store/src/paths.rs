use std::path::{Path, PathBuf};

use crate::error::SessionStoreError;

pub const STATE_DIR: [&str; 2] = [".cyberterm", "state"];

#[must_use]
pub fn state_root(cwd: &Path) -> PathBuf {
    cwd.join(STATE_DIR[0]).join(STATE_DIR[1])
}

/// Keys map one-to-one onto file names, so only a conservative character set is accepted.
pub fn validate_key(key: &str) -> Result<(), SessionStoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(SessionStoreError::InvalidKey {
            key: key.to_string(),
        })
    }
}

#[must_use]
pub fn key_file_name(key: &str) -> String {
    format!("{key}.json")
}
