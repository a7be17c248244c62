//! Environment configuration.

use std::env;
use std::path::{Path, PathBuf};

use crate::core::keys::HostPlatform;

pub const STATE_DIR_VAR: &str = "CYBERTERM_STATE_DIR";
pub const CONTENT_DIR_VAR: &str = "CYBERTERM_CONTENT_DIR";
pub const HOST_OS_VAR: &str = "CYBERTERM_HOST_OS";
pub const LOG_FILE_VAR: &str = "CYBERTERM_LOG_FILE";
pub const RESCUE_VAR: &str = "CYBERTERM_RESCUE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub state_dir: Option<PathBuf>,
    pub content_dir: Option<PathBuf>,
    pub host_os: Option<HostPlatform>,
    pub log_file: Option<PathBuf>,
    pub start_in_rescue: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            state_dir: env_string_opt(STATE_DIR_VAR).map(PathBuf::from),
            content_dir: env_string_opt(CONTENT_DIR_VAR).map(PathBuf::from),
            host_os: env_string_opt(HOST_OS_VAR).and_then(|value| parse_host_os(&value)),
            log_file: env_string_opt(LOG_FILE_VAR).map(PathBuf::from),
            start_in_rescue: env_flag(RESCUE_VAR),
        }
    }

    /// Configured platform, or the compile target's.
    pub fn platform(&self) -> HostPlatform {
        self.host_os.unwrap_or_else(HostPlatform::detect)
    }

    /// Configured state directory, or `<cwd>/.cyberterm/state`.
    pub fn state_root(&self, cwd: &Path) -> PathBuf {
        self.state_dir
            .clone()
            .unwrap_or_else(|| session_store::state_root(cwd))
    }
}

fn parse_host_os(value: &str) -> Option<HostPlatform> {
    match value.trim().to_lowercase().as_str() {
        "mac" | "macos" | "darwin" => Some(HostPlatform::Mac),
        "other" | "linux" | "windows" => Some(HostPlatform::Other),
        unknown => {
            tracing::warn!(value = unknown, "ignoring unknown {HOST_OS_VAR}");
            None
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
