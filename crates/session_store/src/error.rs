use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage key '{key}' is empty or contains characters outside [A-Za-z0-9_.-]")]
    InvalidKey { key: String },

    #[error("stored value under '{key}' is not valid JSON for the expected type: {source}")]
    JsonParse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize value for '{key}': {source}")]
    JsonSerialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SessionStoreError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn json_parse(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonParse {
            key: key.into(),
            source,
        }
    }

    #[must_use]
    pub fn json_serialize(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonSerialize {
            key: key.into(),
            source,
        }
    }
}
