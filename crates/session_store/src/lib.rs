//! String-keyed durable storage for terminal session state.
//!
//! Values are stored as JSON text, one entry per key, with no versioning.

mod error;
mod paths;
mod store;

pub use error::SessionStoreError;
pub use paths::{key_file_name, state_root, validate_key};
pub use store::{load_json, persist_json, FileStore, KeyValueStore, MemoryStore};
