//! Core model: paths, the virtual file system, keys and completion.

pub mod autocomplete;
pub mod host;
pub mod keys;
pub mod path;
pub mod shortcuts;
pub mod state;
pub mod vfs;
