//! Raw-mode terminal front end for the cyberterm session.
//!
//! `CYBERTERM_*` environment variables configure the state directory, content directory,
//! host platform, log file and rescue mode; see [`cyberterm::config`].

pub mod host;
pub mod input;
pub mod keys;
pub mod panic_hook;
pub mod render;
#[cfg(unix)]
pub mod terminal;
