//! Panic reporting that stays off the raw-mode screen.
//!
//! The default hook writes to stderr, which lands in the middle of the rendered frame. The
//! replacement sends the report to `tracing` instead, so it reaches the log file when one is
//! configured and is discarded otherwise.

use std::any::Any;
use std::panic::{self, PanicHookInfo};

pub fn install_panic_hook() {
    panic::set_hook(Box::new(report_panic));
}

fn report_panic(info: &PanicHookInfo<'_>) {
    let location = info
        .location()
        .map(|location| format!("{}:{}", location.file(), location.line()))
        .unwrap_or_else(|| "unknown".to_string());
    tracing::error!(
        message = %payload_message(info.payload()),
        %location,
        "panic"
    );
}

pub fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unknown error".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::catch_unwind;
    use tempfile::NamedTempFile;

    #[test]
    fn payloads_are_described() {
        let text: Box<dyn Any + Send> = Box::new("boom");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(payload_message(text.as_ref()), "boom");
        assert_eq!(payload_message(owned.as_ref()), "owned boom");
        assert_eq!(payload_message(other.as_ref()), "Unknown error");
    }

    #[test]
    fn panics_are_logged_through_tracing() {
        let log_file = NamedTempFile::new().expect("temp log");
        let subscriber = cyberterm::logging::build_subscriber(
            log_file.reopen().expect("reopen"),
            "info",
        )
        .expect("subscriber");

        install_panic_hook();
        let caught = tracing::subscriber::with_default(subscriber, || {
            catch_unwind(|| panic!("deck overheated"))
        });
        let _ = panic::take_hook();

        assert!(caught.is_err());
        let contents = std::fs::read_to_string(log_file.path()).expect("read log");
        assert!(contents.contains("ERROR"));
        assert!(contents.contains("deck overheated"));
        assert!(contents.contains("panic_hook.rs"));
    }
}
