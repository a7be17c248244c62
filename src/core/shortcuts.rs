//! Global keyboard shortcuts.

use crate::core::host::HostOps;
use crate::core::keys::{HostPlatform, KeyEvent};

/// Page chords, completed as `ctrl+<modifier>+<key>`.
pub const PAGE_SHORTCUTS: [(&str, &str); 5] = [
    ("h", "/"),
    ("a", "/about"),
    ("b", "/blog"),
    ("p", "/projects"),
    ("c", "/contact"),
];

/// Routes a key event to the host. Returns `true` when the event was consumed.
///
/// While the terminal is open only Escape is handled (it closes the terminal); page and
/// open-terminal chords are inert so they don't fight the line editor.
pub fn handle_keyboard_shortcuts(
    event: &KeyEvent,
    platform: HostPlatform,
    is_open: bool,
    host: &mut dyn HostOps,
) -> bool {
    if is_open {
        if event.matches("escape") {
            host.close_terminal();
            return true;
        }
        return false;
    }

    let modifier = platform.shortcut_modifier();
    if event.matches(&format!("ctrl+{modifier}+t")) {
        host.open_terminal();
        return true;
    }

    for (key, url_path) in PAGE_SHORTCUTS {
        if event.matches(&format!("ctrl+{modifier}+{key}")) {
            tracing::debug!(url_path, "page shortcut");
            host.navigate(url_path);
            return true;
        }
    }

    false
}
