//! Key events and key-id matching.
//!
//! Key ids are lowercase `+`-joined chords such as `ctrl+alt+t` or `escape`. On mac hosts the
//! `cmd` modifier stands in for `alt` in the global shortcuts.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Mac,
    Other,
}

impl HostPlatform {
    /// Platform of the compile target.
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::Mac
        } else {
            Self::Other
        }
    }

    pub fn is_mac(self) -> bool {
        matches!(self, Self::Mac)
    }

    /// Modifier label shown in help text: `Ctrl+Cmd` on mac, `Ctrl+Alt` elsewhere.
    pub fn shortcut_modifier_label(self) -> &'static str {
        match self {
            Self::Mac => "Ctrl+Cmd",
            Self::Other => "Ctrl+Alt",
        }
    }

    /// Second modifier used by the global shortcuts, as a key-id part.
    pub fn shortcut_modifier(self) -> &'static str {
        match self {
            Self::Mac => "cmd",
            Self::Other => "alt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    fn id(&self) -> String {
        match self {
            Self::Char(ch) => ch.to_lowercase().to_string(),
            Self::Enter => "enter".to_string(),
            Self::Tab => "tab".to_string(),
            Self::Backspace => "backspace".to_string(),
            Self::Escape => "escape".to_string(),
            Self::Up => "up".to_string(),
            Self::Down => "down".to_string(),
            Self::Left => "left".to_string(),
            Self::Right => "right".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyEvent {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
            meta: false,
            shift: false,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key)
        }
    }

    /// Parses a key id into an event. Unknown multi-character key names yield `None`.
    pub fn from_id(key_id: &str) -> Option<Self> {
        let parsed = parse_key_id(key_id)?;
        let key = match parsed.key.as_str() {
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "backspace" => Key::Backspace,
            "escape" | "esc" => Key::Escape,
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            other => {
                let mut chars = other.chars();
                let ch = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                Key::Char(ch)
            }
        };

        Some(Self {
            key,
            ctrl: parsed.ctrl,
            alt: parsed.alt,
            meta: parsed.meta,
            shift: parsed.shift,
        })
    }

    /// Exact match: every modifier must agree, letters compare case-insensitively.
    pub fn matches(&self, key_id: &str) -> bool {
        let Some(parsed) = parse_key_id(key_id) else {
            return false;
        };

        parsed.key == self.key.id()
            && parsed.ctrl == self.ctrl
            && parsed.alt == self.alt
            && parsed.meta == self.meta
            && parsed.shift == self.shift
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedKeyId {
    key: String,
    ctrl: bool,
    alt: bool,
    meta: bool,
    shift: bool,
}

fn parse_key_id(key_id: &str) -> Option<ParsedKeyId> {
    let lowered = key_id.to_lowercase();
    let parts: Vec<&str> = lowered.split('+').collect();
    let key = parts.last()?.to_string();
    if key.is_empty() {
        return None;
    }
    let modifiers = &parts[..parts.len() - 1];
    Some(ParsedKeyId {
        key,
        ctrl: modifiers.contains(&"ctrl"),
        alt: modifiers.contains(&"alt"),
        meta: modifiers.iter().any(|part| matches!(*part, "cmd" | "meta")),
        shift: modifiers.contains(&"shift"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_id_parses_modifiers_and_named_keys() {
        let event = KeyEvent::from_id("ctrl+alt+t").expect("valid id");
        assert_eq!(event.key, Key::Char('t'));
        assert!(event.ctrl && event.alt && !event.meta && !event.shift);

        assert_eq!(KeyEvent::from_id("escape"), Some(KeyEvent::plain(Key::Escape)));
        assert_eq!(KeyEvent::from_id("ctrl+pageup"), None);
        assert_eq!(KeyEvent::from_id(""), None);
    }

    #[test]
    fn matches_requires_exact_modifiers() {
        let event = KeyEvent::from_id("ctrl+cmd+b").expect("valid id");
        assert!(event.matches("ctrl+cmd+b"));
        assert!(event.matches("Ctrl+Meta+B"));
        assert!(!event.matches("ctrl+alt+b"));
        assert!(!event.matches("cmd+b"));
    }

    #[test]
    fn uppercase_char_events_match_lowercase_ids() {
        let mut event = KeyEvent::ctrl(Key::Char('T'));
        event.alt = true;
        assert!(event.matches("ctrl+alt+t"));
    }

    #[test]
    fn platform_labels() {
        assert_eq!(HostPlatform::Mac.shortcut_modifier_label(), "Ctrl+Cmd");
        assert_eq!(HostPlatform::Other.shortcut_modifier(), "alt");
    }
}
