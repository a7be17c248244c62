//! Decoding raw terminal input into [`KeyEvent`]s.
//!
//! Legacy (non-kitty) sequences only: arrows in CSI and SS3 form, C0 control characters as
//! `ctrl+<letter>`, and an escape prefix as the second shortcut modifier. On mac hosts that
//! prefix reports as `meta`, matching the `ctrl+cmd+<key>` chords.

use std::iter::Peekable;
use std::str::Chars;

use cyberterm::{HostPlatform, Key, KeyEvent};

const ESC: char = '\x1b';

/// Splits one read chunk into key events. Unrecognized sequences are dropped.
pub fn decode(data: &str, platform: HostPlatform) -> Vec<KeyEvent> {
    let mut events = Vec::new();
    let mut chars = data.chars().peekable();

    while let Some(ch) = chars.next() {
        let event = if ch == ESC {
            decode_escape(&mut chars, platform)
        } else {
            decode_single(ch)
        };
        if let Some(event) = event {
            events.push(event);
        }
    }

    events
}

fn decode_single(ch: char) -> Option<KeyEvent> {
    match ch {
        '\r' | '\n' => Some(KeyEvent::plain(Key::Enter)),
        '\t' => Some(KeyEvent::plain(Key::Tab)),
        '\x7f' | '\x08' => Some(KeyEvent::plain(Key::Backspace)),
        ctrl @ '\x01'..='\x1a' => Some(KeyEvent::ctrl(Key::Char(control_letter(ctrl)))),
        ch if !ch.is_control() => Some(KeyEvent::plain(Key::Char(ch))),
        _ => None,
    }
}

fn decode_escape(chars: &mut Peekable<Chars<'_>>, platform: HostPlatform) -> Option<KeyEvent> {
    let Some(&next) = chars.peek() else {
        return Some(KeyEvent::plain(Key::Escape));
    };

    match next {
        '[' | 'O' => {
            chars.next();
            let mut sequence = String::new();
            for ch in chars.by_ref() {
                sequence.push(ch);
                if ('\x40'..='\x7e').contains(&ch) {
                    break;
                }
            }
            arrow(&sequence).map(KeyEvent::plain)
        }
        ESC => Some(KeyEvent::plain(Key::Escape)),
        _ => {
            chars.next();
            let mut event = decode_single(next)?;
            if platform.is_mac() {
                event.meta = true;
            } else {
                event.alt = true;
            }
            Some(event)
        }
    }
}

fn arrow(sequence: &str) -> Option<Key> {
    match sequence {
        "A" => Some(Key::Up),
        "B" => Some(Key::Down),
        "C" => Some(Key::Right),
        "D" => Some(Key::Left),
        _ => None,
    }
}

fn control_letter(ch: char) -> char {
    char::from(ch as u8 + 96)
}
