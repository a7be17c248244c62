//! Reassembles raw stdin reads into text that [`crate::keys::decode`] can split safely.
//!
//! A read may end inside a UTF-8 character or an escape sequence. Incomplete UTF-8 bytes wait
//! for the next read. An incomplete escape tail waits until the next read or until the flush
//! timeout, after which it is emitted verbatim so a lone Escape still arrives.

use std::time::{Duration, Instant};

const ESC: char = '\x1b';

pub const DEFAULT_FLUSH_MS: u64 = 10;

#[derive(Debug)]
pub struct InputBuffer {
    pending_bytes: Vec<u8>,
    held: String,
    timeout_ms: u64,
    flush_deadline: Option<Instant>,
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_FLUSH_MS)
    }
}

impl InputBuffer {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            pending_bytes: Vec::new(),
            held: String::new(),
            timeout_ms,
            flush_deadline: None,
        }
    }

    /// Appends one read and returns everything that is complete so far.
    pub fn process(&mut self, data: &[u8], now: Instant) -> String {
        self.flush_deadline = None;
        self.pending_bytes.extend_from_slice(data);

        let mut text = std::mem::take(&mut self.held);
        text.push_str(&take_utf8(&mut self.pending_bytes));

        let split = incomplete_escape_start(&text).unwrap_or(text.len());
        self.held = text.split_off(split);
        if !self.held.is_empty() {
            self.flush_deadline = Some(now + Duration::from_millis(self.timeout_ms));
        }
        text
    }

    /// Emits a held escape tail once its deadline has passed.
    pub fn flush_due(&mut self, now: Instant) -> Option<String> {
        let deadline = self.flush_deadline?;
        if now < deadline {
            return None;
        }
        self.flush_deadline = None;
        Some(std::mem::take(&mut self.held))
    }

    /// Poll timeout that wakes up in time for a pending flush.
    pub fn next_timeout_ms(&self, now: Instant, default_ms: i32) -> i32 {
        match self.flush_deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(now);
                let ms = remaining.as_millis().min(i32::MAX as u128) as i32;
                ms.min(default_ms).max(0)
            }
            None => default_ms,
        }
    }

    pub fn held(&self) -> &str {
        &self.held
    }
}

/// Drains the decodable prefix of `bytes`. Invalid bytes become U+FFFD; a truncated trailing
/// character stays in `bytes`.
fn take_utf8(bytes: &mut Vec<u8>) -> String {
    let mut out = String::new();
    loop {
        match std::str::from_utf8(&bytes[..]) {
            Ok(text) => {
                out.push_str(text);
                bytes.clear();
                return out;
            }
            Err(err) => {
                let valid = err.valid_up_to();
                out.push_str(&String::from_utf8_lossy(&bytes[..valid]));
                match err.error_len() {
                    None => {
                        bytes.drain(..valid);
                        return out;
                    }
                    Some(len) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        bytes.drain(..valid + len);
                    }
                }
            }
        }
    }
}

/// Byte offset of a trailing escape sequence that is still missing its final byte.
fn incomplete_escape_start(text: &str) -> Option<usize> {
    let start = text.rfind(ESC)?;
    let tail = &text[start + ESC.len_utf8()..];
    let incomplete = match tail.chars().next() {
        None => true,
        Some('[') => !tail[1..].chars().any(|ch| ('\x40'..='\x7e').contains(&ch)),
        Some('O') => tail.len() == 1,
        Some(_) => false,
    };
    incomplete.then_some(start)
}
