//! Full-screen frame rendering. Pure string building; the terminal only writes the result.

use unicode_width::UnicodeWidthChar;

const CLEAR_ALL: &str = "\x1b[3J\x1b[2J\x1b[H";

/// What one frame shows.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub history: &'a [String],
    pub prompt: &'a str,
    pub input: &'a str,
    pub notice: Option<&'a str>,
    pub rescue: bool,
}

fn ansi_wrap(text: &str, prefix: &str, suffix: &str) -> String {
    format!("{prefix}{text}{suffix}")
}

fn dim(text: &str) -> String {
    ansi_wrap(text, "\x1b[2m", "\x1b[22m")
}

fn cyan(text: &str) -> String {
    ansi_wrap(text, "\x1b[36m", "\x1b[39m")
}

fn red(text: &str) -> String {
    ansi_wrap(text, "\x1b[31m", "\x1b[39m")
}

/// Leading part of `line` that fits in `width` columns.
pub fn fit_start(line: &str, width: usize) -> &str {
    let mut used = 0;
    for (offset, ch) in line.char_indices() {
        used += UnicodeWidthChar::width(ch).unwrap_or(0);
        if used > width {
            return &line[..offset];
        }
    }
    line
}

/// Trailing part of `line` that fits in `width` columns.
pub fn fit_end(line: &str, width: usize) -> &str {
    let mut used = 0;
    for (offset, ch) in line.char_indices().rev() {
        used += UnicodeWidthChar::width(ch).unwrap_or(0);
        if used > width {
            return &line[offset + ch.len_utf8()..];
        }
    }
    line
}

pub fn frame(view: &View<'_>, cols: u16, rows: u16) -> String {
    let width = usize::from(cols.max(1));
    let rows = usize::from(rows.max(2));
    let reserved = 1 + usize::from(view.notice.is_some());

    let lines: Vec<&str> = view
        .history
        .iter()
        .flat_map(|entry| entry.split('\n'))
        .collect();
    let visible = &lines[lines.len().saturating_sub(rows.saturating_sub(reserved))..];

    let mut buffer = String::from(CLEAR_ALL);
    for line in visible {
        buffer.push_str(fit_start(line, width));
        buffer.push_str("\r\n");
    }
    if let Some(notice) = view.notice {
        buffer.push_str(&dim(fit_start(notice, width)));
        buffer.push_str("\r\n");
    }

    let prompt = fit_start(view.prompt, width.saturating_sub(1));
    let prompt_width: usize = prompt.chars().filter_map(UnicodeWidthChar::width).sum();
    buffer.push_str(&if view.rescue { red(prompt) } else { cyan(prompt) });
    buffer.push_str(fit_end(view.input, width.saturating_sub(prompt_width + 1)));
    buffer
}

/// Shown while the terminal overlay is closed.
pub fn closed_screen(notice: Option<&str>, modifier_label: &str, cols: u16) -> String {
    let width = usize::from(cols.max(1));
    let mut buffer = String::from(CLEAR_ALL);
    if let Some(notice) = notice {
        buffer.push_str(&dim(fit_start(notice, width)));
        buffer.push_str("\r\n");
    }
    let hint = format!("Terminal closed. {modifier_label}+T opens it, q quits.");
    buffer.push_str(fit_start(&hint, width));
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fitting_respects_wide_characters() {
        assert_eq!(fit_start("ネオン街", 5), "ネオ");
        assert_eq!(fit_end("ネオン街", 5), "ン街");
        assert_eq!(fit_start("ls", 10), "ls");
    }

    #[test]
    fn frame_keeps_the_newest_lines() {
        let history: Vec<String> = vec!["one".into(), "two\nthree".into(), "four".into()];
        let view = View {
            history: &history,
            prompt: "guest@cyberdeck:~$ ",
            input: "pwd",
            notice: None,
            rescue: false,
        };
        let output = frame(&view, 40, 3);
        assert!(!output.contains("two"));
        assert!(output.contains("three\r\nfour\r\n"));
        assert!(output.ends_with("guest@cyberdeck:~$ \x1b[39mpwd"));
    }

    #[test]
    fn long_input_shows_its_tail() {
        let view = View {
            history: &[],
            prompt: "$ ",
            input: "echo abcdefghij",
            notice: Some("page: /blog"),
            rescue: true,
        };
        let output = frame(&view, 8, 5);
        assert!(output.contains("\x1b[31m$ \x1b[39m"));
        assert!(output.ends_with("ghij"));
        assert!(output.contains("page: /"));
    }

    #[test]
    fn closed_screen_names_the_chord() {
        let output = closed_screen(None, "Ctrl+Alt", 80);
        assert!(output.ends_with("Terminal closed. Ctrl+Alt+T opens it, q quits."));
    }
}
