use crate::commands::{CommandError, CommandResult};
use crate::core::path::resolve;
use crate::core::state::TerminalState;
use crate::core::vfs::{FileContent, FileSystemNode, LookupError};

const OWNER: &str = "guest";
const LISTING_DATE: &str = "Nov 17  2077";

pub fn run(args: &str, state: &TerminalState) -> Result<CommandResult, CommandError> {
    let mut operands = Vec::new();
    let mut options_done = false;
    for token in args.split_whitespace() {
        if options_done {
            operands.push(token);
            continue;
        }
        if token == "--" {
            options_done = true;
            continue;
        }
        if let Some(flags) = token.strip_prefix('-').filter(|flags| !flags.is_empty()) {
            if let Some(bad) = flags.chars().find(|flag| !matches!(flag, 'l' | 'a' | 'h' | '1')) {
                return Ok(CommandResult::output(format!(
                    "ls: invalid option -- '{bad}'\nTry 'ls --help' for more information."
                )));
            }
            continue;
        }
        operands.push(token);
    }

    let sections = match operands.as_slice() {
        [] => vec![list(None, &state.current_path, state)],
        [single] => vec![list(Some(*single), &resolve(&state.current_path, single), state)],
        many => many
            .iter()
            .map(|operand| {
                let listing = list(Some(*operand), &resolve(&state.current_path, operand), state);
                match listing {
                    Listing::Entries(text) => Listing::Entries(format!("{operand}:\n{text}")),
                    other => other,
                }
            })
            .collect(),
    };

    let text = sections
        .into_iter()
        .filter_map(|section| match section {
            Listing::Entries(text) | Listing::Error(text) => Some(text),
            Listing::Empty => None,
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    if text.is_empty() {
        Ok(CommandResult::silent())
    } else {
        Ok(CommandResult::output(text))
    }
}

enum Listing {
    Entries(String),
    Error(String),
    Empty,
}

fn list(shown: Option<&str>, segments: &[String], state: &TerminalState) -> Listing {
    let shown = shown.unwrap_or(".");
    let node = match state.file_system.lookup(segments) {
        Ok(node) => node,
        Err(LookupError::NotFound) => {
            return Listing::Error(format!("ls: cannot access '{shown}': No such file or directory"))
        }
        Err(LookupError::NotADirectory) => {
            return Listing::Error(format!("ls: cannot access '{shown}': Not a directory"))
        }
    };

    if !node.is_directory() {
        return Listing::Entries(listing_line(node));
    }

    let mut children: Vec<&FileSystemNode> = node.children().collect();
    if children.is_empty() {
        return Listing::Empty;
    }
    children.sort_by_key(|child| child.name().to_lowercase());
    Listing::Entries(
        children
            .into_iter()
            .map(listing_line)
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

/// One `ls -l` style line. Directories end in `/`; project files are executable.
fn listing_line(node: &FileSystemNode) -> String {
    let (mode, links, size, suffix) = match node {
        FileSystemNode::Directory { children, .. } => {
            let subdirs = children.values().filter(|child| child.is_directory()).count();
            ("drwxr-xr-x", 2 + subdirs, 4096, "/")
        }
        FileSystemNode::File {
            content: Some(FileContent::Project(_)),
            ..
        } => ("-rwxr-xr-x", 1, 8192, ""),
        FileSystemNode::File { .. } => ("-rw-r--r--", 1, 2048, ""),
    };
    format!(
        "{mode} {links:>2} {OWNER} {OWNER} {size:>5} {LISTING_DATE} {}{suffix}",
        node.name()
    )
}
