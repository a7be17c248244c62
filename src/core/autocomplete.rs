//! Tab completion over the command table and the virtual file system.
//!
//! Completion is a pure query: it reads a [`TerminalState`] and never changes it. Candidates
//! are whole command lines (`cd /about`, `./demo`, `systemctl start`), so a single candidate can
//! replace the input outright.

use crate::commands::systemctl::{SERVICE_NAMES, SUBCOMMANDS};
use crate::commands::COMMAND_NAMES;
use crate::core::path::{resolve, split_partial};
use crate::core::state::TerminalState;
use crate::core::vfs::{FileContent, FileSystemNode, BLOG_DIR, PROJECTS_DIR};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Command,
    Directory,
    File,
    Executable,
    ParentDirectory,
    Argument,
}

impl CompletionKind {
    /// What the session appends after inserting a lone candidate.
    pub fn insertion_suffix(self) -> &'static str {
        match self {
            Self::Command | Self::File | Self::Argument => " ",
            Self::Directory => "/",
            Self::Executable | Self::ParentDirectory => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub value: String,
    pub kind: CompletionKind,
}

impl Completion {
    fn new(value: impl Into<String>, kind: CompletionKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    /// The value with its insertion suffix applied.
    pub fn inserted(&self) -> String {
        format!("{}{}", self.value, self.kind.insertion_suffix())
    }

    /// Last whitespace-separated token, as shown in a multi-candidate listing.
    pub fn display(&self) -> &str {
        self.value.rsplit(' ').next().unwrap_or(&self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathCommand {
    Cd,
    Read,
    Ls,
}

impl PathCommand {
    fn name(self) -> &'static str {
        match self {
            Self::Cd => "cd",
            Self::Read => "read",
            Self::Ls => "ls",
        }
    }

    fn accepts(self, node: &FileSystemNode) -> bool {
        match self {
            Self::Cd => node.is_directory(),
            Self::Read => !node.is_directory(),
            Self::Ls => true,
        }
    }
}

/// Completion candidates for `raw`, sorted case-insensitively and free of duplicates.
pub fn complete(raw: &str, state: &TerminalState) -> Vec<Completion> {
    let input = raw.trim_start();

    let mut completions = if let Some(rest) = input.strip_prefix("./") {
        complete_executable(rest, state)
    } else if let Some(rest) = input.strip_prefix("../") {
        complete_parent_directory(rest, state)
    } else {
        match input.split_once(char::is_whitespace) {
            None => complete_command(input),
            Some((command, rest)) => {
                let rest = rest.trim_start();
                match command.to_lowercase().as_str() {
                    "systemctl" => complete_systemctl(rest),
                    "cd" => complete_path(PathCommand::Cd, rest, state),
                    "read" => complete_path(PathCommand::Read, rest, state),
                    "ls" => complete_path(PathCommand::Ls, rest, state),
                    _ => Vec::new(),
                }
            }
        }
    };

    completions.sort_by(|a, b| {
        a.value
            .to_lowercase()
            .cmp(&b.value.to_lowercase())
            .then_with(|| a.value.cmp(&b.value))
    });
    completions.dedup_by(|a, b| a.value == b.value);
    completions
}

/// Plain-string form of [`complete`].
pub fn get_tab_completions(raw: &str, state: &TerminalState) -> Vec<String> {
    complete(raw, state)
        .into_iter()
        .map(|completion| completion.value)
        .collect()
}

/// Longest common prefix of `values`, compared char by char.
pub fn common_prefix<S: AsRef<str>>(values: &[S]) -> String {
    let Some((first, rest)) = values.split_first() else {
        return String::new();
    };
    let mut prefix: Vec<char> = first.as_ref().chars().collect();
    for value in rest {
        let shared = prefix
            .iter()
            .zip(value.as_ref().chars())
            .take_while(|(a, b)| **a == *b)
            .count();
        prefix.truncate(shared);
    }
    prefix.into_iter().collect()
}

fn starts_with_ignore_case(candidate: &str, prefix: &str) -> bool {
    candidate.to_lowercase().starts_with(&prefix.to_lowercase())
}

fn join_path(dir: &str, name: &str) -> String {
    if dir.is_empty() || dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}

fn complete_command(prefix: &str) -> Vec<Completion> {
    COMMAND_NAMES
        .iter()
        .filter(|name| starts_with_ignore_case(name, prefix))
        .map(|name| Completion::new(*name, CompletionKind::Command))
        .collect()
}

fn complete_executable(prefix: &str, state: &TerminalState) -> Vec<Completion> {
    if !state.is_in(PROJECTS_DIR) {
        return Vec::new();
    }
    let Ok(projects) = state.file_system.lookup(&state.current_path) else {
        return Vec::new();
    };
    projects
        .children()
        .filter(|node| matches!(node.content(), Some(FileContent::Project(_))))
        .filter(|node| starts_with_ignore_case(node.name(), prefix))
        .map(|node| Completion::new(format!("./{}", node.name()), CompletionKind::Executable))
        .collect()
}

fn complete_parent_directory(prefix: &str, state: &TerminalState) -> Vec<Completion> {
    if state.is_root() {
        return Vec::new();
    }
    state
        .file_system
        .root()
        .children()
        .filter(|node| node.is_directory() && starts_with_ignore_case(node.name(), prefix))
        .map(|node| Completion::new(format!("../{}/", node.name()), CompletionKind::ParentDirectory))
        .collect()
}

fn complete_systemctl(rest: &str) -> Vec<Completion> {
    match rest.split_once(char::is_whitespace) {
        None => SUBCOMMANDS
            .iter()
            .filter(|sub| starts_with_ignore_case(sub, rest))
            .map(|sub| Completion::new(format!("systemctl {sub}"), CompletionKind::Argument))
            .collect(),
        Some((subcommand, partial)) => {
            let subcommand = subcommand.to_lowercase();
            let partial = partial.trim_start();
            if !SUBCOMMANDS.contains(&subcommand.as_str()) || partial.contains(char::is_whitespace) {
                return Vec::new();
            }
            SERVICE_NAMES
                .iter()
                .filter(|service| starts_with_ignore_case(service, partial))
                .map(|service| {
                    Completion::new(
                        format!("systemctl {subcommand} {service}"),
                        CompletionKind::Argument,
                    )
                })
                .collect()
        }
    }
}

fn complete_path(command: PathCommand, partial: &str, state: &TerminalState) -> Vec<Completion> {
    if partial.contains(char::is_whitespace) {
        return Vec::new();
    }

    let (dir_part, prefix) = split_partial(partial);
    let dir_segments = resolve(&state.current_path, dir_part);
    let Ok(dir) = state.file_system.lookup(&dir_segments) else {
        return Vec::new();
    };

    // Bare names typed at the root complete to absolute paths.
    let shown_dir = if dir_part.is_empty() && state.is_root() {
        "/"
    } else {
        dir_part
    };

    let mut completions: Vec<Completion> = dir
        .children()
        .filter(|node| command.accepts(node) && starts_with_ignore_case(node.name(), prefix))
        .map(|node| {
            let kind = if node.is_directory() {
                CompletionKind::Directory
            } else {
                CompletionKind::File
            };
            Completion::new(
                format!("{} {}", command.name(), join_path(shown_dir, node.name())),
                kind,
            )
        })
        .collect();

    if dir_part.is_empty() && !state.is_root() && command == PathCommand::Cd {
        for synthetic in [".", ".."] {
            if synthetic.starts_with(prefix) {
                completions.push(Completion::new(
                    format!("cd {synthetic}"),
                    CompletionKind::Directory,
                ));
            }
        }
    }

    // `read <id>` works from the root, so offer bare ids there.
    if dir_part.is_empty() && state.is_root() && command == PathCommand::Read {
        for collection in [BLOG_DIR, PROJECTS_DIR] {
            let Some(collection) = state.file_system.root().child(collection) else {
                continue;
            };
            completions.extend(
                collection
                    .children()
                    .filter(|node| starts_with_ignore_case(node.name(), prefix))
                    .map(|node| Completion::new(format!("read {}", node.name()), CompletionKind::File)),
            );
        }
    }

    completions
}
