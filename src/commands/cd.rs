//! `cd`, including the `../<dir>` shorthand and `cd -`.
//!
//! The previous directory is only recorded when a change succeeds, so a failed `cd` leaves
//! `cd -` pointing where it did before.

use crate::commands::{CommandError, CommandResult, HostOps};
use crate::core::path::{display_path, resolve};
use crate::core::state::TerminalState;
use crate::core::vfs::LookupError;

const USAGE: &str = "cd: usage: cd [-L|-P] [dir]";

/// Top-level names that are site pages as well as directories.
const PAGE_ALIASES: [&str; 6] = ["home", "about", "blog", "projects", "contact", "terminal"];

pub fn run(
    args: &str,
    state: &TerminalState,
    previous_dir: &mut Option<Vec<String>>,
    host: &mut dyn HostOps,
) -> Result<CommandResult, CommandError> {
    let mut operands = Vec::new();
    let mut options_done = false;
    for token in args.split_whitespace() {
        if !options_done && token.len() > 1 && token.starts_with('-') {
            if token == "--" {
                options_done = true;
                continue;
            }
            if token[1..].chars().all(|flag| matches!(flag, 'L' | 'P')) {
                continue;
            }
            return Ok(CommandResult::output(format!("cd: {token}: invalid option\n{USAGE}")));
        }
        options_done = true;
        operands.push(token);
    }

    if operands.len() > 1 {
        return Ok(CommandResult::output("cd: too many arguments"));
    }

    let result = match operands.first().copied() {
        None | Some("~") => change_to(Vec::new(), state, previous_dir, host),
        Some("-") => return Ok(swap_with_previous(state, previous_dir, host)),
        Some(target) => {
            if let Some(rest) = target.strip_prefix("~/") {
                change_dir(target, &format!("/{rest}"), state, previous_dir, host)
            } else if let Some(user) = target.strip_prefix('~') {
                CommandResult::output(format!("cd: {user}: No such user"))
            } else {
                change_dir(target, target, state, previous_dir, host)
            }
        }
    };
    Ok(result)
}

fn change_dir(
    shown: &str,
    target: &str,
    state: &TerminalState,
    previous_dir: &mut Option<Vec<String>>,
    host: &mut dyn HostOps,
) -> CommandResult {
    let resolved = resolve(&state.current_path, target);

    if target.starts_with('/') {
        let page = match resolved.as_slice() {
            [] => Some(Vec::new()),
            [page] if page == "home" => Some(Vec::new()),
            [page] if PAGE_ALIASES.contains(&page.as_str()) => Some(resolved.clone()),
            _ => None,
        };
        if let Some(page) = page {
            return change_to(page, state, previous_dir, host);
        }
    }

    match state.file_system.lookup(&resolved) {
        Ok(node) if node.is_directory() => change_to(resolved, state, previous_dir, host),
        Ok(_) | Err(LookupError::NotADirectory) => {
            CommandResult::output(format!("cd: {shown}: Not a directory"))
        }
        Err(LookupError::NotFound) => {
            CommandResult::output(format!("cd: {shown}: No such file or directory"))
        }
    }
}

fn change_to(
    target: Vec<String>,
    state: &TerminalState,
    previous_dir: &mut Option<Vec<String>>,
    host: &mut dyn HostOps,
) -> CommandResult {
    *previous_dir = Some(state.current_path.clone());
    host.navigate(&page_url(&target));
    CommandResult::silent().with_state(state.with_path(target))
}

fn swap_with_previous(
    state: &TerminalState,
    previous_dir: &mut Option<Vec<String>>,
    host: &mut dyn HostOps,
) -> CommandResult {
    let target = match previous_dir.take() {
        Some(previous) => previous,
        None if state.is_root() => return CommandResult::output("cd: OLDPWD not set"),
        None => Vec::new(),
    };
    *previous_dir = Some(state.current_path.clone());
    host.navigate(&page_url(&target));
    CommandResult::output(display_path(&target)).with_state(state.with_path(target))
}

/// Site URL for a directory; `/home` is the landing page.
fn page_url(segments: &[String]) -> String {
    match segments {
        [page] if page == "home" => "/".to_string(),
        _ => display_path(segments),
    }
}
