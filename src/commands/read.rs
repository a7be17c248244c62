//! `read <name>` and `./<project>`.

use crate::commands::{CommandError, CommandResult, HostOps};
use crate::core::path::{display_path, resolve};
use crate::core::state::TerminalState;
use crate::core::vfs::{FileContent, FileSystemNode, LookupError, BLOG_DIR, PROJECTS_DIR};

pub fn run(
    args: &str,
    state: &TerminalState,
    host: &mut dyn HostOps,
) -> Result<CommandResult, CommandError> {
    let Some(target) = args.split_whitespace().next() else {
        return Ok(CommandResult::output(
            "read: missing file operand\nUsage: read <post-or-project>",
        ));
    };

    let resolved = resolve(&state.current_path, target);
    let (segments, node) = match state.file_system.lookup(&resolved) {
        Ok(node) => (resolved, node),
        Err(LookupError::NotFound) => match find_by_id(target, state) {
            Some(found) => found,
            None => {
                return Ok(CommandResult::output(format!(
                    "read: {target}: No such file or directory"
                )))
            }
        },
        Err(LookupError::NotADirectory) => {
            return Ok(CommandResult::output(format!("read: {target}: Not a directory")))
        }
    };

    if node.is_directory() {
        return Ok(CommandResult::output(format!("read: {target}: Is a directory")));
    }

    match node.content() {
        Some(FileContent::Blog(id)) => {
            host.open_blog(id);
            Ok(CommandResult::output(format!("Opening blog post: {id}...")))
        }
        Some(FileContent::Project(id)) => {
            host.open_project(id);
            Ok(CommandResult::output(format!("Opening project: {id}...")))
        }
        None => Err(CommandError::UntaggedFile {
            path: display_path(&segments),
        }),
    }
}

/// Bare ids are looked up in `blog/` first, then `projects/`.
fn find_by_id<'a>(id: &str, state: &'a TerminalState) -> Option<(Vec<String>, &'a FileSystemNode)> {
    if id.contains('/') {
        return None;
    }
    [BLOG_DIR, PROJECTS_DIR].into_iter().find_map(|dir| {
        let segments = vec![dir.to_string(), id.to_string()];
        let node = state.file_system.lookup(&segments).ok()?;
        Some((segments, node))
    })
}

/// Runs `./<name>`; only valid from `/projects`.
pub fn execute(
    name: &str,
    state: &TerminalState,
    host: &mut dyn HostOps,
) -> Result<CommandResult, CommandError> {
    let name = name.split_whitespace().next().unwrap_or("");

    if !state.is_in(PROJECTS_DIR) {
        return Ok(CommandResult::output(format!(
            "Error: ./{name}: executables can only be run from /projects\nTry: cd /projects"
        )));
    }
    if name.is_empty() {
        return Ok(CommandResult::output("Error: ./: Is a directory"));
    }

    let node = match state.file_system.lookup(&[PROJECTS_DIR, name]) {
        Ok(node) => node,
        Err(_) => {
            return Ok(CommandResult::output(format!(
                "Error: ./{name}: No such file or directory"
            )))
        }
    };

    match node.content() {
        Some(FileContent::Project(id)) => {
            host.launch_project(id).map_err(|message| CommandError::Host {
                operation: "launch project",
                message,
            })?;
            tracing::info!(project = %id, "project launched");
            Ok(CommandResult::output(format!("Executing {id}...\nLaunching {id} in a new window.")))
        }
        _ => Ok(CommandResult::output(format!("Error: ./{name}: Permission denied"))),
    }
}
