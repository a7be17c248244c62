//! Path resolution over segment stacks.
//!
//! Paths are `Vec<String>` segment stacks from the VFS root; the empty stack is the root.
//! Resolution never consults the VFS, so a resolved path may not exist.

/// Resolves `input` against `current`.
///
/// Absolute input (leading `/`) ignores `current`. `..` pops (a no-op at the root), `.` and
/// empty segments are skipped.
pub fn resolve(current: &[String], input: &str) -> Vec<String> {
    let mut resolved = if input.starts_with('/') {
        Vec::new()
    } else {
        current.to_vec()
    };

    for segment in input.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                resolved.pop();
            }
            other => resolved.push(other.to_string()),
        }
    }

    resolved
}

/// Absolute display form: `/` at the root, `/a/b` otherwise.
pub fn display_path(segments: &[String]) -> String {
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Prompt form, with the root shown as the home directory: `~`, `~/blog`.
pub fn prompt_path(segments: &[String]) -> String {
    if segments.is_empty() {
        "~".to_string()
    } else {
        format!("~/{}", segments.join("/"))
    }
}

/// Splits a partially typed path into the directory part (kept verbatim, including its
/// trailing `/`) and the final segment being completed.
pub fn split_partial(partial: &str) -> (&str, &str) {
    match partial.rfind('/') {
        Some(idx) => (&partial[..=idx], &partial[idx + 1..]),
        None => ("", partial),
    }
}

#[cfg(test)]
pub(crate) fn segments(path: &[&str]) -> Vec<String> {
    path.iter().map(|segment| segment.to_string()).collect()
}
