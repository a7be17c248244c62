//! Informational commands: `help`, `whoami`, `status`, `pwd`, `echo`, `date`, `history`.

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use unicode_width::UnicodeWidthStr;

use crate::commands::shutdown::{format_timestamp, PendingShutdown};
use crate::commands::systemctl::ServiceTable;
use crate::core::keys::HostPlatform;
use crate::core::state::TerminalState;
use crate::runtime::rescue::RescueControl;

pub const USER: &str = "guest";
pub const HOST: &str = "cyberdeck";

struct HelpSection {
    title: &'static str,
    entries: Vec<(String, &'static str)>,
}

fn help_sections(platform: HostPlatform) -> Vec<HelpSection> {
    let entry = |usage: &str, description: &'static str| (usage.to_string(), description);
    let modifier = platform.shortcut_modifier_label();
    vec![
        HelpSection {
            title: "NAVIGATION",
            entries: vec![
                entry("cd [dir]", "Change directory (cd -, cd ~, cd ..)"),
                entry("ls [path]", "List directory contents"),
                entry("pwd", "Print working directory"),
                entry("../<dir>", "Shorthand for cd ../<dir>"),
            ],
        },
        HelpSection {
            title: "CONTENT",
            entries: vec![
                entry("read <name>", "Open a blog post or project"),
                entry("./<project>", "Launch a project demo (from /projects)"),
            ],
        },
        HelpSection {
            title: "SYSTEM",
            entries: vec![
                entry("whoami", "Display user information"),
                entry("status", "Show system status"),
                entry("systemctl <verb>", "Manage services (status|start|stop|restart|enable|disable)"),
                entry("shutdown [opts]", "Schedule a shutdown (shutdown -c cancels)"),
                entry("reboot | poweroff | halt", "Power actions"),
                entry("history", "Show command history"),
                entry("echo <text>", "Print text"),
                entry("date", "Print the current date"),
                entry("clear", "Clear the terminal"),
                entry("reload", "Reload the page"),
                entry("exit | quit", "Close the terminal"),
            ],
        },
        HelpSection {
            title: "GAMES",
            entries: vec![
                entry("tetris", "Play Tetris"),
                entry("snake", "Play Snake"),
            ],
        },
        HelpSection {
            title: "SHORTCUTS",
            entries: vec![
                (format!("{modifier}+T"), "Open terminal"),
                (format!("{modifier}+H/A/B/P/C"), "Go to home/about/blog/projects/contact"),
                entry("Esc", "Close terminal"),
                entry("Tab", "Autocomplete"),
                entry("Up/Down", "Command history"),
            ],
        },
    ]
}

pub fn help(platform: HostPlatform) -> String {
    let sections = help_sections(platform);
    let width = sections
        .iter()
        .flat_map(|section| section.entries.iter())
        .map(|(usage, _)| usage.width())
        .max()
        .unwrap_or(0);

    let mut lines = vec!["CYBERDECK TERMINAL v2.077 - COMMAND REFERENCE".to_string()];
    for section in sections {
        lines.push(String::new());
        lines.push(section.title.to_string());
        for (usage, description) in section.entries {
            let padding = " ".repeat(width - usage.width());
            lines.push(format!("  {usage}{padding}  {description}"));
        }
    }
    lines.join("\n")
}

pub fn whoami() -> String {
    [
        format!("USER: {USER}"),
        format!("HOST: {HOST}"),
        "ACCESS: public (read-only)".to_string(),
        "Type 'cd /about' to learn who runs this deck.".to_string(),
    ]
    .join("\n")
}

pub fn pwd(state: &TerminalState) -> String {
    state.cwd()
}

pub fn echo(args: &str) -> String {
    args.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `date(1)` default format, e.g. `Sun Oct 18 12:00:00 UTC 2026`.
pub fn date(now: OffsetDateTime) -> String {
    let format = format_description!(
        "[weekday repr:short] [month repr:short] [day padding:space] [hour]:[minute]:[second] UTC [year]"
    );
    let utc = now.to_offset(UtcOffset::UTC);
    utc.format(&format).unwrap_or_else(|_| utc.to_string())
}

pub fn history(command_history: &[String]) -> String {
    let width = command_history.len().to_string().len().max(4);
    command_history
        .iter()
        .enumerate()
        .map(|(idx, command)| format!("{:>width$}  {command}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn status(
    state: &TerminalState,
    services: &ServiceTable,
    pending: Option<&PendingShutdown>,
    rescue: &dyn RescueControl,
    now: OffsetDateTime,
) -> String {
    let degraded = services.degraded();
    let mut lines = vec![
        "SYSTEM STATUS".to_string(),
        format!("  Host:       {HOST}"),
        format!("  User:       {USER}"),
        format!("  Directory:  {}", state.cwd()),
        format!(
            "  Content:    {} blog posts, {} projects",
            state.file_system.blog_count(),
            state.file_system.project_count()
        ),
    ];

    if degraded.is_empty() {
        lines.push("  Services:   all systems nominal".to_string());
    } else {
        lines.push(format!("  Services:   degraded ({})", degraded.join(", ")));
    }

    match (rescue.is_active(), rescue.activated_at()) {
        (true, Some(since)) => {
            let elapsed = (now - since).whole_seconds().max(0);
            lines.push(format!(
                "  Rescue:     ACTIVE for {}m{:02}s",
                elapsed / 60,
                elapsed % 60
            ));
        }
        (true, None) => lines.push("  Rescue:     ACTIVE".to_string()),
        (false, _) => lines.push("  Rescue:     inactive".to_string()),
    }

    match pending {
        Some(pending) => lines.push(format!(
            "  Shutdown:   {} scheduled for {}",
            pending.action,
            format_timestamp(pending.at)
        )),
        None => lines.push("  Shutdown:   none scheduled".to_string()),
    }

    lines.join("\n")
}
