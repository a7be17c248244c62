//! `shutdown`, `reboot`, `poweroff` and `halt`, plus the single-slot scheduler behind them.

use time::macros::format_description;
use time::{Duration, OffsetDateTime, Time, UtcOffset};

use crate::commands::{CommandError, CommandResult, HostOps, PowerAction};

const DEFAULT_DELAY_MINUTES: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingShutdown {
    pub action: PowerAction,
    pub at: OffsetDateTime,
    pub message: Option<String>,
}

/// At most one shutdown is pending; scheduling replaces it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShutdownScheduler {
    pending: Option<PendingShutdown>,
}

impl ShutdownScheduler {
    /// Schedules `shutdown`, returning the one it replaced.
    pub fn schedule(&mut self, shutdown: PendingShutdown) -> Option<PendingShutdown> {
        tracing::info!(action = %shutdown.action, at = %shutdown.at, "shutdown scheduled");
        self.pending.replace(shutdown)
    }

    pub fn cancel(&mut self) -> Option<PendingShutdown> {
        let cancelled = self.pending.take();
        if cancelled.is_some() {
            tracing::info!("shutdown cancelled");
        }
        cancelled
    }

    pub fn pending(&self) -> Option<&PendingShutdown> {
        self.pending.as_ref()
    }

    /// Takes the pending shutdown once `now` has reached it.
    pub fn poll(&mut self, now: OffsetDateTime) -> Option<PendingShutdown> {
        if self.pending.as_ref().is_some_and(|pending| pending.at <= now) {
            let fired = self.pending.take();
            if let Some(fired) = &fired {
                tracing::info!(action = %fired.action, "shutdown fired");
            }
            return fired;
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum When {
    Now,
    In(Duration),
    At(Time),
}

fn parse_when(spec: &str) -> Option<When> {
    if spec == "now" {
        return Some(When::Now);
    }
    if let Some(minutes) = spec.strip_prefix('+') {
        let minutes: u32 = minutes.parse().ok()?;
        return Some(if minutes == 0 {
            When::Now
        } else {
            When::In(Duration::minutes(i64::from(minutes)))
        });
    }
    let (hour, minute) = spec.split_once(':')?;
    let time = Time::from_hms(hour.parse().ok()?, minute.parse().ok()?, 0).ok()?;
    Some(When::At(time))
}

/// Absolute fire time, or `None` when it falls outside the representable range.
fn resolve_when(when: When, now: OffsetDateTime) -> Option<OffsetDateTime> {
    match when {
        When::Now => Some(now),
        When::In(delay) => now.checked_add(delay),
        When::At(time) => {
            let today = now.replace_time(time);
            if today <= now {
                today.checked_add(Duration::days(1))
            } else {
                Some(today)
            }
        }
    }
}

/// `date(1)`-style timestamp in UTC, e.g. `Sun 2026-10-18 12:05:00 UTC`.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let format = format_description!(
        "[weekday repr:short] [year]-[month]-[day] [hour]:[minute]:[second] UTC"
    );
    let utc = at.to_offset(UtcOffset::UTC);
    utc.format(&format).unwrap_or_else(|_| utc.to_string())
}

pub fn run(
    args: &str,
    scheduler: &mut ShutdownScheduler,
    host: &mut dyn HostOps,
    now: OffsetDateTime,
) -> Result<CommandResult, CommandError> {
    let mut action = PowerAction::Poweroff;
    let mut cancel = false;
    let mut operands = Vec::new();

    for token in args.split_whitespace() {
        if !operands.is_empty() || !token.starts_with('-') || token == "-" {
            operands.push(token);
            continue;
        }
        match token {
            "--reboot" => action = PowerAction::Reboot,
            "--poweroff" => action = PowerAction::Poweroff,
            "--halt" => action = PowerAction::Halt,
            _ if token.starts_with("--") => {
                return Ok(CommandResult::output(format!(
                    "shutdown: unrecognized option '{token}'"
                )))
            }
            _ => {
                for flag in token[1..].chars() {
                    match flag {
                        'r' => action = PowerAction::Reboot,
                        'h' | 'P' => action = PowerAction::Poweroff,
                        'H' => action = PowerAction::Halt,
                        'c' => cancel = true,
                        other => {
                            return Ok(CommandResult::output(format!(
                                "shutdown: invalid option -- '{other}'"
                            )))
                        }
                    }
                }
            }
        }
    }

    if cancel {
        let text = match scheduler.cancel() {
            Some(_) => "Shutdown cancelled.",
            None => "No scheduled shutdown to cancel.",
        };
        return Ok(CommandResult::output(text));
    }

    let mut operands = operands.into_iter();
    let spec = operands.next();
    let unparsable = |spec: &str| {
        CommandResult::output(format!("shutdown: failed to parse time specification: {spec}"))
    };
    let when = match spec {
        None => When::In(Duration::minutes(DEFAULT_DELAY_MINUTES)),
        Some(spec) => match parse_when(spec) {
            Some(when) => when,
            None => return Ok(unparsable(spec)),
        },
    };
    let message = operands.collect::<Vec<_>>().join(" ");
    let message = (!message.is_empty()).then_some(message);

    if when == When::Now {
        // An immediate action supersedes anything pending.
        scheduler.cancel();
        return Ok(power_now(action, host));
    }

    let Some(at) = resolve_when(when, now) else {
        return Ok(unparsable(spec.unwrap_or_default()));
    };
    let replaced = scheduler.schedule(PendingShutdown {
        action,
        at,
        message: message.clone(),
    });

    let mut lines = Vec::new();
    if replaced.is_some() {
        lines.push("Previously scheduled shutdown replaced.".to_string());
    }
    lines.push(format!(
        "Shutdown scheduled for {}, use 'shutdown -c' to cancel.",
        format_timestamp(at)
    ));
    if let Some(message) = message {
        lines.push(format!("Broadcast message: {message}"));
    }
    Ok(CommandResult::output(lines.join("\n")))
}

/// `reboot`, `poweroff` and `halt` act immediately.
pub fn power_now(action: PowerAction, host: &mut dyn HostOps) -> CommandResult {
    host.power(action);
    CommandResult::output(broadcast(action))
}

/// Line shown when a power action takes effect.
pub fn broadcast(action: PowerAction) -> String {
    format!(
        "Broadcast message from root@cyberdeck:\nThe system will {} now!",
        action.verb()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::GameKind;
    use time::macros::{datetime, time};

    #[derive(Default)]
    struct PowerLog(Vec<PowerAction>);

    impl HostOps for PowerLog {
        fn navigate(&mut self, _url_path: &str) {}
        fn open_blog(&mut self, _id: &str) {}
        fn open_project(&mut self, _id: &str) {}
        fn launch_project(&mut self, _id: &str) -> Result<(), String> {
            Ok(())
        }
        fn reload(&mut self) {}
        fn power(&mut self, action: PowerAction) {
            self.0.push(action);
        }
        fn open_game(&mut self, _game: GameKind) {}
        fn open_terminal(&mut self) {}
        fn close_terminal(&mut self) {}
    }

    const NOW: OffsetDateTime = datetime!(2026-10-18 12:00 UTC);

    fn shutdown(args: &str, scheduler: &mut ShutdownScheduler, host: &mut PowerLog) -> String {
        run(args, scheduler, host, NOW)
            .expect("shutdown never fails hard")
            .text()
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn time_specs() {
        assert_eq!(parse_when("now"), Some(When::Now));
        assert_eq!(parse_when("+0"), Some(When::Now));
        assert_eq!(parse_when("+5"), Some(When::In(Duration::minutes(5))));
        assert_eq!(parse_when("23:30"), Some(When::At(time!(23:30))));
        assert_eq!(parse_when("25:00"), None);
        assert_eq!(parse_when("soon"), None);
    }

    #[test]
    fn clock_times_roll_to_the_next_day() {
        assert_eq!(resolve_when(When::At(time!(13:00)), NOW), Some(datetime!(2026-10-18 13:00 UTC)));
        assert_eq!(resolve_when(When::At(time!(11:00)), NOW), Some(datetime!(2026-10-19 11:00 UTC)));
    }

    #[test]
    fn schedule_then_cancel_never_fires() {
        let mut scheduler = ShutdownScheduler::default();
        let mut host = PowerLog::default();
        assert_eq!(
            shutdown("+5", &mut scheduler, &mut host),
            "Shutdown scheduled for Sun 2026-10-18 12:05:00 UTC, use 'shutdown -c' to cancel."
        );
        assert_eq!(shutdown("-c", &mut scheduler, &mut host), "Shutdown cancelled.");
        assert_eq!(scheduler.poll(NOW + Duration::minutes(10)), None);
        assert!(host.0.is_empty());
    }

    #[test]
    fn rescheduling_replaces_the_pending_shutdown() {
        let mut scheduler = ShutdownScheduler::default();
        let mut host = PowerLog::default();
        shutdown("+5", &mut scheduler, &mut host);
        let text = shutdown("-r +10 maintenance window", &mut scheduler, &mut host);
        assert!(text.starts_with("Previously scheduled shutdown replaced."));
        assert!(text.ends_with("Broadcast message: maintenance window"));

        assert_eq!(scheduler.poll(NOW + Duration::minutes(5)), None);
        let fired = scheduler.poll(NOW + Duration::minutes(10)).expect("due");
        assert_eq!(fired.action, PowerAction::Reboot);
        assert_eq!(scheduler.pending(), None);
    }

    #[test]
    fn now_fires_immediately() {
        let mut scheduler = ShutdownScheduler::default();
        let mut host = PowerLog::default();
        let text = shutdown("-H now", &mut scheduler, &mut host);
        assert_eq!(text, "Broadcast message from root@cyberdeck:\nThe system will halt now!");
        assert_eq!(host.0, vec![PowerAction::Halt]);
    }

    #[test]
    fn bad_arguments() {
        let mut scheduler = ShutdownScheduler::default();
        let mut host = PowerLog::default();
        assert_eq!(
            shutdown("-x", &mut scheduler, &mut host),
            "shutdown: invalid option -- 'x'"
        );
        assert_eq!(
            shutdown("later", &mut scheduler, &mut host),
            "shutdown: failed to parse time specification: later"
        );
        assert_eq!(
            shutdown("-c", &mut scheduler, &mut host),
            "No scheduled shutdown to cancel."
        );
    }

    #[test]
    fn delays_past_the_calendar_are_rejected() {
        let mut scheduler = ShutdownScheduler::default();
        let mut host = PowerLog::default();
        assert_eq!(
            shutdown("+4294967295", &mut scheduler, &mut host),
            "shutdown: failed to parse time specification: +4294967295"
        );
        assert_eq!(scheduler.pending(), None);
        assert!(host.0.is_empty());
    }
}
