//! Rescue mode: the simulated infrastructure failure that locks the terminal.
//!
//! `Normal -> RescueActive` is triggered from outside (`activate`); the only way back is
//! `systemctl start NetworkManager`, which calls [`RescueControl::resolve`].

use time::{Duration, OffsetDateTime};

pub const DEFAULT_WARNING_INTERVAL: Duration = Duration::seconds(60);

pub const RESCUE_BANNER: &str = "RESCUE MODE ACTIVE\n\
Network infrastructure failure detected. All commands are locked.\n\
Restore connectivity with:\n  systemctl start NetworkManager";

/// The rescue flag as seen by the dispatcher.
pub trait RescueControl {
    fn is_active(&self) -> bool;

    fn activated_at(&self) -> Option<OffsetDateTime>;

    fn resolve(&mut self);

    /// Countdown warning due at `now`, if any.
    fn due_warning(&mut self, _now: OffsetDateTime) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescueMode {
    activated_at: Option<OffsetDateTime>,
    warning_interval: Duration,
    warnings_issued: i64,
}

impl Default for RescueMode {
    fn default() -> Self {
        Self::new()
    }
}

impl RescueMode {
    pub fn new() -> Self {
        Self::with_warning_interval(DEFAULT_WARNING_INTERVAL)
    }

    pub fn with_warning_interval(warning_interval: Duration) -> Self {
        Self {
            activated_at: None,
            warning_interval,
            warnings_issued: 0,
        }
    }

    /// Enters rescue mode. A second activation keeps the original timestamp.
    pub fn activate(&mut self, now: OffsetDateTime) {
        if self.activated_at.is_some() {
            return;
        }
        tracing::warn!(at = %now, "rescue mode activated");
        self.activated_at = Some(now);
        self.warnings_issued = 0;
    }

    pub fn elapsed(&self, now: OffsetDateTime) -> Option<Duration> {
        self.activated_at.map(|since| now - since)
    }
}

impl RescueControl for RescueMode {
    fn is_active(&self) -> bool {
        self.activated_at.is_some()
    }

    fn activated_at(&self) -> Option<OffsetDateTime> {
        self.activated_at
    }

    fn resolve(&mut self) {
        if self.activated_at.take().is_some() {
            tracing::info!("rescue mode resolved");
        }
        self.warnings_issued = 0;
    }

    /// One warning per elapsed interval; intervals missed between polls collapse into one.
    fn due_warning(&mut self, now: OffsetDateTime) -> Option<String> {
        let elapsed = self.elapsed(now)?;
        let interval = self.warning_interval.whole_seconds();
        if interval <= 0 {
            return None;
        }
        let due = elapsed.whole_seconds() / interval;
        if due <= self.warnings_issued {
            return None;
        }
        self.warnings_issued = due;
        let seconds = elapsed.whole_seconds();
        Some(format!(
            "WARNING: rescue mode active for {}m{:02}s. Run 'systemctl start NetworkManager' to restore the network.",
            seconds / 60,
            seconds % 60
        ))
    }
}
