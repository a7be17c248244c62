use cyberterm::{GameKind, HostOps, PowerAction};

/// Host side effects in a plain terminal: page changes become status notices, power actions
/// end the process.
#[derive(Debug, Default)]
pub struct CliHost {
    notice: Option<String>,
    power: Option<PowerAction>,
    open_requested: bool,
    reload_requested: bool,
}

impl CliHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn power_action(&self) -> Option<PowerAction> {
        self.power
    }

    /// Returns and clears a pending request to open the terminal.
    pub fn take_open_request(&mut self) -> bool {
        std::mem::take(&mut self.open_requested)
    }

    pub fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }

    fn set_notice(&mut self, notice: String) {
        tracing::debug!(%notice, "host notice");
        self.notice = Some(notice);
    }
}

impl HostOps for CliHost {
    fn navigate(&mut self, url_path: &str) {
        self.set_notice(format!("page: {url_path}"));
    }

    fn open_blog(&mut self, id: &str) {
        self.set_notice(format!("reading: /blog/{id}"));
    }

    fn open_project(&mut self, id: &str) {
        self.set_notice(format!("viewing: /projects/{id}"));
    }

    fn launch_project(&mut self, id: &str) -> Result<(), String> {
        self.set_notice(format!("launched: {id}"));
        Ok(())
    }

    fn reload(&mut self) {
        self.reload_requested = true;
        self.set_notice("reloading content".to_string());
    }

    fn power(&mut self, action: PowerAction) {
        tracing::info!(%action, "power action requested");
        self.power = Some(action);
    }

    fn open_game(&mut self, game: GameKind) {
        self.set_notice(format!("{} is not available in this terminal", game.title()));
    }

    fn open_terminal(&mut self) {
        self.open_requested = true;
    }

    fn close_terminal(&mut self) {
        self.set_notice("terminal closed".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_taken_once() {
        let mut host = CliHost::new();
        host.open_terminal();
        host.reload();
        assert!(host.take_open_request());
        assert!(!host.take_open_request());
        assert!(host.take_reload_request());
        assert_eq!(host.notice(), Some("reloading content"));
    }

    #[test]
    fn power_is_recorded() {
        let mut host = CliHost::new();
        assert_eq!(host.power_action(), None);
        host.power(PowerAction::Halt);
        assert_eq!(host.power_action(), Some(PowerAction::Halt));
    }
}
