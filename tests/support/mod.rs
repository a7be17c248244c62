#![allow(dead_code)]

use std::sync::Arc;

use cyberterm::{
    GameKind, HostOps, HostPlatform, ManualClock, PowerAction, TerminalSession, TerminalState, Vfs,
};
use session_store::MemoryStore;
use time::macros::datetime;
use time::OffsetDateTime;

pub const START: OffsetDateTime = datetime!(2026-10-18 12:00 UTC);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Navigate(String),
    OpenBlog(String),
    OpenProject(String),
    LaunchProject(String),
    Reload,
    Power(PowerAction),
    OpenGame(GameKind),
    OpenTerminal,
    CloseTerminal,
}

#[derive(Debug, Default)]
pub struct HostSpy {
    pub calls: Vec<HostCall>,
    pub launch_failure: Option<String>,
}

impl HostSpy {
    pub fn navigations(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Navigate(url) => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl HostOps for HostSpy {
    fn navigate(&mut self, url_path: &str) {
        self.calls.push(HostCall::Navigate(url_path.to_string()));
    }

    fn open_blog(&mut self, id: &str) {
        self.calls.push(HostCall::OpenBlog(id.to_string()));
    }

    fn open_project(&mut self, id: &str) {
        self.calls.push(HostCall::OpenProject(id.to_string()));
    }

    fn launch_project(&mut self, id: &str) -> Result<(), String> {
        self.calls.push(HostCall::LaunchProject(id.to_string()));
        match &self.launch_failure {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }

    fn reload(&mut self) {
        self.calls.push(HostCall::Reload);
    }

    fn power(&mut self, action: PowerAction) {
        self.calls.push(HostCall::Power(action));
    }

    fn open_game(&mut self, game: GameKind) {
        self.calls.push(HostCall::OpenGame(game));
    }

    fn open_terminal(&mut self) {
        self.calls.push(HostCall::OpenTerminal);
    }

    fn close_terminal(&mut self) {
        self.calls.push(HostCall::CloseTerminal);
    }
}

pub fn fixture_vfs() -> Vfs {
    Vfs::build(
        ["my-post", "neon-nights", "ghost-protocol"],
        ["demo", "cyberdeck", "ice-breaker"],
    )
}

pub fn state_at(path: &[&str]) -> TerminalState {
    TerminalState::new(fixture_vfs()).with_path(path.iter().map(|s| s.to_string()).collect())
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(START))
}

/// Initialized, open session over an in-memory store.
pub fn session_with(store: MemoryStore, clock: Arc<ManualClock>) -> TerminalSession<MemoryStore> {
    let mut session = TerminalSession::new(store, HostPlatform::Other, clock);
    session.initialize_with(fixture_vfs());
    session.open();
    session
}

pub fn session() -> TerminalSession<MemoryStore> {
    session_with(MemoryStore::new(), manual_clock())
}
