//! Callbacks into the hosting application.

use std::fmt;

/// Power actions a shutdown can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Poweroff,
    Reboot,
    Halt,
}

impl PowerAction {
    pub fn verb(self) -> &'static str {
        match self {
            Self::Poweroff => "power off",
            Self::Reboot => "reboot",
            Self::Halt => "halt",
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Poweroff => "poweroff",
            Self::Reboot => "reboot",
            Self::Halt => "halt",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    Tetris,
    Snake,
}

impl GameKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Tetris => "TETRIS",
            Self::Snake => "SNAKE",
        }
    }
}

/// Host-side effects the terminal can trigger. All calls are fire-and-forget except
/// `launch_project`, whose failure is surfaced as a command error.
pub trait HostOps {
    fn navigate(&mut self, url_path: &str);
    fn open_blog(&mut self, id: &str);
    fn open_project(&mut self, id: &str);
    fn launch_project(&mut self, id: &str) -> Result<(), String>;
    fn reload(&mut self);
    fn power(&mut self, action: PowerAction);
    fn open_game(&mut self, game: GameKind);
    fn open_terminal(&mut self);
    fn close_terminal(&mut self);
}
