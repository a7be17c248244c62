//! Command dispatch.
//!
//! Order of precedence: rescue mode, `./<project>`, `../<dir>`, then the command table.
//! The dispatcher owns the little state commands keep between calls (the `cd -` target, the
//! service table and the pending shutdown); navigation state travels in and out as
//! [`TerminalState`] values.

use time::OffsetDateTime;

use crate::commands::shutdown::{PendingShutdown, ShutdownScheduler};
use crate::commands::systemctl::{ServiceTable, NETWORK_MANAGER};
use crate::commands::{
    cd, info, ls, read, shutdown, split_command, systemctl, CommandError, CommandName,
    CommandOutcome, CommandResult, GameKind, HostOps, PowerAction,
};
use crate::core::keys::HostPlatform;
use crate::core::state::TerminalState;
use crate::runtime::rescue::{RescueControl, RESCUE_BANNER};

/// Collaborators for one dispatch.
pub struct DispatchContext<'a> {
    pub host: &'a mut dyn HostOps,
    pub rescue: &'a mut dyn RescueControl,
    pub platform: HostPlatform,
    pub command_history: &'a [String],
    pub now: OffsetDateTime,
}

pub fn command_not_found(word: &str) -> String {
    format!("Error: command not found: {word}\nType 'help' to see available commands.")
}

#[derive(Debug, Default, Clone)]
pub struct CommandDispatcher {
    previous_dir: Option<Vec<String>>,
    services: ServiceTable,
    shutdown: ShutdownScheduler,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous_dir(&self) -> Option<&[String]> {
        self.previous_dir.as_deref()
    }

    pub fn services(&self) -> &ServiceTable {
        &self.services
    }

    pub fn pending_shutdown(&self) -> Option<&PendingShutdown> {
        self.shutdown.pending()
    }

    /// Takes the pending shutdown once it is due.
    pub fn poll_shutdown(&mut self, now: OffsetDateTime) -> Option<PendingShutdown> {
        self.shutdown.poll(now)
    }

    pub fn execute(
        &mut self,
        raw: &str,
        state: &TerminalState,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<CommandResult, CommandError> {
        let input = raw.trim();
        if input.is_empty() {
            return Ok(CommandResult::silent());
        }

        if ctx.rescue.is_active() {
            return self.execute_rescue(input, ctx);
        }

        if let Some(name) = input.strip_prefix("./") {
            return read::execute(name, state, ctx.host);
        }
        if input.starts_with("../") {
            return cd::run(input, state, &mut self.previous_dir, ctx.host);
        }

        let (word, args) = split_command(input);
        let Some(command) = CommandName::parse(word) else {
            tracing::debug!(word, "command not found");
            return Ok(CommandResult::output(command_not_found(word)));
        };
        tracing::debug!(command = command.as_str(), "dispatch");

        match command {
            CommandName::Help => Ok(CommandResult::output(info::help(ctx.platform))),
            CommandName::Clear => Ok(CommandResult::outcome(CommandOutcome::ClearHistory)),
            CommandName::Whoami => Ok(CommandResult::output(info::whoami())),
            CommandName::Status => Ok(CommandResult::output(info::status(
                state,
                &self.services,
                self.shutdown.pending(),
                &*ctx.rescue,
                ctx.now,
            ))),
            CommandName::Cd => cd::run(args, state, &mut self.previous_dir, ctx.host),
            CommandName::Ls => ls::run(args, state),
            CommandName::Pwd => Ok(CommandResult::output(info::pwd(state))),
            CommandName::Read => read::run(args, state, ctx.host),
            CommandName::Echo => Ok(CommandResult::output(info::echo(args))),
            CommandName::Date => Ok(CommandResult::output(info::date(ctx.now))),
            CommandName::History => Ok(CommandResult::output(info::history(ctx.command_history))),
            CommandName::Systemctl => systemctl::run(args, &mut self.services, ctx.rescue),
            CommandName::Shutdown => shutdown::run(args, &mut self.shutdown, ctx.host, ctx.now),
            CommandName::Reboot => Ok(self.power_now(PowerAction::Reboot, ctx.host)),
            CommandName::Poweroff => Ok(self.power_now(PowerAction::Poweroff, ctx.host)),
            CommandName::Halt => Ok(self.power_now(PowerAction::Halt, ctx.host)),
            CommandName::Reload => {
                ctx.host.reload();
                Ok(CommandResult::output("Reloading..."))
            }
            CommandName::Exit | CommandName::Quit => {
                Ok(CommandResult::outcome(CommandOutcome::ExitTerminal))
            }
            CommandName::Tetris => Ok(CommandResult::outcome(CommandOutcome::OpenGame(GameKind::Tetris))),
            CommandName::Snake => Ok(CommandResult::outcome(CommandOutcome::OpenGame(GameKind::Snake))),
        }
    }

    fn power_now(&mut self, action: PowerAction, host: &mut dyn HostOps) -> CommandResult {
        self.shutdown.cancel();
        shutdown::power_now(action, host)
    }

    /// Everything but the one recovery command gets the banner and changes nothing.
    fn execute_rescue(
        &mut self,
        input: &str,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<CommandResult, CommandError> {
        let mut words = input.split_whitespace();
        let command = words.next().unwrap_or_default();
        let rest = words.collect::<Vec<_>>().join(" ");

        if command == "systemctl" && rest == format!("start {NETWORK_MANAGER}") {
            return systemctl::run(&rest, &mut self.services, ctx.rescue);
        }
        tracing::debug!(input, "input refused in rescue mode");
        Ok(CommandResult::output(RESCUE_BANNER))
    }
}
