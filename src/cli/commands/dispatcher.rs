//! Command dispatching.
//!
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands, NetworkArgs};
use crate::commands::CommandName;
use crate::error::Result;
use crate::procedures::Shell;
use crate::shell::SystemShell;
use crate::ui::UserInterface;

/// A CLI subcommand.
#[async_trait]
pub trait Command {
    /// Execute the command.
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub success: bool,
    /// 0 for success.
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Routes CLI subcommands to their implementations.
pub struct CommandDispatcher {
    shell: Shell,
    cancel: CancellationToken,
}

impl CommandDispatcher {
    /// A dispatcher running commands on the host.
    pub fn new(cancel: CancellationToken) -> Self {
        Self::with_shell(Arc::new(SystemShell::new()), cancel)
    }

    /// A dispatcher running commands through `shell`.
    pub fn with_shell(shell: Shell, cancel: CancellationToken) -> Self {
        Self { shell, cancel }
    }

    pub async fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Build(args) => self.run(CommandName::Build, args, ui).await,
            Commands::Init(args) => self.run(CommandName::Init, args, ui).await,
            Commands::Start(args) => self.run(CommandName::Start, args, ui).await,
            Commands::Stop(args) => self.run(CommandName::Stop, args, ui).await,
            Commands::Networks(args) => {
                let cmd = super::networks::NetworksCommand::new(args.clone());
                cmd.execute(ui).await
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui).await
            }
        }
    }

    async fn run(
        &self,
        name: CommandName,
        args: &NetworkArgs,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let cmd = super::run::RunCommand::new(
            name,
            args.clone(),
            self.shell.clone(),
            self.cancel.clone(),
        );
        cmd.execute(ui).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }
}
