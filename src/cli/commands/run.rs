//! Procedure commands: `build`, `init`, `start`, `stop`.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::args::NetworkArgs;
use crate::commands::{CommandName, CommandRegistry};
use crate::config::{load_settings, Settings, UserPaths};
use crate::context::{CommandOptions, ExecutionContext, NetworkDescriptor};
use crate::error::Result;
use crate::network::{resolve_commit, NetworkRegistry};
use crate::procedures::Shell;
use crate::runner::{Executor, RunOptions};
use crate::ui::{format_duration, ProgressView, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Runs one command's procedures for one network.
pub struct RunCommand {
    name: CommandName,
    args: NetworkArgs,
    shell: Shell,
    cancel: CancellationToken,
}

impl RunCommand {
    pub fn new(name: CommandName, args: NetworkArgs, shell: Shell, cancel: CancellationToken) -> Self {
        Self {
            name,
            args,
            shell,
            cancel,
        }
    }

    /// Settings with command-line overrides applied.
    fn effective_settings(&self, mut settings: Settings) -> Settings {
        if let Some(url) = &self.args.registry_url {
            settings.registry_url = url.clone();
        }
        if let Some(secs) = self.args.timeout {
            settings.step_timeout_secs = Some(secs);
        }
        settings.dedupe |= self.args.dedupe;
        settings
    }

    async fn build_context(
        &self,
        ui: &mut dyn UserInterface,
        paths: UserPaths,
        settings: &Settings,
    ) -> Result<ExecutionContext> {
        let network = self.args.network;

        ui.message(&format!("Fetching networks from {}", settings.registry_url));
        let registry = NetworkRegistry::fetch(&settings.registry_url).await?;
        let entry = registry.require(network, &settings.registry_url)?;
        let key = registry
            .find(network)
            .map(|(key, _)| key.to_string())
            .unwrap_or_else(|| network.to_string());

        let repo_path = paths.data_root.join(&settings.repo_dir);
        let commit =
            resolve_commit(self.shell.as_ref(), &repo_path, &settings.git_url, &entry.git_ref)
                .await?;
        info!("{} uses {} ({})", key, entry.git_ref, commit);

        let descriptor = NetworkDescriptor::new(network, key, entry, commit);
        let options = CommandOptions {
            force: self.args.force,
        };
        Ok(ExecutionContext::new(paths, descriptor, options, settings))
    }
}

#[async_trait]
impl Command for RunCommand {
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let paths = UserPaths::from_env()?;
        paths.create_dirs()?;
        let settings = self.effective_settings(load_settings(&paths.config_root)?);
        debug!("settings: {:?}", settings);

        let ctx = self.build_context(ui, paths, &settings).await?;

        let registry = CommandRegistry::new(self.shell.clone());
        let procedures = registry
            .get(self.name)
            .map(|entry| entry.procedures.as_slice())
            .unwrap_or_default();

        ui.show_header(&format!("{} {}", self.name, ctx.network().human_name));

        let executor = Executor::new(RunOptions {
            dedupe: settings.dedupe,
            step_timeout: settings.step_timeout(),
        })
        .with_cancellation(self.cancel.clone());

        let summary = {
            let mut view = ProgressView::new(&mut *ui);
            executor
                .run_with_progress(procedures, &ctx, |event| view.on_event(event))
                .await?
        };

        if summary.is_noop() {
            ui.success("Nothing to do");
        } else {
            ui.success(&format!(
                "{} ran, {} already done in {}",
                summary.executed.len(),
                summary.skipped.len(),
                format_duration(summary.duration)
            ));
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkName;
    use crate::shell::FakeShell;
    use std::sync::Arc;
    use std::time::Duration;

    fn command(args: NetworkArgs) -> RunCommand {
        RunCommand::new(
            CommandName::Start,
            args,
            Arc::new(FakeShell::new()),
            CancellationToken::new(),
        )
    }

    fn args() -> NetworkArgs {
        NetworkArgs {
            network: NetworkName::Ghostnet,
            force: false,
            timeout: None,
            dedupe: false,
            registry_url: None,
        }
    }

    #[test]
    fn file_settings_survive_without_flags() {
        let file = Settings {
            dedupe: true,
            step_timeout_secs: Some(30),
            ..Settings::default()
        };
        let settings = command(args()).effective_settings(file);
        assert!(settings.dedupe);
        assert_eq!(settings.step_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn flags_override_file_settings() {
        let cmd = command(NetworkArgs {
            timeout: Some(5),
            dedupe: true,
            registry_url: Some("http://localhost/nets.json".into()),
            ..args()
        });
        let settings = cmd.effective_settings(Settings::default());
        assert!(settings.dedupe);
        assert_eq!(settings.step_timeout_secs, Some(5));
        assert_eq!(settings.registry_url, "http://localhost/nets.json");
    }
}
