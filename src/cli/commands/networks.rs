//! The `networks` command: known networks and what the registry says
//! about them.

use async_trait::async_trait;

use crate::cli::args::NetworksArgs;
use crate::config::{load_settings, Settings, UserPaths};
use crate::error::Result;
use crate::network::{NetworkName, NetworkRegistry, PortPlan};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

pub struct NetworksCommand {
    args: NetworksArgs,
}

impl NetworksCommand {
    pub fn new(args: NetworksArgs) -> Self {
        Self { args }
    }

    fn registry_url(&self) -> Result<String> {
        if let Some(url) = &self.args.registry_url {
            return Ok(url.clone());
        }
        // A missing HOME only means there is no settings file to read.
        let settings = match UserPaths::from_env() {
            Ok(paths) => load_settings(&paths.config_root)?,
            Err(_) => Settings::default(),
        };
        Ok(settings.registry_url)
    }
}

/// One line per known network.
pub fn network_lines(registry: &NetworkRegistry) -> Vec<String> {
    NetworkName::ALL
        .iter()
        .map(|name| {
            let rpc = PortPlan::for_network(*name).node_rpc;
            match registry.find(*name) {
                Some((key, entry)) => format!(
                    "{:<10} {:<28} {:<12} rpc :{}",
                    name.as_str(),
                    key,
                    entry.git_ref,
                    rpc
                ),
                None => format!("{:<10} {:<28} {:<12} rpc :{}", name.as_str(), "-", "-", rpc),
            }
        })
        .collect()
}

#[async_trait]
impl Command for NetworksCommand {
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let url = self.registry_url()?;
        let registry = NetworkRegistry::fetch(&url).await?;
        if registry.is_empty() {
            ui.warning(&format!("The registry at {} lists no networks", url));
        }
        for line in network_lines(&registry) {
            println!("{}", line);
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_known_network() {
        let registry = NetworkRegistry::from_json(
            r#"{"ghostnet": {"human_name": "Ghostnet", "git_ref": "v19.1",
                "rpc_url": "https://rpc.ghostnet.teztnets.com", "last_baking_daemon": "PtParisB"}}"#,
        )
        .unwrap();

        let lines = network_lines(&registry);
        assert_eq!(lines.len(), NetworkName::ALL.len());
        let ghostnet = lines.iter().find(|l| l.starts_with("ghostnet")).unwrap();
        assert!(ghostnet.contains("v19.1"));
        assert!(ghostnet.contains(":7833"));
        assert!(lines.iter().any(|l| l.starts_with("mainnet") && l.contains(" - ")));
    }
}
