//! Command registry: user-facing command names to procedure lists.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::TezonatorError;
use crate::procedure::ProcedureRef;
use crate::procedures::{
    build_procedures, init_procedures, start_procedures, stop_procedures, Shell,
};

/// Commands that run procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum CommandName {
    Build,
    Init,
    Start,
    Stop,
}

impl CommandName {
    pub const ALL: [CommandName; 4] = [
        CommandName::Build,
        CommandName::Init,
        CommandName::Start,
        CommandName::Stop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::Build => "build",
            CommandName::Init => "init",
            CommandName::Start => "start",
            CommandName::Stop => "stop",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            CommandName::Build => "Clone, compile and install the network's binaries, then write service units",
            CommandName::Init => "Initialize client and node configuration for the network",
            CommandName::Start => "Start the node and DAL node services",
            CommandName::Stop => "Stop every service of the network",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandName {
    type Err = TezonatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandName::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| TezonatorError::UnknownCommand { name: s.to_string() })
    }
}

/// A command's description and top-level procedures.
pub struct CommandEntry {
    pub name: CommandName,
    pub description: &'static str,
    pub procedures: Vec<ProcedureRef>,
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.procedures.iter().map(|p| p.id()).collect();
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("procedures", &ids)
            .finish()
    }
}

/// Every command, built once at startup.
#[derive(Debug)]
pub struct CommandRegistry {
    entries: BTreeMap<CommandName, CommandEntry>,
}

impl CommandRegistry {
    /// Build the registry with procedures that run commands through `shell`.
    pub fn new(shell: Shell) -> Self {
        let entries = CommandName::ALL
            .into_iter()
            .map(|name| {
                let procedures = match name {
                    CommandName::Build => build_procedures(shell.clone()),
                    CommandName::Init => init_procedures(shell.clone()),
                    CommandName::Start => start_procedures(shell.clone()),
                    CommandName::Stop => stop_procedures(shell.clone()),
                };
                let entry = CommandEntry {
                    name,
                    description: name.description(),
                    procedures,
                };
                (name, entry)
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: CommandName) -> Option<&CommandEntry> {
        self.entries.get(&name)
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::FakeShell;
    use std::sync::Arc;

    fn registry() -> CommandRegistry {
        CommandRegistry::new(Arc::new(FakeShell::new()))
    }

    #[test]
    fn every_command_is_registered() {
        let registry = registry();
        let names: Vec<_> = registry.iter().map(|e| e.name).collect();
        assert_eq!(names, CommandName::ALL.to_vec());
    }

    #[test]
    fn build_starts_from_service_files() {
        let registry = registry();
        let build = registry.get(CommandName::Build).unwrap();
        let ids: Vec<_> = build.procedures.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["create service files"]);
    }

    #[test]
    fn init_reaches_node_through_configure() {
        let registry = registry();
        let ids: Vec<_> = registry
            .get(CommandName::Init)
            .unwrap()
            .procedures
            .iter()
            .map(|p| p.id().to_string())
            .collect();
        assert_eq!(
            ids,
            vec![
                "init octez client",
                "configure node",
                "generate identity"
            ]
        );
    }

    #[test]
    fn parses_names() {
        assert_eq!("stop".parse::<CommandName>().unwrap(), CommandName::Stop);
        let err = "monitor".parse::<CommandName>().unwrap_err();
        assert!(err.to_string().contains("monitor"));
    }
}
