//! Fake command runner for testing.
//!
//! `FakeShell` implements [`CommandRunner`] without spawning anything. It
//! records every command and answers with scripted outputs matched by
//! command-line prefix.
//!
//! # Example
//!
//! ```
//! use tezonator::shell::{CommandOutput, CommandRunner, CommandSpec, FakeShell};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let shell = FakeShell::new();
//! shell.respond("git status", CommandOutput::success(""));
//! shell.respond("make", CommandOutput::failure(Some(2), "no rule"));
//!
//! assert!(shell.run(&CommandSpec::new("git").arg("status")).await.unwrap().success);
//! assert!(shell.run_checked(&CommandSpec::new("make")).await.is_err());
//! assert_eq!(shell.command_lines(), vec!["git status", "make"]);
//! # });
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::Result;

use super::command::{CommandOutput, CommandRunner, CommandSpec};

/// Recording, scripted command runner.
#[derive(Debug, Clone, Default)]
pub struct FakeShell {
    responses: Arc<Mutex<Vec<(String, CommandOutput)>>>,
    calls: Arc<Mutex<Vec<CommandSpec>>>,
}

impl FakeShell {
    /// A shell where every command succeeds with empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands whose command line starts with `prefix`.
    ///
    /// Later registrations win over earlier ones.
    pub fn respond(&self, prefix: impl Into<String>, output: CommandOutput) {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((prefix.into(), output));
    }

    /// Every command run so far.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Command lines of every command run so far.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(CommandSpec::command_line).collect()
    }

    /// Whether any command line starts with `prefix`.
    pub fn ran(&self, prefix: &str) -> bool {
        self.command_lines().iter().any(|l| l.starts_with(prefix))
    }
}

#[async_trait]
impl CommandRunner for FakeShell {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(spec.clone());

        let line = spec.command_line();
        let responses = self
            .responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let output = responses
            .iter()
            .rev()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| CommandOutput::success(""));
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn later_response_overrides_earlier() {
        let shell = FakeShell::new();
        shell.respond("git", CommandOutput::failure(Some(1), "old"));
        shell.respond("git", CommandOutput::success("new"));

        let out = shell.run(&CommandSpec::new("git").arg("pull")).await.unwrap();
        assert_eq!(out.stdout, "new");
    }

    #[tokio::test]
    async fn unmatched_commands_succeed() {
        let shell = FakeShell::new();
        let out = shell.run(&CommandSpec::new("systemctl")).await.unwrap();
        assert!(out.success);
        assert!(shell.ran("systemctl"));
    }
}
