//! External command execution.
//!
//! Procedures never spawn processes directly. They describe what to run
//! with a [`CommandSpec`] and hand it to a [`CommandRunner`], which keeps
//! them testable with [`FakeShell`](super::FakeShell).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, TezonatorError};

/// A program invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path.
    pub program: String,

    /// Arguments, passed verbatim (no shell parsing).
    pub args: Vec<String>,

    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged over the inherited environment
    /// unless `clear_env` is set).
    pub env: HashMap<String, String>,

    /// Start from an empty environment.
    pub clear_env: bool,

    /// Timeout (None = no timeout).
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    /// Describe an invocation of `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Set environment variables.
    pub fn envs(mut self, env: HashMap<String, String>) -> Self {
        self.env.extend(env);
        self
    }

    /// Do not inherit the parent environment.
    pub fn clear_env(mut self) -> Self {
        self.clear_env = true;
        self
    }

    /// Bound the runtime.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Human-readable command line.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandOutput {
    /// Create a success result.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
            duration: Duration::ZERO,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
            duration: Duration::ZERO,
            success: false,
        }
    }

    /// Turn a non-zero exit into an error carrying stderr.
    pub fn into_success(self, spec: &CommandSpec) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(TezonatorError::CommandFailed {
                command: spec.command_line(),
                code: self.exit_code,
                stderr: self.stderr,
            })
        }
    }
}

/// Capability to run external commands.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command and capture its output.
    ///
    /// A non-zero exit is not an error here; spawn failures and timeouts are.
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;

    /// Run a command and fail on a non-zero exit.
    async fn run_checked(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.run(spec).await?.into_success(spec)
    }

    /// Run a command and report only whether it succeeded.
    async fn succeeds(&self, spec: &CommandSpec) -> Result<bool> {
        Ok(self.run(spec).await?.success)
    }
}

/// Runs commands on the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell;

impl SystemShell {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemShell {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let start = Instant::now();
        debug!("exec: {}", spec.command_line());

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);

        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }

        if spec.clear_env {
            cmd.env_clear();
        }
        cmd.envs(&spec.env);

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let spawn_error = |e: std::io::Error| TezonatorError::CommandFailed {
            command: spec.command_line(),
            code: None,
            stderr: e.to_string(),
        };

        let output = match spec.timeout {
            Some(after) => tokio::time::timeout(after, cmd.output())
                .await
                .map_err(|_| TezonatorError::CommandTimedOut {
                    command: spec.command_line(),
                    after,
                })?
                .map_err(spawn_error)?,
            None => cmd.output().await.map_err(spawn_error)?,
        };

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration: start.elapsed(),
            success: output.status.success(),
        })
    }
}
