//! Error types for Tezonator operations.
//!
//! This module defines [`TezonatorError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `TezonatorError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `TezonatorError::Other`) for unexpected errors
//! - A procedure failure is wrapped exactly once, where it happens, and then
//!   travels up the dependency walk untouched

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Which part of a procedure was executing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The skip check (`can_skip`).
    SkipCheck,
    /// The main action (`run`).
    Run,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::SkipCheck => write!(f, "skip check"),
            Phase::Run => write!(f, "run"),
        }
    }
}

/// Core error type for Tezonator operations.
#[derive(Debug, Error)]
pub enum TezonatorError {
    /// A procedure's skip check or action failed.
    #[error("{phase} of '{id}' failed: {source}")]
    Procedure {
        id: String,
        phase: Phase,
        #[source]
        source: Box<TezonatorError>,
    },

    /// A procedure was reached again while it was still in progress.
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// A skip check or action did not finish in time.
    #[error("'{id}' timed out after {}s", .after.as_secs())]
    Timeout { id: String, after: Duration },

    /// The run was cancelled by the operator.
    #[error("cancelled while running '{id}'")]
    Cancelled { id: String },

    /// External command ran past its own timeout and was killed.
    #[error("Command timed out after {}s: {command}", .after.as_secs())]
    CommandTimedOut { command: String, after: Duration },

    /// External command exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}{}", stderr_suffix(.stderr))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Command name not present in the registry.
    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    /// Network not present in the remote registry.
    #[error("Could not find {name} in the network registry at {url}")]
    UnknownNetwork { name: String, url: String },

    /// Fetching or decoding the network registry failed.
    #[error("Network registry error: {message}")]
    NetworkRegistry { message: String },

    /// `HOME` is unset or unusable.
    #[error("Invalid home directory: {message}")]
    InvalidHome { message: String },

    /// A binary's `--version` output could not be understood.
    #[error("{} version could not be determined. {output}", .path.display())]
    BinaryVersion { path: PathBuf, output: String },

    /// Settings file could not be parsed.
    #[error("Failed to parse settings at {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{}", trimmed)
    }
}

impl TezonatorError {
    /// Wrap an error raised by a procedure.
    ///
    /// Errors that already describe a procedure (or the walk itself) are
    /// returned unchanged so a failure is only attributed once.
    pub fn in_procedure(id: &str, phase: Phase, source: TezonatorError) -> Self {
        match source {
            err @ (TezonatorError::Procedure { .. }
            | TezonatorError::CircularDependency { .. }
            | TezonatorError::Timeout { .. }
            | TezonatorError::Cancelled { .. }) => err,
            other => TezonatorError::Procedure {
                id: id.to_string(),
                phase,
                source: Box::new(other),
            },
        }
    }

    /// The id of the procedure this error is attributed to, if any.
    pub fn procedure_id(&self) -> Option<&str> {
        match self {
            TezonatorError::Procedure { id, .. }
            | TezonatorError::Timeout { id, .. }
            | TezonatorError::Cancelled { id } => Some(id),
            _ => None,
        }
    }
}

/// Result type alias for Tezonator operations.
pub type Result<T> = std::result::Result<T, TezonatorError>;
