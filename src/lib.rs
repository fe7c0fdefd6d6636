//! Tezonator - build, configure, and run Octez nodes for a Tezos network.
//!
//! Every user-facing command is a list of [`procedure::Procedure`]s: named,
//! skippable units of work with ordered prerequisites. The
//! [`runner::Executor`] walks them depth-first against one
//! [`context::ExecutionContext`], skipping work that is already done and
//! stopping at the first failure.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`commands`] - Command names to procedure lists
//! - [`config`] - Settings file and per-user paths
//! - [`context`] - The execution context shared by procedures
//! - [`error`] - Error types and result aliases
//! - [`network`] - Known networks, the network registry, ports
//! - [`octez`] - Probing built and installed binaries
//! - [`procedure`] - The procedure trait
//! - [`procedures`] - The build, init, start and stop procedures
//! - [`runner`] - The procedure executor
//! - [`shell`] - External command execution
//! - [`ui`] - Spinners and terminal output
//!
//! # Example
//!
//! ```
//! use tezonator::procedure::{Journal, ProcedureRef, ScriptedProcedure};
//! use tezonator::runner::Executor;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let journal = Journal::new();
//! let fetch = Arc::new(ScriptedProcedure::new("fetch", &journal));
//! let build = ScriptedProcedure::new("build", &journal).with_dependencies(vec![fetch]);
//! let procedures: Vec<ProcedureRef<()>> = vec![Arc::new(build)];
//!
//! Executor::default().run_all(&procedures, &()).await.unwrap();
//! assert_eq!(journal.runs(), vec!["fetch", "build"]);
//! # });
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod network;
pub mod octez;
pub mod procedure;
pub mod procedures;
pub mod runner;
pub mod shell;
pub mod ui;

pub use error::{Result, TezonatorError};
