//! External command execution.

pub mod command;
pub mod fake;

pub use command::{CommandOutput, CommandRunner, CommandSpec, SystemShell};
pub use fake::FakeShell;
