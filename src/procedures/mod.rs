//! The concrete procedures behind each command.
//!
//! Every procedure holds the [`CommandRunner`] it shells out through, so a
//! [`FakeShell`](crate::shell::FakeShell) can stand in for the host in
//! tests. Dependencies are built on demand from the same runner.

pub mod build;
pub mod init;
pub mod services;
pub mod start;
pub mod stop;

use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::error::Result;
use crate::shell::{CommandOutput, CommandRunner, CommandSpec};

pub use build::build_procedures;
pub use init::init_procedures;
pub use start::start_procedures;
pub use stop::stop_procedures;

/// Shared handle to the command runner.
pub type Shell = Arc<dyn CommandRunner>;

/// `git <args>` in the checkout, failing on a non-zero exit.
pub(crate) async fn git(
    shell: &dyn CommandRunner,
    ctx: &ExecutionContext,
    args: &[&str],
) -> Result<CommandOutput> {
    let spec = CommandSpec::new("git")
        .args(args.iter().copied())
        .cwd(ctx.repo_path());
    shell.run_checked(&spec).await
}

/// `systemctl --user <args>`, failing on a non-zero exit.
pub(crate) async fn systemctl(shell: &dyn CommandRunner, args: &[&str]) -> Result<CommandOutput> {
    let spec = CommandSpec::new("systemctl")
        .arg("--user")
        .args(args.iter().copied());
    shell.run_checked(&spec).await
}
