//! `build`: fetch the sources, compile, install, and write service units.
//!
//! The graph, leaves first:
//!
//! ```text
//! create service files
//! └── install binaries
//!     └── make
//!         └── make build-deps
//!             └── patch repo
//!                 ├── checkout network commit
//!                 │   └── git pull
//!                 │       └── git checkout master
//!                 │           ├── clone repo
//!                 │           └── reset repo
//!                 └── reset repo
//! ```

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::context::{ExecutionContext, ServiceKind};
use crate::error::Result;
use crate::octez::{binaries_match, list_files, parse_opam_env, BINARY_PREFIX};
use crate::procedure::{Procedure, ProcedureRef};
use crate::shell::CommandSpec;

use super::services::unit_file;
use super::{git, systemctl, Shell};

/// Top-level procedures of the `build` command.
pub fn build_procedures(shell: Shell) -> Vec<ProcedureRef> {
    vec![Arc::new(CreateServiceFiles::new(shell))]
}

/// Clones the source repository into the data root.
pub struct CloneRepo {
    shell: Shell,
}

impl CloneRepo {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl Procedure for CloneRepo {
    fn id(&self) -> &str {
        "clone repo"
    }

    async fn can_skip(&self, ctx: &ExecutionContext) -> Result<bool> {
        Ok(ctx.repo_path().exists())
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<()> {
        let data_root = &ctx.user_paths().data_root;
        tokio::fs::create_dir_all(data_root).await?;
        let spec = CommandSpec::new("git")
            .args(["clone", ctx.git_url(), ctx.repo_dir()])
            .cwd(data_root);
        self.shell.run_checked(&spec).await?;
        Ok(())
    }
}

/// Discards local changes in the checkout.
pub struct ResetRepo {
    shell: Shell,
}

impl ResetRepo {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl Procedure for ResetRepo {
    fn id(&self) -> &str {
        "reset repo"
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<()> {
        git(self.shell.as_ref(), ctx, &["reset", "--hard", "-q"]).await?;
        Ok(())
    }
}

pub struct GitCheckoutMaster {
    shell: Shell,
}

impl GitCheckoutMaster {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl Procedure for GitCheckoutMaster {
    fn id(&self) -> &str {
        "git checkout master"
    }

    fn dependencies(&self) -> Vec<ProcedureRef> {
        vec![
            Arc::new(CloneRepo::new(self.shell.clone())),
            Arc::new(ResetRepo::new(self.shell.clone())),
        ]
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<()> {
        git(self.shell.as_ref(), ctx, &["checkout", "master", "-q"]).await?;
        Ok(())
    }
}

pub struct GitPull {
    shell: Shell,
}

impl GitPull {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl Procedure for GitPull {
    fn id(&self) -> &str {
        "git pull"
    }

    fn dependencies(&self) -> Vec<ProcedureRef> {
        vec![Arc::new(GitCheckoutMaster::new(self.shell.clone()))]
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<()> {
        git(self.shell.as_ref(), ctx, &["pull", "-q"]).await?;
        Ok(())
    }
}

/// Checks out the commit the network's ref resolved to.
pub struct CheckoutNetworkCommit {
    shell: Shell,
}

impl CheckoutNetworkCommit {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl Procedure for CheckoutNetworkCommit {
    fn id(&self) -> &str {
        "checkout network commit"
    }

    fn dependencies(&self) -> Vec<ProcedureRef> {
        vec![Arc::new(GitPull::new(self.shell.clone()))]
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<()> {
        let commit = ctx.network().commit.as_str();
        git(self.shell.as_ref(), ctx, &["checkout", commit, "-q"]).await?;
        Ok(())
    }
}

/// Applies `<data root>/patches/<git ref>/*.patch`, if any.
pub struct PatchRepo {
    shell: Shell,
}

impl PatchRepo {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl Procedure for PatchRepo {
    fn id(&self) -> &str {
        "patch repo"
    }

    fn dependencies(&self) -> Vec<ProcedureRef> {
        vec![
            Arc::new(CheckoutNetworkCommit::new(self.shell.clone())),
            Arc::new(ResetRepo::new(self.shell.clone())),
        ]
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<()> {
        let patches = list_files(&ctx.patches_dir(), None, Some(".patch")).await?;
        if patches.is_empty() {
            debug!("no patches in {}", ctx.patches_dir().display());
            return Ok(());
        }
        for patch in patches {
            info!("applying {}", patch.display());
            let spec = CommandSpec::new("git")
                .arg("apply")
                .path_arg(&patch)
                .cwd(ctx.repo_path());
            self.shell.run_checked(&spec).await?;
        }
        Ok(())
    }
}

pub struct MakeBuildDeps {
    shell: Shell,
}

impl MakeBuildDeps {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl Procedure for MakeBuildDeps {
    fn id(&self) -> &str {
        "make build-deps"
    }

    fn dependencies(&self) -> Vec<ProcedureRef> {
        vec![Arc::new(PatchRepo::new(self.shell.clone()))]
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<()> {
        let spec = CommandSpec::new("make")
            .arg("build-deps")
            .cwd(ctx.repo_path());
        self.shell.run_checked(&spec).await?;
        Ok(())
    }
}

/// Compiles the binaries inside the opam switch.
pub struct Make {
    shell: Shell,
}

impl Make {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl Procedure for Make {
    fn id(&self) -> &str {
        "make"
    }

    async fn can_skip(&self, ctx: &ExecutionContext) -> Result<bool> {
        binaries_match(self.shell.as_ref(), ctx, &ctx.repo_path()).await
    }

    fn dependencies(&self) -> Vec<ProcedureRef> {
        vec![Arc::new(MakeBuildDeps::new(self.shell.clone()))]
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<()> {
        let repo = ctx.repo_path();
        let sexp = self
            .shell
            .run_checked(&CommandSpec::new("opam").args(["env", "--sexp"]).cwd(&repo))
            .await?
            .stdout;
        let opam_env = parse_opam_env(&sexp);
        debug!("opam env sets {} variables", opam_env.len());

        let spec = CommandSpec::new("make").cwd(&repo).envs(opam_env);
        self.shell.run_checked(&spec).await?;
        Ok(())
    }
}

/// Moves the built binaries into the per-commit bin directory.
pub struct InstallBinaries {
    shell: Shell,
}

impl InstallBinaries {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl Procedure for InstallBinaries {
    fn id(&self) -> &str {
        "install binaries"
    }

    async fn can_skip(&self, ctx: &ExecutionContext) -> Result<bool> {
        binaries_match(self.shell.as_ref(), ctx, &ctx.bin_dir()).await
    }

    fn dependencies(&self) -> Vec<ProcedureRef> {
        vec![Arc::new(Make::new(self.shell.clone()))]
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<()> {
        let target = ctx.bin_dir();
        tokio::fs::create_dir_all(&target).await?;

        let binaries = list_files(&ctx.repo_path(), Some(BINARY_PREFIX), None).await?;
        info!("installing {} binaries to {}", binaries.len(), target.display());
        for binary in binaries {
            if let Some(name) = binary.file_name() {
                move_file(&binary, &target.join(name)).await?;
            }
        }
        Ok(())
    }
}

/// Rename, falling back to copy and remove across filesystems.
async fn move_file(from: &Path, to: &Path) -> Result<()> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    tokio::fs::copy(from, to).await?;
    tokio::fs::remove_file(from).await?;
    Ok(())
}

/// Writes and enables the systemd user units.
pub struct CreateServiceFiles {
    shell: Shell,
}

impl CreateServiceFiles {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl Procedure for CreateServiceFiles {
    fn id(&self) -> &str {
        "create service files"
    }

    fn dependencies(&self) -> Vec<ProcedureRef> {
        vec![Arc::new(InstallBinaries::new(self.shell.clone()))]
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<()> {
        tokio::fs::create_dir_all(&ctx.user_paths().systemd_dir).await?;
        for kind in ServiceKind::ALL {
            tokio::fs::write(ctx.unit_path(kind), unit_file(ctx, kind)).await?;
        }
        for kind in ServiceKind::ALL {
            systemctl(self.shell.as_ref(), &["enable", ctx.service_name(kind)]).await?;
        }
        systemctl(self.shell.as_ref(), &["daemon-reload"]).await?;
        Ok(())
    }
}
