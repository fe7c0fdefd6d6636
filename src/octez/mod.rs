//! Probing built and installed Octez binaries.

pub mod files;
pub mod opam;
pub mod version;

use std::path::Path;

use tracing::debug;

use crate::context::ExecutionContext;
use crate::error::Result;
use crate::shell::{CommandRunner, CommandSpec};

pub use files::list_files;
pub use opam::parse_opam_env;
pub use version::BinaryVersion;

/// Prefix shared by every Octez binary.
pub const BINARY_PREFIX: &str = "octez-";

/// Ask every `octez-*` binary in `dir` for its version.
pub async fn binary_versions(shell: &dyn CommandRunner, dir: &Path) -> Result<Vec<BinaryVersion>> {
    let mut versions = Vec::new();
    for path in list_files(dir, Some(BINARY_PREFIX), None).await? {
        let spec = CommandSpec::new(path.to_string_lossy()).arg("--version");
        let output = shell.run(&spec).await?;
        versions.push(BinaryVersion::parse(&path, &output.stdout)?);
    }
    Ok(versions)
}

/// Whether `dir` holds a complete set of binaries built from the network's
/// commit.
pub async fn binaries_match(
    shell: &dyn CommandRunner,
    ctx: &ExecutionContext,
    dir: &Path,
) -> Result<bool> {
    let count = list_files(dir, Some(BINARY_PREFIX), None).await?.len();
    if count < ctx.min_binaries() {
        debug!(
            "{} holds {} binaries, need {}",
            dir.display(),
            count,
            ctx.min_binaries()
        );
        return Ok(false);
    }

    let commit = &ctx.network().commit;
    let versions = binary_versions(shell, dir).await?;
    let stale: Vec<_> = versions.iter().filter(|v| !v.built_from(commit)).collect();
    for v in &stale {
        debug!(
            "{} was built from {}, want {}",
            v.path.display(),
            v.commit_hash,
            commit
        );
    }
    Ok(stale.is_empty())
}
