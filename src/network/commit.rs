//! Resolution of a network's `git_ref` to a full commit hash.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, TezonatorError};
use crate::shell::{CommandRunner, CommandSpec};

/// Number of leading commit characters that name an install directory.
pub const SHORT_COMMIT_LEN: usize = 8;

const FULL_COMMIT_LEN: usize = 40;

/// Whether `value` already looks like a (possibly abbreviated) commit hash.
pub fn is_commit_hash(value: &str) -> bool {
    value.len() >= 7 && value.chars().all(|c| c.is_ascii_hexdigit())
}

fn is_full_commit_hash(value: &str) -> bool {
    value.len() == FULL_COMMIT_LEN && is_commit_hash(value)
}

/// Resolve `git_ref` to a commit hash.
///
/// Tries, in order: `git rev-list -n 1 <ref>` in the local checkout when it
/// exists, the ref itself when it is a full hash, and
/// `git ls-remote <url> <ref>` with the peeled tag entry preferred. An
/// abbreviated hash nothing could expand is kept as given, provided it
/// covers [`SHORT_COMMIT_LEN`] characters so the install directory it
/// names matches the one a later, fully resolved run picks.
pub async fn resolve_commit(
    shell: &dyn CommandRunner,
    repo_path: &Path,
    git_url: &str,
    git_ref: &str,
) -> Result<String> {
    if repo_path.join(".git").exists() {
        let spec = CommandSpec::new("git")
            .args(["rev-list", "-n", "1", git_ref])
            .cwd(repo_path);
        let output = shell.run(&spec).await?;
        let hash = output.stdout.trim();
        if output.success && is_commit_hash(hash) {
            debug!("resolved {} to {} from local checkout", git_ref, hash);
            return Ok(hash.to_string());
        }
        debug!("{} not known to local checkout", git_ref);
    }

    if is_full_commit_hash(git_ref) {
        return Ok(git_ref.to_lowercase());
    }

    let spec = CommandSpec::new("git").args(["ls-remote", git_url, git_ref]);
    let output = shell.run_checked(&spec).await?;
    if let Some(hash) = pick_ls_remote_hash(&output.stdout) {
        debug!("resolved {} to {} via ls-remote", git_ref, hash);
        return Ok(hash);
    }

    if is_commit_hash(git_ref) {
        if git_ref.len() < SHORT_COMMIT_LEN {
            return Err(TezonatorError::Other(anyhow::anyhow!(
                "abbreviated commit '{}' needs at least {} characters until the repository is cloned",
                git_ref,
                SHORT_COMMIT_LEN
            )));
        }
        warn!("using abbreviated commit {} as given", git_ref);
        return Ok(git_ref.to_lowercase());
    }

    Err(TezonatorError::Other(anyhow::anyhow!(
        "git ref '{}' not found at {}",
        git_ref,
        git_url
    )))
}

/// Pick the commit from `git ls-remote` output, preferring `^{}` entries.
fn pick_ls_remote_hash(stdout: &str) -> Option<String> {
    let entries: Vec<(&str, &str)> = stdout
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .filter(|(hash, _)| is_commit_hash(hash))
        .collect();

    entries
        .iter()
        .find(|(_, name)| name.ends_with("^{}"))
        .or_else(|| entries.first())
        .map(|(hash, _)| hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{CommandOutput, FakeShell};
    use tempfile::TempDir;

    const FULL: &str = "0a81ce76b3d4f57d8c5194bcb9418f9294fd2be1";

    #[test]
    fn recognizes_hashes() {
        assert!(is_commit_hash("0a81ce7"));
        assert!(is_commit_hash(FULL));
        assert!(!is_commit_hash("v19.1"));
        assert!(!is_commit_hash("abc"));
    }

    #[test]
    fn prefers_peeled_tag() {
        let out = format!(
            "1111111111111111111111111111111111111111\trefs/tags/v19.1\n{}\trefs/tags/v19.1^{{}}\n",
            FULL
        );
        assert_eq!(pick_ls_remote_hash(&out).as_deref(), Some(FULL));
    }

    #[tokio::test]
    async fn hash_ref_is_used_without_a_checkout() {
        let temp = TempDir::new().unwrap();
        let shell = FakeShell::new();
        let hash = resolve_commit(&shell, &temp.path().join("tezos"), "url", FULL)
            .await
            .unwrap();
        assert_eq!(hash, FULL);
        assert!(shell.calls().is_empty());
    }

    #[tokio::test]
    async fn symbolic_ref_goes_to_ls_remote() {
        let temp = TempDir::new().unwrap();
        let shell = FakeShell::new();
        shell.respond(
            "git ls-remote",
            CommandOutput::success(format!("{}\trefs/tags/v19.1\n", FULL)),
        );
        let hash = resolve_commit(&shell, &temp.path().join("tezos"), "url", "v19.1")
            .await
            .unwrap();
        assert_eq!(hash, FULL);
        assert!(shell.ran("git ls-remote url v19.1"));
    }

    #[tokio::test]
    async fn local_checkout_is_asked_first() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".git")).unwrap();
        let shell = FakeShell::new();
        shell.respond("git rev-list", CommandOutput::success(format!("{}\n", FULL)));
        let hash = resolve_commit(&shell, temp.path(), "url", "v19.1")
            .await
            .unwrap();
        assert_eq!(hash, FULL);
        assert!(!shell.ran("git ls-remote"));
    }

    #[tokio::test]
    async fn abbreviated_ref_names_the_same_install_before_and_after_clone() {
        let temp = TempDir::new().unwrap();
        let repo = temp.path().join("tezos");
        let shell = FakeShell::new();

        let before = resolve_commit(&shell, &repo, "url", "0A81CE76B3").await.unwrap();
        assert_eq!(before, "0a81ce76b3");
        assert!(shell.ran("git ls-remote url 0A81CE76B3"));

        std::fs::create_dir_all(repo.join(".git")).unwrap();
        shell.respond("git rev-list", CommandOutput::success(format!("{}\n", FULL)));
        let after = resolve_commit(&shell, &repo, "url", "0A81CE76B3").await.unwrap();

        assert_eq!(after, FULL);
        assert_eq!(before[..SHORT_COMMIT_LEN], after[..SHORT_COMMIT_LEN]);
    }

    #[tokio::test]
    async fn seven_character_ref_needs_a_checkout() {
        let temp = TempDir::new().unwrap();
        let shell = FakeShell::new();
        let err = resolve_commit(&shell, &temp.path().join("tezos"), "url", "0a81ce7")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("0a81ce7"));
    }

    #[tokio::test]
    async fn unknown_ref_is_an_error() {
        let temp = TempDir::new().unwrap();
        let shell = FakeShell::new();
        let err = resolve_commit(&shell, temp.path(), "url", "nope")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
