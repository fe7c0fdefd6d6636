//! `init`: client and node configuration for the selected network.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::context::{DataKind, ExecutionContext};
use crate::error::Result;
use crate::procedure::{Procedure, ProcedureRef};
use crate::shell::CommandSpec;

use super::Shell;

/// Top-level procedures of the `init` command.
///
/// Node initialisation is reached only through `configure node`, so a
/// forced run initialises the node once.
pub fn init_procedures(shell: Shell) -> Vec<ProcedureRef> {
    vec![
        Arc::new(InitOctezClient::new(shell.clone())),
        Arc::new(ConfigureNode::new(shell.clone())),
        Arc::new(GenerateIdentity::new(shell)),
    ]
}

fn node_config_file(ctx: &ExecutionContext) -> std::path::PathBuf {
    ctx.data_dir(DataKind::Node).join("config.json")
}

fn client_command(ctx: &ExecutionContext) -> CommandSpec {
    CommandSpec::new(ctx.binary("octez-client").to_string_lossy())
        .arg("--base-dir")
        .path_arg(ctx.data_dir(DataKind::Client))
        .args(["--endpoint", ctx.network().rpc_url.as_str()])
}

fn node_config_show(ctx: &ExecutionContext) -> CommandSpec {
    CommandSpec::new(ctx.binary("octez-node").to_string_lossy())
        .args(["config", "show", "--data-dir"])
        .path_arg(ctx.data_dir(DataKind::Node))
}

pub struct InitOctezClient {
    shell: Shell,
}

impl InitOctezClient {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl Procedure for InitOctezClient {
    fn id(&self) -> &str {
        "init octez client"
    }

    async fn can_skip(&self, ctx: &ExecutionContext) -> Result<bool> {
        if ctx.force() {
            return Ok(false);
        }
        let spec = client_command(ctx).args(["config", "show"]);
        self.shell.succeeds(&spec).await
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<()> {
        tokio::fs::create_dir_all(ctx.data_dir(DataKind::Client)).await?;
        let spec = client_command(ctx).args(["config", "init"]);
        self.shell.run_checked(&spec).await?;
        Ok(())
    }
}

pub struct InitOctezNode {
    shell: Shell,
}

impl InitOctezNode {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl Procedure for InitOctezNode {
    fn id(&self) -> &str {
        "init octez node"
    }

    async fn can_skip(&self, ctx: &ExecutionContext) -> Result<bool> {
        if ctx.force() {
            return Ok(false);
        }
        self.shell.succeeds(&node_config_show(ctx)).await
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<()> {
        let node_dir = ctx.data_dir(DataKind::Node);
        tokio::fs::create_dir_all(node_dir).await?;

        // `config init` refuses to overwrite an existing file.
        let config = node_config_file(ctx);
        if config.exists() {
            let backup = node_dir.join(format!(
                "config-{}.json",
                chrono::Utc::now().timestamp_millis()
            ));
            if self.shell.succeeds(&node_config_show(ctx)).await? {
                info!("moving node config to {}", backup.display());
            } else {
                warn!("node config is invalid, moving it to {}", backup.display());
            }
            tokio::fs::rename(&config, &backup).await?;
        }

        let spec = CommandSpec::new(ctx.binary("octez-node").to_string_lossy())
            .args(["config", "init", "--network"])
            .arg(ctx.network().config_network())
            .arg("--data-dir")
            .path_arg(node_dir);
        self.shell.run_checked(&spec).await?;
        Ok(())
    }
}

/// Points the node's RPC, P2P and metrics addresses at the network's ports.
pub struct ConfigureNode {
    shell: Shell,
}

impl ConfigureNode {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl Procedure for ConfigureNode {
    fn id(&self) -> &str {
        "configure node"
    }

    async fn can_skip(&self, ctx: &ExecutionContext) -> Result<bool> {
        if ctx.force() {
            return Ok(false);
        }
        let Some(current) = read_json(&node_config_file(ctx)).await? else {
            return Ok(false);
        };
        let mut merged = current.clone();
        merge(&mut merged, ctx.network().ports.node_config());
        Ok(merged == current)
    }

    fn dependencies(&self) -> Vec<ProcedureRef> {
        vec![Arc::new(InitOctezNode::new(self.shell.clone()))]
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<()> {
        tokio::fs::create_dir_all(ctx.data_dir(DataKind::Node)).await?;
        let path = node_config_file(ctx);
        let mut config = read_json(&path)
            .await?
            .unwrap_or_else(|| Value::Object(Default::default()));
        merge(&mut config, ctx.network().ports.node_config());
        tokio::fs::write(&path, serde_json::to_string_pretty(&config)?).await?;
        info!("node listens for RPC on {}", ctx.network().ports.node_endpoint());
        Ok(())
    }
}

async fn read_json(path: &Path) -> Result<Option<Value>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Deep-merge `overlay` into `base`; objects merge, everything else replaces.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

pub struct GenerateIdentity {
    shell: Shell,
}

impl GenerateIdentity {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl Procedure for GenerateIdentity {
    fn id(&self) -> &str {
        "generate identity"
    }

    async fn can_skip(&self, ctx: &ExecutionContext) -> Result<bool> {
        Ok(!ctx.force() && ctx.data_dir(DataKind::Node).join("identity.json").exists())
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<()> {
        tokio::fs::create_dir_all(ctx.data_dir(DataKind::Node)).await?;
        let spec = CommandSpec::new(ctx.binary("octez-node").to_string_lossy())
            .args(["identity", "generate", "--config-file"])
            .path_arg(&node_config_file(ctx));
        self.shell.run_checked(&spec).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedures::testing::context;
    use crate::runner::Executor;
    use crate::shell::{CommandOutput, FakeShell};
    use std::fs;
    use tempfile::TempDir;

    fn fake() -> (FakeShell, Shell) {
        let fake = FakeShell::new();
        let shell: Shell = Arc::new(fake.clone());
        (fake, shell)
    }

    #[tokio::test]
    async fn client_init_is_skipped_when_config_shows() {
        let temp = TempDir::new().unwrap();
        let (fake, shell) = fake();
        let procedure = InitOctezClient::new(shell);

        assert!(procedure.can_skip(&context(temp.path(), false)).await.unwrap());
        assert!(fake.command_lines()[0].ends_with("config show"));

        fake.respond("", CommandOutput::failure(Some(1), "no config"));
        assert!(!procedure.can_skip(&context(temp.path(), false)).await.unwrap());
    }

    #[tokio::test]
    async fn force_disables_skip_checks() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path(), true);
        let (fake, shell) = fake();
        fs::create_dir_all(ctx.data_dir(DataKind::Node)).unwrap();
        fs::write(ctx.data_dir(DataKind::Node).join("identity.json"), "{}").unwrap();

        assert!(!InitOctezClient::new(shell.clone()).can_skip(&ctx).await.unwrap());
        assert!(!InitOctezNode::new(shell.clone()).can_skip(&ctx).await.unwrap());
        assert!(!GenerateIdentity::new(shell).can_skip(&ctx).await.unwrap());
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn invalid_node_config_is_backed_up() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path(), false);
        let node_dir = ctx.data_dir(DataKind::Node).clone();
        fs::create_dir_all(&node_dir).unwrap();
        fs::write(node_dir.join("config.json"), "garbage").unwrap();
        let (fake, shell) = fake();
        fake.respond("", CommandOutput::failure(Some(1), "invalid"));
        let init_line = format!("{} config init", ctx.binary("octez-node").display());
        fake.respond(init_line.clone(), CommandOutput::success(""));

        InitOctezNode::new(shell).run(&ctx).await.unwrap();

        let backups: Vec<_> = fs::read_dir(&node_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with("config-") && n.ends_with(".json"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert!(fake.ran(&format!("{} --network ghostnet", init_line)));
    }

    #[tokio::test]
    async fn configure_node_merges_ports_and_keeps_other_settings() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path(), false);
        fs::create_dir_all(ctx.data_dir(DataKind::Node)).unwrap();
        let path = ctx.data_dir(DataKind::Node).join("config.json");
        fs::write(
            &path,
            r#"{"data-dir": "/x", "network": "ghostnet", "rpc": {"cors-origin": ["*"]}}"#,
        )
        .unwrap();
        let (_, shell) = fake();
        let procedure = ConfigureNode::new(shell);

        assert!(!procedure.can_skip(&ctx).await.unwrap());
        procedure.run(&ctx).await.unwrap();

        let config: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(config["network"], "ghostnet");
        assert_eq!(config["rpc"]["cors-origin"][0], "*");
        assert_eq!(config["rpc"]["listen-addr"], "127.0.0.1:7833");
        assert!(procedure.can_skip(&ctx).await.unwrap());
    }

    #[tokio::test]
    async fn second_init_run_does_nothing() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path(), false);
        let (fake, shell) = fake();
        let executor = Executor::default();

        executor.run_all(&init_procedures(shell.clone()), &ctx).await.unwrap();
        fs::write(ctx.data_dir(DataKind::Node).join("identity.json"), "{}").unwrap();
        let first = fake.calls().len();

        let summary = executor.run_all(&init_procedures(shell), &ctx).await.unwrap();
        assert!(summary.executed.is_empty());
        assert!(fake.command_lines()[first..]
            .iter()
            .all(|l| l.contains("config show")));
    }

    #[tokio::test]
    async fn forced_init_initialises_node_once() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path(), true);
        let (fake, shell) = fake();

        let summary = Executor::default()
            .run_all(&init_procedures(shell), &ctx)
            .await
            .unwrap();

        assert_eq!(
            summary.executed,
            vec![
                "init octez client",
                "init octez node",
                "configure node",
                "generate identity"
            ]
        );
        let node_inits = fake
            .command_lines()
            .iter()
            .filter(|l| l.contains("config init --network"))
            .count();
        assert_eq!(node_inits, 1);

        let backups = fs::read_dir(ctx.data_dir(DataKind::Node))
            .unwrap()
            .filter(|e| {
                let name = e.as_ref().unwrap().file_name();
                name.to_string_lossy().starts_with("config-")
            })
            .count();
        assert_eq!(backups, 0);
    }

    #[test]
    fn merge_replaces_scalars_and_extends_objects() {
        let mut base = serde_json::json!({"a": 1, "b": {"c": 2}});
        merge(&mut base, serde_json::json!({"a": 3, "b": {"d": 4}}));
        assert_eq!(base, serde_json::json!({"a": 3, "b": {"c": 2, "d": 4}}));
    }
}
