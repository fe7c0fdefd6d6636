//! `start`: start the node and DAL node units.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::{ExecutionContext, ServiceKind};
use crate::error::Result;
use crate::procedure::{Procedure, ProcedureRef};

use super::{systemctl, Shell};

/// Top-level procedures of the `start` command.
pub fn start_procedures(shell: Shell) -> Vec<ProcedureRef> {
    vec![
        Arc::new(StartService::new(shell.clone(), ServiceKind::Node)),
        Arc::new(StartService::new(shell, ServiceKind::Dal)),
    ]
}

/// `systemctl --user start` for one unit.
pub struct StartService {
    shell: Shell,
    kind: ServiceKind,
    id: String,
}

impl StartService {
    pub fn new(shell: Shell, kind: ServiceKind) -> Self {
        Self {
            shell,
            kind,
            id: format!("start octez {}", kind),
        }
    }
}

#[async_trait]
impl Procedure for StartService {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<()> {
        systemctl(self.shell.as_ref(), &["start", ctx.service_name(self.kind)]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedures::testing::context;
    use crate::runner::Executor;
    use crate::shell::FakeShell;
    use tempfile::TempDir;

    #[tokio::test]
    async fn starts_node_then_dal() {
        let temp = TempDir::new().unwrap();
        let fake = FakeShell::new();

        let summary = Executor::default()
            .run_all(&start_procedures(Arc::new(fake.clone())), &context(temp.path(), false))
            .await
            .unwrap();

        assert_eq!(summary.executed, vec!["start octez node", "start octez dal"]);
        assert_eq!(
            fake.command_lines(),
            vec![
                "systemctl --user start octez-node-ghostnet.service",
                "systemctl --user start octez-dal-ghostnet.service",
            ]
        );
    }
}
