//! `stop`: stop every daemon, dependents before the node.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::{ExecutionContext, ServiceKind};
use crate::error::Result;
use crate::procedure::{Procedure, ProcedureRef};
use crate::shell::CommandSpec;

use super::{systemctl, Shell};

/// Top-level procedures of the `stop` command.
pub fn stop_procedures(shell: Shell) -> Vec<ProcedureRef> {
    [
        ServiceKind::Baker,
        ServiceKind::Accuser,
        ServiceKind::Dal,
        ServiceKind::Node,
    ]
    .into_iter()
    .map(|kind| Arc::new(StopService::new(shell.clone(), kind)) as ProcedureRef)
    .collect()
}

/// `systemctl --user stop` for one unit; skipped when the unit is not active.
pub struct StopService {
    shell: Shell,
    kind: ServiceKind,
    id: String,
}

impl StopService {
    pub fn new(shell: Shell, kind: ServiceKind) -> Self {
        Self {
            shell,
            kind,
            id: format!("stop octez {}", kind),
        }
    }
}

#[async_trait]
impl Procedure for StopService {
    fn id(&self) -> &str {
        &self.id
    }

    async fn can_skip(&self, ctx: &ExecutionContext) -> Result<bool> {
        let spec = CommandSpec::new("systemctl").args([
            "--user",
            "is-active",
            "--quiet",
            ctx.service_name(self.kind),
        ]);
        Ok(!self.shell.succeeds(&spec).await?)
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<()> {
        systemctl(self.shell.as_ref(), &["stop", ctx.service_name(self.kind)]).await?;
        Ok(())
    }
}
