//! Scripted procedures for testing.
//!
//! [`ScriptedProcedure`] never touches the filesystem or spawns processes.
//! It records every skip check and action into a shared [`Journal`] so
//! tests can assert on ordering.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tezonator::procedure::{Journal, ProcedureRef, ScriptedProcedure};
//! use tezonator::runner::Executor;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let journal = Journal::default();
//! let a = Arc::new(ScriptedProcedure::new("A", &journal));
//! let b = Arc::new(ScriptedProcedure::new("B", &journal).with_skip(true));
//! let procedures: Vec<ProcedureRef<()>> = vec![a, b];
//!
//! Executor::default().run_all(&procedures, &()).await.unwrap();
//! assert_eq!(journal.runs(), vec!["A"]);
//! # });
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, TezonatorError};

use super::{Procedure, ProcedureRef};

/// Shared, ordered record of what scripted procedures did.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<JournalEntry>>>,
}

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEntry {
    /// A skip check was evaluated.
    Checked(String),
    /// An action ran (recorded before it returns).
    Ran(String),
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, entry: JournalEntry) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
    }

    /// Every recorded event in order.
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Ids whose action ran, in order.
    pub fn runs(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                JournalEntry::Ran(id) => Some(id),
                JournalEntry::Checked(_) => None,
            })
            .collect()
    }

    /// Ids whose skip check was evaluated, in order.
    pub fn checks(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                JournalEntry::Checked(id) => Some(id),
                JournalEntry::Ran(_) => None,
            })
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

#[derive(Debug, Clone)]
enum SkipScript {
    /// No skip check declared.
    Absent,
    Answer(bool),
    /// Skip only once the procedure has run (idempotent goal state).
    AfterFirstRun,
    Fail(String),
}

/// A procedure whose behavior is scripted up front.
#[derive(Debug, Clone)]
pub struct ScriptedProcedure {
    id: String,
    journal: Journal,
    skip: SkipScript,
    failure: Option<String>,
    delay: Option<Duration>,
    dependencies: Vec<Arc<ScriptedProcedure>>,
    self_dependent: bool,
}

impl ScriptedProcedure {
    /// A procedure without skip check or dependencies that always succeeds.
    pub fn new(id: impl Into<String>, journal: &Journal) -> Self {
        Self {
            id: id.into(),
            journal: journal.clone(),
            skip: SkipScript::Absent,
            failure: None,
            delay: None,
            dependencies: Vec::new(),
            self_dependent: false,
        }
    }

    /// Declare a skip check with a fixed answer.
    pub fn with_skip(mut self, skip: bool) -> Self {
        self.skip = SkipScript::Answer(skip);
        self
    }

    /// Declare a skip check that answers true once this id has run.
    pub fn skip_once_ran(mut self) -> Self {
        self.skip = SkipScript::AfterFirstRun;
        self
    }

    /// Declare a skip check that fails.
    pub fn with_failing_skip_check(mut self, message: impl Into<String>) -> Self {
        self.skip = SkipScript::Fail(message.into());
        self
    }

    /// Make the action fail with a message.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Make the action sleep before finishing.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the prerequisites.
    pub fn with_dependencies(mut self, dependencies: Vec<Arc<ScriptedProcedure>>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Make the procedure list itself as its last dependency.
    pub fn with_self_dependency(mut self) -> Self {
        self.self_dependent = true;
        self
    }
}

#[async_trait]
impl<C> Procedure<C> for ScriptedProcedure
where
    C: Sync + ?Sized,
{
    fn id(&self) -> &str {
        &self.id
    }

    async fn can_skip(&self, _ctx: &C) -> Result<bool> {
        if let SkipScript::Absent = self.skip {
            return Ok(false);
        }
        self.journal.record(JournalEntry::Checked(self.id.clone()));
        match &self.skip {
            SkipScript::Absent => Ok(false),
            SkipScript::Answer(answer) => Ok(*answer),
            SkipScript::AfterFirstRun => Ok(self.journal.runs().contains(&self.id)),
            SkipScript::Fail(message) => Err(TezonatorError::Other(anyhow::anyhow!(
                "{}",
                message
            ))),
        }
    }

    fn dependencies(&self) -> Vec<ProcedureRef<C>> {
        let mut dependencies: Vec<ProcedureRef<C>> = self
            .dependencies
            .iter()
            .map(|d| d.clone() as ProcedureRef<C>)
            .collect();
        if self.self_dependent {
            dependencies.push(Arc::new(self.clone()));
        }
        dependencies
    }

    async fn run(&self, _ctx: &C) -> Result<()> {
        self.journal.record(JournalEntry::Ran(self.id.clone()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(message) => Err(TezonatorError::Other(anyhow::anyhow!("{}", message))),
            None => Ok(()),
        }
    }
}
