//! Procedure executor.
//!
//! Walks an ordered list of procedures depth-first, left to right:
//!
//! 1. run the procedure's skip check and move on if it says so,
//! 2. resolve its dependencies through the same walk,
//! 3. run its action.
//!
//! The first failure anywhere stops the whole run. Nothing runs
//! concurrently; every skip check, dependency subtree, and action is
//! awaited before the next one starts.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{Phase, Result, TezonatorError};
use crate::procedure::ProcedureRef;

use super::progress::{RunProgress, RunSummary};

type WalkFuture<'w> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'w>>;

/// Options for a run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Do not revisit a procedure id that was already resolved in this run.
    pub dedupe: bool,

    /// Upper bound for each skip check and each action.
    pub step_timeout: Option<Duration>,
}

/// Bookkeeping for a single run.
#[derive(Debug, Default)]
struct WalkState {
    /// Ids whose dependencies or action are in progress, outermost first.
    stack: Vec<String>,
    /// Ids that were skipped or ran.
    resolved: HashSet<String>,
    summary: RunSummary,
}

impl WalkState {
    fn cycle_through(&self, id: &str) -> Option<String> {
        let start = self.stack.iter().position(|s| s == id)?;
        let mut cycle: Vec<&str> = self.stack[start..].iter().map(String::as_str).collect();
        cycle.push(id);
        Some(cycle.join(" -> "))
    }
}

/// Runs procedures against a shared context.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    options: RunOptions,
    cancel: CancellationToken,
}

impl Executor {
    /// Create an executor with the given options.
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that aborts the run when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run every procedure in order.
    ///
    /// An empty list is a successful no-op.
    pub async fn run_all<C>(&self, procedures: &[ProcedureRef<C>], ctx: &C) -> Result<RunSummary>
    where
        C: Sync + ?Sized,
    {
        self.run_with_progress(procedures, ctx, |_| {}).await
    }

    /// Run every procedure in order, reporting progress.
    pub async fn run_with_progress<C, F>(
        &self,
        procedures: &[ProcedureRef<C>],
        ctx: &C,
        mut on_progress: F,
    ) -> Result<RunSummary>
    where
        C: Sync + ?Sized,
        F: FnMut(RunProgress<'_>) + Send,
    {
        let start = Instant::now();
        let mut state = WalkState::default();

        self.walk(procedures, ctx, &mut state, &mut on_progress, 0)
            .await?;

        let mut summary = state.summary;
        summary.duration = start.elapsed();
        info!(
            "Run finished: {} ran, {} skipped in {:?}",
            summary.executed.len(),
            summary.skipped.len(),
            summary.duration
        );
        Ok(summary)
    }

    fn walk<'w, C, F>(
        &'w self,
        procedures: &'w [ProcedureRef<C>],
        ctx: &'w C,
        state: &'w mut WalkState,
        on_progress: &'w mut F,
        depth: usize,
    ) -> WalkFuture<'w>
    where
        C: Sync + ?Sized,
        F: FnMut(RunProgress<'_>) + Send,
    {
        Box::pin(async move {
            for procedure in procedures {
                let id = procedure.id().to_string();

                if self.cancel.is_cancelled() {
                    return Err(TezonatorError::Cancelled { id });
                }

                if let Some(cycle) = state.cycle_through(&id) {
                    return Err(TezonatorError::CircularDependency { cycle });
                }

                if self.options.dedupe && state.resolved.contains(&id) {
                    debug!("'{}' already resolved in this run", id);
                    on_progress(RunProgress::Deduplicated { id: &id, depth });
                    state.summary.deduplicated.push(id);
                    continue;
                }

                let skip = match self.guarded(&id, procedure.can_skip(ctx)).await {
                    Ok(skip) => skip,
                    Err(e) => {
                        let err = TezonatorError::in_procedure(&id, Phase::SkipCheck, e);
                        on_progress(RunProgress::Failed {
                            id: &id,
                            error: &err,
                            depth,
                        });
                        return Err(err);
                    }
                };

                debug!("can skip '{}'? {}", id, if skip { "yes" } else { "no" });
                on_progress(RunProgress::SkipChecked {
                    id: &id,
                    skip,
                    depth,
                });

                if skip {
                    state.resolved.insert(id.clone());
                    state.summary.skipped.push(id);
                    continue;
                }

                state.stack.push(id.clone());

                let dependencies = procedure.dependencies();
                if !dependencies.is_empty() {
                    self.walk(&dependencies, ctx, &mut *state, &mut *on_progress, depth + 1)
                        .await?;
                }

                on_progress(RunProgress::Started { id: &id, depth });
                info!("running {}", id);
                let started = Instant::now();

                if let Err(e) = self.guarded(&id, procedure.run(ctx)).await {
                    let err = TezonatorError::in_procedure(&id, Phase::Run, e);
                    on_progress(RunProgress::Failed {
                        id: &id,
                        error: &err,
                        depth,
                    });
                    return Err(err);
                }

                state.stack.pop();
                on_progress(RunProgress::Finished {
                    id: &id,
                    duration: started.elapsed(),
                    depth,
                });
                state.resolved.insert(id.clone());
                state.summary.executed.push(id);
            }

            Ok(())
        })
    }

    /// Await one skip check or action, bounded by the timeout and the
    /// cancellation token.
    async fn guarded<T, Fut>(&self, id: &str, operation: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>> + Send,
    {
        let bounded = async {
            match self.options.step_timeout {
                Some(after) => tokio::time::timeout(after, operation)
                    .await
                    .map_err(|_| TezonatorError::Timeout {
                        id: id.to_string(),
                        after,
                    })?,
                None => operation.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(TezonatorError::Cancelled { id: id.to_string() }),
            result = bounded => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedure::{Journal, ScriptedProcedure};
    use std::sync::Arc;

    fn refs(procedures: &[Arc<ScriptedProcedure>]) -> Vec<ProcedureRef<()>> {
        procedures
            .iter()
            .map(|p| p.clone() as ProcedureRef<()>)
            .collect()
    }

    #[tokio::test]
    async fn empty_list_is_a_noop() {
        let summary = Executor::default().run_all::<()>(&[], &()).await.unwrap();
        assert!(summary.is_noop());
        assert!(summary.skipped.is_empty());
    }

    #[tokio::test]
    async fn parent_skip_short_circuits_dependencies() {
        let journal = Journal::default();
        let dep = Arc::new(ScriptedProcedure::new("dep", &journal));
        let parent = Arc::new(
            ScriptedProcedure::new("parent", &journal)
                .with_skip(true)
                .with_dependencies(vec![dep]),
        );

        let summary = Executor::default()
            .run_all(&refs(&[parent]), &())
            .await
            .unwrap();

        assert_eq!(journal.checks(), vec!["parent"]);
        assert!(journal.runs().is_empty());
        assert_eq!(summary.skipped, vec!["parent"]);
    }

    #[tokio::test]
    async fn shared_dependency_is_revisited_by_default() {
        let journal = Journal::default();
        let shared = Arc::new(ScriptedProcedure::new("shared", &journal));
        let a = Arc::new(
            ScriptedProcedure::new("a", &journal).with_dependencies(vec![shared.clone()]),
        );
        let b = Arc::new(ScriptedProcedure::new("b", &journal).with_dependencies(vec![shared]));

        Executor::default()
            .run_all(&refs(&[a, b]), &())
            .await
            .unwrap();

        assert_eq!(journal.runs(), vec!["shared", "a", "shared", "b"]);
    }

    #[tokio::test]
    async fn dedupe_visits_shared_dependency_once() {
        let journal = Journal::default();
        let shared = Arc::new(ScriptedProcedure::new("shared", &journal));
        let a = Arc::new(
            ScriptedProcedure::new("a", &journal).with_dependencies(vec![shared.clone()]),
        );
        let b = Arc::new(ScriptedProcedure::new("b", &journal).with_dependencies(vec![shared]));

        let executor = Executor::new(RunOptions {
            dedupe: true,
            ..Default::default()
        });
        let summary = executor.run_all(&refs(&[a, b]), &()).await.unwrap();

        assert_eq!(journal.runs(), vec!["shared", "a", "b"]);
        assert_eq!(summary.deduplicated, vec!["shared"]);
    }

    #[tokio::test]
    async fn self_dependency_is_a_cycle() {
        let journal = Journal::default();
        let looping = Arc::new(ScriptedProcedure::new("loop", &journal).with_self_dependency());

        let err = Executor::default()
            .run_all(&refs(&[looping]), &())
            .await
            .unwrap_err();

        match err {
            TezonatorError::CircularDependency { cycle } => assert_eq!(cycle, "loop -> loop"),
            other => panic!("expected cycle, got {other}"),
        }
        assert!(journal.runs().is_empty());
    }

    #[tokio::test]
    async fn failing_skip_check_is_fatal() {
        let journal = Journal::default();
        let a = Arc::new(ScriptedProcedure::new("a", &journal).with_failing_skip_check("no git"));
        let b = Arc::new(ScriptedProcedure::new("b", &journal));

        let err = Executor::default()
            .run_all(&refs(&[a, b]), &())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TezonatorError::Procedure {
                phase: Phase::SkipCheck,
                ..
            }
        ));
        assert!(err.to_string().contains("no git"));
        assert!(journal.runs().is_empty());
    }

    #[tokio::test]
    async fn dependency_failure_is_attributed_to_the_dependency() {
        let journal = Journal::default();
        let dep = Arc::new(ScriptedProcedure::new("dep", &journal).with_failure("broken"));
        let parent =
            Arc::new(ScriptedProcedure::new("parent", &journal).with_dependencies(vec![dep]));

        let err = Executor::default()
            .run_all(&refs(&[parent]), &())
            .await
            .unwrap_err();

        assert_eq!(err.procedure_id(), Some("dep"));
        assert_eq!(journal.runs(), vec!["dep"]);
    }

    #[tokio::test]
    async fn slow_action_times_out() {
        let journal = Journal::default();
        let slow = Arc::new(
            ScriptedProcedure::new("slow", &journal).with_delay(Duration::from_secs(5)),
        );
        let executor = Executor::new(RunOptions {
            step_timeout: Some(Duration::from_millis(20)),
            ..Default::default()
        });

        let err = executor.run_all(&refs(&[slow]), &()).await.unwrap_err();

        assert!(matches!(err, TezonatorError::Timeout { .. }));
    }

    #[tokio::test]
    async fn cancelled_token_stops_before_first_procedure() {
        let journal = Journal::default();
        let a = Arc::new(ScriptedProcedure::new("a", &journal));
        let executor = Executor::default();
        executor.cancellation_token().cancel();

        let err = executor.run_all(&refs(&[a]), &()).await.unwrap_err();

        assert!(matches!(err, TezonatorError::Cancelled { .. }));
        assert!(journal.checks().is_empty());
    }

    #[tokio::test]
    async fn progress_reports_nesting_depth() {
        let journal = Journal::default();
        let dep = Arc::new(ScriptedProcedure::new("dep", &journal));
        let parent =
            Arc::new(ScriptedProcedure::new("parent", &journal).with_dependencies(vec![dep]));

        let mut started = Vec::new();
        Executor::default()
            .run_with_progress(&refs(&[parent]), &(), |event| {
                if let RunProgress::Started { id, depth } = event {
                    started.push((id.to_string(), depth));
                }
            })
            .await
            .unwrap();

        assert_eq!(
            started,
            vec![("dep".to_string(), 1), ("parent".to_string(), 0)]
        );
    }

    #[test]
    fn cycle_path_starts_at_first_occurrence() {
        let state = WalkState {
            stack: vec!["a".into(), "b".into(), "c".into()],
            ..Default::default()
        };
        assert_eq!(state.cycle_through("b").as_deref(), Some("b -> c -> b"));
        assert!(state.cycle_through("d").is_none());
    }
}
