//! Procedures: named, skippable, dependency-aware units of work.
//!
//! A [`Procedure`] is run by the [`Executor`](crate::runner::Executor)
//! against a shared, read-only context. The executor never looks inside the
//! context, so procedures are generic over it; every concrete procedure in
//! this crate uses [`ExecutionContext`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tezonator::procedure::{Procedure, ProcedureRef};
//! use tezonator::Result;
//!
//! struct Touch;
//!
//! #[async_trait::async_trait]
//! impl Procedure<()> for Touch {
//!     fn id(&self) -> &str {
//!         "touch"
//!     }
//!
//!     async fn run(&self, _ctx: &()) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let touch: ProcedureRef<()> = Arc::new(Touch);
//! assert_eq!(touch.id(), "touch");
//! assert!(touch.dependencies().is_empty());
//! ```

pub mod scripted;

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::ExecutionContext;
use crate::error::Result;

pub use scripted::{Journal, JournalEntry, ScriptedProcedure};

/// Shared handle to a procedure.
///
/// Dependencies are handed out as fresh `Arc`s, so the same logical
/// procedure may appear under several parents.
pub type ProcedureRef<C = ExecutionContext> = Arc<dyn Procedure<C>>;

/// A unit of work executed against a context.
#[async_trait]
pub trait Procedure<C = ExecutionContext>: Send + Sync
where
    C: Sync + ?Sized,
{
    /// Unique, human-readable identifier.
    ///
    /// Used in progress output, error messages, cycle detection, and
    /// (when enabled) deduplication within a run.
    fn id(&self) -> &str;

    /// Decide whether the goal state is already reached.
    ///
    /// Evaluated every time the procedure is reached. When it returns
    /// `Ok(true)` neither the dependencies nor `run` are visited. An `Err`
    /// is fatal for the whole run.
    async fn can_skip(&self, _ctx: &C) -> Result<bool> {
        Ok(false)
    }

    /// Prerequisites, resolved in order before `run`.
    fn dependencies(&self) -> Vec<ProcedureRef<C>> {
        Vec::new()
    }

    /// Perform the work.
    async fn run(&self, ctx: &C) -> Result<()>;
}
