//! Progress events and run summaries.

use std::time::Duration;

use crate::error::TezonatorError;

/// Progress events emitted while procedures are walked.
///
/// `depth` is 0 for procedures in the top-level list and grows by one for
/// every dependency level.
#[derive(Debug)]
pub enum RunProgress<'a> {
    /// A skip check resolved.
    SkipChecked {
        id: &'a str,
        skip: bool,
        depth: usize,
    },
    /// A procedure's action is about to start.
    Started { id: &'a str, depth: usize },
    /// A procedure's action finished successfully.
    Finished {
        id: &'a str,
        duration: Duration,
        depth: usize,
    },
    /// A procedure was already resolved earlier in this run and is not revisited.
    Deduplicated { id: &'a str, depth: usize },
    /// A skip check or action failed; the run stops after this event.
    Failed {
        id: &'a str,
        error: &'a TezonatorError,
        depth: usize,
    },
}

impl RunProgress<'_> {
    /// The procedure this event is about.
    pub fn id(&self) -> &str {
        match self {
            RunProgress::SkipChecked { id, .. }
            | RunProgress::Started { id, .. }
            | RunProgress::Finished { id, .. }
            | RunProgress::Deduplicated { id, .. }
            | RunProgress::Failed { id, .. } => id,
        }
    }

    /// Nesting depth of the procedure.
    pub fn depth(&self) -> usize {
        match self {
            RunProgress::SkipChecked { depth, .. }
            | RunProgress::Started { depth, .. }
            | RunProgress::Finished { depth, .. }
            | RunProgress::Deduplicated { depth, .. }
            | RunProgress::Failed { depth, .. } => *depth,
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    /// Ids whose action ran, in completion order.
    pub executed: Vec<String>,
    /// Ids whose skip check returned true, in visiting order.
    pub skipped: Vec<String>,
    /// Ids that were not revisited because they had already been resolved.
    pub deduplicated: Vec<String>,
    /// Wall-clock time of the whole run.
    pub duration: Duration,
}

impl RunSummary {
    /// True when no action ran at all.
    pub fn is_noop(&self) -> bool {
        self.executed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_cover_every_variant() {
        let err = TezonatorError::Cancelled { id: "x".into() };
        let events = [
            RunProgress::SkipChecked {
                id: "a",
                skip: true,
                depth: 0,
            },
            RunProgress::Started { id: "a", depth: 1 },
            RunProgress::Finished {
                id: "a",
                duration: Duration::ZERO,
                depth: 2,
            },
            RunProgress::Deduplicated { id: "a", depth: 3 },
            RunProgress::Failed {
                id: "a",
                error: &err,
                depth: 4,
            },
        ];
        for (expected_depth, event) in events.iter().enumerate() {
            assert_eq!(event.id(), "a");
            assert_eq!(event.depth(), expected_depth);
        }
    }

    #[test]
    fn empty_summary_is_noop() {
        assert!(RunSummary::default().is_noop());
    }
}
