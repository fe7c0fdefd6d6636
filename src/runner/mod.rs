//! Procedure execution orchestration.

pub mod executor;
pub mod progress;

pub use executor::{Executor, RunOptions};
pub use progress::{RunProgress, RunSummary};
