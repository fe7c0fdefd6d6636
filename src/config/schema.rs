//! Settings file schema.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::network::DEFAULT_REGISTRY_URL;

/// Default source repository.
pub const DEFAULT_GIT_URL: &str = "https://gitlab.com/tezos/tezos.git";

/// Number of `octez-*` binaries a complete build produces, at least.
pub const DEFAULT_MIN_BINARIES: usize = 15;

/// Settings read from `config.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Where the network registry is fetched from.
    pub registry_url: String,

    /// Source repository to clone.
    pub git_url: String,

    /// Checkout directory, relative to the data root.
    pub repo_dir: String,

    /// Per-procedure timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_timeout_secs: Option<u64>,

    /// Visit shared dependencies only once per run.
    pub dedupe: bool,

    /// Binaries required before a build counts as complete.
    pub min_binaries: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            git_url: DEFAULT_GIT_URL.to_string(),
            repo_dir: "tezos".to_string(),
            step_timeout_secs: None,
            dedupe: false,
            min_binaries: DEFAULT_MIN_BINARIES,
        }
    }
}

impl Settings {
    /// The per-procedure timeout, if any.
    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout_secs.map(Duration::from_secs)
    }
}
