//! Remote network registry.
//!
//! The registry is a JSON object keyed by network id (`mainnet`,
//! `ghostnet`, `weeklynet-2024-03-20`, ...). Only the fields the tool uses
//! are decoded; everything else is ignored.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TezonatorError};

use super::NetworkName;

/// Default registry location.
pub const DEFAULT_REGISTRY_URL: &str = "https://teztnets.com/teztnets.json";

/// One network as described by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub human_name: String,
    pub git_ref: String,
    pub rpc_url: String,
    #[serde(default)]
    pub network_url: Option<String>,
    pub last_baking_daemon: String,
    #[serde(default)]
    pub chain_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Decoded registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct NetworkRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl NetworkRegistry {
    /// Decode a registry document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TezonatorError::NetworkRegistry {
            message: format!("could not decode registry: {}", e),
        })
    }

    /// Fetch and decode the registry from `url`.
    pub async fn fetch(url: &str) -> Result<Self> {
        RegistryFetcher::new().fetch(url).await
    }

    /// First entry (in key order) whose key starts with the network name.
    pub fn find(&self, network: NetworkName) -> Option<(&str, &RegistryEntry)> {
        self.entries
            .iter()
            .find(|(key, _)| key.starts_with(network.as_str()))
            .map(|(key, entry)| (key.as_str(), entry))
    }

    /// Like [`find`](Self::find) but an error when nothing matches.
    pub fn require(&self, network: NetworkName, url: &str) -> Result<&RegistryEntry> {
        self.find(network)
            .map(|(_, entry)| entry)
            .ok_or_else(|| TezonatorError::UnknownNetwork {
                name: network.to_string(),
                url: url.to_string(),
            })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fetches the registry over HTTP/HTTPS.
#[derive(Debug, Clone)]
pub struct RegistryFetcher {
    client: Client,
    timeout: Duration,
}

impl RegistryFetcher {
    /// Create a fetcher with the default 30-second timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a fetcher with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(concat!("tezonator/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, timeout }
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch and decode the registry.
    pub async fn fetch(&self, url: &str) -> Result<NetworkRegistry> {
        debug!("fetching network registry from {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TezonatorError::NetworkRegistry {
                message: format!("request to {} failed: {}", url, e),
            })?;

        if !response.status().is_success() {
            return Err(TezonatorError::NetworkRegistry {
                message: format!("HTTP {} fetching {}", response.status(), url),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TezonatorError::NetworkRegistry {
                message: format!("reading {} failed: {}", url, e),
            })?;

        NetworkRegistry::from_json(&body)
    }
}

impl Default for RegistryFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "mainnet": {
            "category": "Long-running Teztnets",
            "chain_name": "TEZOS_MAINNET",
            "human_name": "Mainnet",
            "git_ref": "v19.1",
            "rpc_url": "https://rpc.tzbeta.net",
            "last_baking_daemon": "PtParisB",
            "masked_from_main_page": false
        },
        "weeklynet-2024-03-20": {
            "human_name": "Weeklynet",
            "git_ref": "0a81ce76b3d4f57d8c5194bcb9418f9294fd2be1",
            "rpc_url": "https://rpc.weeklynet-2024-03-20.teztnets.com",
            "network_url": "https://teztnets.com/weeklynet-2024-03-20",
            "last_baking_daemon": "alpha"
        }
    }"#;

    #[test]
    fn decodes_entries_ignoring_unknown_fields() {
        let registry = NetworkRegistry::from_json(SAMPLE).unwrap();
        assert_eq!(registry.len(), 2);
        let (_, mainnet) = registry.find(NetworkName::Mainnet).unwrap();
        assert_eq!(mainnet.git_ref, "v19.1");
        assert!(mainnet.network_url.is_none());
    }

    #[test]
    fn finds_dated_network_by_prefix() {
        let registry = NetworkRegistry::from_json(SAMPLE).unwrap();
        let (key, entry) = registry.find(NetworkName::Weeklynet).unwrap();
        assert_eq!(key, "weeklynet-2024-03-20");
        assert_eq!(entry.last_baking_daemon, "alpha");
    }

    #[test]
    fn require_reports_missing_network() {
        let registry = NetworkRegistry::from_json(SAMPLE).unwrap();
        let err = registry
            .require(NetworkName::Ghostnet, "http://example")
            .unwrap_err();
        assert!(err.to_string().contains("ghostnet"));
    }

    #[test]
    fn malformed_json_is_a_registry_error() {
        let err = NetworkRegistry::from_json("[1, 2").unwrap_err();
        assert!(matches!(err, TezonatorError::NetworkRegistry { .. }));
    }

    #[test]
    fn default_timeout_is_30_seconds() {
        assert_eq!(RegistryFetcher::new().timeout(), Duration::from_secs(30));
    }
}
