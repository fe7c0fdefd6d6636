//! The execution context threaded through every procedure.
//!
//! An [`ExecutionContext`] is built once per invocation, after the network
//! has been resolved, and is never mutated afterwards. Procedures read
//! paths and names from it; nothing in it is ambient process state.

mod kinds;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::{Settings, UserPaths};
use crate::network::{NetworkName, PortPlan, RegistryEntry, SHORT_COMMIT_LEN};

pub use kinds::{DataKind, ServiceKind};

/// Options taken from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandOptions {
    /// Redo work even when skip checks say it is done.
    pub force: bool,
}

/// The selected network, with its ref resolved to a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDescriptor {
    pub name: NetworkName,
    /// Registry key (`weeklynet-2024-03-20` for dated networks).
    pub key: String,
    pub human_name: String,
    pub git_ref: String,
    /// Full commit hash `git_ref` points at.
    pub commit: String,
    pub rpc_url: String,
    pub network_url: Option<String>,
    pub last_baking_daemon: String,
    pub ports: PortPlan,
}

impl NetworkDescriptor {
    /// Describe `name` from its registry entry and resolved commit.
    pub fn new(
        name: NetworkName,
        key: impl Into<String>,
        entry: &RegistryEntry,
        commit: impl Into<String>,
    ) -> Self {
        Self {
            name,
            key: key.into(),
            human_name: entry.human_name.clone(),
            git_ref: entry.git_ref.clone(),
            commit: commit.into(),
            rpc_url: entry.rpc_url.clone(),
            network_url: entry.network_url.clone(),
            last_baking_daemon: entry.last_baking_daemon.clone(),
            ports: PortPlan::for_network(name),
        }
    }

    /// Leading characters of the commit that name the install directory.
    pub fn short_commit(&self) -> &str {
        let end = self
            .commit
            .char_indices()
            .nth(SHORT_COMMIT_LEN)
            .map(|(i, _)| i)
            .unwrap_or(self.commit.len());
        &self.commit[..end]
    }

    /// Value for `octez-node config init --network`.
    pub fn config_network(&self) -> String {
        self.network_url
            .clone()
            .unwrap_or_else(|| self.human_name.to_lowercase())
    }
}

/// Everything a procedure needs to know about this invocation.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    user_paths: UserPaths,
    network: NetworkDescriptor,
    options: CommandOptions,
    git_url: String,
    repo_dir: String,
    min_binaries: usize,
    service_names: BTreeMap<ServiceKind, String>,
    data_dirs: BTreeMap<DataKind, PathBuf>,
}

impl ExecutionContext {
    pub fn new(
        user_paths: UserPaths,
        network: NetworkDescriptor,
        options: CommandOptions,
        settings: &Settings,
    ) -> Self {
        let net = network.name.as_str();

        let service_names = ServiceKind::ALL
            .iter()
            .map(|kind| (*kind, format!("octez-{}-{}.service", kind, net)))
            .collect();

        let data_dirs = DataKind::ALL
            .iter()
            .map(|kind| {
                let dir = user_paths
                    .data_root
                    .join("config")
                    .join(net)
                    .join(kind.as_str());
                (*kind, dir)
            })
            .collect();

        Self {
            user_paths,
            network,
            options,
            git_url: settings.git_url.clone(),
            repo_dir: settings.repo_dir.clone(),
            min_binaries: settings.min_binaries,
            service_names,
            data_dirs,
        }
    }

    pub fn user_paths(&self) -> &UserPaths {
        &self.user_paths
    }

    pub fn network(&self) -> &NetworkDescriptor {
        &self.network
    }

    pub fn force(&self) -> bool {
        self.options.force
    }

    pub fn git_url(&self) -> &str {
        &self.git_url
    }

    pub fn repo_dir(&self) -> &str {
        &self.repo_dir
    }

    pub fn min_binaries(&self) -> usize {
        self.min_binaries
    }

    /// Source checkout.
    pub fn repo_path(&self) -> PathBuf {
        self.user_paths.data_root.join(&self.repo_dir)
    }

    /// Patches applied after checkout, if the directory exists.
    pub fn patches_dir(&self) -> PathBuf {
        self.user_paths
            .data_root
            .join("patches")
            .join(&self.network.git_ref)
    }

    /// Install directory for this network's commit.
    pub fn bin_dir(&self) -> PathBuf {
        self.user_paths.bin_root.join(self.network.short_commit())
    }

    /// An installed binary.
    pub fn binary(&self, name: &str) -> PathBuf {
        self.bin_dir().join(name)
    }

    pub fn data_dir(&self, kind: DataKind) -> &PathBuf {
        // Every kind is inserted in `new`.
        &self.data_dirs[&kind]
    }

    pub fn service_name(&self, kind: ServiceKind) -> &str {
        &self.service_names[&kind]
    }

    /// Path of a unit file in the systemd user directory.
    pub fn unit_path(&self, kind: ServiceKind) -> PathBuf {
        self.user_paths.systemd_dir.join(self.service_name(kind))
    }
}
