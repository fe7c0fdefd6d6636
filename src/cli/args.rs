//! CLI argument definitions.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::network::NetworkName;

/// Build, configure, and run Octez nodes for a Tezos network.
#[derive(Debug, Parser)]
#[command(name = "tez")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show every skip decision
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clone, compile and install the network's binaries, then write service units
    Build(NetworkArgs),

    /// Initialize client and node configuration for the network
    Init(NetworkArgs),

    /// Start the node and DAL node services
    Start(NetworkArgs),

    /// Stop every service of the network
    Stop(NetworkArgs),

    /// List known networks and their registry entries
    Networks(NetworksArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments shared by every procedure command.
#[derive(Debug, Clone, clap::Args)]
pub struct NetworkArgs {
    /// Network to act on
    #[arg(value_enum)]
    pub network: NetworkName,

    /// Redo work even when it looks done
    #[arg(short, long)]
    pub force: bool,

    /// Give up on any single step after this many seconds
    #[arg(long, value_name = "SECS", env = "TEZONATOR_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Visit shared dependencies only once
    #[arg(long, env = "TEZONATOR_DEDUPE")]
    pub dedupe: bool,

    /// Network registry to fetch
    #[arg(long, value_name = "URL", env = "TEZONATOR_REGISTRY_URL")]
    pub registry_url: Option<String>,
}

/// Arguments for `networks`.
#[derive(Debug, Clone, clap::Args)]
pub struct NetworksArgs {
    /// Network registry to fetch
    #[arg(long, value_name = "URL", env = "TEZONATOR_REGISTRY_URL")]
    pub registry_url: Option<String>,
}

/// Arguments for `completions`.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
