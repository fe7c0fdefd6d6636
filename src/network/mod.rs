//! Networks: known names, the remote registry, port allocation and commit
//! resolution.

pub mod commit;
pub mod names;
pub mod ports;
pub mod registry;

pub use commit::{is_commit_hash, resolve_commit, SHORT_COMMIT_LEN};
pub use names::NetworkName;
pub use ports::PortPlan;
pub use registry::{NetworkRegistry, RegistryEntry, RegistryFetcher, DEFAULT_REGISTRY_URL};
