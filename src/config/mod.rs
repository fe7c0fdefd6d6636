//! Settings and per-user paths.
//!
//! Settings come from `<config root>/config.yml` when present; every field
//! has a default and the command line can override the interesting ones.
//!
//! # Example
//!
//! ```
//! use tezonator::config::{load_settings, UserPaths};
//!
//! let paths = UserPaths::from_vars(Some("/home/alice"), None, None).unwrap();
//! let settings = load_settings(&paths.config_root).unwrap();
//! assert_eq!(settings.repo_dir, "tezos");
//! ```

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::{load_settings, parse_settings, SETTINGS_FILE};
pub use paths::UserPaths;
pub use schema::{Settings, DEFAULT_GIT_URL, DEFAULT_MIN_BINARIES};
