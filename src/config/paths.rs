//! Per-user directory layout.

use std::fs;
use std::path::PathBuf;

use crate::error::{Result, TezonatorError};

const APP_DIR: &str = "tezonator";

/// Directories the tool reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPaths {
    pub home: PathBuf,
    /// Settings and generated configuration.
    pub config_root: PathBuf,
    /// Source checkout, patches and node data.
    pub data_root: PathBuf,
    /// Installed binaries, one directory per commit.
    pub bin_root: PathBuf,
    /// systemd user unit directory.
    pub systemd_dir: PathBuf,
}

impl UserPaths {
    /// Resolve paths from explicit environment values.
    ///
    /// `home` must be set and at least 5 characters long; the XDG values
    /// are used when set and non-empty.
    pub fn from_vars(
        home: Option<&str>,
        xdg_config_home: Option<&str>,
        xdg_data_home: Option<&str>,
    ) -> Result<Self> {
        let home = match home {
            None => {
                return Err(TezonatorError::InvalidHome {
                    message: "HOME is not set".to_string(),
                })
            }
            Some(h) if h.len() < 5 => {
                return Err(TezonatorError::InvalidHome {
                    message: format!("'{}' is too short to be a home directory", h),
                })
            }
            Some(h) => PathBuf::from(h),
        };

        let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(PathBuf::from);
        let config_base = non_empty(xdg_config_home).unwrap_or_else(|| home.join(".config"));
        let data_base =
            non_empty(xdg_data_home).unwrap_or_else(|| home.join(".local").join("share"));

        Ok(Self {
            config_root: config_base.join(APP_DIR),
            data_root: data_base.join(APP_DIR),
            bin_root: home.join(".local").join("bin").join(APP_DIR),
            systemd_dir: config_base.join("systemd").join("user"),
            home,
        })
    }

    /// Resolve paths from the process environment.
    pub fn from_env() -> Result<Self> {
        let home = std::env::var("HOME").ok();
        let config = std::env::var("XDG_CONFIG_HOME").ok();
        let data = std::env::var("XDG_DATA_HOME").ok();
        Self::from_vars(home.as_deref(), config.as_deref(), data.as_deref())
    }

    /// Create every directory.
    pub fn create_dirs(&self) -> Result<()> {
        for dir in [
            &self.config_root,
            &self.data_root,
            &self.bin_root,
            &self.systemd_dir,
        ] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}
