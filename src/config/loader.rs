//! Settings file loading.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::schema::Settings;
use crate::error::{Result, TezonatorError};

/// File name of the settings file inside the config root.
pub const SETTINGS_FILE: &str = "config.yml";

/// Load `<config_root>/config.yml`, or defaults when it does not exist.
pub fn load_settings(config_root: &Path) -> Result<Settings> {
    let path = config_root.join(SETTINGS_FILE);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no settings at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        Err(e) => return Err(TezonatorError::Io(e)),
    };

    parse_settings(&content, &path)
}

/// Parse settings YAML.
///
/// An empty file yields the defaults.
pub fn parse_settings(content: &str, source_path: &Path) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(content).map_err(|e| TezonatorError::Config {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
