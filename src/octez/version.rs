//! Parsing `octez-* --version` output.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

use crate::error::{Result, TezonatorError};

/// `<commit> (<date>) (<version>)`.
static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+) \((\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2} \+\d{4})\) \(([ \w.~+]+)\)")
        .expect("VERSION_REGEX must compile")
});

/// What a binary reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryVersion {
    pub path: PathBuf,
    /// Abbreviated commit the binary was built from.
    pub commit_hash: String,
    pub date: DateTime<FixedOffset>,
    /// Release string, e.g. `Octez 19.1` or `18.0~rc1+dev`.
    pub version: String,
}

impl BinaryVersion {
    /// Parse the `--version` output of the binary at `path`.
    ///
    /// ```
    /// use std::path::Path;
    /// use tezonator::octez::BinaryVersion;
    ///
    /// let v = BinaryVersion::parse(
    ///     Path::new("octez-client"),
    ///     "0a81ce76 (2024-03-19 17:09:20 +0000) (Octez 0.0+dev)\n",
    /// )
    /// .unwrap();
    /// assert_eq!(v.commit_hash, "0a81ce76");
    /// assert_eq!(v.version, "Octez 0.0+dev");
    /// ```
    pub fn parse(path: &Path, stdout: &str) -> Result<Self> {
        let invalid = || TezonatorError::BinaryVersion {
            path: path.to_path_buf(),
            output: stdout.trim().to_string(),
        };

        let caps = VERSION_REGEX.captures(stdout.trim()).ok_or_else(invalid)?;
        let date = DateTime::parse_from_str(&caps[2], "%Y-%m-%d %H:%M:%S %z")
            .map_err(|_| invalid())?;

        Ok(Self {
            path: path.to_path_buf(),
            commit_hash: caps[1].to_string(),
            date,
            version: caps[3].to_string(),
        })
    }

    /// Whether this binary was built from `commit` (a full hash).
    pub fn built_from(&self, commit: &str) -> bool {
        !self.commit_hash.is_empty() && commit.starts_with(&self.commit_hash)
    }
}
