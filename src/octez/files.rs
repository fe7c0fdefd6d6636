//! Directory listing helpers.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Regular files in `dir` whose names start with `prefix` and end with
/// `suffix`, sorted by path.
///
/// A missing directory yields an empty list.
pub async fn list_files(
    dir: &Path,
    prefix: Option<&str>,
    suffix: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if prefix.is_some_and(|p| !name.starts_with(p)) {
            continue;
        }
        if suffix.is_some_and(|s| !name.ends_with(s)) {
            continue;
        }
        files.push(entry.path());
    }

    files.sort();
    Ok(files)
}
