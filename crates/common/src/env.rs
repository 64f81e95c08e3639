//! Environment/runtime helpers
//!
//! Sanity checks to ensure the data file location is usable at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the directory holding `data_file` exists; note when the file itself is absent.
///
/// A missing data file is not an error: the store starts empty and the file is
/// created on the first write.
pub async fn ensure_env(data_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = data_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    }
    match tokio::fs::metadata(data_file).await {
        Ok(meta) if meta.is_dir() => {
            return Err(anyhow::anyhow!("{} is a directory, expected a CSV file", data_file.display()));
        }
        Ok(meta) => info!(path = %data_file.display(), bytes = meta.len(), "data file found"),
        Err(_) => warn!(path = %data_file.display(), "data file not found; starting with an empty dataset"),
    }
    Ok(())
}
