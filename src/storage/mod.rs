//! Page-config file IO — one JSON file, overwritten whole.
//!
//! No locking, versioning, or atomicity: the last writer wins. That is the
//! contract of the save endpoint; the console compensates by hot-reloading
//! the file when it changes.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::page::PageConfig;

/// Load the page config from `path`.
pub fn load_page(path: &Path) -> Result<PageConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read page config at {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("invalid page config JSON at {}", path.display()))
}

/// Overwrite `path` with the pretty-printed document. Returns the number of
/// bytes written.
pub fn write_page_value(path: &Path, value: &serde_json::Value) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let pretty = serde_json::to_string_pretty(value).context("failed to serialize page config")?;
    std::fs::write(path, &pretty)
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), bytes = pretty.len(), "page config written");
    Ok(pretty.len())
}

/// Serialize and overwrite the page config.
pub fn write_page(path: &Path, config: &PageConfig) -> Result<usize> {
    let value = serde_json::to_value(config).context("failed to serialize page config")?;
    write_page_value(path, &value)
}
