//! Atomic writes for config files.

use anyhow::{Context, Result};
use atomicwrites::{AllowOverwrite, AtomicFile};
use serde_json::Value;
use std::io::Write;
use std::path::Path;

/// Write `value` as pretty JSON via a temporary file and an atomic rename,
/// creating parent directories as needed.
pub fn write_pretty_json_atomic(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let mut json =
        serde_json::to_string_pretty(value).context("Failed to serialize config to JSON")?;
    json.push('\n');

    AtomicFile::new(path, AllowOverwrite)
        .write(|f| f.write_all(json.as_bytes()))
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}
