//! Configuration loader with two-layer merge and env overrides.
//!
//! The loading process:
//! 1. Read global config from `~/.config/include-flatten/flatten.json`
//! 2. Read local config from `<dir>/flatten.json`
//! 3. Deep merge at JSON Value level (RFC 7396)
//! 4. Deserialize once into typed FlattenConfig
//! 5. Resolve relative include dirs against `<dir>`
//! 6. Apply env var overrides (highest precedence)
//! 7. Run advisory validation

use crate::{merge::merge_patch, types::FlattenConfig, validation::AdvisoryWarning};
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Filename for local config.
pub const LOCAL_FILE: &str = "flatten.json";

/// Directory name under config_dir for global config.
pub const GLOBAL_DIR: &str = "include-flatten";

/// Filename for global config.
pub const GLOBAL_FILE: &str = "flatten.json";

pub const ENV_INCLUDE_PATH: &str = "FLATTEN_INCLUDE_PATH";
pub const ENV_MAX_DEPTH: &str = "FLATTEN_MAX_DEPTH";
pub const ENV_TRUNCATE: &str = "FLATTEN_TRUNCATE";
pub const ENV_LOG_LEVEL: &str = "FLATTEN_LOG_LEVEL";

/// Resolved paths for config files.
#[derive(Debug, Clone)]
pub struct FlattenConfigPaths {
    /// Path to local config (`<dir>/flatten.json`).
    pub local: PathBuf,

    /// Path to global config, when the platform has a config directory.
    pub global: Option<PathBuf>,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct LoadedFlattenConfig {
    /// The loaded and merged configuration.
    pub config: FlattenConfig,

    /// Advisory warnings from validation.
    pub warnings: Vec<AdvisoryWarning>,

    /// Resolved config file paths.
    pub paths: FlattenConfigPaths,
}

/// Get the global config file path, if the platform defines a config dir.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(GLOBAL_DIR).join(GLOBAL_FILE))
}

/// Get the local config file path for a given directory.
pub fn local_config_path(local_dir: &Path) -> PathBuf {
    local_dir.join(LOCAL_FILE)
}

/// Load and merge configuration for `local_dir`.
///
/// # Precedence (lowest to highest)
/// 1. Default values
/// 2. Global config
/// 3. Local config (`<local_dir>/flatten.json`)
/// 4. Environment variables
pub fn load_merged(local_dir: &Path) -> Result<LoadedFlattenConfig> {
    load_layers(global_config_path().as_deref(), local_dir)
}

/// Same as [`load_merged`] with an explicit global config path.
pub fn load_layers(global_path: Option<&Path>, local_dir: &Path) -> Result<LoadedFlattenConfig> {
    let local_path = local_config_path(local_dir);

    let global_v = match global_path {
        Some(p) => read_json_object_or_empty(p)?,
        None => Value::Object(Default::default()),
    };
    let local_v = read_json_object_or_empty(&local_path)?;

    let merged = merge_patch(global_v, local_v);

    let mut cfg: FlattenConfig =
        serde_json::from_value(merged).context("Failed to deserialize merged flatten config")?;

    // Env-supplied dirs stay relative to the working directory, so resolve first.
    resolve_relative_dirs(&mut cfg, local_dir);
    apply_env_overrides(&mut cfg);

    let warnings = crate::validation::validate(&cfg);

    Ok(LoadedFlattenConfig {
        config: cfg,
        warnings,
        paths: FlattenConfigPaths {
            local: local_path,
            global: global_path.map(Path::to_path_buf),
        },
    })
}

fn resolve_relative_dirs(cfg: &mut FlattenConfig, base: &Path) {
    for dir in &mut cfg.include_dirs {
        if dir.is_relative() {
            *dir = base.join(&*dir);
        }
    }
}

/// Apply environment variable overrides to the config.
fn apply_env_overrides(cfg: &mut FlattenConfig) {
    if let Some(v) = env_trimmed(ENV_INCLUDE_PATH) {
        cfg.include_dirs = std::env::split_paths(&v)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
    }

    if let Some(v) = env_trimmed(ENV_MAX_DEPTH) {
        match v.parse::<usize>() {
            Ok(n) => cfg.max_depth = Some(n),
            Err(e) => tracing::warn!("Ignoring {}={:?}: {}", ENV_MAX_DEPTH, v, e),
        }
    }

    if let Some(v) = env_trimmed(ENV_TRUNCATE) {
        cfg.truncate_output = v.eq_ignore_ascii_case("true") || v == "1";
    }

    if let Some(v) = env_trimmed(ENV_LOG_LEVEL) {
        cfg.logging.level = v;
    }
}

/// Helper to read and normalize an env var (trim + filter empty).
fn env_trimmed(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a JSON file as a Value, returning empty object if file doesn't exist.
fn read_json_object_or_empty(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(Value::Object(Default::default()));
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let v: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    match v {
        Value::Object(_) => Ok(v),
        _ => anyhow::bail!("Config root must be a JSON object: {}", path.display()),
    }
}
