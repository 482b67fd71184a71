//! Configuration types for `flatten.json`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
///
/// All fields use `#[serde(default)]` so partial configs work correctly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FlattenConfig {
    /// Optional JSON Schema URL for IDE autocomplete support.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Include directories, searched in order after any given on the command line.
    pub include_dirs: Vec<PathBuf>,

    /// Maximum include nesting depth. Unset means the flattener's built-in limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Empty the output file before flattening instead of appending to it.
    pub truncate_output: bool,

    /// Logging and diagnostics configuration.
    pub logging: LoggingConfig,
}

/// Logging and diagnostics configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: FlattenConfig = serde_json::from_str(r#"{"include_dirs": ["inc"]}"#).unwrap();
        assert_eq!(cfg.include_dirs, vec![PathBuf::from("inc")]);
        assert_eq!(cfg.max_depth, None);
        assert!(!cfg.truncate_output);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn default_serializes_without_optional_fields() {
        let json = serde_json::to_value(FlattenConfig::default()).unwrap();
        assert!(json.get("$schema").is_none());
        assert!(json.get("max_depth").is_none());
        assert_eq!(json["include_dirs"], serde_json::json!([]));
    }

    #[test]
    fn schema_key_round_trips() {
        let raw = r#"{"$schema": "https://example.invalid/flatten.schema.json", "max_depth": 12}"#;
        let cfg: FlattenConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(cfg.max_depth, Some(12));
        let back = serde_json::to_value(&cfg).unwrap();
        assert_eq!(back["$schema"], "https://example.invalid/flatten.schema.json");
    }
}
