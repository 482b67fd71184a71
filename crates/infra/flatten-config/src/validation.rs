//! Advisory validation for FlattenConfig.
//!
//! Validation never rejects a config. A missing include directory, for
//! instance, is harmless to the flattener (it simply finds nothing there), but
//! is usually a typo worth surfacing.

use crate::types::FlattenConfig;
use std::collections::HashSet;

/// An advisory warning about a configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryWarning {
    /// Machine-readable warning code.
    pub code: &'static str,

    /// Human-readable warning message.
    pub message: String,

    /// JSON path to the problematic config field.
    pub path: &'static str,
}

impl std::fmt::Display for AdvisoryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a configuration and return advisory warnings.
pub fn validate(cfg: &FlattenConfig) -> Vec<AdvisoryWarning> {
    let mut warnings = vec![];
    let mut seen = HashSet::new();

    for (idx, dir) in cfg.include_dirs.iter().enumerate() {
        if !seen.insert(dir) {
            warnings.push(AdvisoryWarning {
                code: "include_dirs.duplicate",
                path: "include_dirs",
                message: format!("Entry {idx} repeats '{}'", dir.display()),
            });
            continue;
        }
        if !dir.exists() {
            warnings.push(AdvisoryWarning {
                code: "include_dirs.missing",
                path: "include_dirs",
                message: format!("Entry {idx} does not exist: '{}'", dir.display()),
            });
        } else if !dir.is_dir() {
            warnings.push(AdvisoryWarning {
                code: "include_dirs.not_a_directory",
                path: "include_dirs",
                message: format!("Entry {idx} is not a directory: '{}'", dir.display()),
            });
        }
    }

    if cfg.max_depth == Some(0) {
        warnings.push(AdvisoryWarning {
            code: "max_depth.zero",
            path: "max_depth",
            message: "A limit of 0 rejects even the root file".into(),
        });
    }

    if !LOG_LEVELS.contains(&cfg.logging.level.to_lowercase().as_str()) {
        warnings.push(AdvisoryWarning {
            code: "logging.level.invalid",
            path: "logging.level",
            message: format!(
                "Unknown log level '{}'. Expected one of: {}",
                cfg.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_no_warnings() {
        let warnings = validate(&FlattenConfig::default());
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn missing_and_file_include_dirs_warn() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("not-a-dir.h");
        std::fs::write(&file, "").unwrap();

        let cfg = FlattenConfig {
            include_dirs: vec![temp.path().to_path_buf(), temp.path().join("gone"), file],
            ..Default::default()
        };
        let codes: Vec<_> = validate(&cfg).iter().map(|w| w.code).collect();
        assert_eq!(codes, vec!["include_dirs.missing", "include_dirs.not_a_directory"]);
    }

    #[test]
    fn duplicate_include_dir_warns_once() {
        let temp = TempDir::new().unwrap();
        let cfg = FlattenConfig {
            include_dirs: vec![temp.path().to_path_buf(), temp.path().to_path_buf()],
            ..Default::default()
        };
        let warnings = validate(&cfg);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, "include_dirs.duplicate");
        assert!(warnings[0].message.starts_with("Entry 1"));
    }

    #[test]
    fn zero_max_depth_warns() {
        let cfg = FlattenConfig {
            max_depth: Some(0),
            ..Default::default()
        };
        assert!(validate(&cfg).iter().any(|w| w.code == "max_depth.zero"));
    }

    #[test]
    fn log_level_is_case_insensitive_but_checked() {
        let mut cfg = FlattenConfig::default();
        cfg.logging.level = "DEBUG".into();
        assert!(validate(&cfg).is_empty());

        cfg.logging.level = "verbose".into();
        assert!(validate(&cfg).iter().any(|w| w.code == "logging.level.invalid"));
    }

    #[test]
    fn warning_display() {
        let warning = AdvisoryWarning {
            code: "max_depth.zero",
            path: "max_depth",
            message: "too small".into(),
        };
        assert_eq!(warning.to_string(), "[max_depth.zero] max_depth: too small");
    }
}
