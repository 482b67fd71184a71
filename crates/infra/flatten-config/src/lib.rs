//! Layered configuration for the include flattener.
//!
//! This crate provides:
//! - [`FlattenConfig`]: include directories, nesting limit, output and logging settings
//! - [`load_merged`]: two-layer file loading (global + local) with env overrides
//! - [`schema`]: JSON Schema for `flatten.json`
//! - [`validation`]: advisory checks that produce warnings, never errors
//!
//! # Configuration Precedence (lowest to highest)
//! 1. Default values
//! 2. Global config (`~/.config/include-flatten/flatten.json`)
//! 3. Local config (`./flatten.json`)
//! 4. Environment variables
//!
//! Relative `include_dirs` coming from the files are resolved against the
//! directory holding the local config.
//!
//! # Environment Variables
//! - `FLATTEN_INCLUDE_PATH`: Replace `include_dirs` (platform path-list syntax)
//! - `FLATTEN_MAX_DEPTH`: Override the include nesting limit
//! - `FLATTEN_TRUNCATE`: Truncate the output before writing ("true" or "1")
//! - `FLATTEN_LOG_LEVEL`: Override log level

pub mod loader;
pub mod merge;
pub mod schema;
pub mod types;
pub mod validation;
pub mod writer;

pub use loader::{LoadedFlattenConfig, load_merged};
pub use schema::schema_json_pretty;
pub use types::FlattenConfig;
