//! JSON Schema for `flatten.json`.

use crate::types::FlattenConfig;
use schemars::{Schema, generate::SchemaSettings};

pub fn schema() -> Schema {
    SchemaSettings::default()
        .into_generator()
        .into_root_schema_for::<FlattenConfig>()
}

pub fn schema_json_pretty() -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&schema())?)
}
