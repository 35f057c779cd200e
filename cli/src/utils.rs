use std::{fs, path::Path};

use anyhow::{Context, Result};
use cbmap_shared::MapConfig;
use serde_json::Value;

/// Reads and decodes a JSON file.
pub fn read_json(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Parses a map config file without validating it.
pub fn load_config(path: &Path) -> Result<MapConfig> {
    let value = read_json(path)?;
    MapConfig::from_json_value(value)
        .with_context(|| format!("failed to parse map config {}", path.display()))
}
