//! Engine configuration files
//!
//! Optional JSON files holding an [`EngineConfig`]. Every field may be
//! omitted and falls back to the engine default; unknown fields are rejected.
//!
//! ```json
//! { "initial_dimension": 16, "load_factor_threshold": 0.6, "hash_scheme": "modulo" }
//! ```

use anyhow::Context;
use hybrid_cache::EngineConfig;
use std::fs;
use std::path::Path;

/// Loads an engine configuration from a JSON file
pub fn load_engine_config(path: &Path) -> anyhow::Result<EngineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_engine_config(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

/// Parses an engine configuration from JSON text
pub fn parse_engine_config(text: &str) -> anyhow::Result<EngineConfig> {
    let config: EngineConfig = serde_json::from_str(text)?;
    config.validate()?;
    Ok(config)
}
