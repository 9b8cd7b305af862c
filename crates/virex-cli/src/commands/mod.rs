//! Subcommands and the helpers they share.

pub mod config;
pub mod extract;
pub mod fields;
pub mod filter;
pub mod schema;

use std::path::Path;

use tracing::debug;

use virex_core::models::config::VirexConfig;
use virex_core::{FieldExtractor, FieldSchema};

/// Load configuration from `path`, the default location, or defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<VirexConfig> {
    let config = match path {
        Some(path) => VirexConfig::from_file(Path::new(path))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                debug!("Using config file {}", default_path.display());
                VirexConfig::from_file(&default_path)?
            } else {
                VirexConfig::default()
            }
        }
    };

    config.validate()?;
    Ok(config)
}

/// Build the field extractor; `schema` overrides the configured schema file.
pub fn load_extractor(config: &VirexConfig, schema: Option<&Path>) -> anyhow::Result<FieldExtractor> {
    let schema = match schema.or(config.extraction.schema_path.as_deref()) {
        Some(path) => {
            debug!("Loading field schema from {}", path.display());
            FieldSchema::from_json_file(path)?
        }
        None => FieldSchema::transfer_order(),
    };

    Ok(FieldExtractor::new(schema).with_sentinel(config.extraction.sentinel.as_str()))
}
