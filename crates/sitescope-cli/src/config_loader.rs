use anyhow::{Context, Result};
use sitescope_core::config::LayeredConfig;
use std::path::Path;

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "sitescope.toml";

/// Build the layered configuration: defaults, then file, then environment.
///
/// An explicit `path` must load; the implicit `sitescope.toml` is only read
/// when it exists.
pub fn load_config(path: Option<&Path>) -> Result<LayeredConfig> {
    let config = LayeredConfig::with_defaults();

    let config = match path {
        Some(path) => config
            .load_from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => config
            .load_from_file(DEFAULT_CONFIG_FILE)
            .with_context(|| format!("Failed to load config file {}", DEFAULT_CONFIG_FILE))?,
        None => config,
    };

    Ok(config.load_from_env())
}
