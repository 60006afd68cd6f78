mod types;

pub use types::{Config, ServerConfig, SourceConfig};

use crate::error::{Result, SheetqlError};
use ::config::{Environment, File, FileFormat};
use std::fs;
use std::path::Path;

/// Prefix of environment variables overriding file settings, e.g.
/// `SHEETQL_SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "SHEETQL";

/// Load configuration from a TOML file, with environment overrides
pub fn load_config(path: &str) -> Result<Config> {
    if !Path::new(path).exists() {
        return Err(SheetqlError::Config(format!(
            "Config file '{}' not found",
            path
        )));
    }

    let settings = ::config::Config::builder()
        .add_source(File::new(path, FileFormat::Toml))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate().map_err(SheetqlError::Config)?;

    Ok(config)
}

/// Save configuration to a TOML file
pub fn save_config(config: &Config, path: &str) -> Result<()> {
    config.validate().map_err(SheetqlError::Config)?;

    let toml_string = toml::to_string_pretty(config)?;
    fs::write(path, toml_string)
        .map_err(|e| SheetqlError::Config(format!("Failed to write config file '{}': {}", path, e)))?;

    Ok(())
}
