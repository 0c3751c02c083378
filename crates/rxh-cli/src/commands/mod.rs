pub mod batch;
pub mod config;
pub mod draft;
pub mod extract;

use std::path::{Path, PathBuf};

use tracing::debug;

use rxh_core::RxhConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rxh")
        .join("config.json")
}

/// Load the config file given on the command line, else the default file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RxhConfig> {
    if let Some(path) = config_path {
        return Ok(RxhConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using configuration from {}", default_path.display());
        Ok(RxhConfig::from_file(&default_path)?)
    } else {
        Ok(RxhConfig::default())
    }
}
