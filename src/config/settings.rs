/*
* vgpu-edit configuration
* -----------------------
*
* Layers, lowest priority first:
* 1. Hardcoded defaults
* 2. <config dir>/default.toml
* 3. <config dir>/local.toml (optional)
* 4. APP_* environment variables, `__` separating sections
*    (APP_SNAPSHOT__PATH, APP_LOGGING__LEVEL, ...)
*
* The config dir comes from --config, then CONFIG_PATH, then "config".
*/

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub snapshot: SnapshotSettings,
    pub presentation: PresentationSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSettings {
    /// Pool snapshot used when --snapshot is not given.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationSettings {
    /// Shown for the "no GPU" entry, whose own label is empty.
    pub none_label: String,
    pub color: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// trace, debug, info, warn or error
    pub level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path = std::env::var("CONFIG_PATH")
            .unwrap_or_else(|_| "config".to_string());
        Self::new_from_dir(Path::new(&config_path))
    }

    pub fn new_from_dir(config_dir: &Path) -> Result<Self, ConfigError> {
        info!("Loading configuration from path: {}", config_dir.display());

        let defaults = generate_default_config();
        let config = Config::builder()
            .set_default("snapshot.path", defaults.snapshot.path.to_string_lossy().to_string())?
            .set_default("presentation.none_label", defaults.presentation.none_label)?
            .set_default("presentation.color", defaults.presentation.color)?
            .set_default("logging.level", defaults.logging.level)?
            .add_source(File::with_name(&format!("{}/default", config_dir.display())).required(false))
            .add_source(File::with_name(&format!("{}/local", config_dir.display())).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

pub fn generate_default_config() -> Settings {
    Settings {
        snapshot: SnapshotSettings {
            path: PathBuf::from("pool.json"),
        },
        presentation: PresentationSettings {
            none_label: "None".to_string(),
            color: true,
        },
        logging: LoggingSettings {
            level: "warn".to_string(),
        },
    }
}
