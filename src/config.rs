// config.rs

use ::config::{Config, ConfigError, Environment, File};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Upper end of the gravity slider, in physical units.
pub const GRAVITY_MAX: f32 = 300.0;
/// Upper end of the bounce slider, in physical units.
pub const BOUNCE_MAX: f32 = 1.0;
/// Integer range of the seek bars on the options screen.
pub const DEFAULT_SLIDER_MAX: u32 = 100;
/// How often the device poller is stepped while waiting for an open.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 16;

pub const DEFAULT_OPTIONS_ASSET: &str = "assets/default_options.json";
pub const OPTIONS_FILE_NAME: &str = "options.json";
pub const ENV_PREFIX: &str = "GRAVITYMAZE";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Per-install writable directory (options file, logs).
    pub data_dir: PathBuf,
    /// Bundled default options document.
    pub default_options: PathBuf,
    /// Optional name marker the device selector requires on input devices.
    pub device_marker: Option<String>,
    pub slider_max: u32,
    pub poll_interval_ms: u64,
}

/// `$HOME/.local/share/gravitymaze`, or `./.gravitymaze` without a home.
pub fn default_data_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("gravitymaze"),
        Err(_) => PathBuf::from(".gravitymaze"),
    }
}

impl AppConfig {
    /// Layers, lowest first: built-in defaults, `gravitymaze.toml` in the
    /// working directory, `extra_file`, then `GRAVITYMAZE_*` variables.
    pub fn load(extra_file: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("data_dir", default_data_dir().to_string_lossy().to_string())?
            .set_default("default_options", DEFAULT_OPTIONS_ASSET)?
            .set_default("slider_max", i64::from(DEFAULT_SLIDER_MAX))?
            .set_default("poll_interval_ms", DEFAULT_POLL_INTERVAL_MS as i64)?
            .add_source(File::with_name("gravitymaze").required(false));

        let builder = match extra_file {
            Some(path) => {
                debug!("Loading extra config file: {}", path.display());
                builder.add_source(File::from(path))
            }
            None => builder,
        };

        let config: AppConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        if config.slider_max == 0 {
            return Err(ConfigError::Message(
                "slider_max must be greater than zero".to_string(),
            ));
        }

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    pub fn options_file(&self) -> PathBuf {
        self.data_dir.join(OPTIONS_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
