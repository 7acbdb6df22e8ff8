//! Game settings persistence.
//!
//! The settings document is a flat JSON object with two numeric keys,
//! `gravity` and `bounce`. It is read from the per-install file when one
//! exists and from the bundled default asset otherwise. Saving always
//! overwrites the per-install file.
//!
//! The options screen edits these values through integer seek bars;
//! [`SliderScale`] converts between bar positions and physical units.

use crate::config::{AppConfig, BOUNCE_MAX, GRAVITY_MAX, OPTIONS_FILE_NAME};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("default settings asset not found: {}", .0.display())]
    AssetMissing(PathBuf),
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// The two tunables the engine reads at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettingsDocument {
    /// In `[0, GRAVITY_MAX]`.
    pub gravity: f32,
    /// In `[0, BOUNCE_MAX]`.
    pub bounce: f32,
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self {
            gravity: 98.0,
            bounce: 0.5,
        }
    }
}

impl SettingsDocument {
    /// The root must be an object; both keys are required and must be
    /// finite numbers.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(parse_error("settings root must be an object"));
        }

        let doc: SettingsDocument = serde_json::from_value(value)?;
        if !doc.gravity.is_finite() {
            return Err(parse_error("gravity is out of range"));
        }
        if !doc.bounce.is_finite() {
            return Err(parse_error("bounce is out of range"));
        }
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Loads and saves the settings document.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    writable_path: PathBuf,
    default_asset: PathBuf,
}

impl SettingsStore {
    pub fn new(data_dir: impl AsRef<Path>, default_asset: impl Into<PathBuf>) -> Self {
        Self {
            writable_path: data_dir.as_ref().join(OPTIONS_FILE_NAME),
            default_asset: default_asset.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.data_dir, config.default_options.clone())
    }

    pub fn writable_path(&self) -> &Path {
        &self.writable_path
    }

    /// Per-install file if present, else the bundled default. A document
    /// that fails to parse is an error; nothing falls back to defaults.
    pub fn load(&self) -> Result<SettingsDocument> {
        let path = if self.writable_path.exists() {
            &self.writable_path
        } else {
            info!(
                "No options file at {}, using defaults",
                self.writable_path.display()
            );
            if !self.default_asset.exists() {
                return Err(SettingsError::AssetMissing(self.default_asset.clone()));
            }
            &self.default_asset
        };

        let json = read(path)?;
        let doc = SettingsDocument::from_json(&json)?;
        debug!("Loaded settings from {}: {:?}", path.display(), doc);
        Ok(doc)
    }

    pub fn save(&self, doc: &SettingsDocument) -> Result<()> {
        if let Some(parent) = self.writable_path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = doc.to_json()?;
        fs::write(&self.writable_path, json).map_err(|source| SettingsError::Io {
            path: self.writable_path.clone(),
            source,
        })?;
        info!("Saved settings to {}", self.writable_path.display());
        Ok(())
    }
}

fn parse_error(msg: &str) -> SettingsError {
    SettingsError::Parse(serde::de::Error::custom(msg))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Linear map between a seek bar's `[0, slider_max]` and `[0, unit_max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderScale {
    pub slider_max: u32,
    pub unit_max: f32,
}

impl SliderScale {
    pub fn new(slider_max: u32, unit_max: f32) -> Self {
        Self {
            slider_max,
            unit_max,
        }
    }

    pub fn gravity(slider_max: u32) -> Self {
        Self::new(slider_max, GRAVITY_MAX)
    }

    pub fn bounce(slider_max: u32) -> Self {
        Self::new(slider_max, BOUNCE_MAX)
    }

    pub fn to_physical(&self, progress: u32) -> f32 {
        if self.slider_max == 0 {
            return 0.0;
        }
        (progress as f32 / self.slider_max as f32) * self.unit_max
    }

    /// Truncates toward zero and clamps to the bar's range.
    pub fn to_slider(&self, value: f32) -> u32 {
        if self.unit_max <= 0.0 {
            return 0;
        }
        let progress = ((value / self.unit_max) * self.slider_max as f32) as u32;
        progress.min(self.slider_max)
    }

    /// Physical size of one slider step.
    pub fn step(&self) -> f32 {
        if self.slider_max == 0 {
            return self.unit_max;
        }
        self.unit_max / self.slider_max as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_values_parse_as_floats() {
        let doc = SettingsDocument::from_json(r#"{"gravity": 98, "bounce": 1}"#).unwrap();
        assert_eq!(doc.gravity, 98.0);
        assert_eq!(doc.bounce, 1.0);
    }

    #[test]
    fn test_flat_json_shape() {
        let doc = SettingsDocument {
            gravity: 150.0,
            bounce: 0.25,
        };
        assert_eq!(doc.to_json().unwrap(), r#"{"gravity":150.0,"bounce":0.25}"#);
    }

    #[test]
    fn test_slider_clamps_out_of_range_values() {
        let scale = SliderScale::gravity(100);
        assert_eq!(scale.to_slider(450.0), 100);
        assert_eq!(scale.to_slider(-3.0), 0);
        assert_eq!(scale.to_physical(100), 300.0);
    }

    #[test]
    fn test_zero_slider_max() {
        let scale = SliderScale::new(0, 1.0);
        assert_eq!(scale.to_physical(0), 0.0);
        assert_eq!(scale.to_slider(0.5), 0);
    }
}
