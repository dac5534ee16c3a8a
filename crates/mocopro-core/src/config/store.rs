//! Settings store for loading and saving config.toml.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::Settings;

#[derive(Debug, Clone)]
pub struct SettingsStore {
    settings_path: PathBuf,
}

impl SettingsStore {
    pub fn new(settings_path: PathBuf) -> Self {
        Self { settings_path }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings, falling back to defaults when the file does not exist.
    pub fn load(&self) -> Result<Settings> {
        if !self.settings_path.exists() {
            return Ok(Settings::new());
        }
        let content = std::fs::read_to_string(&self.settings_path).map_err(|e| {
            Error::io(
                format!("Failed to read settings: {}", self.settings_path.display()),
                e,
            )
        })?;
        Settings::from_toml_str(&content).map_err(|source| Error::Settings {
            path: self.settings_path.clone(),
            source,
        })
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let content = settings.to_toml()?;
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::io(
                    format!("Failed to create settings directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        std::fs::write(&self.settings_path, content).map_err(|e| {
            Error::io(
                format!("Failed to write settings: {}", self.settings_path.display()),
                e,
            )
        })?;
        Ok(())
    }
}
