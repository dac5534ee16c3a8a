//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};

use crate::client::ClientContext;
use crate::config::SettingsStore;
use crate::error::{Error, Result};
use crate::registry::RegistryStore;

/// Name of the application directory under the user's home directory.
pub const APP_DIR_NAME: &str = ".mocopro";

/// Environment variable that relocates the application directory.
pub const APP_DIR_ENV: &str = "MOCOPRO_HOME";

/// Unified application context for dependency injection.
///
/// Holds the resolved paths every operation works against. The CLI creates
/// this once per process and hands it to [`crate::commands::ServerManager`].
#[derive(Debug, Clone)]
pub struct AppContext {
    home_dir: PathBuf,
    project_root: PathBuf,
    state_dir: PathBuf,
}

impl AppContext {
    /// Create a new context with explicit paths.
    pub fn new(home_dir: PathBuf, project_root: PathBuf, state_dir: PathBuf) -> Self {
        Self {
            home_dir,
            project_root,
            state_dir,
        }
    }

    /// Create a context from the user's environment.
    ///
    /// The state directory is `$MOCOPRO_HOME` when set, otherwise
    /// `~/.mocopro`. The project root is the current working directory.
    pub fn with_defaults() -> Result<Self> {
        let home_dir = dirs::home_dir().ok_or(Error::NoHomeDir)?;
        let project_root = std::env::current_dir()
            .map_err(|e| Error::io("Failed to read current directory", e))?;
        let state_dir = match std::env::var(APP_DIR_ENV) {
            Ok(val) if !val.trim().is_empty() => PathBuf::from(val.trim()),
            _ => home_dir.join(APP_DIR_NAME),
        };
        Ok(Self::new(home_dir, project_root, state_dir))
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Path of the persisted server registry.
    pub fn registry_path(&self) -> PathBuf {
        self.state_dir.join("registry.json")
    }

    /// Path of the user settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.state_dir.join("config.toml")
    }

    /// Directory holding every cloned server repository.
    pub fn repos_dir(&self) -> PathBuf {
        self.state_dir.join("repos")
    }

    /// Checkout location for one repository: `repos/{owner}_{repository}`.
    pub fn repository_path(&self, owner: &str, repository: &str) -> PathBuf {
        self.repos_dir().join(format!("{}_{}", owner, repository))
    }

    /// Get a RegistryStore bound to this context's registry file.
    pub fn registry_store(&self) -> RegistryStore {
        RegistryStore::new(self.registry_path())
    }

    /// Get a SettingsStore bound to this context's settings file.
    pub fn settings_store(&self) -> SettingsStore {
        SettingsStore::new(self.settings_path())
    }

    /// Get a ClientContext for integration calls.
    pub fn client_context(&self) -> ClientContext {
        ClientContext::new(self.home_dir.clone(), self.project_root.clone())
    }
}
