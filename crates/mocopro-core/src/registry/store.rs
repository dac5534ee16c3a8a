//! Registry persistence.
//!
//! Every operation is a full load/modify/save cycle against the registry
//! file. There is no in-memory cache and no file locking: two mocopro
//! processes writing the registry at the same time may lose an update.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{Registry, ServerRecord, ServerUpdate};
use crate::error::{Error, Result};

/// Service for registry operations with encapsulated load/modify/save cycle.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    /// Create a store for the registry document at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the registry file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the registry from disk.
    ///
    /// Returns an empty registry if the file doesn't exist or cannot be
    /// parsed.
    pub fn load(&self) -> Result<Registry> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Registry::new()),
            Err(e) => {
                return Err(Error::io(
                    format!("Failed to read registry: {}", self.path.display()),
                    e,
                ));
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(registry) => Ok(registry),
            Err(e) => {
                warn!(
                    "Ignoring unreadable registry {}: {}",
                    self.path.display(),
                    e
                );
                Ok(Registry::new())
            }
        }
    }

    /// Save the whole registry document (tmp + rename).
    pub fn save(&self, registry: &Registry) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|e| {
            Error::io(
                format!("Failed to create registry directory: {}", dir.display()),
                e,
            )
        })?;

        let bytes = serde_json::to_vec_pretty(registry).map_err(|source| Error::Json {
            path: self.path.clone(),
            source,
        })?;

        let tmp_path = dir.join(format!("registry.json.{}.tmp", std::process::id()));
        fs::write(&tmp_path, bytes).map_err(|e| {
            Error::io(
                format!("Failed to write tmp registry: {}", tmp_path.display()),
                e,
            )
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            Error::io(
                format!("Failed to replace registry: {}", self.path.display()),
                e,
            )
        })?;

        debug!("Saved {} server(s) to {}", registry.servers.len(), self.path.display());
        Ok(())
    }

    /// Get a server record. `None` when the server is not installed.
    pub fn get(&self, name: &str) -> Result<Option<ServerRecord>> {
        Ok(self.load()?.get(name).cloned())
    }

    /// Get a server record, failing with [`Error::NotFound`] when absent.
    pub fn require(&self, name: &str) -> Result<ServerRecord> {
        self.get(name)?
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Add a server record.
    ///
    /// Overwrites any record with the same name; callers check
    /// [`RegistryStore::exists`] first when that matters.
    pub fn add(&self, record: ServerRecord) -> Result<()> {
        let mut registry = self.load()?;
        if registry.insert(record).is_some() {
            debug!("Replaced existing registry record");
        }
        self.save(&registry)
    }

    /// Merge `update` into an existing record and return the result.
    pub fn update(&self, name: &str, update: ServerUpdate) -> Result<ServerRecord> {
        let mut registry = self.load()?;
        let record = registry
            .servers
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        record.apply(update);
        let updated = record.clone();
        self.save(&registry)?;
        Ok(updated)
    }

    /// Remove a server record, returning it.
    pub fn remove(&self, name: &str) -> Result<ServerRecord> {
        let mut registry = self.load()?;
        let removed = registry
            .remove(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        self.save(&registry)?;
        Ok(removed)
    }

    /// All records, ordered by name.
    pub fn list(&self) -> Result<Vec<ServerRecord>> {
        Ok(self.load()?.servers.into_values().collect())
    }

    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.load()?.contains(name))
    }
}
