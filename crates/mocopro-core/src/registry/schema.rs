//! Registry document types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::source::{self, RepositoryRef};

/// Environment variables injected into a server's container.
pub type EnvironmentVariables = BTreeMap<String, String>;

/// Root of `registry.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub servers: BTreeMap<String, ServerRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ServerRecord> {
        self.servers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.servers.contains_key(name)
    }

    /// Insert a record, replacing any record with the same name.
    pub fn insert(&mut self, record: ServerRecord) -> Option<ServerRecord> {
        self.servers.insert(record.name.clone(), record)
    }

    pub fn remove(&mut self, name: &str) -> Option<ServerRecord> {
        self.servers.remove(name)
    }
}

/// One installed server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRecord {
    /// Registry key; the repository name
    pub name: String,
    pub owner: String,
    pub repository: String,
    /// Branch or tag the image was built from
    pub branch: String,
    pub image_name: String,
    pub image_tag: String,
    #[serde(default)]
    pub environment_variables: EnvironmentVariables,
    pub installed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServerRecord {
    /// Record for a freshly built repository, tagged with `branch`.
    pub fn new(repo: &RepositoryRef, branch: impl Into<String>) -> Self {
        let branch = branch.into();
        let now = Utc::now();
        Self {
            name: repo.repository.clone(),
            owner: repo.owner.clone(),
            repository: repo.repository.clone(),
            image_name: repo.image_name(),
            image_tag: branch.clone(),
            branch,
            environment_variables: EnvironmentVariables::new(),
            installed_at: now,
            updated_at: now,
        }
    }

    /// `image_name:image_tag`
    pub fn image_reference(&self) -> String {
        source::image_reference(&self.image_name, &self.image_tag)
    }

    pub fn container_name(&self) -> String {
        source::container_name(&self.repository)
    }

    /// Merge a partial update into this record.
    ///
    /// `installed_at` is never touched.
    pub fn apply(&mut self, update: ServerUpdate) {
        if let Some(branch) = update.branch {
            self.branch = branch;
        }
        if let Some(env) = update.environment_variables {
            self.environment_variables = env;
        }
        if let Some(at) = update.updated_at {
            self.updated_at = at;
        }
    }
}

/// Partial set of fields merged into an existing record by
/// [`crate::registry::RegistryStore::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerUpdate {
    pub branch: Option<String>,
    pub environment_variables: Option<EnvironmentVariables>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ServerUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh `updated_at` to the current time.
    pub fn touch(mut self) -> Self {
        self.updated_at = Some(Utc::now());
        self
    }

    pub fn with_environment_variables(mut self, env: EnvironmentVariables) -> Self {
        self.environment_variables = Some(env);
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}
