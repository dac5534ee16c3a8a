//! Start, stop and list.

use std::fmt;

use serde::Serialize;
use tracing::info;

use super::ServerManager;
use crate::error::{Error, Result};
use crate::registry::ServerRecord;
use crate::runtime::{ContainerStatus, StartRequest};

/// Lifecycle state of an installed server.
///
/// A server without a registry record is simply not installed; there is no
/// variant for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerState {
    Stopped,
    Running,
}

impl ServerState {
    pub fn from_status(status: &ContainerStatus) -> Self {
        if status.running {
            ServerState::Running
        } else {
            ServerState::Stopped
        }
    }

    pub fn is_running(self) -> bool {
        self == ServerState::Running
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerState::Stopped => f.write_str("stopped"),
            ServerState::Running => f.write_str("running"),
        }
    }
}

/// One row of `list`.
#[derive(Debug, Clone, Serialize)]
pub struct ServerListEntry {
    #[serde(flatten)]
    pub record: ServerRecord,
    pub state: ServerState,
}

#[derive(Debug, Clone)]
pub struct StartReport {
    pub name: String,
    pub image: String,
    pub detached: bool,
}

#[derive(Debug, Clone)]
pub struct StopReport {
    pub name: String,
}

impl ServerManager {
    /// Start a server's container.
    ///
    /// `detach` falls back to the `default_detach` setting when `None`.
    pub fn start(&self, name: &str, detach: Option<bool>) -> Result<StartReport> {
        let record = self.registry().require(name)?;
        let runtime = self.runtime()?;
        if runtime.status(&record.repository)?.running {
            return Err(Error::AlreadyRunning(name.to_string()));
        }

        let detach = detach.unwrap_or(self.settings.default_detach);
        info!(
            "Starting {} in {} mode",
            name,
            if detach { "detached" } else { "foreground" }
        );
        runtime.start(&StartRequest {
            image_name: &record.image_name,
            image_tag: &record.image_tag,
            repository: &record.repository,
            detach,
            env: &record.environment_variables,
        })?;

        Ok(StartReport {
            name: record.name.clone(),
            image: record.image_reference(),
            detached: detach,
        })
    }

    pub fn stop(&self, name: &str) -> Result<StopReport> {
        let record = self.registry().require(name)?;
        let runtime = self.runtime()?;
        if !runtime.status(&record.repository)?.running {
            return Err(Error::NotRunning(name.to_string()));
        }

        runtime.stop(&record.repository)?;
        Ok(StopReport { name: record.name })
    }

    /// Every installed server with its live state, ordered by name.
    pub fn list(&self) -> Result<Vec<ServerListEntry>> {
        let records = self.registry().list()?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let runtime = self.runtime()?;
        records
            .into_iter()
            .map(|record| -> Result<ServerListEntry> {
                let status = runtime.status(&record.repository)?;
                Ok(ServerListEntry {
                    state: ServerState::from_status(&status),
                    record,
                })
            })
            .collect()
    }
}
