//! High-level commands for mocopro operations.
//!
//! [`ServerManager`] is the public API the CLI drives. Each operation loads
//! what it needs from the registry, checks the server's state, talks to git
//! or the container runtime, and returns a report describing what happened.

mod env;
mod install;
mod lifecycle;
mod setup;
mod uninstall;

use std::cell::OnceCell;

use tracing::debug;

pub use env::{EnvListReport, EnvSetReport, EnvUnsetReport, parse_env_pair};
pub use install::{InstallReport, UpdateReport};
pub use lifecycle::{ServerListEntry, ServerState, StartReport, StopReport};
pub use setup::SetupReport;
pub use uninstall::UninstallReport;

use crate::config::Settings;
use crate::context::AppContext;
use crate::error::{Error, Result};
use crate::git::{GitClient, GitFetcher};
use crate::registry::RegistryStore;
use crate::runtime::{CliRuntime, ContainerRuntime, detect_runtime};

/// Coordinates the registry, git and the container runtime.
///
/// The container runtime is detected on first use, so commands that never
/// touch containers (`env`) work on machines without podman or docker.
pub struct ServerManager {
    ctx: AppContext,
    settings: Settings,
    git: Box<dyn GitClient>,
    runtime: OnceCell<Box<dyn ContainerRuntime>>,
}

impl ServerManager {
    /// Create a manager with explicit collaborators.
    pub fn new(ctx: AppContext, settings: Settings, git: Box<dyn GitClient>) -> Self {
        Self {
            ctx,
            settings,
            git,
            runtime: OnceCell::new(),
        }
    }

    /// Use `runtime` instead of detecting one.
    pub fn with_runtime(self, runtime: Box<dyn ContainerRuntime>) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(runtime);
        Self {
            runtime: cell,
            ..self
        }
    }

    /// Manager for the current user, reading settings from disk.
    pub fn with_defaults() -> Result<Self> {
        Self::from_context(AppContext::with_defaults()?)
    }

    /// Manager over `ctx`, using the git binary and loading settings.
    pub fn from_context(ctx: AppContext) -> Result<Self> {
        let settings = ctx.settings_store().load()?;
        Ok(Self::new(ctx, settings, Box::new(GitFetcher::new())))
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn registry(&self) -> RegistryStore {
        self.ctx.registry_store()
    }

    fn runtime(&self) -> Result<&dyn ContainerRuntime> {
        if self.runtime.get().is_none() {
            let kind = detect_runtime(self.settings.container_runtime)?;
            debug!("Using container runtime {}", kind);
            let _ = self.runtime.set(Box::new(CliRuntime::new(kind)));
        }
        self.runtime
            .get()
            .map(|runtime| runtime.as_ref())
            .ok_or(Error::NoRuntimeFound)
    }
}
