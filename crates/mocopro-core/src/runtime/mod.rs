//! Container runtime adapter.
//!
//! mocopro drives exactly one external container tool per process, podman
//! or docker. The choice is made once by [`detect_runtime`] and carried
//! around as a [`RuntimeKind`] value; nothing is cached globally.
//!
//! ## Design
//!
//! - [`ContainerRuntime`] is the seam the lifecycle commands talk to
//! - [`CliRuntime`] implements it by spawning the runtime binary
//! - Containers are addressed by the deterministic name from
//!   [`crate::source::container_name`]

mod cli;

use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use cli::CliRuntime;

use crate::config::RuntimePreference;
use crate::error::{Error, Result};
use crate::registry::EnvironmentVariables;

/// Supported container runtimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    Podman,
    Docker,
}

impl RuntimeKind {
    /// Executable name of the runtime.
    pub fn binary(self) -> &'static str {
        match self {
            RuntimeKind::Podman => "podman",
            RuntimeKind::Docker => "docker",
        }
    }
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

/// Live state of a server's container. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerStatus {
    pub running: bool,
    /// Present when a container with the deterministic name exists
    pub container_id: Option<String>,
    pub container_name: String,
}

impl ContainerStatus {
    /// Status for a container that does not exist.
    pub fn absent(container_name: impl Into<String>) -> Self {
        Self {
            running: false,
            container_id: None,
            container_name: container_name.into(),
        }
    }

    pub fn exists(&self) -> bool {
        self.container_id.is_some()
    }
}

/// Everything needed to launch a server container.
#[derive(Debug, Clone)]
pub struct StartRequest<'a> {
    pub image_name: &'a str,
    pub image_tag: &'a str,
    pub repository: &'a str,
    pub detach: bool,
    pub env: &'a EnvironmentVariables,
}

/// Operations mocopro needs from a container runtime.
pub trait ContainerRuntime {
    /// Which runtime this is.
    fn kind(&self) -> RuntimeKind;

    /// Query the container for `repository`, including stopped containers.
    fn status(&self, repository: &str) -> Result<ContainerStatus>;

    /// Launch a fresh container, replacing any existing one with the same
    /// name.
    ///
    /// Detached runs succeed only on exit code 0. Foreground runs hand the
    /// terminal to the container and succeed once it exits.
    fn start(&self, request: &StartRequest<'_>) -> Result<()>;

    /// Stop the running container for `repository`.
    fn stop(&self, repository: &str) -> Result<()>;

    /// Force-remove the container for `repository`. A missing container is
    /// not an error.
    fn remove(&self, repository: &str) -> Result<()>;

    /// Build `image_ref` from the build context at `context`.
    fn build_image(&self, context: &Path, image_ref: &str) -> Result<()>;

    /// Remove `image_ref`.
    fn remove_image(&self, image_ref: &str) -> Result<()>;

    /// Whether `image_ref` exists locally.
    fn image_exists(&self, image_ref: &str) -> bool;
}

/// Detect the runtime to use by probing `<binary> --version`.
///
/// With [`RuntimePreference::Auto`] podman is tried before docker.
pub fn detect_runtime(preference: RuntimePreference) -> Result<RuntimeKind> {
    detect_runtime_with(preference, probe_version)
}

/// Like [`detect_runtime`] with a custom availability probe.
pub fn detect_runtime_with(
    preference: RuntimePreference,
    probe: impl Fn(RuntimeKind) -> bool,
) -> Result<RuntimeKind> {
    let candidates: &[RuntimeKind] = match preference {
        RuntimePreference::Auto => &[RuntimeKind::Podman, RuntimeKind::Docker],
        RuntimePreference::Podman => &[RuntimeKind::Podman],
        RuntimePreference::Docker => &[RuntimeKind::Docker],
    };

    candidates
        .iter()
        .copied()
        .find(|kind| probe(*kind))
        .ok_or(Error::NoRuntimeFound)
}

fn probe_version(kind: RuntimeKind) -> bool {
    let available = Command::new(kind.binary())
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false);
    debug!("Probed {}: available={}", kind, available);
    available
}
