//! mocopro core library
//!
//! Domain logic for installing MCP servers from GitHub repositories as
//! container images, running them with podman or docker, and wiring them
//! into MCP client configuration.

pub mod client;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod git;
pub mod image;
pub mod registry;
pub mod runtime;
pub mod source;

pub use error::{Error, Result};

/// Re-exports of commonly used types
pub mod prelude {
    // Paths and settings
    pub use crate::config::{RuntimePreference, Settings, SettingsStore};
    pub use crate::context::AppContext;

    // Commands
    pub use crate::commands::{ServerListEntry, ServerManager, ServerState};

    // Registry
    pub use crate::registry::{EnvironmentVariables, RegistryStore, ServerRecord, ServerUpdate};

    // Collaborators
    pub use crate::client::{ClientIntegration, ClientKind, McpServerConfig, SetupScope};
    pub use crate::git::GitClient;
    pub use crate::runtime::{ContainerRuntime, ContainerStatus, RuntimeKind};
    pub use crate::source::RepositoryRef;

    pub use crate::error::{Error, Result};
}
