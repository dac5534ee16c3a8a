//! Error types shared by every mocopro operation.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for mocopro.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid repository format: \"{0}\". Expected \"owner/repository\" or a GitHub URL.")]
    InvalidRepository(String),

    #[error("Invalid format: \"{pair}\". {reason}")]
    InvalidEnvPair { pair: String, reason: &'static str },

    #[error("Server \"{0}\" is already installed. Use \"mocopro update {0}\" to update it.")]
    AlreadyInstalled(String),

    #[error("Server \"{0}\" is not installed.")]
    NotFound(String),

    #[error("Server \"{0}\" is already running.")]
    AlreadyRunning(String),

    #[error("Server \"{0}\" is not running.")]
    NotRunning(String),

    #[error("Server \"{name}\" is already configured in {client} ({scope} scope).")]
    AlreadyConfigured {
        name: String,
        client: &'static str,
        scope: String,
    },

    #[error("Server \"{name}\" is not configured in {client} ({scope} scope).")]
    NotConfigured {
        name: String,
        client: &'static str,
        scope: String,
    },

    #[error("No container runtime found. Please install Podman or Docker.")]
    NoRuntimeFound,

    #[error("No Dockerfile or smithery.yaml found in repository at {}", .0.display())]
    NoBuildContext(PathBuf),

    #[error("Image build failed with exit code {}", exit_code_label(.0))]
    BuildFailed(Option<i32>),

    #[error("Image removal failed with exit code {}", exit_code_label(.0))]
    ImageRemovalFailed(Option<i32>),

    #[error("{program} {action} failed with exit code {}", exit_code_label(.code))]
    CommandFailed {
        program: String,
        action: String,
        code: Option<i32>,
    },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {action} failed: {stderr}")]
    Git { action: String, stderr: String },

    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid client configuration {}: {reason}", .path.display())]
    InvalidClientConfig { path: PathBuf, reason: String },

    #[error("Invalid settings file {}: {source}", .path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    SettingsSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Wrap an I/O error with a short description of what was being attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

fn exit_code_label(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "unknown (terminated by signal)".to_string())
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;
