//! Client adapter layer.
//!
//! An MCP client (currently only the Claude CLI) keeps its server table in
//! a JSON file it owns. [`ClientIntegration`] describes how to find that
//! file for a [`SetupScope`] and how to add or remove one named entry in
//! it. Supported clients form the closed set [`ClientKind`].

mod claude_code;
pub mod json;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use claude_code::ClaudeCodeClient;

use crate::error::Result;
use crate::registry::EnvironmentVariables;
use crate::runtime::RuntimeKind;

/// Which configuration file a setup command edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetupScope {
    /// Project file in the current working directory
    #[default]
    Local,
    /// User-wide file in the home directory
    Global,
}

impl SetupScope {
    pub fn from_global_flag(global: bool) -> Self {
        if global {
            SetupScope::Global
        } else {
            SetupScope::Local
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SetupScope::Local => "local",
            SetupScope::Global => "global",
        }
    }
}

impl fmt::Display for SetupScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paths client integrations resolve their files against.
#[derive(Debug, Clone)]
pub struct ClientContext {
    pub home_dir: PathBuf,
    pub project_root: PathBuf,
}

impl ClientContext {
    pub fn new(home_dir: PathBuf, project_root: PathBuf) -> Self {
        Self {
            home_dir,
            project_root,
        }
    }
}

/// Supported MCP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientKind {
    ClaudeCode,
}

impl ClientKind {
    /// Integration for this client bound to `ctx`.
    pub fn integration(self, ctx: &ClientContext) -> Box<dyn ClientIntegration> {
        match self {
            ClientKind::ClaudeCode => Box::new(ClaudeCodeClient::new(ctx.clone())),
        }
    }
}

/// One entry of a client's `mcpServers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerConfig {
    #[serde(rename = "type")]
    pub transport: String,
    pub command: String,
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<EnvironmentVariables>,
}

/// Operations on one MCP client's configuration.
pub trait ClientIntegration {
    /// Display name of the client.
    fn name(&self) -> &'static str;

    /// Configuration file edited for `scope`.
    fn config_path(&self, scope: SetupScope) -> PathBuf;

    /// Server entry that launches `image_name:image_tag` through `runtime`.
    fn build_server_config(
        &self,
        runtime: RuntimeKind,
        image_name: &str,
        image_tag: &str,
        env: &EnvironmentVariables,
    ) -> McpServerConfig;

    fn has_server(&self, scope: SetupScope, name: &str) -> Result<bool>;

    /// Insert or replace the entry for `name`.
    fn add_server(&self, scope: SetupScope, name: &str, config: &McpServerConfig) -> Result<()>;

    /// Remove the entry for `name`. Returns false when there was none.
    fn remove_server(&self, scope: SetupScope, name: &str) -> Result<bool>;
}
