//! Claude CLI integration.

use std::path::PathBuf;

use tracing::debug;

use super::json::{load_json_map, mcp_servers, mcp_servers_mut, write_json_map};
use super::{ClientContext, ClientIntegration, McpServerConfig, SetupScope};
use crate::error::{Error, Result};
use crate::registry::EnvironmentVariables;
use crate::runtime::RuntimeKind;
use crate::source;

const GLOBAL_CONFIG_FILE: &str = ".claude.json";
const LOCAL_CONFIG_FILE: &str = ".mcp.json";

/// Claude CLI: `~/.claude.json` globally, `./.mcp.json` per project.
#[derive(Debug, Clone)]
pub struct ClaudeCodeClient {
    ctx: ClientContext,
}

impl ClaudeCodeClient {
    pub fn new(ctx: ClientContext) -> Self {
        Self { ctx }
    }
}

impl ClientIntegration for ClaudeCodeClient {
    fn name(&self) -> &'static str {
        "Claude CLI"
    }

    fn config_path(&self, scope: SetupScope) -> PathBuf {
        match scope {
            SetupScope::Global => self.ctx.home_dir.join(GLOBAL_CONFIG_FILE),
            SetupScope::Local => self.ctx.project_root.join(LOCAL_CONFIG_FILE),
        }
    }

    fn build_server_config(
        &self,
        runtime: RuntimeKind,
        image_name: &str,
        image_tag: &str,
        env: &EnvironmentVariables,
    ) -> McpServerConfig {
        let mut args: Vec<String> = ["run", "--rm", "-i"].map(String::from).to_vec();
        for (key, value) in env {
            args.push("-e".to_string());
            args.push(format!("{}={}", key, value));
        }
        args.push(source::image_reference(image_name, image_tag));

        McpServerConfig {
            transport: "stdio".to_string(),
            command: runtime.binary().to_string(),
            args,
            env: (!env.is_empty()).then(|| env.clone()),
        }
    }

    fn has_server(&self, scope: SetupScope, name: &str) -> Result<bool> {
        let path = self.config_path(scope);
        let root = load_json_map(&path)?;
        Ok(mcp_servers(&path, &root)?.is_some_and(|servers| servers.contains_key(name)))
    }

    fn add_server(&self, scope: SetupScope, name: &str, config: &McpServerConfig) -> Result<()> {
        let path = self.config_path(scope);
        let mut root = load_json_map(&path)?;
        let value = serde_json::to_value(config).map_err(|source| Error::Json {
            path: path.clone(),
            source,
        })?;
        mcp_servers_mut(&path, &mut root)?.insert(name.to_string(), value);
        write_json_map(&path, &root)?;
        debug!("Added {} to {}", name, path.display());
        Ok(())
    }

    fn remove_server(&self, scope: SetupScope, name: &str) -> Result<bool> {
        let path = self.config_path(scope);
        let mut root = load_json_map(&path)?;
        let present = mcp_servers(&path, &root)?.is_some_and(|servers| servers.contains_key(name));
        if present {
            mcp_servers_mut(&path, &mut root)?.remove(name);
            write_json_map(&path, &root)?;
            debug!("Removed {} from {}", name, path.display());
        }
        Ok(present)
    }
}
