//! Wiring installed servers into MCP client configuration.

use std::path::PathBuf;

use tracing::info;

use super::ServerManager;
use crate::client::{ClientKind, SetupScope};
use crate::error::{Error, Result};

/// Report from a setup add/remove operation
#[derive(Debug, Clone)]
pub struct SetupReport {
    pub name: String,
    /// Display name of the client
    pub client: &'static str,
    pub scope: SetupScope,
    /// Client configuration file that was edited
    pub config_path: PathBuf,
}

impl ServerManager {
    /// Add an installed server to a client's configuration.
    pub fn setup_add(&self, client: ClientKind, scope: SetupScope, name: &str) -> Result<SetupReport> {
        let record = self.registry().require(name)?;
        let integration = client.integration(&self.ctx.client_context());

        if integration.has_server(scope, name)? {
            return Err(Error::AlreadyConfigured {
                name: name.to_string(),
                client: integration.name(),
                scope: scope.to_string(),
            });
        }

        let runtime = self.runtime()?;
        let config = integration.build_server_config(
            runtime.kind(),
            &record.image_name,
            &record.image_tag,
            &record.environment_variables,
        );
        integration.add_server(scope, name, &config)?;

        let config_path = integration.config_path(scope);
        info!("Configured {} in {}", name, config_path.display());
        Ok(SetupReport {
            name: name.to_string(),
            client: integration.name(),
            scope,
            config_path,
        })
    }

    /// Remove a server from a client's configuration.
    ///
    /// Works for servers that are no longer installed.
    pub fn setup_remove(
        &self,
        client: ClientKind,
        scope: SetupScope,
        name: &str,
    ) -> Result<SetupReport> {
        let integration = client.integration(&self.ctx.client_context());
        if !integration.remove_server(scope, name)? {
            return Err(Error::NotConfigured {
                name: name.to_string(),
                client: integration.name(),
                scope: scope.to_string(),
            });
        }

        Ok(SetupReport {
            name: name.to_string(),
            client: integration.name(),
            scope,
            config_path: integration.config_path(scope),
        })
    }
}
