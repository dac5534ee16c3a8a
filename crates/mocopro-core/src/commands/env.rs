//! Per-server environment variables.

use tracing::warn;

use super::ServerManager;
use crate::error::{Error, Result};
use crate::registry::{EnvironmentVariables, ServerUpdate};

#[derive(Debug, Clone)]
pub struct EnvSetReport {
    pub name: String,
    /// Keys written, in argument order
    pub keys: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EnvUnsetReport {
    pub name: String,
    pub removed: Vec<String>,
    /// Keys that were not set
    pub missing: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EnvListReport {
    pub name: String,
    pub variables: EnvironmentVariables,
}

/// Split `KEY=VALUE` at the first `=`. The value may be empty, the key may
/// not.
pub fn parse_env_pair(pair: &str) -> Result<(String, String)> {
    let (key, value) = pair.split_once('=').ok_or_else(|| Error::InvalidEnvPair {
        pair: pair.to_string(),
        reason: "Expected KEY=value.",
    })?;
    if key.is_empty() {
        return Err(Error::InvalidEnvPair {
            pair: pair.to_string(),
            reason: "Key cannot be empty.",
        });
    }
    Ok((key.to_string(), value.to_string()))
}

impl ServerManager {
    /// Merge `pairs` into the server's environment.
    ///
    /// Every pair is validated before anything is written.
    pub fn env_set<S: AsRef<str>>(&self, name: &str, pairs: &[S]) -> Result<EnvSetReport> {
        let registry = self.registry();
        let record = registry.require(name)?;

        let parsed = pairs
            .iter()
            .map(|pair| parse_env_pair(pair.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let mut variables = record.environment_variables;
        let mut keys = Vec::with_capacity(parsed.len());
        for (key, value) in parsed {
            if !keys.contains(&key) {
                keys.push(key.clone());
            }
            variables.insert(key, value);
        }

        registry.update(
            name,
            ServerUpdate::new()
                .with_environment_variables(variables)
                .touch(),
        )?;
        Ok(EnvSetReport {
            name: name.to_string(),
            keys,
        })
    }

    /// Remove `keys` from the server's environment. Unknown keys are
    /// reported, not rejected.
    pub fn env_unset<S: AsRef<str>>(&self, name: &str, keys: &[S]) -> Result<EnvUnsetReport> {
        let registry = self.registry();
        let record = registry.require(name)?;

        let mut variables = record.environment_variables;
        let mut removed = Vec::new();
        let mut missing = Vec::new();
        for key in keys {
            let key = key.as_ref();
            if variables.remove(key).is_some() {
                removed.push(key.to_string());
            } else {
                warn!("Environment variable \"{}\" is not set for {}", key, name);
                missing.push(key.to_string());
            }
        }

        registry.update(
            name,
            ServerUpdate::new()
                .with_environment_variables(variables)
                .touch(),
        )?;
        Ok(EnvUnsetReport {
            name: name.to_string(),
            removed,
            missing,
        })
    }

    pub fn env_list(&self, name: &str) -> Result<EnvListReport> {
        let record = self.registry().require(name)?;
        Ok(EnvListReport {
            name: record.name,
            variables: record.environment_variables,
        })
    }
}
