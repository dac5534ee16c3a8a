//! `smithery.yaml` manifests and the Dockerfile synthesized from them.
//!
//! Only `startCommand.commandFunction` is read. It holds a JavaScript arrow
//! function source string; the command and argument list are pulled out of
//! it with two regexes rather than by evaluating anything.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// File name of the manifest inside a repository.
pub const MANIFEST_FILE_NAME: &str = "smithery.yaml";

const DEFAULT_COMMAND: &str = "node";
const DEFAULT_ARGS: &str = "'dist/index.js'";

static COMMAND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"command:\s*['"]([^'"]+)['"]"#).expect("command pattern is valid")
});

static ARGS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"args:\s*\[([^\]]+)\]").expect("args pattern is valid"));

/// Parsed `smithery.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmitheryManifest {
    pub start_command: StartCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartCommand {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub command_function: String,
}

/// Command line the synthesized image runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub command: String,
    pub args: Vec<String>,
}

impl SmitheryManifest {
    /// Parse manifest YAML.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Read `smithery.yaml` from a repository checkout.
    ///
    /// Returns `None` when the file is missing, unreadable or not a valid
    /// manifest.
    pub fn read(repository_path: &Path) -> Option<Self> {
        let path = repository_path.join(MANIFEST_FILE_NAME);
        let content = std::fs::read_to_string(&path).ok()?;
        match Self::from_yaml_str(&content) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                debug!("Ignoring invalid manifest {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Command and args extracted from `commandFunction`, with defaults for
    /// anything that can't be found.
    pub fn launch_command(&self) -> LaunchCommand {
        parse_command_function(&self.start_command.command_function)
    }

    /// Dockerfile contents for a Node based server.
    pub fn to_dockerfile(&self) -> String {
        generate_dockerfile(&self.launch_command())
    }
}

fn parse_command_function(source: &str) -> LaunchCommand {
    let command = COMMAND_PATTERN
        .captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or_else(|| {
            debug!("No command in commandFunction, using {}", DEFAULT_COMMAND);
            DEFAULT_COMMAND
        });
    let args = ARGS_PATTERN
        .captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(DEFAULT_ARGS);

    let args = args
        .split(',')
        .map(|arg| arg.trim().replace(['\'', '"'], ""))
        .filter(|arg| !arg.is_empty())
        .collect();

    LaunchCommand {
        command: command.to_string(),
        args,
    }
}

/// Render the Dockerfile template for `launch`.
pub fn generate_dockerfile(launch: &LaunchCommand) -> String {
    let cmd = std::iter::once(&launch.command)
        .chain(launch.args.iter())
        .map(|part| format!("\"{}\"", part))
        .collect::<Vec<_>>()
        .join(", ");

    [
        "FROM node:20-alpine",
        "",
        "WORKDIR /app",
        "",
        "COPY package*.json ./",
        "RUN npm ci --only=production",
        "",
        "COPY . .",
        "",
        "RUN npm run build 2>/dev/null || true",
        "",
        format!("CMD [{}]", cmd).as_str(),
    ]
    .join("\n")
}
