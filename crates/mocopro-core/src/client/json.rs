//! Read/write helpers for client-owned JSON documents.
//!
//! These files belong to other tools. Only the `mcpServers` entry we are
//! asked to touch changes; every other key round-trips as-is.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Key under which MCP clients keep their server table.
pub const MCP_SERVERS_KEY: &str = "mcpServers";

/// Load a JSON object document. A missing file is an empty object.
pub fn load_json_map(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let bytes = std::fs::read(path)
        .map_err(|e| Error::io(format!("Failed to read config file: {}", path.display()), e))?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::InvalidClientConfig {
            path: path.to_path_buf(),
            reason: "expected a JSON object at the root".to_string(),
        }),
    }
}

/// Write a JSON object document, creating parent directories.
pub fn write_json_map(path: &Path, map: &Map<String, Value>) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::io(
                format!("Failed to create config directory: {}", parent.display()),
                e,
            )
        })?;
    }
    let bytes = serde_json::to_vec_pretty(map).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, bytes)
        .map_err(|e| Error::io(format!("Failed to write config file: {}", path.display()), e))
}

/// Borrow the `mcpServers` table, if the document has one.
pub fn mcp_servers<'a>(
    path: &Path,
    root: &'a Map<String, Value>,
) -> Result<Option<&'a Map<String, Value>>> {
    match root.get(MCP_SERVERS_KEY) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(not_an_object(path)),
    }
}

/// Mutably borrow the `mcpServers` table, creating it when absent.
pub fn mcp_servers_mut<'a>(
    path: &Path,
    root: &'a mut Map<String, Value>,
) -> Result<&'a mut Map<String, Value>> {
    let entry = root
        .entry(MCP_SERVERS_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    if entry.is_null() {
        *entry = Value::Object(Map::new());
    }
    match entry {
        Value::Object(map) => Ok(map),
        _ => Err(not_an_object(path)),
    }
}

fn not_an_object(path: &Path) -> Error {
    Error::InvalidClientConfig {
        path: path.to_path_buf(),
        reason: format!("expected '{}' to be a JSON object", MCP_SERVERS_KEY),
    }
}
