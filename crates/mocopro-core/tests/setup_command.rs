//! Integration tests for setup add/remove against the Claude CLI config

mod support;

use serde_json::{Value, json};

use mocopro_core::client::{ClientKind, SetupScope};
use mocopro_core::error::Error;

use support::Harness;

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).expect("read config")).expect("parse config")
}

#[test]
fn setup_add_remove_lifecycle() {
    let h = Harness::new();

    let err = h
        .manager
        .setup_add(ClientKind::ClaudeCode, SetupScope::Local, "weather-mcp")
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    h.install("acme/weather-mcp");
    let report = h
        .manager
        .setup_add(ClientKind::ClaudeCode, SetupScope::Local, "weather-mcp")
        .expect("setup add");
    assert_eq!(report.config_path, h.ctx.project_root().join(".mcp.json"));
    assert_eq!(report.client, "Claude CLI");

    let config = read_json(&report.config_path);
    assert_eq!(
        config["mcpServers"]["weather-mcp"],
        json!({
            "type": "stdio",
            "command": "podman",
            "args": ["run", "--rm", "-i", "mocopro/acme-weather-mcp:main"]
        })
    );

    let err = h
        .manager
        .setup_add(ClientKind::ClaudeCode, SetupScope::Local, "weather-mcp")
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyConfigured { .. }));
    assert_eq!(
        err.to_string(),
        "Server \"weather-mcp\" is already configured in Claude CLI (local scope)."
    );

    h.manager
        .setup_remove(ClientKind::ClaudeCode, SetupScope::Local, "weather-mcp")
        .expect("setup remove");
    let config = read_json(&report.config_path);
    assert!(config["mcpServers"].get("weather-mcp").is_none());

    let err = h
        .manager
        .setup_remove(ClientKind::ClaudeCode, SetupScope::Local, "weather-mcp")
        .unwrap_err();
    assert!(matches!(err, Error::NotConfigured { .. }));
}

#[test]
fn global_scope_writes_home_config_and_keeps_other_keys() {
    let h = Harness::new();
    h.install("acme/weather-mcp");
    h.manager
        .env_set("weather-mcp", &["TOKEN=abc"])
        .unwrap();

    let global = h.ctx.home_dir().join(".claude.json");
    std::fs::write(
        &global,
        r#"{"theme": "dark", "mcpServers": {"existing": {"command": "npx", "args": []}}}"#,
    )
    .unwrap();

    h.manager
        .setup_add(ClientKind::ClaudeCode, SetupScope::Global, "weather-mcp")
        .expect("setup add");

    let config = read_json(&global);
    assert_eq!(config["theme"], json!("dark"));
    assert_eq!(
        config["mcpServers"]["existing"],
        json!({"command": "npx", "args": []})
    );
    let entry = &config["mcpServers"]["weather-mcp"];
    assert_eq!(
        entry["args"],
        json!([
            "run",
            "--rm",
            "-i",
            "-e",
            "TOKEN=abc",
            "mocopro/acme-weather-mcp:main"
        ])
    );
    assert_eq!(entry["env"], json!({"TOKEN": "abc"}));
    assert!(!h.ctx.project_root().join(".mcp.json").exists());
}

#[test]
fn scopes_are_independent() {
    let h = Harness::new();
    h.install("acme/weather-mcp");

    h.manager
        .setup_add(ClientKind::ClaudeCode, SetupScope::Global, "weather-mcp")
        .unwrap();
    h.manager
        .setup_add(ClientKind::ClaudeCode, SetupScope::Local, "weather-mcp")
        .expect("local scope is separate");

    h.manager
        .setup_remove(ClientKind::ClaudeCode, SetupScope::Global, "weather-mcp")
        .unwrap();
    let local = read_json(&h.ctx.project_root().join(".mcp.json"));
    assert!(local["mcpServers"].get("weather-mcp").is_some());
}

#[test]
fn remove_works_after_uninstall() {
    let h = Harness::new();
    h.install("acme/weather-mcp");
    h.manager
        .setup_add(ClientKind::ClaudeCode, SetupScope::Local, "weather-mcp")
        .unwrap();
    h.manager.uninstall("weather-mcp").unwrap();

    h.manager
        .setup_remove(ClientKind::ClaudeCode, SetupScope::Local, "weather-mcp")
        .expect("remove stale entry");
}

#[test]
fn invalid_client_config_is_not_overwritten() {
    let h = Harness::new();
    h.install("acme/weather-mcp");
    let local = h.ctx.project_root().join(".mcp.json");
    std::fs::write(&local, "{ not json").unwrap();

    let err = h
        .manager
        .setup_add(ClientKind::ClaudeCode, SetupScope::Local, "weather-mcp")
        .unwrap_err();
    assert!(matches!(err, Error::Json { .. }));
    assert_eq!(std::fs::read_to_string(&local).unwrap(), "{ not json");
}
