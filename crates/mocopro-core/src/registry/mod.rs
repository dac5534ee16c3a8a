//! Registry of installed MCP servers.
//!
//! The registry is the single source of truth for what is installed. It is a
//! single JSON document (`{"servers": {...}}`) that every mutation reloads,
//! modifies and writes back whole.

pub mod schema;
pub mod store;

pub use schema::{EnvironmentVariables, Registry, ServerRecord, ServerUpdate};
pub use store::RegistryStore;
