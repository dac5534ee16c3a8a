//! User settings for mocopro.
//!
//! Settings live in `config.toml` inside the application directory. A
//! missing file means every setting takes its default.

pub mod schema;
pub mod store;

pub use schema::{RuntimePreference, Settings};
pub use store::SettingsStore;
