pub mod config;
pub mod database;
pub mod migrations;
mod store;

pub use config::Config;
pub use database::Database;
pub use store::{MemoryStore, SessionStore};

use std::path::PathBuf;

use crate::error::DatabaseError;

/// Returns `~/.config/focusjuju[-dev]/` based on FOCUSJUJU_ENV.
///
/// Set FOCUSJUJU_ENV=dev to use the development data directory.
pub fn data_dir() -> Result<PathBuf, DatabaseError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSJUJU_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusjuju-dev")
    } else {
        base_dir.join("focusjuju")
    };

    std::fs::create_dir_all(&dir).map_err(DatabaseError::DataDir)?;
    Ok(dir)
}
