pub mod kv;
pub mod snapshot;
pub mod write_queue;

pub use kv::{keys, KeyValueStore, MemoryStore, SqliteStore};
pub use snapshot::Snapshot;
pub use write_queue::WriteQueue;

use std::path::PathBuf;

/// Returns `~/.config/vitaquest[-dev]/` based on VITAQUEST_ENV.
///
/// Set VITAQUEST_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("VITAQUEST_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("vitaquest-dev")
    } else {
        base_dir.join("vitaquest")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
