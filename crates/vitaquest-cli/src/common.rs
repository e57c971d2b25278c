//! Shared helpers for CLI commands.

use std::sync::Arc;

use vitaquest_core::{Config, SqliteStore, StorageContext};

/// Open the SQLite-backed context and hydrate it from disk.
pub async fn open_context() -> Result<StorageContext, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = Arc::new(SqliteStore::open()?);
    let ctx = StorageContext::with_config(store, &config);
    ctx.initialize().await;
    Ok(ctx)
}
