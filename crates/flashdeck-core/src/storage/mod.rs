mod config;
pub mod database;
pub mod memory;
pub mod migrations;
pub mod repository;

pub use config::{Config, DisplayConfig, SessionConfig, StorageConfig};
pub use database::SqliteStore;
pub use memory::MemoryStore;
pub use repository::Repository;

use std::path::PathBuf;

use crate::error::{Result, StoreError};

/// Document key holding the JSON array of decks.
pub const DECKS_KEY: &str = "decks";
/// Document key holding the JSON array of rating events.
pub const RATING_HISTORY_KEY: &str = "ratingHistory";
/// Document key holding the aggregate rating counters.
pub const AGGREGATE_STATS_KEY: &str = "aggregateStats";

/// String-keyed storage of whole JSON documents.
///
/// Reading a key that was never written yields `None`. Writes replace the
/// entire value; there are no partial updates. Multi-document writes go
/// through [`KeyValueStore::set_many`].
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Write several keys as one unit.
    ///
    /// Stores that can roll back override this so that either every entry
    /// lands or none does. The default writes them in order.
    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// Returns the flashdeck data directory, creating it if needed.
///
/// `FLASHDECK_HOME` wins when set. Otherwise `~/.config/flashdeck/`, or
/// `~/.config/flashdeck-dev/` when `FLASHDECK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("FLASHDECK_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FLASHDECK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("flashdeck-dev")
            } else {
                base_dir.join("flashdeck")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StoreError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
