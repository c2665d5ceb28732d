mod config;
pub mod database;
mod memory;

pub use config::{Config, DisplayConfig, NotificationsConfig, PlansConfig, TimerConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::DatabaseError;

/// String-keyed slot storage.
///
/// Each call is all-or-nothing. Values are opaque text; callers decide
/// the encoding of each slot.
pub trait KvStore {
    /// Get a value, `None` when the slot is absent.
    fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError>;

    /// Create or overwrite a slot.
    fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError>;

    /// Delete a slot. Removing an absent slot is not an error.
    fn kv_remove(&self, key: &str) -> Result<(), DatabaseError>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        (**self).kv_get(key)
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        (**self).kv_set(key, value)
    }

    fn kv_remove(&self, key: &str) -> Result<(), DatabaseError> {
        (**self).kv_remove(key)
    }
}

/// Returns the data directory, creating it if needed.
///
/// Resolution order:
/// 1. `FASTWINDOW_DATA_DIR` if set
/// 2. `~/.config/fastwindow-dev/` when `FASTWINDOW_ENV=dev`
/// 3. `~/.config/fastwindow/`
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, DatabaseError> {
    let dir = match std::env::var_os("FASTWINDOW_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("FASTWINDOW_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("fastwindow-dev")
            } else {
                base_dir.join("fastwindow")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| DatabaseError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
