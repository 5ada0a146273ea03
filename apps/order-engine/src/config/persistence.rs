//! Order store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::infrastructure::persistence::SqliteSettings;

/// SQLite persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Database URL, e.g. `sqlite://./data/orders.db` or `sqlite::memory:`.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long a statement waits on a locked database, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// How long to wait for a pooled connection, in milliseconds.
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            busy_timeout_ms: default_busy_timeout_ms(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
        }
    }
}

impl PersistenceConfig {
    /// Settings for [`crate::infrastructure::persistence::SqliteOrderStore::connect`].
    #[must_use]
    pub fn sqlite_settings(&self) -> SqliteSettings {
        SqliteSettings {
            database_url: self.database_url.clone(),
            max_connections: self.max_connections,
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
            acquire_timeout: Duration::from_millis(self.acquire_timeout_ms),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://./data/orders.db".to_string()
}

const fn default_max_connections() -> u32 {
    8
}

const fn default_busy_timeout_ms() -> u64 {
    5000
}

const fn default_acquire_timeout_ms() -> u64 {
    5000
}
