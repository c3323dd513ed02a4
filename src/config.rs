//! Configuration.
//!
//! Loaded from a TOML file, every field defaulted:
//!
//! ```toml
//! queues = ["queue1", "queue2"]
//!
//! [server]
//! bind = "0.0.0.0"
//! port = 8080
//!
//! [listener]
//! poll_interval_ms = 100
//! auto_startup = true
//! ```
//!
//! The binary lets `--queues` / `QUEUE_ADMIN_QUEUES` (comma-separated)
//! override the queue list via [`AdminConfig::apply_queue_list`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// HTTP listener address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

/// Listener container settings shared by every configured queue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    pub poll_interval_ms: u64,
    pub auto_startup: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            auto_startup: true,
        }
    }
}

impl ListenerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Configured queue names; bulk operations act on `<queue>Listener`.
    pub queues: Vec<String>,
    pub server: ServerConfig,
    pub listener: ListenerConfig,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            queues: (1..=4).map(|n| format!("queue{n}")).collect(),
            server: ServerConfig::default(),
            listener: ListenerConfig::default(),
        }
    }
}

impl AdminConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.queues = normalize_queues(config.queues.iter().map(String::as_str));
        debug!(path = %path.display(), queues = ?config.queues, "loaded config");
        Ok(config)
    }

    /// Replace the queue list from a comma-separated string.
    pub fn apply_queue_list(&mut self, list: &str) {
        self.queues = normalize_queues(list.split(','));
    }
}

/// Trim entries and drop empty ones.
fn normalize_queues<'a>(queues: impl Iterator<Item = &'a str>) -> Vec<String> {
    queues
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .collect()
}
