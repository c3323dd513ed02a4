//! Listener states and bulk outcomes.

use serde::{Deserialize, Serialize};

/// Suffix appended to a queue name to form its listener id.
pub const LISTENER_SUFFIX: &str = "Listener";

/// Derive the listener id for a configured queue (`orders` -> `ordersListener`).
///
/// Bulk operations and single-listener lookups share this one rule.
pub fn listener_id_for_queue(queue: &str) -> String {
    format!("{queue}{LISTENER_SUFFIX}")
}

/// Live state of a listener, as reported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListenerState {
    Running,
    Stopped,
    NotFound,
}

impl ListenerState {
    /// `Running` or `Stopped` from a container's running flag.
    pub fn from_running(running: bool) -> Self {
        if running {
            ListenerState::Running
        } else {
            ListenerState::Stopped
        }
    }
}

/// Per-listener outcome of a bulk start or stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulkOutcome {
    Started,
    AlreadyRunning,
    Stopped,
    AlreadyStopped,
    NotFound,
}
