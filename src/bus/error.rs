//! Error type for broker operations.

use thiserror::Error;

/// Error returned by the broker-facing capabilities.
#[derive(Debug, Error)]
pub enum BusError {
    /// Connection to the broker failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    /// The broker rejected the operation
    #[error("rejected by broker: {0}")]
    Rejected(String),
    /// The queue already exists
    #[error("queue already exists: {0}")]
    QueueExists(String),
    /// An internal lock was poisoned
    #[error("broker lock poisoned during {0}")]
    LockPoisoned(&'static str),
}
