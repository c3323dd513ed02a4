//! Receiver trait for consuming messages (competing consumers).

use super::error::BusError;
use super::message::Message;

/// Trait for consuming from a named queue.
///
/// Each message is delivered to exactly one receiver. Listener containers
/// drive this in a loop while they are running.
pub trait Receiver: Send + Sync {
    /// Take the next message from `queue`, blocking until one is available
    /// or the timeout expires.
    fn receive(&self, queue: &str, timeout_ms: u64) -> Result<Option<Message>, BusError>;
}
