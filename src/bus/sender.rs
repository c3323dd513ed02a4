//! Sender trait for point-to-point messaging.

use super::error::BusError;
use super::message::Message;

/// Trait for sending messages to a named destination.
///
/// The destination is the routed name: a canonical queue name, optionally
/// followed by a `?key=value` routing qualifier that the broker interprets.
pub trait Sender: Send + Sync {
    /// Send a message to a destination.
    fn send(&self, destination: &str, message: Message) -> Result<(), BusError>;
}
