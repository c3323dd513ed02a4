//! Browser trait for non-destructive queue inspection.

use super::error::BusError;
use super::message::Message;

/// Trait for browsing the current contents of a queue.
///
/// Browsing must never consume, acknowledge or reorder messages: two
/// consecutive browses with no intervening send or receive return the
/// same sequence.
pub trait Browser: Send + Sync {
    /// Return every message currently enqueued at `destination`, oldest first.
    ///
    /// An unknown or empty queue yields an empty vector.
    fn browse(&self, destination: &str) -> Result<Vec<Message>, BusError>;
}
