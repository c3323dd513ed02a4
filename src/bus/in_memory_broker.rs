//! In-memory broker for testing and single-process deployments.
//!
//! Implements `Sender`, `Browser` and `Receiver` over a map of named FIFO
//! queues. A routed destination such as `orders?targetClient=1` addresses the
//! physical queue `orders`; the qualifier pairs are recorded as message
//! headers so consumers can see which delivery path was requested.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

use super::{Browser, BusError, Message, Receiver, Sender};

/// In-memory broker.
///
/// Features:
/// - Thread-safe (clones share the same queues)
/// - Queues are auto-created on first send
/// - Browsing clones the queue contents and never consumes
/// - Receiving pops from the front (competing consumers)
///
/// ## Example
///
/// ```
/// use queue_admin::bus::{Browser, InMemoryBroker, Message, Receiver, Sender};
///
/// let broker = InMemoryBroker::new();
/// broker.send("orders", Message::text("order-1")).unwrap();
///
/// // Browsing leaves the message in place
/// assert_eq!(broker.browse("orders").unwrap().len(), 1);
/// assert_eq!(broker.browse("orders").unwrap().len(), 1);
///
/// // Receiving consumes it
/// let message = broker.receive("orders", 10).unwrap().unwrap();
/// assert_eq!(message.text_payload(), Some("order-1"));
/// assert!(broker.browse("orders").unwrap().is_empty());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryBroker {
    queues: Arc<RwLock<BTreeMap<String, VecDeque<Message>>>>,
}

impl InMemoryBroker {
    /// Create an empty broker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue. Fails with `BusError::QueueExists` if it is already there.
    pub fn create_queue(&self, name: &str) -> Result<(), BusError> {
        let mut queues = self
            .queues
            .write()
            .map_err(|_| BusError::LockPoisoned("create queue"))?;
        if queues.contains_key(name) {
            return Err(BusError::QueueExists(name.to_string()));
        }
        queues.insert(name.to_string(), VecDeque::new());
        Ok(())
    }

    /// Names of all known queues, sorted.
    pub fn queue_names(&self) -> Result<Vec<String>, BusError> {
        let queues = self
            .queues
            .read()
            .map_err(|_| BusError::LockPoisoned("list queues"))?;
        Ok(queues.keys().cloned().collect())
    }

    /// Number of messages currently on a queue (0 for unknown queues).
    pub fn depth(&self, queue: &str) -> Result<usize, BusError> {
        let queues = self
            .queues
            .read()
            .map_err(|_| BusError::LockPoisoned("queue depth"))?;
        Ok(queues.get(physical_queue(queue)).map_or(0, VecDeque::len))
    }

    /// Drop every queue and message (useful for test cleanup).
    pub fn clear(&self) -> Result<(), BusError> {
        self.queues
            .write()
            .map_err(|_| BusError::LockPoisoned("clear"))?
            .clear();
        Ok(())
    }
}

impl Sender for InMemoryBroker {
    fn send(&self, destination: &str, message: Message) -> Result<(), BusError> {
        let queue = physical_queue(destination);
        if queue.is_empty() {
            return Err(BusError::Rejected(format!(
                "destination {destination:?} names no queue"
            )));
        }

        let message = qualifier_pairs(destination)
            .fold(message, |message, (key, value)| message.with_header(key, value));

        let mut queues = self
            .queues
            .write()
            .map_err(|_| BusError::LockPoisoned("send"))?;
        debug!(queue, message_id = %message.id, "enqueue");
        queues.entry(queue.to_string()).or_default().push_back(message);
        Ok(())
    }
}

impl Browser for InMemoryBroker {
    fn browse(&self, destination: &str) -> Result<Vec<Message>, BusError> {
        let queues = self
            .queues
            .read()
            .map_err(|_| BusError::LockPoisoned("browse"))?;
        Ok(queues
            .get(physical_queue(destination))
            .map(|messages| messages.iter().cloned().collect())
            .unwrap_or_default())
    }
}

impl Receiver for InMemoryBroker {
    fn receive(&self, queue: &str, timeout_ms: u64) -> Result<Option<Message>, BusError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        let queue = physical_queue(queue);

        loop {
            {
                let mut queues = self
                    .queues
                    .write()
                    .map_err(|_| BusError::LockPoisoned("receive"))?;
                if let Some(message) = queues.get_mut(queue).and_then(VecDeque::pop_front) {
                    return Ok(Some(message));
                }
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }

            // Small sleep to avoid busy-waiting
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}

/// The queue a routed destination refers to: everything before the first `?`.
fn physical_queue(destination: &str) -> &str {
    destination
        .split_once('?')
        .map_or(destination, |(queue, _)| queue)
}

/// `key=value` pairs of the routing qualifier, if any.
fn qualifier_pairs(destination: &str) -> impl Iterator<Item = (&str, &str)> {
    destination
        .split_once('?')
        .map(|(_, query)| query)
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
}
