//! Thread-backed listener container.
//!
//! A `QueueListener` consumes one queue on a background thread while it is
//! running. `start` spawns the thread, `stop` signals it and waits for it to
//! exit. Both are no-ops when the container is already in the target state.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::registry::{ListenerHandle, RegistryError};
use crate::bus::{Message, Receiver};

/// Error returned by a message handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Callback invoked for every consumed message.
pub type MessageHandler = Arc<dyn Fn(&Message) -> Result<(), HandlerError> + Send + Sync>;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Processing statistics, accumulated across start/stop cycles.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListenerStats {
    /// Messages successfully handled.
    pub handled: usize,
    /// Messages whose handler returned an error.
    pub failed: usize,
    /// Receive cycles completed.
    pub polls: usize,
}

#[derive(Default)]
struct Counters {
    handled: AtomicUsize,
    failed: AtomicUsize,
    polls: AtomicUsize,
}

/// The consuming thread of a running container.
struct Worker {
    stop_tx: mpsc::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    fn is_alive(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal stop and wait for the thread. `false` if the thread panicked.
    fn shutdown(mut self) -> bool {
        let _ = self.stop_tx.send(());
        match self.handle.take() {
            Some(handle) => handle.join().is_ok(),
            None => true,
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}

/// Listener container consuming a single queue.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use queue_admin::bus::InMemoryBroker;
/// use queue_admin::listener::{ListenerHandle, QueueListener};
///
/// let broker = Arc::new(InMemoryBroker::new());
/// let listener = QueueListener::new("ordersListener", "orders", broker)
///     .poll_interval(Duration::from_millis(10));
///
/// listener.start().unwrap();
/// assert!(listener.is_running().unwrap());
/// listener.stop().unwrap();
/// assert!(!listener.is_running().unwrap());
/// ```
pub struct QueueListener {
    id: String,
    queue: String,
    receiver: Arc<dyn Receiver>,
    handler: MessageHandler,
    poll_interval: Duration,
    auto_startup: bool,
    counters: Arc<Counters>,
    worker: Mutex<Option<Worker>>,
}

impl QueueListener {
    /// Create a stopped container for `queue`. Messages are logged and
    /// dropped until a handler is set with [`QueueListener::with_handler`].
    pub fn new(
        id: impl Into<String>,
        queue: impl Into<String>,
        receiver: Arc<dyn Receiver>,
    ) -> Self {
        let id = id.into();
        let queue = queue.into();
        Self {
            handler: log_handler(id.clone(), queue.clone()),
            id,
            queue,
            receiver,
            poll_interval: DEFAULT_POLL_INTERVAL,
            auto_startup: true,
            counters: Arc::new(Counters::default()),
            worker: Mutex::new(None),
        }
    }

    /// Replace the message handler.
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Message) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.handler = Arc::new(handler);
        self
    }

    /// How long each receive blocks before checking for a stop signal.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Whether the container should be started with the process.
    pub fn with_auto_startup(mut self, auto_startup: bool) -> Self {
        self.auto_startup = auto_startup;
        self
    }

    /// Listener id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Queue consumed by this container.
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Snapshot of the processing statistics.
    pub fn stats(&self) -> ListenerStats {
        ListenerStats {
            handled: self.counters.handled.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            polls: self.counters.polls.load(Ordering::Relaxed),
        }
    }

    fn spawn_worker(&self) -> Result<Worker, RegistryError> {
        let (stop_tx, stop_rx) = mpsc::channel();
        let queue = self.queue.clone();
        let id = self.id.clone();
        let receiver = Arc::clone(&self.receiver);
        let handler = Arc::clone(&self.handler);
        let counters = Arc::clone(&self.counters);
        let poll_interval = self.poll_interval;

        let handle = std::thread::Builder::new()
            .name(format!("listener-{}", self.id))
            .spawn(move || loop {
                match stop_rx.try_recv() {
                    Ok(()) | Err(TryRecvError::Disconnected) => break,
                    Err(TryRecvError::Empty) => {}
                }

                counters.polls.fetch_add(1, Ordering::Relaxed);

                match receiver.receive(&queue, poll_interval.as_millis() as u64) {
                    Ok(Some(message)) => match handler(&message) {
                        Ok(()) => {
                            counters.handled.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => {
                            counters.failed.fetch_add(1, Ordering::Relaxed);
                            warn!(listener_id = %id, message_id = %message.id, error = %e, "message handler failed");
                        }
                    },
                    Ok(None) => {}
                    Err(e) => {
                        warn!(listener_id = %id, queue = %queue, error = %e, "receive failed");
                        std::thread::sleep(poll_interval);
                    }
                }
            })?;

        Ok(Worker {
            stop_tx,
            handle: Some(handle),
        })
    }
}

impl ListenerHandle for QueueListener {
    fn is_running(&self) -> Result<bool, RegistryError> {
        let worker = self
            .worker
            .lock()
            .map_err(|_| RegistryError::LockPoisoned("is_running"))?;
        Ok(worker.as_ref().is_some_and(Worker::is_alive))
    }

    fn start(&self) -> Result<(), RegistryError> {
        let mut worker = self
            .worker
            .lock()
            .map_err(|_| RegistryError::LockPoisoned("start"))?;

        if worker.as_ref().is_some_and(Worker::is_alive) {
            debug!(listener_id = %self.id, "start ignored, already running");
            return Ok(());
        }

        // A thread that died on its own is reaped before restarting.
        if let Some(dead) = worker.take() {
            if !dead.shutdown() {
                warn!(listener_id = %self.id, "previous listener thread panicked");
            }
        }

        *worker = Some(self.spawn_worker()?);
        info!(listener_id = %self.id, queue = %self.queue, "listener container started");
        Ok(())
    }

    fn stop(&self) -> Result<(), RegistryError> {
        let mut worker = self
            .worker
            .lock()
            .map_err(|_| RegistryError::LockPoisoned("stop"))?;

        let Some(running) = worker.take() else {
            debug!(listener_id = %self.id, "stop ignored, already stopped");
            return Ok(());
        };

        if !running.shutdown() {
            return Err(RegistryError::ContainerFailed {
                listener_id: self.id.clone(),
                reason: "listener thread panicked".into(),
            });
        }
        info!(listener_id = %self.id, queue = %self.queue, "listener container stopped");
        Ok(())
    }

    fn auto_startup(&self) -> bool {
        self.auto_startup
    }
}

fn log_handler(id: String, queue: String) -> MessageHandler {
    Arc::new(move |message: &Message| -> Result<(), HandlerError> {
        match message.text_payload() {
            Some(text) => info!(listener_id = %id, queue = %queue, payload = text, "received message"),
            None => info!(listener_id = %id, queue = %queue, message_id = %message.id, "received non-text message"),
        }
        Ok(())
    })
}
