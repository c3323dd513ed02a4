//! Listener lifecycle manager.
//!
//! Status queries, idempotent start/stop and bulk start/stop over the
//! configured queues. Every call reads live state from the registry; nothing
//! is cached between calls.
//!
//! Not-found handling is asymmetric:
//!
//! - single-listener operations fail with [`AdminError::ListenerNotFound`]
//! - the all-status query and bulk operations record `NOT_FOUND` inline and
//!   keep going
//!
//! Any error raised by the registry itself aborts the whole call with an
//! [`AdminError::CapabilityFailure`] tagged with the running [`Operation`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::registry::{ListenerHandle, ListenerRegistry, RegistryError};
use super::state::{listener_id_for_queue, BulkOutcome, ListenerState};
use crate::error::{AdminError, ErrorContext, Operation};

/// Status of one listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerStatus {
    pub listener_id: String,
    pub listener_status: ListenerState,
    pub auto_startup: bool,
}

/// Status of every registered listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerStatuses {
    pub listeners: BTreeMap<String, ListenerState>,
    pub total_listeners: usize,
}

/// Result of a single start or stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub listener_id: String,
    pub listener_status: ListenerState,
    /// False when the listener was already in the target state.
    #[serde(skip)]
    pub changed: bool,
}

/// Result of a bulk start or stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOperationResult {
    pub results: BTreeMap<String, BulkOutcome>,
    pub total_processed: usize,
}

impl BulkOperationResult {
    fn from_results(results: BTreeMap<String, BulkOutcome>) -> Self {
        Self {
            total_processed: results.len(),
            results,
        }
    }
}

/// Manages listener run state through an injected registry.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use queue_admin::bus::InMemoryBroker;
/// use queue_admin::listener::{
///     BulkOutcome, InMemoryListenerRegistry, ListenerLifecycleManager, ListenerState,
///     QueueListener,
/// };
///
/// let broker = Arc::new(InMemoryBroker::new());
/// let registry = Arc::new(InMemoryListenerRegistry::new());
/// registry
///     .register("q1Listener", Arc::new(QueueListener::new("q1Listener", "q1", broker)))
///     .unwrap();
///
/// let manager = ListenerLifecycleManager::new(registry, ["q1", "q2"]);
///
/// let started = manager.start("q1Listener").unwrap();
/// assert_eq!(started.listener_status, ListenerState::Running);
///
/// let bulk = manager.start_all().unwrap();
/// assert_eq!(bulk.results["q1Listener"], BulkOutcome::AlreadyRunning);
/// assert_eq!(bulk.results["q2Listener"], BulkOutcome::NotFound);
/// # manager.stop_all().unwrap();
/// ```
pub struct ListenerLifecycleManager {
    registry: Arc<dyn ListenerRegistry>,
    queues: Vec<String>,
}

impl ListenerLifecycleManager {
    /// Create a manager over `registry`. `queues` are the configured queue
    /// names bulk operations iterate.
    pub fn new<I, S>(registry: Arc<dyn ListenerRegistry>, queues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            registry,
            queues: queues.into_iter().map(Into::into).collect(),
        }
    }

    /// Configured queue names.
    pub fn queues(&self) -> &[String] {
        &self.queues
    }

    /// Status of a single listener.
    pub fn status(&self, listener_id: &str) -> Result<ListenerStatus, AdminError> {
        let op = Operation::ListenerStatus;
        let handle = self.lookup(op, listener_id)?;
        let running = handle
            .is_running()
            .map_err(|e| single_failure(op, listener_id, e))?;

        Ok(ListenerStatus {
            listener_id: listener_id.to_string(),
            listener_status: ListenerState::from_running(running),
            auto_startup: handle.auto_startup(),
        })
    }

    /// Status of every listener the registry knows about.
    ///
    /// An id that disappears between enumeration and lookup is reported as
    /// `NOT_FOUND` instead of failing the call.
    pub fn statuses(&self) -> Result<ListenerStatuses, AdminError> {
        let fail = |e: RegistryError| bulk_failure(Operation::ListenerStatus, e);

        let mut listeners = BTreeMap::new();
        for id in self.registry.listener_ids().map_err(fail)? {
            let state = match self.registry.get(&id).map_err(fail)? {
                Some(handle) => ListenerState::from_running(handle.is_running().map_err(fail)?),
                None => ListenerState::NotFound,
            };
            listeners.insert(id, state);
        }

        Ok(ListenerStatuses {
            total_listeners: listeners.len(),
            listeners,
        })
    }

    /// Start a listener. Starting a running listener succeeds without change.
    pub fn start(&self, listener_id: &str) -> Result<Transition, AdminError> {
        let op = Operation::ListenerStart;
        let handle = self.lookup(op, listener_id)?;
        let changed =
            ensure_running(handle.as_ref()).map_err(|e| single_failure(op, listener_id, e))?;

        if changed {
            info!(listener_id, "listener started");
        }
        Ok(Transition {
            listener_id: listener_id.to_string(),
            listener_status: ListenerState::Running,
            changed,
        })
    }

    /// Stop a listener. Stopping a stopped listener succeeds without change.
    pub fn stop(&self, listener_id: &str) -> Result<Transition, AdminError> {
        let op = Operation::ListenerStop;
        let handle = self.lookup(op, listener_id)?;
        let changed =
            ensure_stopped(handle.as_ref()).map_err(|e| single_failure(op, listener_id, e))?;

        if changed {
            info!(listener_id, "listener stopped");
        }
        Ok(Transition {
            listener_id: listener_id.to_string(),
            listener_status: ListenerState::Stopped,
            changed,
        })
    }

    /// Start the listener of every configured queue.
    pub fn start_all(&self) -> Result<BulkOperationResult, AdminError> {
        self.bulk(Operation::BulkStart, |handle| {
            Ok(if ensure_running(handle)? {
                BulkOutcome::Started
            } else {
                BulkOutcome::AlreadyRunning
            })
        })
    }

    /// Stop the listener of every configured queue.
    pub fn stop_all(&self) -> Result<BulkOperationResult, AdminError> {
        self.bulk(Operation::BulkStop, |handle| {
            Ok(if ensure_stopped(handle)? {
                BulkOutcome::Stopped
            } else {
                BulkOutcome::AlreadyStopped
            })
        })
    }

    fn lookup(
        &self,
        op: Operation,
        listener_id: &str,
    ) -> Result<Arc<dyn ListenerHandle>, AdminError> {
        self.registry
            .get(listener_id)
            .map_err(|e| single_failure(op, listener_id, e))?
            .ok_or_else(|| {
                warn!(listener_id, "listener not found");
                AdminError::ListenerNotFound {
                    listener_id: listener_id.to_string(),
                }
            })
    }

    fn bulk<F>(&self, op: Operation, apply: F) -> Result<BulkOperationResult, AdminError>
    where
        F: Fn(&dyn ListenerHandle) -> Result<BulkOutcome, RegistryError>,
    {
        let mut results = BTreeMap::new();
        for queue in &self.queues {
            let listener_id = listener_id_for_queue(queue);
            let outcome = match self.registry.get(&listener_id) {
                Ok(Some(handle)) => apply(handle.as_ref()),
                Ok(None) => Ok(BulkOutcome::NotFound),
                Err(e) => Err(e),
            }
            .map_err(|e| bulk_failure(op, e))?;
            results.insert(listener_id, outcome);
        }

        let result = BulkOperationResult::from_results(results);
        info!(operation = ?op, total = result.total_processed, "bulk operation completed");
        Ok(result)
    }
}

/// Start `handle` unless it is running. Returns whether it was started.
fn ensure_running(handle: &dyn ListenerHandle) -> Result<bool, RegistryError> {
    if handle.is_running()? {
        return Ok(false);
    }
    handle.start()?;
    Ok(true)
}

/// Stop `handle` if it is running. Returns whether it was stopped.
fn ensure_stopped(handle: &dyn ListenerHandle) -> Result<bool, RegistryError> {
    if !handle.is_running()? {
        return Ok(false);
    }
    handle.stop()?;
    Ok(true)
}

fn single_failure(op: Operation, listener_id: &str, err: RegistryError) -> AdminError {
    warn!(listener_id, operation = ?op, error = %err, "listener registry failure");
    let mut context = ErrorContext::new();
    context.insert("listenerId".into(), Value::from(listener_id));
    AdminError::capability(op, err, context)
}

fn bulk_failure(op: Operation, err: RegistryError) -> AdminError {
    warn!(operation = ?op, error = %err, "listener registry failure");
    AdminError::capability(op, err, ErrorContext::new())
}
