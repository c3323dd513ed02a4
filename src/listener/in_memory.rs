//! In-memory listener registry.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use super::registry::{ListenerHandle, ListenerRegistry, RegistryError};

/// Process-wide registry of listener containers keyed by id.
///
/// Ids enumerate in sorted order.
#[derive(Default)]
pub struct InMemoryListenerRegistry {
    listeners: RwLock<BTreeMap<String, Arc<dyn ListenerHandle>>>,
}

impl InMemoryListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a container under `id`.
    pub fn register(
        &self,
        id: impl Into<String>,
        handle: Arc<dyn ListenerHandle>,
    ) -> Result<(), RegistryError> {
        let id = id.into();
        let mut listeners = self
            .listeners
            .write()
            .map_err(|_| RegistryError::LockPoisoned("register"))?;
        if listeners.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        listeners.insert(id, handle);
        Ok(())
    }

    /// Remove the container registered under `id`, returning it.
    pub fn deregister(&self, id: &str) -> Result<Option<Arc<dyn ListenerHandle>>, RegistryError> {
        let mut listeners = self
            .listeners
            .write()
            .map_err(|_| RegistryError::LockPoisoned("deregister"))?;
        Ok(listeners.remove(id))
    }

    /// Start every container flagged for auto-startup. Returns how many were started.
    ///
    /// A container that fails to start is logged and skipped.
    pub fn start_auto_startup(&self) -> Result<usize, RegistryError> {
        let mut started = 0;
        for (id, handle) in self.snapshot()? {
            if !handle.auto_startup() {
                continue;
            }
            match handle.start() {
                Ok(()) => started += 1,
                Err(e) => warn!(listener_id = %id, error = %e, "auto-startup failed"),
            }
        }
        info!(started, "auto-startup complete");
        Ok(started)
    }

    /// Stop every container, e.g. on shutdown. Failures are logged and skipped.
    pub fn stop_all(&self) -> Result<(), RegistryError> {
        for (id, handle) in self.snapshot()? {
            if let Err(e) = handle.stop() {
                warn!(listener_id = %id, error = %e, "failed to stop listener");
            }
        }
        Ok(())
    }

    /// Whether a container is registered under `id`.
    pub fn contains(&self, id: &str) -> Result<bool, RegistryError> {
        Ok(self
            .listeners
            .read()
            .map_err(|_| RegistryError::LockPoisoned("contains"))?
            .contains_key(id))
    }

    /// Number of registered containers.
    pub fn len(&self) -> Result<usize, RegistryError> {
        Ok(self
            .listeners
            .read()
            .map_err(|_| RegistryError::LockPoisoned("len"))?
            .len())
    }

    /// Whether no containers are registered.
    pub fn is_empty(&self) -> Result<bool, RegistryError> {
        Ok(self.len()? == 0)
    }

    // Containers are started/stopped outside the lock so a slow stop never
    // blocks lookups.
    fn snapshot(&self) -> Result<Vec<(String, Arc<dyn ListenerHandle>)>, RegistryError> {
        let listeners = self
            .listeners
            .read()
            .map_err(|_| RegistryError::LockPoisoned("snapshot"))?;
        Ok(listeners
            .iter()
            .map(|(id, handle)| (id.clone(), Arc::clone(handle)))
            .collect())
    }
}

impl ListenerRegistry for InMemoryListenerRegistry {
    fn listener_ids(&self) -> Result<Vec<String>, RegistryError> {
        let listeners = self
            .listeners
            .read()
            .map_err(|_| RegistryError::LockPoisoned("listener_ids"))?;
        Ok(listeners.keys().cloned().collect())
    }

    fn get(&self, id: &str) -> Result<Option<Arc<dyn ListenerHandle>>, RegistryError> {
        let listeners = self
            .listeners
            .read()
            .map_err(|_| RegistryError::LockPoisoned("get"))?;
        Ok(listeners.get(id).cloned())
    }
}
