//! Listener registry capability.
//!
//! The registry is owned by the transport layer and outlives every request.
//! The lifecycle manager only reads and mutates it through these traits,
//! and receives it explicitly at construction.

use std::sync::Arc;

use thiserror::Error;

/// Error raised by a registry or one of its listener containers.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry itself could not be reached
    #[error("listener registry unavailable: {0}")]
    Unavailable(String),
    /// A container failed to change state
    #[error("listener {listener_id} failed: {reason}")]
    ContainerFailed { listener_id: String, reason: String },
    /// A listener id was registered twice
    #[error("listener already registered: {0}")]
    AlreadyRegistered(String),
    /// The consuming thread could not be spawned
    #[error("failed to spawn listener thread: {0}")]
    Spawn(#[from] std::io::Error),
    /// An internal lock was poisoned
    #[error("registry lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

/// Control surface of a single listener container.
///
/// Implementations must make `start` on a running container and `stop` on a
/// stopped one harmless no-ops: the manager checks state first, but the state
/// may change between that check and the call.
pub trait ListenerHandle: Send + Sync {
    /// Whether the container is currently consuming.
    fn is_running(&self) -> Result<bool, RegistryError>;

    /// Start consuming.
    fn start(&self) -> Result<(), RegistryError>;

    /// Stop consuming.
    fn stop(&self) -> Result<(), RegistryError>;

    /// Whether the container starts with the process.
    fn auto_startup(&self) -> bool;
}

/// Enumerates and looks up listener containers by id.
pub trait ListenerRegistry: Send + Sync {
    /// Every registered listener id.
    fn listener_ids(&self) -> Result<Vec<String>, RegistryError>;

    /// The container registered under `id`, if any.
    fn get(&self, id: &str) -> Result<Option<Arc<dyn ListenerHandle>>, RegistryError>;
}

impl<T: ListenerRegistry + ?Sized> ListenerRegistry for Arc<T> {
    fn listener_ids(&self) -> Result<Vec<String>, RegistryError> {
        (**self).listener_ids()
    }

    fn get(&self, id: &str) -> Result<Option<Arc<dyn ListenerHandle>>, RegistryError> {
        (**self).get(id)
    }
}
