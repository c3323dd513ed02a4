//! Listener lifecycle.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  ListenerLifecycleManager    │  status / start / stop / start_all / stop_all
//! └──────────────────────────────┘
//!                │ ListenerRegistry (injected)
//!                ▼
//! ┌──────────────────────────────┐
//! │  InMemoryListenerRegistry    │  id -> Arc<dyn ListenerHandle>
//! └──────────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────┐
//! │  QueueListener (per queue)   │  background thread over bus::Receiver
//! └──────────────────────────────┘
//! ```
//!
//! Listener ids follow the `<queue>Listener` convention, derived in one
//! place by [`listener_id_for_queue`].

mod container;
mod in_memory;
mod manager;
mod registry;
mod state;

pub use container::{HandlerError, ListenerStats, MessageHandler, QueueListener};
pub use in_memory::InMemoryListenerRegistry;
pub use manager::{
    BulkOperationResult, ListenerLifecycleManager, ListenerStatus, ListenerStatuses, Transition,
};
pub use registry::{ListenerHandle, ListenerRegistry, RegistryError};
pub use state::{listener_id_for_queue, BulkOutcome, ListenerState, LISTENER_SUFFIX};
