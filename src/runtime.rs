//! Process wiring for a single-node deployment on the in-memory broker.
//!
//! Creates the configured queues, registers one [`QueueListener`] per queue
//! under `<queue>Listener`, starts the auto-startup ones and builds the
//! [`QueueAdmin`] facade over them.

use std::sync::Arc;

use tracing::{error, info};

use crate::api::QueueAdmin;
use crate::bus::{BusError, InMemoryBroker};
use crate::config::AdminConfig;
use crate::gateway::MessageGateway;
use crate::listener::{
    listener_id_for_queue, InMemoryListenerRegistry, ListenerLifecycleManager, QueueListener,
    RegistryError,
};

/// Create every configured queue. Existing queues are tolerated and other
/// failures are logged; neither aborts startup. Returns how many were created.
pub fn initialize_queues(broker: &InMemoryBroker, queues: &[String]) -> usize {
    let mut created = 0;
    for queue in queues {
        match broker.create_queue(queue) {
            Ok(()) => {
                info!(queue = %queue, "created queue");
                created += 1;
            }
            Err(BusError::QueueExists(_)) => info!(queue = %queue, "queue already exists"),
            Err(e) => error!(queue = %queue, error = %e, "failed to create queue"),
        }
    }
    created
}

/// A wired admin instance with its broker and listener registry.
pub struct Runtime {
    pub admin: Arc<QueueAdmin>,
    pub broker: Arc<InMemoryBroker>,
    pub registry: Arc<InMemoryListenerRegistry>,
}

impl Runtime {
    /// Wire everything on a fresh in-memory broker.
    pub fn in_memory(config: &AdminConfig) -> Result<Self, RegistryError> {
        Self::with_broker(config, Arc::new(InMemoryBroker::new()))
    }

    /// Wire everything on an existing broker.
    pub fn with_broker(
        config: &AdminConfig,
        broker: Arc<InMemoryBroker>,
    ) -> Result<Self, RegistryError> {
        initialize_queues(&broker, &config.queues);

        let registry = Arc::new(InMemoryListenerRegistry::new());
        for queue in &config.queues {
            let id = listener_id_for_queue(queue);
            // Duplicate queue names map to one listener.
            if registry.contains(&id)? {
                continue;
            }
            let listener = QueueListener::new(id.clone(), queue.clone(), broker.clone())
                .poll_interval(config.listener.poll_interval())
                .with_auto_startup(config.listener.auto_startup);
            registry.register(id, Arc::new(listener))?;
        }
        registry.start_auto_startup()?;

        let manager = ListenerLifecycleManager::new(registry.clone(), config.queues.clone());
        let gateway = MessageGateway::from_transport(broker.clone());

        Ok(Self {
            admin: Arc::new(QueueAdmin::new(manager, gateway)),
            broker,
            registry,
        })
    }

    /// Stop every listener container.
    pub fn shutdown(&self) -> Result<(), RegistryError> {
        info!("stopping listener containers");
        self.registry.stop_all()
    }
}
