//! Admin API facade.
//!
//! One method per admin operation, each returning a [`ResponseEnvelope`].
//! Transports (HTTP, CLI, tests) call these and only have to render the
//! envelope.

use crate::envelope::ResponseEnvelope;
use crate::gateway::{BrowseResult, MessageGateway, SendReceipt};
use crate::listener::{
    BulkOperationResult, ListenerLifecycleManager, ListenerStatus, ListenerStatuses, Transition,
};

/// Listener control plus message gateway behind one handle.
pub struct QueueAdmin {
    manager: ListenerLifecycleManager,
    gateway: MessageGateway,
}

impl QueueAdmin {
    pub fn new(manager: ListenerLifecycleManager, gateway: MessageGateway) -> Self {
        Self { manager, gateway }
    }

    pub fn manager(&self) -> &ListenerLifecycleManager {
        &self.manager
    }

    pub fn gateway(&self) -> &MessageGateway {
        &self.gateway
    }

    /// `GET /listeners/status`
    pub fn listener_statuses(&self) -> ResponseEnvelope<ListenerStatuses> {
        ResponseEnvelope::from_result(self.manager.statuses(), |_| {
            "Listener statuses retrieved successfully"
        })
    }

    /// `GET /listeners/status/{id}`
    pub fn listener_status(&self, listener_id: &str) -> ResponseEnvelope<ListenerStatus> {
        ResponseEnvelope::from_result(self.manager.status(listener_id), |_| {
            "Listener status retrieved successfully"
        })
    }

    /// `POST /listeners/start/{id}`
    pub fn start_listener(&self, listener_id: &str) -> ResponseEnvelope<Transition> {
        ResponseEnvelope::from_result(self.manager.start(listener_id), |t| {
            if t.changed {
                "Listener started successfully"
            } else {
                "Listener is already running"
            }
        })
    }

    /// `POST /listeners/stop/{id}`
    pub fn stop_listener(&self, listener_id: &str) -> ResponseEnvelope<Transition> {
        ResponseEnvelope::from_result(self.manager.stop(listener_id), |t| {
            if t.changed {
                "Listener stopped successfully"
            } else {
                "Listener is already stopped"
            }
        })
    }

    /// `POST /listeners/start/all`
    pub fn start_all_listeners(&self) -> ResponseEnvelope<BulkOperationResult> {
        ResponseEnvelope::from_result(self.manager.start_all(), |_| {
            "Bulk start operation completed"
        })
    }

    /// `POST /listeners/stop/all`
    pub fn stop_all_listeners(&self) -> ResponseEnvelope<BulkOperationResult> {
        ResponseEnvelope::from_result(self.manager.stop_all(), |_| "Bulk stop operation completed")
    }

    /// `POST /queues/send/{rawQueueName}?message=..&targetClient=..`
    pub fn send_message(
        &self,
        raw_queue: &str,
        message: &str,
        target_client: Option<&str>,
    ) -> ResponseEnvelope<SendReceipt> {
        ResponseEnvelope::from_result(self.gateway.send(raw_queue, message, target_client), |_| {
            "Message sent successfully"
        })
    }

    /// `GET /queues/browse/{rawDestination}?targetClient=..`
    pub fn browse_queue(
        &self,
        raw_destination: &str,
        target_client: Option<&str>,
    ) -> ResponseEnvelope<BrowseResult> {
        ResponseEnvelope::from_result(self.gateway.browse(raw_destination, target_client), |_| {
            "Queue browsed successfully"
        })
    }
}
