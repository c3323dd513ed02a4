//! Message gateway: send to and browse arbitrary queues.
//!
//! Both operations resolve the raw destination first (see
//! [`crate::destination`]) and reject one that names no queue before the
//! transport is touched. Browse goes through [`Browser`], which never
//! consumes, so browsing twice without an intervening send returns the same
//! messages.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use queue_admin::bus::InMemoryBroker;
//! use queue_admin::gateway::MessageGateway;
//!
//! let gateway = MessageGateway::from_transport(Arc::new(InMemoryBroker::new()));
//!
//! let receipt = gateway.send("queue://orders", "hello", None).unwrap();
//! assert_eq!(receipt.queue, "orders");
//!
//! let browsed = gateway.browse("queue://orders", None).unwrap();
//! assert_eq!(browsed.queue_name, "orders?targetClient=1");
//! assert_eq!(browsed.messages, vec!["hello"]);
//! ```

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::bus::{Browser, BusError, Message, Sender};
use crate::destination::{self, Destination};
use crate::error::{AdminError, ErrorContext, Operation};

/// Outcome of a successful send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    /// Routed name the message was sent to (canonical name plus qualifier).
    pub queue: String,
    pub raw_queue: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_client: Option<String>,
    #[serde(skip)]
    pub destination: Destination,
}

/// Outcome of a successful browse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResult {
    /// Routed name that was browsed (canonical name plus qualifier).
    pub queue_name: String,
    pub raw_destination: String,
    /// Rendered messages, oldest first.
    pub messages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_client: Option<String>,
    #[serde(skip)]
    pub destination: Destination,
}

/// Sends and browses through injected transport capabilities.
pub struct MessageGateway {
    sender: Arc<dyn Sender>,
    browser: Arc<dyn Browser>,
}

impl MessageGateway {
    /// Create a gateway from separate send and browse capabilities.
    pub fn new(sender: Arc<dyn Sender>, browser: Arc<dyn Browser>) -> Self {
        Self { sender, browser }
    }

    /// Create a gateway from one transport that can both send and browse.
    pub fn from_transport<T>(transport: Arc<T>) -> Self
    where
        T: Sender + Browser + 'static,
    {
        Self {
            sender: transport.clone(),
            browser: transport,
        }
    }

    /// Send a text message to `raw_queue`.
    ///
    /// Only an explicit `target_client` of `"1"` adds the routing qualifier;
    /// a `queue://` scheme does not.
    pub fn send(
        &self,
        raw_queue: &str,
        message: &str,
        target_client: Option<&str>,
    ) -> Result<SendReceipt, AdminError> {
        let destination = destination::for_send(raw_queue, target_client);
        if destination.is_empty() {
            warn!(raw_queue, "send rejected, destination names no queue");
            return Err(invalid_queue_name("rawQueue", raw_queue, target_client));
        }

        let queue = destination.routed_name();
        self.sender
            .send(&queue, Message::text(message))
            .map_err(|e| {
                let mut context = ErrorContext::new();
                context.insert("rawQueue".into(), Value::from(raw_queue));
                context.insert("queue".into(), Value::from(queue.as_str()));
                capability_failure(Operation::MessageSend, e, context, target_client)
            })?;

        info!(queue = %queue, raw_queue, "message sent");
        Ok(SendReceipt {
            queue,
            raw_queue: raw_queue.to_string(),
            message: message.to_string(),
            target_client: target_client.map(str::to_string),
            destination,
        })
    }

    /// Browse the current contents of `raw_destination` without consuming.
    ///
    /// A `queue://` scheme on the raw input always adds the routing
    /// qualifier; otherwise an explicit `target_client` of `"1"` does.
    /// An empty queue is a successful, empty result.
    pub fn browse(
        &self,
        raw_destination: &str,
        target_client: Option<&str>,
    ) -> Result<BrowseResult, AdminError> {
        let destination = destination::for_browse(raw_destination, target_client);
        if destination.is_empty() {
            warn!(raw_destination, "browse rejected, destination names no queue");
            return Err(invalid_queue_name(
                "rawDestination",
                raw_destination,
                target_client,
            ));
        }

        let queue_name = destination.routed_name();
        debug!(queue = %queue_name, "browsing queue");
        let messages = self
            .browser
            .browse(&queue_name)
            .map_err(|e| {
                let mut context = ErrorContext::new();
                context.insert("queueName".into(), Value::from(queue_name.as_str()));
                context.insert("rawDestination".into(), Value::from(raw_destination));
                capability_failure(Operation::QueueBrowse, e, context, target_client)
            })?
            .iter()
            .map(render_message)
            .collect();

        Ok(BrowseResult {
            queue_name,
            raw_destination: raw_destination.to_string(),
            messages,
            target_client: target_client.map(str::to_string),
            destination,
        })
    }
}

/// Text payload of a message, or a placeholder naming its id.
pub fn render_message(message: &Message) -> String {
    match message.text_payload() {
        Some(text) => text.to_string(),
        None => format!("Non-text message: {}", message.id),
    }
}

fn invalid_queue_name(field: &str, raw: &str, target_client: Option<&str>) -> AdminError {
    let mut context = ErrorContext::new();
    context.insert(field.into(), Value::from(raw));
    if let Some(target_client) = target_client {
        context.insert("targetClient".into(), Value::from(target_client));
    }
    AdminError::InvalidQueueName { context }
}

fn capability_failure(
    op: Operation,
    err: BusError,
    mut context: ErrorContext,
    target_client: Option<&str>,
) -> AdminError {
    warn!(operation = ?op, error = %err, "transport failure");
    if let Some(target_client) = target_client {
        context.insert("targetClient".into(), Value::from(target_client));
    }
    AdminError::capability(op, err, context)
}
