//! Error taxonomy for admin operations.
//!
//! Three kinds of failure reach the caller:
//!
//! | Kind | Variant | HTTP |
//! |---|---|---|
//! | NotFound | [`AdminError::ListenerNotFound`] | 400 |
//! | InvalidInput | [`AdminError::InvalidQueueName`] | 400 |
//! | CapabilityFailure | [`AdminError::CapabilityFailure`] | 500 |
//!
//! Client errors carry the offending id or raw destination in their context.
//! Capability failures carry the failing [`Operation`], whose error code is
//! stable and machine-readable, plus the upstream error verbatim.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::bus::BusError;
use crate::listener::RegistryError;

/// Structured error context (`errorData` on the wire).
pub type ErrorContext = Map<String, Value>;

/// The admin operation that was running when a capability failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListenerStatus,
    ListenerStart,
    ListenerStop,
    BulkStart,
    BulkStop,
    MessageSend,
    QueueBrowse,
}

impl Operation {
    /// Stable error code for a capability failure during this operation.
    pub fn error_code(&self) -> &'static str {
        match self {
            Operation::ListenerStatus => "LISTENER_STATUS_FAILED",
            Operation::ListenerStart => "LISTENER_START_FAILED",
            Operation::ListenerStop => "LISTENER_STOP_FAILED",
            Operation::BulkStart => "BULK_START_FAILED",
            Operation::BulkStop => "BULK_STOP_FAILED",
            Operation::MessageSend => "MESSAGE_SEND_FAILED",
            Operation::QueueBrowse => "QUEUE_BROWSE_FAILED",
        }
    }

    /// Human-readable failure message for this operation.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::ListenerStatus => "Failed to get listener status",
            Operation::ListenerStart => "Failed to start listener",
            Operation::ListenerStop => "Failed to stop listener",
            Operation::BulkStart => "Failed to start all listeners",
            Operation::BulkStop => "Failed to stop all listeners",
            Operation::MessageSend => "Failed to send message",
            Operation::QueueBrowse => "Failed to browse queue",
        }
    }
}

/// Failure raised by an external capability (registry or transport).
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Bus(#[from] BusError),
}

/// Error returned by the lifecycle manager and the message gateway.
#[derive(Debug, Error)]
pub enum AdminError {
    /// No listener registered under this id.
    #[error("listener not found: {listener_id}")]
    ListenerNotFound { listener_id: String },

    /// The destination resolved to an empty queue name.
    #[error("invalid queue name")]
    InvalidQueueName { context: ErrorContext },

    /// The registry or transport failed underneath an operation.
    #[error("{}: {source}", .operation.failure_message())]
    CapabilityFailure {
        operation: Operation,
        #[source]
        source: CapabilityError,
        context: ErrorContext,
    },
}

impl AdminError {
    /// Wrap a capability error raised during `operation`.
    pub fn capability(
        operation: Operation,
        source: impl Into<CapabilityError>,
        context: ErrorContext,
    ) -> Self {
        AdminError::CapabilityFailure {
            operation,
            source: source.into(),
            context,
        }
    }

    /// HTTP-equivalent status: 400 for client errors, 500 for capability failures.
    pub fn http_status(&self) -> u16 {
        match self {
            AdminError::ListenerNotFound { .. } | AdminError::InvalidQueueName { .. } => 400,
            AdminError::CapabilityFailure { .. } => 500,
        }
    }

    /// Stable machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            AdminError::ListenerNotFound { .. } => "LISTENER_NOT_FOUND",
            AdminError::InvalidQueueName { .. } => "INVALID_QUEUE_NAME",
            AdminError::CapabilityFailure { operation, .. } => operation.error_code(),
        }
    }

    /// Envelope message.
    pub fn message(&self) -> &'static str {
        match self {
            AdminError::ListenerNotFound { .. } => "Listener not found",
            AdminError::InvalidQueueName { .. } => "Invalid queue name",
            AdminError::CapabilityFailure { operation, .. } => operation.failure_message(),
        }
    }

    /// Upstream failure detail (capability failures only).
    pub fn details(&self) -> Option<String> {
        match self {
            AdminError::CapabilityFailure { source, .. } => Some(source.to_string()),
            _ => None,
        }
    }

    /// Structured context; `None` when there is nothing to report.
    pub fn context(&self) -> Option<ErrorContext> {
        let context = match self {
            AdminError::ListenerNotFound { listener_id } => {
                let mut context = ErrorContext::new();
                context.insert("listenerId".into(), Value::from(listener_id.as_str()));
                context
            }
            AdminError::InvalidQueueName { context } => context.clone(),
            AdminError::CapabilityFailure { context, .. } => context.clone(),
        };
        (!context.is_empty()).then_some(context)
    }
}
