//! Administrative control plane for message-queue listeners.
//!
//! Two pieces of core logic sit behind one facade ([`QueueAdmin`]):
//!
//! - [`listener::ListenerLifecycleManager`]: status, idempotent start/stop
//!   and bulk start/stop of listener containers through an injected
//!   [`listener::ListenerRegistry`].
//! - [`gateway::MessageGateway`]: send to and non-destructively browse any
//!   queue, addressed by plain name, `/name` or `queue://name` (see
//!   [`destination`]).
//!
//! Every operation answers with a [`ResponseEnvelope`]. The HTTP transport
//! (`http` feature) is a thin axum layer over the facade.

pub mod api;
pub mod bus;
pub mod config;
pub mod destination;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod listener;
pub mod runtime;

#[cfg(feature = "http")]
pub mod http;

pub use api::QueueAdmin;
pub use config::{AdminConfig, ConfigError};
pub use destination::{Destination, RoutingQualifier};
pub use envelope::{ErrorBody, ResponseEnvelope, SuccessBody};
pub use error::{AdminError, CapabilityError, ErrorContext, Operation};
pub use gateway::{BrowseResult, MessageGateway, SendReceipt};
