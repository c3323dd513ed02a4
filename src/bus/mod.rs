//! Broker-facing capabilities.
//!
//! The admin core never talks to a broker directly. It goes through three
//! narrow traits so any transport can be plugged in:
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │     Sender       │   │     Browser      │   │     Receiver     │
//! │ send(dest, msg)  │   │ browse(dest)     │   │ receive(q, t)    │
//! │ (MessageGateway) │   │ (MessageGateway) │   │ (QueueListener)  │
//! └──────────────────┘   └──────────────────┘   └──────────────────┘
//!          │                      │                      │
//!          └──────────────────────┼──────────────────────┘
//!                                 ▼
//!                  ┌─────────────────────────────┐
//!                  │ InMemoryBroker (included)   │
//!                  │ Artemis / AMQP (external)   │
//!                  └─────────────────────────────┘
//! ```

mod browser;
mod error;
mod in_memory_broker;
mod message;
mod receiver;
mod sender;

pub use browser::Browser;
pub use error::BusError;
pub use in_memory_broker::InMemoryBroker;
pub use message::{Message, MessageBody};
pub use receiver::Receiver;
pub use sender::Sender;
