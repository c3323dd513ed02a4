//! Messages carried by the broker.

use uuid::Uuid;

/// Payload of a queued message.
///
/// Text messages are what the gateway sends and what browse renders
/// verbatim. Anything else is opaque bytes and is only ever described by
/// its message id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageBody {
    /// UTF-8 text payload.
    Text(String),
    /// Binary payload (object, map or stream messages on a real broker).
    Bytes(Vec<u8>),
}

/// A message on a queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Broker-assigned identifier (`ID:<uuid>`).
    pub id: String,
    /// Message payload.
    pub body: MessageBody,
    /// Headers (routing properties, correlation IDs, etc.)
    pub headers: Vec<(String, String)>,
}

impl Message {
    /// Create a message with an explicit id.
    pub fn new(id: impl Into<String>, body: MessageBody) -> Self {
        Self {
            id: id.into(),
            body,
            headers: Vec::new(),
        }
    }

    /// Create a text message with a freshly generated id.
    pub fn text(payload: impl Into<String>) -> Self {
        Self::new(next_message_id(), MessageBody::Text(payload.into()))
    }

    /// Create a binary message with a freshly generated id.
    pub fn bytes(payload: Vec<u8>) -> Self {
        Self::new(next_message_id(), MessageBody::Bytes(payload))
    }

    /// Add a header to the message.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Look up a header value by key.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The text payload, if this is a text message.
    pub fn text_payload(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Text(text) => Some(text),
            MessageBody::Bytes(_) => None,
        }
    }
}

fn next_message_id() -> String {
    format!("ID:{}", Uuid::new_v4())
}
