//! Destination resolution.
//!
//! Operators address queues in several ways:
//!
//! - `orders` (plain name)
//! - `/orders` (path-prefixed)
//! - `queue://orders` or `/queue://orders` (URI style)
//! - any of the above percent-encoded, and optionally followed by a
//!   `?query` suffix
//!
//! [`resolve`] normalizes all of them to the canonical queue name. The
//! routing qualifier (`?targetClient=1`) is a caller-level policy applied on
//! top of that, and send and browse apply it differently:
//!
//! - send: only an explicit `targetClient=1` parameter adds it
//!   ([`for_send`])
//! - browse: a `queue://` scheme on the raw input always adds it, otherwise
//!   the explicit parameter does ([`for_browse`])
//!
//! ```
//! use queue_admin::destination::{self, RoutingQualifier};
//!
//! let dest = destination::resolve("/queue://orders?foo=bar");
//! assert_eq!(dest.queue(), "orders");
//! assert_eq!(dest.qualifier(), None);
//!
//! let browse = destination::for_browse("queue://orders", None);
//! assert_eq!(browse.qualifier(), Some(RoutingQualifier::TargetClient));
//! assert_eq!(browse.routed_name(), "orders?targetClient=1");
//!
//! let send = destination::for_send("queue://orders", None);
//! assert_eq!(send.routed_name(), "orders");
//! ```

use std::fmt;

use tracing::debug;

/// URI scheme accepted in front of a queue name.
pub const QUEUE_SCHEME: &str = "queue://";

const PATH_SEPARATOR: char = '/';

/// Request parameter value that selects the alternate delivery path.
const TARGET_CLIENT_ENABLED: &str = "1";

/// Opaque routing suffix understood by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingQualifier {
    /// Deliver through the alternate client path (`?targetClient=1`).
    TargetClient,
}

impl RoutingQualifier {
    /// The exact suffix appended to the canonical name on the wire.
    pub fn as_suffix(&self) -> &'static str {
        match self {
            RoutingQualifier::TargetClient => "?targetClient=1",
        }
    }
}

impl fmt::Display for RoutingQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_suffix())
    }
}

/// A resolved destination: canonical queue name plus optional qualifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    queue: String,
    qualifier: Option<RoutingQualifier>,
}

impl Destination {
    /// Build a destination from an already canonical queue name.
    pub fn new(queue: impl Into<String>) -> Self {
        Self {
            queue: queue.into(),
            qualifier: None,
        }
    }

    /// Attach a routing qualifier.
    pub fn with_qualifier(mut self, qualifier: RoutingQualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    /// The canonical queue name.
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// The routing qualifier, if any.
    pub fn qualifier(&self) -> Option<RoutingQualifier> {
        self.qualifier
    }

    /// True when resolution produced no queue name at all.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The name handed to the transport: canonical name plus qualifier suffix.
    pub fn routed_name(&self) -> String {
        match self.qualifier {
            Some(qualifier) => format!("{}{}", self.queue, qualifier.as_suffix()),
            None => self.queue.clone(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.queue)?;
        if let Some(qualifier) = self.qualifier {
            f.write_str(qualifier.as_suffix())?;
        }
        Ok(())
    }
}

/// Resolve a raw destination string to its canonical queue name.
///
/// Never fails: if form-decoding fails (a malformed `%` escape or invalid
/// UTF-8) the raw string is used verbatim. The result never starts with `/`
/// or `queue://` and never contains `?`.
pub fn resolve(raw: &str) -> Destination {
    let decoded = form_decode(raw).unwrap_or_else(|| raw.to_string());

    let mut name = decoded.as_str();
    // One separator, then one scheme; repeated only for degenerate input
    // such as `//orders` or `queue://queue://orders`.
    loop {
        let stripped = name.strip_prefix(PATH_SEPARATOR).unwrap_or(name);
        let stripped = stripped.strip_prefix(QUEUE_SCHEME).unwrap_or(stripped);
        if stripped.len() == name.len() {
            break;
        }
        name = stripped;
    }

    let name = name.split_once('?').map_or(name, |(queue, _)| queue);
    debug!(raw, queue = name, "resolved destination");
    Destination::new(name)
}

/// `application/x-www-form-urlencoded` decoding: `+` is a space and every
/// `%` must start a two-digit hex escape.
fn form_decode(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let well_formed = bytes.iter().enumerate().all(|(i, b)| {
        *b != b'%'
            || bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    });
    if !well_formed {
        return None;
    }
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// True when the raw input uses the `queue://` scheme, with or without a
/// leading separator.
pub fn uses_queue_scheme(raw: &str) -> bool {
    raw.strip_prefix(PATH_SEPARATOR)
        .unwrap_or(raw)
        .starts_with(QUEUE_SCHEME)
}

/// True when the `targetClient` request parameter asks for the alternate path.
pub fn requests_target_client(target_client: Option<&str>) -> bool {
    target_client == Some(TARGET_CLIENT_ENABLED)
}

/// Destination for a send: qualified only by an explicit `targetClient=1`.
pub fn for_send(raw: &str, target_client: Option<&str>) -> Destination {
    let destination = resolve(raw);
    if requests_target_client(target_client) {
        destination.with_qualifier(RoutingQualifier::TargetClient)
    } else {
        destination
    }
}

/// Destination for a browse: a `queue://` scheme always qualifies it,
/// otherwise an explicit `targetClient=1` does.
pub fn for_browse(raw: &str, target_client: Option<&str>) -> Destination {
    let destination = resolve(raw);
    if uses_queue_scheme(raw) || requests_target_client(target_client) {
        destination.with_qualifier(RoutingQualifier::TargetClient)
    } else {
        destination
    }
}
