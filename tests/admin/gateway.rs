//! Send and browse through the admin facade.

use queue_admin::bus::{Browser, Message, Sender};
use serde_json::json;

use crate::support::{admin, toggles};

fn gateway_admin() -> (queue_admin::QueueAdmin, std::sync::Arc<queue_admin::bus::InMemoryBroker>) {
    let (registry, _) = toggles(&[]);
    admin(registry, &[])
}

#[test]
fn send_then_browse_plain_name() {
    let (admin, _) = gateway_admin();

    let sent = admin.send_message("orders", "first", None);
    assert_eq!(sent.message(), "Message sent successfully");
    let value = serde_json::to_value(&sent).unwrap();
    assert_eq!(
        value["data"],
        json!({ "queue": "orders", "rawQueue": "orders", "message": "first" })
    );

    let browsed = admin.browse_queue("orders", None);
    assert_eq!(browsed.message(), "Queue browsed successfully");
    let value = serde_json::to_value(&browsed).unwrap();
    assert_eq!(
        value["data"],
        json!({
            "queueName": "orders",
            "rawDestination": "orders",
            "messages": ["first"]
        })
    );
}

#[test]
fn send_address_forms_reach_the_same_queue() {
    let (admin, broker) = gateway_admin();

    for raw in ["orders", "/orders", "queue://orders", "/queue://orders", "queue%3A%2F%2Forders"] {
        let sent = admin.send_message(raw, raw, None);
        assert_eq!(sent.data().unwrap().queue, "orders", "raw form {raw}");
    }

    assert_eq!(broker.queue_names().unwrap(), vec!["orders"]);
    assert_eq!(broker.depth("orders").unwrap(), 5);
}

#[test]
fn send_scheme_alone_does_not_qualify() {
    let (admin, broker) = gateway_admin();

    let sent = admin.send_message("queue://orders", "x", None);
    assert_eq!(sent.data().unwrap().queue, "orders");
    assert_eq!(broker.browse("orders").unwrap()[0].header("targetClient"), None);
}

#[test]
fn send_with_target_client_qualifies() {
    let (admin, broker) = gateway_admin();

    let sent = admin.send_message("orders", "x", Some("1"));
    let value = serde_json::to_value(&sent).unwrap();
    assert_eq!(value["data"]["queue"], "orders?targetClient=1");
    assert_eq!(value["data"]["targetClient"], "1");
    assert_eq!(broker.browse("orders").unwrap()[0].header("targetClient"), Some("1"));

    // Any other value leaves the destination unqualified.
    let sent = admin.send_message("orders", "y", Some("true"));
    assert_eq!(sent.data().unwrap().queue, "orders");
}

#[test]
fn send_to_bare_scheme_is_invalid_and_never_reaches_transport() {
    let (admin, broker) = gateway_admin();

    let envelope = admin.send_message("queue://", "lost", None);
    assert_eq!(envelope.http_status(), 400);
    let value = serde_json::to_value(&envelope).unwrap();
    assert_eq!(value["errorCode"], "INVALID_QUEUE_NAME");
    assert_eq!(value["message"], "Invalid queue name");
    assert_eq!(value["errorData"], json!({ "rawQueue": "queue://" }));

    assert!(broker.queue_names().unwrap().is_empty());
}

#[test]
fn browse_empty_queue_returns_empty_list() {
    let (admin, _) = gateway_admin();

    let envelope = admin.browse_queue("idle", None);
    assert!(envelope.is_success());
    assert!(envelope.data().unwrap().messages.is_empty());
}

#[test]
fn browse_is_repeatable() {
    let (admin, broker) = gateway_admin();
    broker.send("q1", Message::text("a")).unwrap();
    broker.send("q1", Message::text("b")).unwrap();

    let first = admin.browse_queue("q1", None);
    let second = admin.browse_queue("q1", None);
    assert_eq!(first.data().unwrap().messages, vec!["a", "b"]);
    assert_eq!(first.data().unwrap().messages, second.data().unwrap().messages);
    assert_eq!(broker.depth("q1").unwrap(), 2);
}

#[test]
fn browse_with_scheme_routes_qualified_destination() {
    let (admin, broker) = gateway_admin();
    broker.send("orders", Message::text("o-1")).unwrap();

    for raw in ["queue://orders", "/queue://orders"] {
        let envelope = admin.browse_queue(raw, None);
        let data = envelope.data().unwrap();
        assert_eq!(data.queue_name, "orders?targetClient=1");
        assert_eq!(data.raw_destination, raw);
        assert_eq!(data.messages, vec!["o-1"]);
    }
}

#[test]
fn browse_plain_name_with_target_client_qualifies() {
    let (admin, _) = gateway_admin();

    let envelope = admin.browse_queue("orders", Some("1"));
    assert_eq!(envelope.data().unwrap().queue_name, "orders?targetClient=1");

    let envelope = admin.browse_queue("orders", Some("0"));
    assert_eq!(envelope.data().unwrap().queue_name, "orders");
}

#[test]
fn browse_bare_slash_is_invalid() {
    let (admin, _) = gateway_admin();

    let envelope = admin.browse_queue("/", Some("1"));
    let value = serde_json::to_value(&envelope).unwrap();
    assert_eq!(value["errorCode"], "INVALID_QUEUE_NAME");
    assert_eq!(
        value["errorData"],
        json!({ "rawDestination": "/", "targetClient": "1" })
    );
}
