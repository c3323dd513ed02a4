//! Capability failures surface as 500 envelopes with operation codes.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use queue_admin::listener::InMemoryListenerRegistry;
use serde_json::{json, Value};

use crate::support::{admin, broken_admin, Stuck};

fn error_value<T: serde::Serialize>(envelope: queue_admin::ResponseEnvelope<T>) -> Value {
    assert_eq!(envelope.http_status(), 500);
    serde_json::to_value(&envelope).unwrap()
}

#[test]
fn offline_registry_fails_every_listener_operation() {
    let (admin, _) = broken_admin();

    let cases = [
        (error_value(admin.listener_statuses()), "LISTENER_STATUS_FAILED"),
        (error_value(admin.listener_status("q1Listener")), "LISTENER_STATUS_FAILED"),
        (error_value(admin.start_listener("q1Listener")), "LISTENER_START_FAILED"),
        (error_value(admin.stop_listener("q1Listener")), "LISTENER_STOP_FAILED"),
        (error_value(admin.start_all_listeners()), "BULK_START_FAILED"),
        (error_value(admin.stop_all_listeners()), "BULK_STOP_FAILED"),
    ];

    for (value, code) in cases {
        assert_eq!(value["status"], "error");
        assert_eq!(value["errorCode"], code);
        assert_eq!(value["details"], "listener registry unavailable: registry offline");
    }
}

#[test]
fn single_listener_failure_carries_listener_id() {
    let (admin, _) = broken_admin();

    let value = error_value(admin.start_listener("q1Listener"));
    assert_eq!(value["message"], "Failed to start listener");
    assert_eq!(value["errorData"], json!({ "listenerId": "q1Listener" }));
}

#[test]
fn bulk_failure_has_no_context() {
    let (admin, _) = broken_admin();

    let value = error_value(admin.stop_all_listeners());
    assert_eq!(value["message"], "Failed to stop all listeners");
    assert!(value.get("errorData").is_none());
}

#[test]
fn container_refusing_to_start_is_start_failure() {
    let registry = Arc::new(InMemoryListenerRegistry::new());
    registry
        .register("q1Listener", Arc::new(Stuck { running: false }))
        .unwrap();
    let (admin, _) = admin(registry, &["q1"]);

    let value = error_value(admin.start_listener("q1Listener"));
    assert_eq!(value["errorCode"], "LISTENER_START_FAILED");
    assert_eq!(value["details"], "listener stuck failed: refused to start");

    let value = error_value(admin.start_all_listeners());
    assert_eq!(value["errorCode"], "BULK_START_FAILED");
}

#[test]
fn container_refusing_to_stop_is_stop_failure() {
    let registry = Arc::new(InMemoryListenerRegistry::new());
    registry
        .register("q1Listener", Arc::new(Stuck { running: true }))
        .unwrap();
    let (admin, _) = admin(registry, &["q1"]);

    let value = error_value(admin.stop_listener("q1Listener"));
    assert_eq!(value["errorCode"], "LISTENER_STOP_FAILED");

    let value = error_value(admin.stop_all_listeners());
    assert_eq!(value["errorCode"], "BULK_STOP_FAILED");
}

#[test]
fn transport_failure_on_send() {
    let (admin, transport) = broken_admin();

    let value = error_value(admin.send_message("/orders", "m", Some("1")));
    assert_eq!(value["errorCode"], "MESSAGE_SEND_FAILED");
    assert_eq!(value["message"], "Failed to send message");
    assert_eq!(value["details"], "connection failed: broker down");
    assert_eq!(
        value["errorData"],
        json!({
            "rawQueue": "/orders",
            "queue": "orders?targetClient=1",
            "targetClient": "1"
        })
    );
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn transport_failure_on_browse() {
    let (admin, _) = broken_admin();

    let value = error_value(admin.browse_queue("queue://orders", None));
    assert_eq!(value["errorCode"], "QUEUE_BROWSE_FAILED");
    assert_eq!(value["message"], "Failed to browse queue");
    assert_eq!(
        value["errorData"],
        json!({
            "queueName": "orders?targetClient=1",
            "rawDestination": "queue://orders"
        })
    );
}

#[test]
fn invalid_destination_is_checked_before_transport() {
    let (admin, transport) = broken_admin();

    let send = admin.send_message("queue://", "m", None);
    let browse = admin.browse_queue("", None);
    assert_eq!(send.http_status(), 400);
    assert_eq!(browse.http_status(), 400);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
}
