//! HTTP transport integration tests.
//!
//! Starts an axum server and exercises it with reqwest.

use std::sync::Arc;

use queue_admin::bus::{InMemoryBroker, Message, Sender};
use queue_admin::http;
use queue_admin::QueueAdmin;
use serde_json::{json, Value};

use crate::support::{admin, toggles};

fn test_admin() -> (Arc<QueueAdmin>, Arc<InMemoryBroker>) {
    let (registry, _) = toggles(&["q1Listener"]);
    let (admin, broker) = admin(registry, &["q1", "q2"]);
    (Arc::new(admin), broker)
}

/// Bind to port 0 and return the actual address.
async fn start_server(admin: Arc<QueueAdmin>) -> String {
    let app = http::router(admin);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_check() {
    let (admin, _) = test_admin();
    let base = start_server(admin).await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true, "queues": ["q1", "q2"] }));
}

#[tokio::test]
async fn start_and_status_roundtrip() {
    let (admin, _) = test_admin();
    let base = start_server(admin).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/listeners/start/q1Listener"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Listener started successfully");
    assert_eq!(
        body["data"],
        json!({ "listenerId": "q1Listener", "listenerStatus": "RUNNING" })
    );

    let body: Value = client
        .get(format!("{base}/api/listeners/status/q1Listener"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["listenerStatus"], "RUNNING");
    assert_eq!(body["httpStatus"], 200);
}

#[tokio::test]
async fn unknown_listener_is_400() {
    let (admin, _) = test_admin();
    let base = start_server(admin).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/listeners/stop/ghostListener"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["errorCode"], "LISTENER_NOT_FOUND");
    assert_eq!(body["httpStatus"], 400);
}

#[tokio::test]
async fn bulk_routes_are_not_listener_ids() {
    let (admin, _) = test_admin();
    let base = start_server(admin).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/listeners/start/all"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["data"],
        json!({
            "results": { "q1Listener": "STARTED", "q2Listener": "NOT_FOUND" },
            "totalProcessed": 2
        })
    );

    let body: Value = client
        .post(format!("{base}/api/listeners/stop/all"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["results"]["q1Listener"], "STOPPED");

    let body: Value = client
        .get(format!("{base}/api/listeners/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body["data"],
        json!({ "listeners": { "q1Listener": "STOPPED" }, "totalListeners": 1 })
    );
}

#[tokio::test]
async fn send_with_raw_scheme_in_path() {
    let (admin, broker) = test_admin();
    let base = start_server(admin).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/queues/send/queue%3A%2F%2Forders"))
        .query(&[("message", "hello world"), ("targetClient", "1")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Message sent successfully");
    assert_eq!(body["data"]["queue"], "orders?targetClient=1");
    assert_eq!(body["data"]["message"], "hello world");
    assert_eq!(broker.depth("orders").unwrap(), 1);
}

#[tokio::test]
async fn send_to_bare_scheme_is_400() {
    let (admin, broker) = test_admin();
    let base = start_server(admin).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/queues/send/queue%3A%2F%2F"))
        .query(&[("message", "lost")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errorCode"], "INVALID_QUEUE_NAME");
    assert!(broker.queue_names().unwrap().is_empty());
}

#[tokio::test]
async fn browse_returns_messages_in_order() {
    let (admin, broker) = test_admin();
    broker.send("orders", Message::text("one")).unwrap();
    broker.send("orders", Message::text("two")).unwrap();
    let base = start_server(admin).await;

    for _ in 0..2 {
        let resp = reqwest::get(format!("{base}/api/queues/browse/orders"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "Queue browsed successfully");
        assert_eq!(body["data"]["queueName"], "orders");
        assert_eq!(body["data"]["messages"], json!(["one", "two"]));
    }
}

#[tokio::test]
async fn browse_with_scheme_is_qualified() {
    let (admin, _) = test_admin();
    let base = start_server(admin).await;

    let body: Value = reqwest::get(format!("{base}/api/queues/browse/queue%3A%2F%2Forders"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["queueName"], "orders?targetClient=1");
    assert_eq!(body["data"]["rawDestination"], "queue://orders");
    assert_eq!(body["data"]["messages"], json!([]));
}

#[tokio::test]
async fn send_without_message_is_enveloped_400() {
    let (admin, broker) = test_admin();
    let base = start_server(admin).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/queues/send/orders"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Invalid request parameters");
    assert_eq!(body["httpStatus"], 400);
    assert!(body["details"].as_str().unwrap().contains("message"));
    assert!(broker.queue_names().unwrap().is_empty());
}

#[tokio::test]
async fn empty_queue_paths_are_invalid_queue_names() {
    let (admin, _) = test_admin();
    let base = start_server(admin).await;
    let client = reqwest::Client::new();

    let resp = reqwest::get(format!("{base}/api/queues/browse/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errorCode"], "INVALID_QUEUE_NAME");
    assert_eq!(body["errorData"], json!({ "rawDestination": "" }));

    let resp = client
        .post(format!("{base}/api/queues/send/"))
        .query(&[("message", "x")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errorCode"], "INVALID_QUEUE_NAME");
}

#[tokio::test]
async fn unknown_route_is_enveloped_404() {
    let (admin, _) = test_admin();
    let base = start_server(admin).await;

    let resp = reqwest::get(format!("{base}/api/nothing")).await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["httpStatus"], 404);
}
