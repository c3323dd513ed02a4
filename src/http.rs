//! HTTP transport mapping admin routes onto [`QueueAdmin`].
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET  /health`
//! - `GET  /api/listeners/status`
//! - `GET  /api/listeners/status/:listener_id`
//! - `POST /api/listeners/start/all`
//! - `POST /api/listeners/start/:listener_id`
//! - `POST /api/listeners/stop/all`
//! - `POST /api/listeners/stop/:listener_id`
//! - `POST /api/queues/send/*raw_queue?message=..&targetClient=..`
//! - `GET  /api/queues/browse/*raw_destination?targetClient=..`
//!
//! Queue routes take the rest of the path as the raw destination, so
//! `queue://orders` and `/queue://orders` can be passed as-is or
//! percent-encoded. An empty rest-of-path is an empty destination and is
//! rejected as an invalid queue name. Every response body (including
//! rejected query strings and unknown routes) is a [`ResponseEnvelope`] and
//! the HTTP status is the envelope's `httpStatus`.
//!
//! ## Example
//!
//! ```ignore
//! let app = queue_admin::http::router(admin.clone());
//! queue_admin::http::serve(admin, "0.0.0.0:8080").await?;
//! ```

use std::future::Future;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::api::QueueAdmin;
use crate::envelope::ResponseEnvelope;

/// Query string of the send route.
#[derive(Debug, Deserialize)]
pub struct SendParams {
    pub message: String,
    #[serde(rename = "targetClient")]
    pub target_client: Option<String>,
}

/// Query string of the browse route.
#[derive(Debug, Deserialize)]
pub struct BrowseParams {
    #[serde(rename = "targetClient")]
    pub target_client: Option<String>,
}

/// Build an axum `Router` serving the admin API.
pub fn router(admin: Arc<QueueAdmin>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/listeners/status", get(all_status_handler))
        .route("/api/listeners/status/:listener_id", get(status_handler))
        .route("/api/listeners/start/all", post(start_all_handler))
        .route("/api/listeners/start/:listener_id", post(start_handler))
        .route("/api/listeners/stop/all", post(stop_all_handler))
        .route("/api/listeners/stop/:listener_id", post(stop_handler))
        .route("/api/queues/send/", post(send_empty_handler))
        .route("/api/queues/send/*raw_queue", post(send_handler))
        .route("/api/queues/browse/", get(browse_empty_handler))
        .route("/api/queues/browse/*raw_destination", get(browse_handler))
        .fallback(not_found_handler)
        .with_state(admin)
}

/// Serve the admin API at the given address (e.g. `"0.0.0.0:8080"`).
pub async fn serve(admin: Arc<QueueAdmin>, addr: &str) -> Result<(), std::io::Error> {
    serve_with_shutdown(admin, addr, std::future::pending()).await
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn serve_with_shutdown<F>(
    admin: Arc<QueueAdmin>,
    addr: &str,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(admin);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "admin API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

impl<T: Serialize> IntoResponse for ResponseEnvelope<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Run an admin call off the async runtime; registry and transport calls block.
async fn run_blocking<T, F>(admin: Arc<QueueAdmin>, call: F) -> Response
where
    T: Serialize + Send + 'static,
    F: FnOnce(&QueueAdmin) -> ResponseEnvelope<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || call(&admin)).await {
        Ok(envelope) => envelope.into_response(),
        Err(e) => {
            error!(error = %e, "admin call panicked");
            ResponseEnvelope::<()>::error("Internal error", 500).into_response()
        }
    }
}

/// `GET /health` returns `{ "ok": true, "queues": [...] }`.
async fn health_handler(State(admin): State<Arc<QueueAdmin>>) -> impl IntoResponse {
    Json(json!({ "ok": true, "queues": admin.manager().queues() }))
}

async fn all_status_handler(State(admin): State<Arc<QueueAdmin>>) -> Response {
    run_blocking(admin, |admin| admin.listener_statuses()).await
}

async fn status_handler(
    State(admin): State<Arc<QueueAdmin>>,
    Path(listener_id): Path<String>,
) -> Response {
    run_blocking(admin, move |admin| admin.listener_status(&listener_id)).await
}

async fn start_handler(
    State(admin): State<Arc<QueueAdmin>>,
    Path(listener_id): Path<String>,
) -> Response {
    run_blocking(admin, move |admin| admin.start_listener(&listener_id)).await
}

async fn stop_handler(
    State(admin): State<Arc<QueueAdmin>>,
    Path(listener_id): Path<String>,
) -> Response {
    run_blocking(admin, move |admin| admin.stop_listener(&listener_id)).await
}

async fn start_all_handler(State(admin): State<Arc<QueueAdmin>>) -> Response {
    run_blocking(admin, |admin| admin.start_all_listeners()).await
}

async fn stop_all_handler(State(admin): State<Arc<QueueAdmin>>) -> Response {
    run_blocking(admin, |admin| admin.stop_all_listeners()).await
}

async fn send_handler(
    State(admin): State<Arc<QueueAdmin>>,
    Path(raw_queue): Path<String>,
    params: Result<Query<SendParams>, QueryRejection>,
) -> Response {
    send(admin, raw_queue, params).await
}

async fn send_empty_handler(
    State(admin): State<Arc<QueueAdmin>>,
    params: Result<Query<SendParams>, QueryRejection>,
) -> Response {
    send(admin, String::new(), params).await
}

async fn send(
    admin: Arc<QueueAdmin>,
    raw_queue: String,
    params: Result<Query<SendParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return rejected(rejection),
    };
    run_blocking(admin, move |admin| {
        admin.send_message(&raw_queue, &params.message, params.target_client.as_deref())
    })
    .await
}

async fn browse_handler(
    State(admin): State<Arc<QueueAdmin>>,
    Path(raw_destination): Path<String>,
    params: Result<Query<BrowseParams>, QueryRejection>,
) -> Response {
    browse(admin, raw_destination, params).await
}

async fn browse_empty_handler(
    State(admin): State<Arc<QueueAdmin>>,
    params: Result<Query<BrowseParams>, QueryRejection>,
) -> Response {
    browse(admin, String::new(), params).await
}

async fn browse(
    admin: Arc<QueueAdmin>,
    raw_destination: String,
    params: Result<Query<BrowseParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return rejected(rejection),
    };
    run_blocking(admin, move |admin| {
        admin.browse_queue(&raw_destination, params.target_client.as_deref())
    })
    .await
}

fn rejected(rejection: QueryRejection) -> Response {
    ResponseEnvelope::<()>::error_with_details(
        "Invalid request parameters",
        rejection.body_text(),
        400,
    )
    .into_response()
}

async fn not_found_handler() -> Response {
    ResponseEnvelope::<()>::error("Not found", 404).into_response()
}
