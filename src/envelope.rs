//! Uniform response envelope.
//!
//! Every admin operation answers with one of two shapes:
//!
//! ```json
//! { "status": "success", "message": "...", "data": { ... },
//!   "timestamp": "2026-01-01T12:00:00", "httpStatus": 200 }
//!
//! { "status": "error", "message": "...", "details": "...",
//!   "errorCode": "LISTENER_NOT_FOUND", "errorData": { ... },
//!   "timestamp": "2026-01-01T12:00:00", "httpStatus": 400 }
//! ```
//!
//! Optional error fields are omitted when absent.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{AdminError, ErrorContext};

/// Success payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessBody<T> {
    pub message: String,
    pub data: T,
    pub timestamp: NaiveDateTime,
    pub http_status: u16,
}

/// Error payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_data: Option<ErrorContext>,
    pub timestamp: NaiveDateTime,
    pub http_status: u16,
}

impl From<&AdminError> for ErrorBody {
    fn from(err: &AdminError) -> Self {
        Self {
            message: err.message().to_string(),
            details: err.details(),
            error_code: Some(err.error_code().to_string()),
            error_data: err.context(),
            timestamp: now(),
            http_status: err.http_status(),
        }
    }
}

/// Response of any admin operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResponseEnvelope<T> {
    Success(SuccessBody<T>),
    Error(ErrorBody),
}

impl<T> ResponseEnvelope<T> {
    /// A 200 response carrying `data`.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        ResponseEnvelope::Success(SuccessBody {
            message: message.into(),
            data,
            timestamp: now(),
            http_status: 200,
        })
    }

    /// An error response with only a message and status.
    pub fn error(message: impl Into<String>, http_status: u16) -> Self {
        ResponseEnvelope::Error(ErrorBody {
            message: message.into(),
            details: None,
            error_code: None,
            error_data: None,
            timestamp: now(),
            http_status,
        })
    }

    /// An error response carrying a detail line, e.g. a rejected request.
    pub fn error_with_details(
        message: impl Into<String>,
        details: impl Into<String>,
        http_status: u16,
    ) -> Self {
        ResponseEnvelope::Error(ErrorBody {
            message: message.into(),
            details: Some(details.into()),
            error_code: None,
            error_data: None,
            timestamp: now(),
            http_status,
        })
    }

    /// Build from an operation result; `message` picks the success message.
    pub fn from_result<F>(result: Result<T, AdminError>, message: F) -> Self
    where
        F: FnOnce(&T) -> &'static str,
    {
        match result {
            Ok(data) => Self::success(message(&data), data),
            Err(err) => Self::from(err),
        }
    }

    /// HTTP status carried by the envelope.
    pub fn http_status(&self) -> u16 {
        match self {
            ResponseEnvelope::Success(body) => body.http_status,
            ResponseEnvelope::Error(body) => body.http_status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseEnvelope::Success(_))
    }

    /// The success data, if any.
    pub fn data(&self) -> Option<&T> {
        match self {
            ResponseEnvelope::Success(body) => Some(&body.data),
            ResponseEnvelope::Error(_) => None,
        }
    }

    /// The error body, if any.
    pub fn error_body(&self) -> Option<&ErrorBody> {
        match self {
            ResponseEnvelope::Success(_) => None,
            ResponseEnvelope::Error(body) => Some(body),
        }
    }

    /// Envelope message (success or error).
    pub fn message(&self) -> &str {
        match self {
            ResponseEnvelope::Success(body) => &body.message,
            ResponseEnvelope::Error(body) => &body.message,
        }
    }
}

impl<T> From<AdminError> for ResponseEnvelope<T> {
    fn from(err: AdminError) -> Self {
        ResponseEnvelope::Error(ErrorBody::from(&err))
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
