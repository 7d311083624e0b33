//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// Body returned by a successful session submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    pub id: i64,
}

/// Uniform error body: `{ "error": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for RecordError {
    fn into_response(self) -> Response {
        let status = match &self {
            RecordError::MissingFields => StatusCode::BAD_REQUEST,
            RecordError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Operational status for the recorder process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub sessions_recorded: i64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
