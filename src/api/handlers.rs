//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{error, info};

use crate::error::RecordError;
use crate::session::SessionDraft;

use super::responses::{HealthResponse, SessionCreated, StatusResponse};
use super::AppState;

/// Handle GET / - plain confirmation that the backend is up
pub async fn root_handler() -> &'static str {
    "focusbrew backend is running"
}

/// Handle POST /sessions - persist one completed focus session
pub async fn create_session_handler(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<SessionDraft>,
) -> Result<(StatusCode, Json<SessionCreated>), RecordError> {
    let id = state.recorder.record(draft).await.map_err(|err| {
        match &err {
            RecordError::MissingFields => info!("Rejected session submission: missing fields"),
            RecordError::Storage(source) => error!("Failed to save session: {:#}", source),
        }
        err
    })?;

    info!("Session {} recorded", id);
    Ok((StatusCode::CREATED, Json(SessionCreated { id })))
}

/// Handle GET /status - recorder process status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let sessions_recorded = match state.recorder.session_count().await {
        Ok(count) => count,
        Err(err) => {
            error!("Failed to count sessions: {:#}", err);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    Ok(Json(StatusResponse {
        sessions_recorded,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
