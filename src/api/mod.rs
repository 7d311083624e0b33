//! HTTP API module
//!
//! Endpoint handlers, response structures, and the state shared by them.

pub mod handlers;
pub mod responses;

use std::{sync::Arc, time::Instant};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::recorder::SessionRecorder;
use handlers::*;

/// State shared by every handler: the recorder plus server metadata.
pub struct AppState {
    pub recorder: SessionRecorder,
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    pub fn new(recorder: SessionRecorder, port: u16, host: String) -> Self {
        Self {
            recorder,
            start_time: Instant::now(),
            port,
            host,
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/sessions", post(create_session_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
