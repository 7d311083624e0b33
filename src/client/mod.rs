//! HTTP client reporting completed focus sessions to the recorder.

use tracing::{info, warn};

use crate::api::responses::{ErrorBody, SessionCreated};
use crate::error::SubmitError;
use crate::session::SessionReport;
use crate::timer::CompletedFocus;

/// Thin wrapper over `reqwest::Client` bound to one recorder base URL.
#[derive(Debug, Clone)]
pub struct SessionClient {
    http: reqwest::Client,
    sessions_url: String,
}

impl SessionClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            sessions_url: format!("{}/sessions", base_url.trim_end_matches('/')),
        }
    }

    /// Submit one report, returning the id the recorder assigned.
    pub async fn submit(&self, report: &SessionReport) -> Result<i64, SubmitError> {
        let response = self
            .http
            .post(&self.sessions_url)
            .json(report)
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::CREATED {
            let created: SessionCreated = response.json().await?;
            Ok(created.id)
        } else {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            Err(SubmitError::Rejected { status, message })
        }
    }

    /// Detach a submission; the outcome is only ever logged. A failed write
    /// loses that session -- there is no retry queue.
    pub fn spawn_submit(&self, completed: CompletedFocus) {
        let client = self.clone();
        let report = SessionReport::from(completed);

        tokio::spawn(async move {
            match client.submit(&report).await {
                Ok(id) => info!("Recorded focus session with id {}", id),
                Err(err) => warn!("Session report dropped: {}", err),
            }
        });
    }
}
