//! Session Recorder -- validates completed sessions and appends them to the
//! store.

pub mod database;

// Re-export main types
pub use database::Database;

use tracing::debug;

use crate::error::RecordError;
use crate::session::SessionDraft;

/// The recorder exposes exactly one operation: persist a completed session.
#[derive(Clone)]
pub struct SessionRecorder {
    db: Database,
}

impl SessionRecorder {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Validate and append one session, returning the assigned id.
    ///
    /// Duplicate submissions become duplicate rows; the store applies no
    /// uniqueness constraint beyond id assignment.
    pub async fn record(&self, draft: SessionDraft) -> Result<i64, RecordError> {
        let report = draft.validate()?;
        let id = self
            .db
            .insert_session(&report)
            .await
            .map_err(RecordError::Storage)?;

        debug!("Recorded session {} ({} min)", id, report.duration_minutes);
        Ok(id)
    }

    pub async fn session_count(&self) -> anyhow::Result<i64> {
        self.db.session_count().await
    }
}
