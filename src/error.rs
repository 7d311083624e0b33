//! Error taxonomy for session recording and submission.

use thiserror::Error;

/// Failures of the recorder's single "persist a completed session" operation.
///
/// The Display strings double as the wire error messages, so they must stay
/// in sync with what HTTP clients expect to read back.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A required field was missing, null, or empty.
    #[error("Missing required fields")]
    MissingFields,

    /// The backing store rejected the write.
    #[error("Failed to save session")]
    Storage(#[source] anyhow::Error),
}

/// Failures observed by the timer when reporting a completed session.
///
/// Both are terminal for the affected session: the timer logs them and moves
/// on, with no retry queue.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The recorder could not be reached at all.
    #[error("failed to reach session recorder: {0}")]
    Transport(#[from] reqwest::Error),

    /// The recorder answered with a non-success status.
    #[error("session recorder rejected the report ({status}): {message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
    },
}
