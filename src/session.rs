//! Session wire records shared by the timer client and the recorder.

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::timer::CompletedFocus;

/// A completed focus session as it travels over the wire and into the store.
///
/// Timestamps stay RFC 3339 text end to end; the store keeps them as TEXT
/// columns and never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub started_at: String,
    pub ended_at: String,
    pub duration_minutes: i64,
}

impl From<CompletedFocus> for SessionReport {
    fn from(completed: CompletedFocus) -> Self {
        Self {
            started_at: completed.started_at.to_rfc3339(),
            ended_at: completed.ended_at.to_rfc3339(),
            duration_minutes: completed.duration_minutes,
        }
    }
}

/// Loosely-typed request body: every field optional so presence can be
/// validated explicitly instead of through deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDraft {
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
}

impl SessionDraft {
    /// Reject missing, null, or empty fields.
    pub fn validate(self) -> Result<SessionReport, RecordError> {
        let started_at = self.started_at.filter(|s| !s.is_empty());
        let ended_at = self.ended_at.filter(|s| !s.is_empty());

        match (started_at, ended_at, self.duration_minutes) {
            (Some(started_at), Some(ended_at), Some(duration_minutes)) => Ok(SessionReport {
                started_at,
                ended_at,
                duration_minutes,
            }),
            _ => Err(RecordError::MissingFields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn report_serializes_with_camel_case_keys() {
        let report = SessionReport {
            started_at: "2024-05-01T09:00:00+00:00".into(),
            ended_at: "2024-05-01T09:25:00+00:00".into(),
            duration_minutes: 25,
        };

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "startedAt": "2024-05-01T09:00:00+00:00",
                "endedAt": "2024-05-01T09:25:00+00:00",
                "durationMinutes": 25
            })
        );
    }

    #[test]
    fn completed_focus_converts_to_rfc3339() {
        let started = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let report = SessionReport::from(CompletedFocus::new(started, started + Duration::minutes(25)));

        assert_eq!(report.started_at, "2024-05-01T09:00:00+00:00");
        assert_eq!(report.ended_at, "2024-05-01T09:25:00+00:00");
        assert_eq!(report.duration_minutes, 25);
    }

    #[test]
    fn draft_with_all_fields_validates() {
        let draft: SessionDraft = serde_json::from_value(json!({
            "startedAt": "2024-05-01T09:00:00+00:00",
            "endedAt": "2024-05-01T09:25:00+00:00",
            "durationMinutes": 25
        }))
        .unwrap();

        let report = draft.validate().unwrap();
        assert_eq!(report.duration_minutes, 25);
    }

    #[test]
    fn draft_missing_null_or_empty_fields_is_rejected() {
        let bodies = [
            json!({ "endedAt": "b", "durationMinutes": 1 }),
            json!({ "startedAt": "a", "durationMinutes": 1 }),
            json!({ "startedAt": "a", "endedAt": "b" }),
            json!({ "startedAt": null, "endedAt": "b", "durationMinutes": 1 }),
            json!({ "startedAt": "", "endedAt": "b", "durationMinutes": 1 }),
            json!({}),
        ];

        for body in bodies {
            let draft: SessionDraft = serde_json::from_value(body).unwrap();
            assert!(matches!(draft.validate(), Err(RecordError::MissingFields)));
        }
    }
}
