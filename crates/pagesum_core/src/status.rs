use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const KEY_STATUS: &str = "summaryStatus";
pub const KEY_SUMMARY: &str = "currentSummary";
pub const KEY_TRANSLATION: &str = "currentTranslation";
pub const KEY_ERROR: &str = "summaryError";

/// Every store key that makes up the status record.
pub const STATUS_KEYS: [&str; 4] = [KEY_STATUS, KEY_SUMMARY, KEY_TRANSLATION, KEY_ERROR];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatusKind {
    #[default]
    Idle,
    Extracting,
    Summarising,
    Translating,
    Done,
    Error,
}

impl JobStatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatusKind::Idle => "idle",
            JobStatusKind::Extracting => "extracting",
            JobStatusKind::Summarising => "summarising",
            JobStatusKind::Translating => "translating",
            JobStatusKind::Done => "done",
            JobStatusKind::Error => "error",
        }
    }

    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "idle" => Some(JobStatusKind::Idle),
            "extracting" => Some(JobStatusKind::Extracting),
            "summarising" => Some(JobStatusKind::Summarising),
            "translating" => Some(JobStatusKind::Translating),
            "done" => Some(JobStatusKind::Done),
            "error" => Some(JobStatusKind::Error),
            _ => None,
        }
    }

    pub fn is_in_progress(self) -> bool {
        matches!(
            self,
            JobStatusKind::Extracting | JobStatusKind::Summarising | JobStatusKind::Translating
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatusKind::Done | JobStatusKind::Error)
    }

    fn rank(self) -> u8 {
        match self {
            JobStatusKind::Idle => 0,
            JobStatusKind::Extracting => 1,
            JobStatusKind::Summarising => 2,
            JobStatusKind::Translating => 3,
            JobStatusKind::Done | JobStatusKind::Error => 4,
        }
    }

    /// Pipeline transitions only move forward; `extracting` opens a new job
    /// from any state that is not already extracting.
    pub fn can_advance_to(self, next: JobStatusKind) -> bool {
        if next == JobStatusKind::Extracting {
            return self != JobStatusKind::Extracting;
        }
        if next == JobStatusKind::Idle {
            return false;
        }
        if self.is_terminal() {
            return false;
        }
        next.rank() > self.rank()
    }
}

impl fmt::Display for JobStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single status record shared between the worker and every renderer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(rename = "summaryStatus", default)]
    pub status: JobStatusKind,
    #[serde(rename = "currentSummary", default)]
    pub summary_text: String,
    #[serde(rename = "currentTranslation", default)]
    pub translation_text: String,
    #[serde(rename = "summaryError", default)]
    pub error_message: String,
}

impl JobStatus {
    /// Rebuilds the record from raw store entries. Missing or unreadable fields
    /// fall back to their idle defaults.
    pub fn from_entries(entries: &Map<String, Value>) -> Self {
        let text = |key: &str| {
            entries
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let status = entries
            .get(KEY_STATUS)
            .and_then(Value::as_str)
            .and_then(JobStatusKind::from_wire)
            .unwrap_or_default();
        Self {
            status,
            summary_text: text(KEY_SUMMARY),
            translation_text: text(KEY_TRANSLATION),
            error_message: text(KEY_ERROR),
        }
    }

    /// Applies an update the same way the store would.
    pub fn apply(&mut self, update: &StatusUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(summary) = &update.summary_text {
            self.summary_text = summary.clone();
        }
        if let Some(translation) = &update.translation_text {
            self.translation_text = translation.clone();
        }
        if let Some(error) = &update.error_message {
            self.error_message = error.clone();
        }
    }
}

/// A coherent subset of status fields written in one upsert.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusUpdate {
    pub status: Option<JobStatusKind>,
    pub summary_text: Option<String>,
    pub translation_text: Option<String>,
    pub error_message: Option<String>,
}

impl StatusUpdate {
    pub fn status(status: JobStatusKind) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Whole-record reset written when a job starts.
    pub fn job_started() -> Self {
        Self {
            status: Some(JobStatusKind::Extracting),
            summary_text: Some(String::new()),
            translation_text: Some(String::new()),
            error_message: Some(String::new()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatusKind::Error),
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary_text = Some(summary.into());
        self
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation_text = Some(translation.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn into_entries(self) -> Map<String, Value> {
        let mut entries = Map::new();
        if let Some(status) = self.status {
            entries.insert(KEY_STATUS.to_string(), Value::from(status.as_str()));
        }
        if let Some(summary) = self.summary_text {
            entries.insert(KEY_SUMMARY.to_string(), Value::from(summary));
        }
        if let Some(translation) = self.translation_text {
            entries.insert(KEY_TRANSLATION.to_string(), Value::from(translation));
        }
        if let Some(error) = self.error_message {
            entries.insert(KEY_ERROR.to_string(), Value::from(error));
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pipeline_moves_forward_only() {
        use JobStatusKind::*;
        assert!(Idle.can_advance_to(Extracting));
        assert!(Extracting.can_advance_to(Summarising));
        assert!(Summarising.can_advance_to(Done));
        assert!(Summarising.can_advance_to(Translating));
        assert!(Translating.can_advance_to(Done));
        assert!(!Translating.can_advance_to(Summarising));
        assert!(!Done.can_advance_to(Error));
        assert!(Done.can_advance_to(Extracting));
        assert!(Error.can_advance_to(Extracting));
        assert!(!Extracting.can_advance_to(Extracting));
        assert!(!Summarising.can_advance_to(Idle));
    }

    #[test]
    fn missing_status_reads_as_idle() {
        let status = JobStatus::from_entries(&Map::new());
        assert_eq!(status, JobStatus::default());
        assert_eq!(status.status, JobStatusKind::Idle);
    }

    #[test]
    fn update_entries_use_wire_names() {
        let entries = StatusUpdate::status(JobStatusKind::Translating)
            .with_summary("short")
            .into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[KEY_STATUS], Value::from("translating"));
        assert_eq!(entries[KEY_SUMMARY], Value::from("short"));
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut status = JobStatus {
            status: JobStatusKind::Translating,
            summary_text: "kept".to_string(),
            ..JobStatus::default()
        };
        status.apply(&StatusUpdate::status(JobStatusKind::Done).with_translation("翻译"));
        assert_eq!(status.summary_text, "kept");
        assert_eq!(status.translation_text, "翻译");
        assert_eq!(status.status, JobStatusKind::Done);
    }

    #[test]
    fn serde_matches_store_keys() {
        let status = JobStatus {
            status: JobStatusKind::Error,
            error_message: "API error: 429".to_string(),
            ..JobStatus::default()
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["summaryStatus"], "error");
        assert_eq!(json["summaryError"], "API error: 429");
    }
}
