use std::fmt;

use thiserror::Error;

/// Why a single provider call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallFailure {
    HttpStatus(u16),
    Timeout,
    Network,
    InvalidBody,
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallFailure::HttpStatus(code) => write!(f, "http status {code}"),
            CallFailure::Timeout => write!(f, "timeout"),
            CallFailure::Network => write!(f, "network error"),
            CallFailure::InvalidBody => write!(f, "invalid response body"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct CallError {
    pub kind: CallFailure,
    pub message: String,
}

impl CallError {
    pub(crate) fn new(kind: CallFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Job-level failure taxonomy. Display strings are what the status record shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("No content found on page")]
    Extraction,
    #[error("Request timed out")]
    Timeout,
    #[error("API error: {status}")]
    Api { status: u16 },
    #[error("No summary returned")]
    EmptyResponse,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Status store error: {0}")]
    Store(String),
}

impl From<CallError> for JobError {
    fn from(err: CallError) -> Self {
        match err.kind {
            CallFailure::HttpStatus(status) => JobError::Api { status },
            CallFailure::Timeout => JobError::Timeout,
            CallFailure::InvalidBody => JobError::EmptyResponse,
            CallFailure::Network => JobError::Network(err.message),
        }
    }
}

/// How a finished job ended, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed {
        translated: bool,
        translation_error: Option<String>,
    },
    Failed(JobError),
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Completed { .. })
    }
}
