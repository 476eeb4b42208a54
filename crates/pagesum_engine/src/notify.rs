use std::sync::{Arc, Mutex};

use pagesum_logging::{pagesum_info, pagesum_warn};

pub const NOTIFICATION_TITLE: &str = "Page Summariser";
pub const NOTIFICATION_ICON: &str = "icon128.png";
pub const READY_ID: &str = "summary-ready";
pub const ERROR_ID: &str = "summary-error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: &'static str,
    pub title: String,
    pub message: String,
    pub icon: &'static str,
}

impl Notification {
    pub fn summary_ready() -> Self {
        Self {
            id: READY_ID,
            title: NOTIFICATION_TITLE.to_string(),
            message: "Summary is ready! Click the extension icon to view.".to_string(),
            icon: NOTIFICATION_ICON,
        }
    }

    pub fn summary_failed(error: &str) -> Self {
        Self {
            id: ERROR_ID,
            title: NOTIFICATION_TITLE.to_string(),
            message: format!("Summarisation failed: {error}"),
            icon: NOTIFICATION_ICON,
        }
    }

    pub fn is_error(&self) -> bool {
        self.id == ERROR_ID
    }
}

/// User notification collaborator. Fire-and-forget: implementations swallow
/// their own failures.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        if notification.is_error() {
            pagesum_warn!("[{}] {}", notification.title, notification.message);
        } else {
            pagesum_info!("[{}] {}", notification.title, notification.message);
        }
    }
}

/// Keeps every notification; used by tests and embedders that poll.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notification> {
        match self.seen.lock() {
            Ok(mut seen) => seen.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification);
        }
    }
}
