use crate::view_model::{PopupView, ResultView, TRIGGER_BUSY, TRIGGER_IDLE};
use crate::{JobStatus, JobStatusKind};

/// Foreground state. Holds nothing the status record cannot rebuild except
/// the transient dispatch flag and a one-off notice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PopupState {
    observed: JobStatus,
    // Record seen when the trigger fired; cleared once the worker moves it.
    dispatched_from: Option<JobStatus>,
    notice: Option<String>,
    dirty: bool,
}

impl PopupState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observed(&self) -> &JobStatus {
        &self.observed
    }

    pub fn trigger_enabled(&self) -> bool {
        self.dispatched_from.is_none() && !self.observed.status.is_in_progress()
    }

    pub fn view(&self) -> PopupView {
        let trigger_enabled = self.trigger_enabled();
        PopupView {
            trigger_enabled,
            trigger_label: if trigger_enabled {
                TRIGGER_IDLE
            } else {
                TRIGGER_BUSY
            },
            body: self.body(),
            dirty: self.dirty,
        }
    }

    fn body(&self) -> ResultView {
        if let Some(message) = &self.notice {
            return ResultView::Notice {
                message: message.clone(),
            };
        }
        let status = &self.observed;
        match status.status {
            _ if self.dispatched_from.is_some() => ResultView::Progress(ResultView::STARTING),
            JobStatusKind::Idle => ResultView::Ready,
            JobStatusKind::Extracting => ResultView::Progress(ResultView::EXTRACTING),
            JobStatusKind::Summarising => ResultView::Progress(ResultView::SUMMARISING),
            JobStatusKind::Translating => ResultView::SummaryPendingTranslation {
                summary: status.summary_text.clone(),
            },
            JobStatusKind::Done => ResultView::Final {
                summary: status.summary_text.clone(),
                translation: non_empty(&status.translation_text),
                translation_error: non_empty(&status.error_message),
            },
            JobStatusKind::Error => ResultView::Failed {
                message: status.error_message.clone(),
            },
        }
    }

    pub(crate) fn observe(&mut self, status: JobStatus) {
        let worker_took_over = match &self.dispatched_from {
            Some(before) => status.status.is_in_progress() || status != *before,
            None => false,
        };
        if worker_took_over {
            self.dispatched_from = None;
            self.dirty = true;
        }
        // A notice only outlives observations that repeat the record it was shown over.
        if status != self.observed {
            self.notice = None;
            self.observed = status;
            self.dirty = true;
        }
    }

    pub(crate) fn begin_dispatch(&mut self) {
        self.dispatched_from = Some(self.observed.clone());
        self.notice = None;
        self.dirty = true;
    }

    pub(crate) fn dispatch_refused(&mut self, message: String) {
        self.dispatched_from = None;
        self.notice = Some(message);
        self.dirty = true;
    }

    pub(crate) fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
        self.dirty = true;
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
