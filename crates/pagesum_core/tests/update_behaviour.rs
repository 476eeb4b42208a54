use std::sync::Once;

use pagesum_core::{
    update, DispatchAck, Effect, JobRequest, JobStatus, JobStatusKind, Msg, PopupState,
    ProviderId, ProviderProfile, ResultView, TabHandle, MISSING_KEY_NOTICE, TRIGGER_BUSY,
    TRIGGER_IDLE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(pagesum_logging::initialize_for_tests);
}

fn request(api_key: &str) -> JobRequest {
    let mut profile = ProviderProfile::defaults(ProviderId::Openai);
    profile.api_key = api_key.to_string();
    JobRequest::from_profile(
        ProviderId::Openai,
        &profile,
        true,
        TabHandle::new("https://example.com/article"),
    )
}

fn status(kind: JobStatusKind) -> JobStatus {
    JobStatus {
        status: kind,
        ..JobStatus::default()
    }
}

fn observe(state: PopupState, status: JobStatus) -> PopupState {
    update(state, Msg::StatusObserved(status)).0
}

#[test]
fn fresh_popup_is_ready() {
    init_logging();
    let view = PopupState::new().view();
    assert!(view.trigger_enabled);
    assert_eq!(view.trigger_label, TRIGGER_IDLE);
    assert_eq!(view.body, ResultView::Ready);
}

#[test]
fn click_dispatches_and_disables_trigger() {
    init_logging();
    let req = request("sk-test");
    let (mut state, effects) = update(PopupState::new(), Msg::SummariseClicked(req.clone()));

    assert_eq!(effects, vec![Effect::DispatchJob(req.clone())]);
    let view = state.view();
    assert!(!view.trigger_enabled);
    assert_eq!(view.trigger_label, TRIGGER_BUSY);
    assert_eq!(view.body, ResultView::Progress(ResultView::STARTING));
    assert!(state.consume_dirty());

    // A second click while the first is pending is ignored.
    let (_state, effects) = update(state, Msg::SummariseClicked(req));
    assert!(effects.is_empty());
}

#[test]
fn click_without_api_key_shows_notice() {
    init_logging();
    let (state, effects) = update(PopupState::new(), Msg::SummariseClicked(request("  ")));
    assert!(effects.is_empty());
    assert_eq!(
        state.view().body,
        ResultView::Notice {
            message: MISSING_KEY_NOTICE.to_string()
        }
    );
    assert!(state.view().trigger_enabled);
}

#[test]
fn progress_statuses_map_to_labels() {
    init_logging();
    let state = observe(PopupState::new(), status(JobStatusKind::Extracting));
    assert_eq!(state.view().body, ResultView::Progress(ResultView::EXTRACTING));
    assert!(!state.view().trigger_enabled);

    let state = observe(state, status(JobStatusKind::Summarising));
    assert_eq!(state.view().body, ResultView::Progress(ResultView::SUMMARISING));
}

#[test]
fn translating_shows_summary_with_pending_translation() {
    init_logging();
    let state = observe(
        PopupState::new(),
        JobStatus {
            status: JobStatusKind::Translating,
            summary_text: "A short summary.".to_string(),
            ..JobStatus::default()
        },
    );
    assert_eq!(
        state.view().body,
        ResultView::SummaryPendingTranslation {
            summary: "A short summary.".to_string()
        }
    );
    assert!(!state.view().trigger_enabled);
}

#[test]
fn done_renders_both_columns_and_reenables_trigger() {
    init_logging();
    let state = observe(
        PopupState::new(),
        JobStatus {
            status: JobStatusKind::Done,
            summary_text: "Summary".to_string(),
            translation_text: "摘要".to_string(),
            error_message: String::new(),
        },
    );
    let view = state.view();
    assert!(view.trigger_enabled);
    assert_eq!(
        view.body,
        ResultView::Final {
            summary: "Summary".to_string(),
            translation: Some("摘要".to_string()),
            translation_error: None,
        }
    );
}

#[test]
fn done_with_failed_translation_keeps_summary() {
    init_logging();
    let state = observe(
        PopupState::new(),
        JobStatus {
            status: JobStatusKind::Done,
            summary_text: "Summary".to_string(),
            translation_text: String::new(),
            error_message: "Translation failed: Request timed out".to_string(),
        },
    );
    assert_eq!(
        state.view().body,
        ResultView::Final {
            summary: "Summary".to_string(),
            translation: None,
            translation_error: Some("Translation failed: Request timed out".to_string()),
        }
    );
}

#[test]
fn error_status_shows_message_and_reenables_trigger() {
    init_logging();
    let state = observe(
        PopupState::new(),
        JobStatus {
            status: JobStatusKind::Error,
            error_message: "API error: 429".to_string(),
            ..JobStatus::default()
        },
    );
    let view = state.view();
    assert!(view.trigger_enabled);
    assert_eq!(
        view.body,
        ResultView::Failed {
            message: "API error: 429".to_string()
        }
    );
}

#[test]
fn refused_dispatch_reenables_trigger_with_reason() {
    init_logging();
    let (state, _) = update(PopupState::new(), Msg::SummariseClicked(request("sk")));
    let (state, effects) = update(
        state,
        Msg::DispatchAcked(DispatchAck::rejected("A summary is already in progress")),
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert!(view.trigger_enabled);
    assert_eq!(
        view.body,
        ResultView::Notice {
            message: "A summary is already in progress".to_string()
        }
    );
}

#[test]
fn later_terminal_record_replaces_stale_notice() {
    init_logging();
    let state = observe(PopupState::new(), status(JobStatusKind::Idle));
    let (state, _) = update(state, Msg::SummariseClicked(request("")));
    let state = observe(state, status(JobStatusKind::Idle));
    assert_eq!(
        state.view().body,
        ResultView::Notice {
            message: MISSING_KEY_NOTICE.to_string()
        }
    );

    let state = observe(
        state,
        JobStatus {
            status: JobStatusKind::Error,
            error_message: "Request timed out".to_string(),
            ..JobStatus::default()
        },
    );
    assert_eq!(
        state.view().body,
        ResultView::Failed {
            message: "Request timed out".to_string()
        }
    );
}

#[test]
fn accepted_ack_changes_nothing() {
    init_logging();
    let (state, _) = update(PopupState::new(), Msg::SummariseClicked(request("sk")));
    let (next, _) = update(state.clone(), Msg::DispatchAcked(DispatchAck::accepted()));
    assert_eq!(next, state);
}

#[test]
fn fast_job_observed_only_at_terminal_state_releases_trigger() {
    init_logging();
    let previous = JobStatus {
        status: JobStatusKind::Done,
        summary_text: "old".to_string(),
        ..JobStatus::default()
    };
    let state = observe(PopupState::new(), previous);
    let (state, _) = update(state, Msg::SummariseClicked(request("sk")));
    assert!(!state.view().trigger_enabled);

    let state = observe(
        state,
        JobStatus {
            status: JobStatusKind::Error,
            error_message: "No content found on page".to_string(),
            ..JobStatus::default()
        },
    );
    assert!(state.view().trigger_enabled);
}

#[test]
fn unchanged_observation_is_not_dirty() {
    init_logging();
    let mut state = observe(PopupState::new(), status(JobStatusKind::Summarising));
    assert!(state.consume_dirty());
    let mut state = observe(state, status(JobStatusKind::Summarising));
    assert!(!state.consume_dirty());
}
