//! A renderer opened at any moment must rebuild its view from the record alone.
use pagesum_core::{
    update, JobStatus, JobStatusKind, Msg, PopupState, ResultView, StatusUpdate,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

fn entries(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => unreachable!("object literal"),
    }
}

#[test]
fn reopened_mid_job_shows_progress_not_stale_summary() {
    pagesum_logging::initialize_for_tests();
    // A previous job left a summary behind; the running job reset it when it
    // started, but even a leftover value must not be rendered.
    let record = entries(json!({
        "summaryStatus": "summarising",
        "currentSummary": "stale summary from last run",
        "currentTranslation": "",
        "summaryError": ""
    }));
    let status = JobStatus::from_entries(&record);
    let (state, _) = update(PopupState::new(), Msg::StatusObserved(status));

    let view = state.view();
    assert_eq!(view.body, ResultView::Progress(ResultView::SUMMARISING));
    assert!(!view.trigger_enabled);
}

#[test]
fn record_round_trips_through_store_entries() {
    let mut record = Map::new();
    for update in [
        StatusUpdate::job_started(),
        StatusUpdate::status(JobStatusKind::Summarising),
        StatusUpdate::status(JobStatusKind::Translating).with_summary("Summary"),
        StatusUpdate::status(JobStatusKind::Done).with_translation("摘要"),
    ] {
        record.extend(update.into_entries());
    }

    let status = JobStatus::from_entries(&record);
    assert_eq!(
        status,
        JobStatus {
            status: JobStatusKind::Done,
            summary_text: "Summary".to_string(),
            translation_text: "摘要".to_string(),
            error_message: String::new(),
        }
    );
}

#[test]
fn unknown_status_string_reads_as_idle() {
    let record = entries(json!({ "summaryStatus": "paused" }));
    assert_eq!(JobStatus::from_entries(&record).status, JobStatusKind::Idle);
}
