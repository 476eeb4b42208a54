use pagesum_core::{
    update, JobRequest, JobStatus, JobStatusKind, Msg, PopupState, ProviderId, ProviderProfile,
    TabHandle,
};

#[test]
fn click_during_persisted_job_leaves_state_untouched() {
    let observed = JobStatus {
        status: JobStatusKind::Translating,
        summary_text: "Partial".to_string(),
        ..JobStatus::default()
    };
    let (mut state, _) = update(PopupState::new(), Msg::StatusObserved(observed));
    state.consume_dirty();

    let mut profile = ProviderProfile::defaults(ProviderId::Gemini);
    profile.api_key = "key".to_string();
    let request = JobRequest::from_profile(
        ProviderId::Gemini,
        &profile,
        false,
        TabHandle::new("https://example.com"),
    );
    let (next, effects) = update(state.clone(), Msg::SummariseClicked(request));
    assert_eq!(next, state);
    assert!(effects.is_empty());
}
