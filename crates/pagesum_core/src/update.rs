use crate::{Effect, Msg, PopupState};

pub const MISSING_KEY_NOTICE: &str = "Set API key in Settings first";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PopupState, msg: Msg) -> (PopupState, Vec<Effect>) {
    let effects = match msg {
        Msg::StatusObserved(status) => {
            state.observe(status);
            Vec::new()
        }
        Msg::SummariseClicked(request) => {
            if !state.trigger_enabled() {
                return (state, Vec::new());
            }
            if request.api_key.trim().is_empty() {
                state.set_notice(MISSING_KEY_NOTICE);
                return (state, Vec::new());
            }
            state.begin_dispatch();
            vec![Effect::DispatchJob(request)]
        }
        Msg::DispatchAcked(ack) => {
            if !ack.ok {
                let message = ack
                    .error
                    .unwrap_or_else(|| "Could not start summary".to_string());
                state.dispatch_refused(message);
            }
            Vec::new()
        }
    };

    (state, effects)
}
