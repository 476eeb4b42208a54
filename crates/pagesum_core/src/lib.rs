//! Pagesum core: shared data model, provider registry, text rules and the
//! foreground renderer state machine.
mod effect;
mod job;
mod msg;
mod provider;
mod state;
mod status;
pub mod text;
mod update;
mod view_model;

pub use effect::Effect;
pub use job::{ControllerMessage, DispatchAck, JobRequest, TabHandle};
pub use msg::Msg;
pub use provider::{
    mask_api_key, parse_model_list, validate_base_url, AdapterKind, ProfileError, ProviderId,
    ProviderProfile, ProviderSpec, DEFAULT_PROMPT,
};
pub use state::PopupState;
pub use status::{
    JobStatus, JobStatusKind, StatusUpdate, KEY_ERROR, KEY_STATUS, KEY_SUMMARY, KEY_TRANSLATION,
    STATUS_KEYS,
};
pub use update::{update, MISSING_KEY_NOTICE};
pub use view_model::{PopupView, ResultView, TRIGGER_BUSY, TRIGGER_IDLE};
