//! Pagesum engine: provider adapters, HTTP plumbing, the shared store and the
//! background job pipeline.
mod adapter;
mod client;
mod decode;
mod engine;
mod extract;
mod fetch;
mod notify;
mod persist;
mod pipeline;
pub mod settings;
mod store;
mod types;
mod validate;

pub use adapter::{
    adapter_for, ChatCompletionsAdapter, CompletionCall, GenerateContentAdapter, ProviderAdapter,
    ProviderRequest,
};
pub use client::{ClientSettings, CompletionClient, ReqwestCompletionClient};
pub use decode::{decode_page, DecodedPage};
pub use engine::{EngineHandle, BUSY_MESSAGE};
pub use extract::{visible_text, ExtractError, HtmlPageExtractor, PageExtractor};
pub use fetch::{FetchSettings, PageBytes, PageFetcher};
pub use notify::{LogNotifier, Notification, Notifier, RecordingNotifier};
pub use persist::{ensure_parent_dir, write_atomically, PersistError};
pub use pipeline::{Orchestrator, INTERRUPTED_MESSAGE};
pub use store::{
    read_status, write_status, KeyValueStore, LocalStore, StoreChange, StoreError,
    StoreSubscription,
};
pub use types::{CallError, CallFailure, JobError, JobOutcome};
pub use validate::{validate_api_key, KeyCheck};
