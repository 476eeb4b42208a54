#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use pagesum_core::{JobRequest, JobStatusKind, ProviderId, TabHandle, KEY_STATUS};
use pagesum_engine::{
    ClientSettings, ExtractError, KeyValueStore, LocalStore, Orchestrator, PageExtractor,
    RecordingNotifier, ReqwestCompletionClient, StoreError, StoreSubscription,
};
use serde_json::{json, Map, Value};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(pagesum_logging::initialize_for_tests);
}

/// Page-text collaborator returning a fixed result.
pub struct StaticExtractor(pub Result<String, ExtractError>);

#[async_trait::async_trait]
impl PageExtractor for StaticExtractor {
    async fn extract_text(&self, _tab: &TabHandle) -> Result<String, ExtractError> {
        self.0.clone()
    }
}

/// Store wrapper that keeps every write for later inspection.
pub struct TracingStore {
    inner: LocalStore,
    writes: Mutex<Vec<Map<String, Value>>>,
}

impl TracingStore {
    pub fn new() -> Self {
        Self {
            inner: LocalStore::in_memory(),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Status values in the order they were written.
    pub fn status_trail(&self) -> Vec<JobStatusKind> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter_map(|write| write.get(KEY_STATUS))
            .filter_map(|value| serde_json::from_value(value.clone()).ok())
            .collect()
    }
}

impl KeyValueStore for TracingStore {
    fn get(&self, keys: &[&str]) -> Map<String, Value> {
        self.inner.get(keys)
    }

    fn set(&self, entries: Map<String, Value>) -> Result<(), StoreError> {
        self.writes.lock().unwrap().push(entries.clone());
        self.inner.set(entries)
    }

    fn subscribe(&self) -> StoreSubscription {
        self.inner.subscribe()
    }
}

pub const PAGE_TEXT: &str = "Rust is a systems programming language focused on safety, speed and concurrency. It achieves memory safety without garbage collection.";

pub fn request(provider: ProviderId, base_url: &str, translate: bool) -> JobRequest {
    JobRequest {
        provider,
        model: provider.spec().model.to_string(),
        api_key: "test-key".to_string(),
        base_url: base_url.to_string(),
        prompt: "Summarise briefly".to_string(),
        translate,
        tab_id: TabHandle::new("https://example.com/article"),
    }
}

pub fn client(timeout: Duration) -> Arc<ReqwestCompletionClient> {
    Arc::new(
        ReqwestCompletionClient::new(ClientSettings {
            connect_timeout: Duration::from_secs(5),
            request_timeout: timeout,
        })
        .unwrap(),
    )
}

pub fn orchestrator(
    store: Arc<dyn KeyValueStore>,
    page: Result<String, ExtractError>,
    timeout: Duration,
    notifier: RecordingNotifier,
) -> Orchestrator {
    Orchestrator::new(
        store,
        Arc::new(StaticExtractor(page)),
        client(timeout),
        Arc::new(notifier),
    )
}

pub fn chat_reply(text: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}]
    })
}

pub fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}, "finishReason": "STOP"}]
    })
}
