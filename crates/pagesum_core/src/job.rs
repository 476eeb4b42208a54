use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::provider::{ProviderId, ProviderProfile};

/// Opaque handle of the page to summarise: an http(s) URL or a local path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabHandle(String);

impl TabHandle {
    pub fn new(target: impl Into<String>) -> Self {
        Self(target.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_remote(&self) -> bool {
        let lower = self.0.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }

    /// Filesystem path of a local page; a `file://` prefix is accepted.
    pub fn local_path(&self) -> PathBuf {
        PathBuf::from(self.0.strip_prefix("file://").unwrap_or(&self.0))
    }
}

impl fmt::Display for TabHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Job descriptor carried by the trigger message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    pub provider: ProviderId,
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub prompt: String,
    pub translate: bool,
    pub tab_id: TabHandle,
}

impl JobRequest {
    pub fn from_profile(
        provider: ProviderId,
        profile: &ProviderProfile,
        translate: bool,
        tab_id: TabHandle,
    ) -> Self {
        Self {
            provider,
            model: profile.model.clone(),
            api_key: profile.api_key.clone(),
            base_url: profile.base_url.clone(),
            prompt: profile.prompt.clone(),
            translate,
            tab_id,
        }
    }
}

// Log-friendly form; leaves out the key.
impl fmt::Display for JobRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "provider={} model={} translate={} tab={}",
            self.provider, self.model, self.translate, self.tab_id
        )
    }
}

/// Foreground → background message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ControllerMessage {
    Summarise(JobRequest),
}

/// Advisory acknowledgement of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchAck {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl DispatchAck {
    pub fn accepted() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
        }
    }
}
