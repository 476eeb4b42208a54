use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

/// Prompt template used when a profile has none stored.
pub const DEFAULT_PROMPT: &str = "Summarise this article in its original language. Output format: A brief summary paragraph, followed by a few key bullet points (3 - 5 items)";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    #[default]
    Gemini,
    Minimax,
    Openai,
}

/// Request/response shape spoken by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    /// `{baseUrl}{endpoint}` with a bearer token and a `messages` body.
    ChatCompletions,
    /// `{baseUrl}/{model}:generateContent` with an API-key header.
    GenerateContent,
}

/// Compiled-in, immutable description of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSpec {
    pub id: ProviderId,
    pub name: &'static str,
    pub base_url: &'static str,
    pub model: &'static str,
    pub models: &'static [&'static str],
    pub endpoint: &'static str,
    pub adapter: AdapterKind,
}

const PROVIDERS: [ProviderSpec; 3] = [
    ProviderSpec {
        id: ProviderId::Gemini,
        name: "Google Gemini",
        base_url: "https://generativelanguage.googleapis.com/v1beta/models",
        model: "gemini-2.5-flash",
        models: &[
            "gemini-2.5-flash",
            "gemini-2.5-pro",
            "gemini-2.0-flash",
            "gemini-2.0-flash-001",
        ],
        endpoint: "",
        adapter: AdapterKind::GenerateContent,
    },
    ProviderSpec {
        id: ProviderId::Minimax,
        name: "MiniMax",
        base_url: "https://api.minimaxi.com/v1",
        model: "MiniMax-M2.5",
        models: &["MiniMax-M2.5"],
        endpoint: "/chat/completions",
        adapter: AdapterKind::ChatCompletions,
    },
    ProviderSpec {
        id: ProviderId::Openai,
        name: "OpenAI",
        base_url: "https://api.openai.com/v1",
        model: "gpt-4o-mini",
        models: &["gpt-4o-mini", "gpt-4o", "gpt-3.5-turbo"],
        endpoint: "/chat/completions",
        adapter: AdapterKind::ChatCompletions,
    },
];

impl ProviderId {
    pub const ALL: [ProviderId; 3] = [ProviderId::Gemini, ProviderId::Minimax, ProviderId::Openai];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::Gemini => "gemini",
            ProviderId::Minimax => "minimax",
            ProviderId::Openai => "openai",
        }
    }

    pub fn spec(self) -> &'static ProviderSpec {
        match self {
            ProviderId::Gemini => &PROVIDERS[0],
            ProviderId::Minimax => &PROVIDERS[1],
            ProviderId::Openai => &PROVIDERS[2],
        }
    }

    /// Store key holding this provider's profile.
    pub fn profile_key(self) -> String {
        format!("provider_{}", self.as_str())
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("model list is empty")]
    EmptyModelList,
    #[error("API key required")]
    MissingApiKey,
}

impl FromStr for ProviderId {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ProviderId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ProfileError::UnknownProvider(wanted.to_string()))
    }
}

/// Per-provider persisted configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderProfile {
    pub base_url: String,
    pub model: String,
    pub models: Vec<String>,
    pub api_key: String,
    pub prompt: String,
}

impl ProviderProfile {
    pub fn defaults(id: ProviderId) -> Self {
        let spec = id.spec();
        Self {
            base_url: spec.base_url.to_string(),
            model: spec.model.to_string(),
            models: spec.models.iter().map(|m| m.to_string()).collect(),
            api_key: String::new(),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    /// Fills every missing or empty field of a stored profile from the built-in defaults.
    pub fn merged_with_defaults(stored: Option<ProviderProfile>, id: ProviderId) -> Self {
        let defaults = Self::defaults(id);
        let Some(stored) = stored else {
            return defaults;
        };
        Self {
            base_url: non_empty_or(stored.base_url, defaults.base_url),
            model: non_empty_or(stored.model, defaults.model),
            models: if stored.models.is_empty() {
                defaults.models
            } else {
                stored.models
            },
            api_key: stored.api_key,
            prompt: non_empty_or(stored.prompt, defaults.prompt),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Replaces the model list; the selected model falls back to the first entry
    /// when it is no longer listed.
    pub fn set_models(&mut self, models: Vec<String>) -> Result<(), ProfileError> {
        if models.is_empty() {
            return Err(ProfileError::EmptyModelList);
        }
        if !models.iter().any(|m| *m == self.model) {
            self.model = models[0].clone();
        }
        self.models = models;
        Ok(())
    }

    pub fn set_base_url(&mut self, raw: &str) -> Result<(), ProfileError> {
        let trimmed = raw.trim().trim_end_matches('/');
        validate_base_url(trimmed)?;
        self.base_url = trimmed.to_string();
        Ok(())
    }
}

fn non_empty_or(value: String, fallback: String) -> String {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Accepts absolute http(s) URLs only.
pub fn validate_base_url(raw: &str) -> Result<(), ProfileError> {
    let parsed = Url::parse(raw).map_err(|err| ProfileError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ProfileError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

/// Comma separated model ids, trimmed, empty entries dropped.
pub fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Short, display-safe hint of an API key.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("({head}...{tail})")
    } else if !chars.is_empty() {
        let head: String = chars.iter().take(2).collect();
        format!("({head}...)")
    } else {
        String::new()
    }
}
