//! Provider adapters: pure mapping between a completion call and each vendor's
//! HTTP request/response shape. No state, no IO.

use pagesum_core::text::TEMPERATURE;
use pagesum_core::{AdapterKind, ProviderId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything needed for one provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCall {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub system_instruction: String,
    pub user_content: String,
    pub max_tokens: u32,
}

/// A fully described HTTP POST, ready for the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

impl ProviderRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub trait ProviderAdapter: Send + Sync {
    fn build_request(&self, call: &CompletionCall) -> ProviderRequest;

    /// Cheapest possible call, used to check credentials.
    fn build_probe(&self, base_url: &str, model: &str, api_key: &str) -> ProviderRequest;

    /// Text of the first answer, or `None` when the shape carries no text.
    fn extract_response_text(&self, body: &Value) -> Option<String>;
}

/// Registry lookup: the only place that knows which shape a provider speaks.
pub fn adapter_for(provider: ProviderId) -> Box<dyn ProviderAdapter> {
    let spec = provider.spec();
    match spec.adapter {
        AdapterKind::ChatCompletions => Box::new(ChatCompletionsAdapter {
            endpoint: spec.endpoint,
        }),
        AdapterKind::GenerateContent => Box::new(GenerateContentAdapter),
    }
}

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatReply>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible `{baseUrl}{endpoint}` chat API with bearer auth.
#[derive(Debug, Clone, Copy)]
pub struct ChatCompletionsAdapter {
    pub endpoint: &'static str,
}

impl ChatCompletionsAdapter {
    fn post(&self, base_url: &str, api_key: &str, body: Value) -> ProviderRequest {
        ProviderRequest {
            url: format!("{base_url}{}", self.endpoint),
            headers: vec![
                ("Authorization", format!("Bearer {api_key}")),
                ("Content-Type", JSON_CONTENT_TYPE.to_string()),
            ],
            body,
        }
    }
}

impl ProviderAdapter for ChatCompletionsAdapter {
    fn build_request(&self, call: &CompletionCall) -> ProviderRequest {
        let body = ChatRequest {
            model: &call.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &call.system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: &call.user_content,
                },
            ],
            max_tokens: call.max_tokens,
            temperature: Some(TEMPERATURE),
        };
        self.post(&call.base_url, &call.api_key, to_body(&body))
    }

    fn build_probe(&self, base_url: &str, model: &str, api_key: &str) -> ProviderRequest {
        let body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            max_tokens: 5,
            temperature: None,
        };
        self.post(base_url, api_key, to_body(&body))
    }

    fn extract_response_text(&self, body: &Value) -> Option<String> {
        let response = ChatResponse::deserialize(body).ok()?;
        response
            .choices
            .into_iter()
            .next()?
            .message?
            .content
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Gemini-style `{baseUrl}/{model}:generateContent` with an API-key header.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateContentAdapter;

impl GenerateContentAdapter {
    fn post(&self, base_url: &str, model: &str, api_key: &str, body: Value) -> ProviderRequest {
        ProviderRequest {
            url: format!("{base_url}/{model}:generateContent"),
            headers: vec![
                ("Content-Type", JSON_CONTENT_TYPE.to_string()),
                ("x-goog-api-key", api_key.to_string()),
            ],
            body,
        }
    }
}

impl ProviderAdapter for GenerateContentAdapter {
    fn build_request(&self, call: &CompletionCall) -> ProviderRequest {
        let body = GenerateRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: &call.user_content,
                }],
            }],
            generation_config: Some(GenerationConfig {
                max_output_tokens: call.max_tokens,
                temperature: TEMPERATURE,
            }),
            system_instruction: Some(GeminiContent {
                parts: vec![GeminiPart {
                    text: &call.system_instruction,
                }],
            }),
        };
        self.post(&call.base_url, &call.model, &call.api_key, to_body(&body))
    }

    fn build_probe(&self, base_url: &str, model: &str, api_key: &str) -> ProviderRequest {
        let body = GenerateRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: "hi" }],
            }],
            generation_config: None,
            system_instruction: None,
        };
        self.post(base_url, model, api_key, to_body(&body))
    }

    fn extract_response_text(&self, body: &Value) -> Option<String> {
        let response = GenerateResponse::deserialize(body).ok()?;
        response
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.trim().is_empty())
    }
}

fn to_body<T: Serialize>(body: &T) -> Value {
    // Wire structs hold only strings and numbers; serialisation cannot fail.
    serde_json::to_value(body).unwrap_or(Value::Null)
}
