use std::time::Duration;

use pagesum_logging::pagesum_debug;
use serde_json::Value;

use crate::adapter::ProviderRequest;
use crate::{CallError, CallFailure};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    /// Whole-call budget; expiry aborts the request.
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// POSTs the request and returns the parsed JSON body of a 2xx response.
    async fn send(&self, request: ProviderRequest) -> Result<Value, CallError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestCompletionClient {
    client: reqwest::Client,
}

impl ReqwestCompletionClient {
    pub fn new(settings: ClientSettings) -> Result<Self, CallError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| CallError::new(CallFailure::Network, err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl CompletionClient for ReqwestCompletionClient {
    async fn send(&self, request: ProviderRequest) -> Result<Value, CallError> {
        let body = serde_json::to_vec(&request.body)
            .map_err(|err| CallError::new(CallFailure::InvalidBody, err.to_string()))?;

        let mut builder = self.client.post(&request.url).body(body);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        pagesum_debug!("POST {} -> {}", request.url, status);
        if !status.is_success() {
            return Err(CallError::new(
                CallFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&bytes)
            .map_err(|err| CallError::new(CallFailure::InvalidBody, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> CallError {
    if err.is_timeout() {
        return CallError::new(CallFailure::Timeout, err.to_string());
    }
    CallError::new(CallFailure::Network, err.to_string())
}
