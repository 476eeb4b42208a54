use pagesum_core::{ProviderId, ProviderProfile};
use pagesum_logging::pagesum_info;

use crate::adapter::adapter_for;
use crate::client::CompletionClient;
use crate::{CallError, CallFailure};

/// Result of a credential probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCheck {
    Valid,
    Invalid { status: u16 },
    Unreachable(String),
}

/// Sends the smallest possible request with the profile's key; any 2xx counts as valid.
pub async fn validate_api_key(
    client: &dyn CompletionClient,
    provider: ProviderId,
    profile: &ProviderProfile,
) -> KeyCheck {
    let request = adapter_for(provider).build_probe(&profile.base_url, &profile.model, &profile.api_key);
    let check = match client.send(request).await {
        Ok(_) => KeyCheck::Valid,
        // A 2xx with an odd body still proves the key was accepted.
        Err(CallError {
            kind: CallFailure::InvalidBody,
            ..
        }) => KeyCheck::Valid,
        Err(CallError {
            kind: CallFailure::HttpStatus(status),
            ..
        }) => KeyCheck::Invalid { status },
        Err(err) => KeyCheck::Unreachable(err.to_string()),
    };
    pagesum_info!("API key check for {}: {:?}", provider, check);
    check
}
