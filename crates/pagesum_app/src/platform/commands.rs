//! Settings commands: provider profiles, the selected provider, the
//! translation toggle and the app config.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use pagesum_core::{mask_api_key, parse_model_list, ProfileError, ProviderId, ProviderProfile};
use pagesum_engine::{
    settings, validate_api_key, ClientSettings, KeyCheck, KeyValueStore, ReqwestCompletionClient,
};
use pagesum_logging::pagesum_info;

use super::persistence::{save_config, AppConfig};
use crate::cli::{ProfileAction, Toggle};

pub(crate) fn profile(
    store: &dyn KeyValueStore,
    action: ProfileAction,
    request_timeout: Duration,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    match action {
        ProfileAction::Show { provider } => {
            let id = provider.unwrap_or_else(|| settings::selected_provider(store));
            let profile = settings::load_profile(store, id)?;
            print_profile(out, id, &profile)?;
        }
        ProfileAction::Set {
            provider,
            model,
            prompt,
        } => {
            let id = provider.unwrap_or_else(|| settings::selected_provider(store));
            let mut profile = settings::load_profile(store, id)?;
            if let Some(model) = model {
                if !profile.models.contains(&model) {
                    anyhow::bail!("model '{model}' is not in the {id} model list");
                }
                profile.model = model;
            }
            if let Some(prompt) = prompt {
                profile.prompt = prompt;
            }
            settings::save_profile(store, id, &profile)?;
            // Re-read so an emptied prompt shows its default.
            let profile = settings::load_profile(store, id)?;
            print_profile(out, id, &profile)?;
        }
        ProfileAction::Reset { provider } => {
            let id = provider.unwrap_or_else(|| settings::selected_provider(store));
            let profile = settings::reset_profile(store, id)?;
            writeln!(out, "✓ Reset to defaults")?;
            print_profile(out, id, &profile)?;
        }
        ProfileAction::Validate {
            provider,
            api_key,
            base_url,
            models,
        } => {
            let id = provider.unwrap_or_else(|| settings::selected_provider(store));
            return validate_and_save(store, id, api_key, base_url, models, request_timeout, out);
        }
    }
    Ok(true)
}

/// Probes the candidate credentials and persists them only when accepted.
fn validate_and_save(
    store: &dyn KeyValueStore,
    id: ProviderId,
    api_key: Option<String>,
    base_url: Option<String>,
    models: Option<String>,
    request_timeout: Duration,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let mut candidate = settings::load_profile(store, id)?;
    if let Some(key) = api_key {
        candidate.api_key = key.trim().to_string();
    }
    if !candidate.has_api_key() {
        writeln!(out, "{}", ProfileError::MissingApiKey)?;
        return Ok(false);
    }
    if let Some(url) = base_url.filter(|url| !url.trim().is_empty()) {
        candidate.set_base_url(&url)?;
    }
    if let Some(list) = models {
        let parsed = parse_model_list(&list);
        if !parsed.is_empty() {
            candidate.model = parsed[0].clone();
            candidate.set_models(parsed)?;
        }
    }

    let client = ReqwestCompletionClient::new(ClientSettings {
        request_timeout,
        ..ClientSettings::default()
    })
    .context("build HTTP client")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start validation runtime")?;
    let check = runtime.block_on(validate_api_key(&client, id, &candidate));

    match check {
        KeyCheck::Valid => {
            settings::save_profile(store, id, &candidate)?;
            pagesum_info!("Saved validated profile for {}", id);
            writeln!(out, "✓ Valid & Saved {}", mask_api_key(&candidate.api_key))?;
            Ok(true)
        }
        KeyCheck::Invalid { status } => {
            writeln!(out, "✗ Invalid API key (HTTP {status})")?;
            Ok(false)
        }
        KeyCheck::Unreachable(message) => {
            writeln!(out, "✗ Error: {message}")?;
            Ok(false)
        }
    }
}

fn print_profile(out: &mut impl Write, id: ProviderId, profile: &ProviderProfile) -> std::io::Result<()> {
    let key = if profile.has_api_key() {
        mask_api_key(&profile.api_key)
    } else {
        "not set".to_string()
    };
    writeln!(out, "Provider: {} ({})", id.spec().name, id)?;
    writeln!(out, "Base URL: {}", profile.base_url)?;
    writeln!(out, "Model: {}", profile.model)?;
    writeln!(out, "Models: {}", profile.models.join(", "))?;
    writeln!(out, "API key: {key}")?;
    writeln!(out, "Prompt: {}", profile.prompt)
}

pub(crate) fn settings(
    store: &dyn KeyValueStore,
    provider: Option<ProviderId>,
    translate: Option<Toggle>,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    if let Some(id) = provider {
        settings::set_selected_provider(store, id)?;
        // Materialise the profile the way selecting a provider does.
        settings::load_profile(store, id)?;
    }
    if let Some(toggle) = translate {
        settings::set_translation_enabled(store, toggle.is_on())?;
    }
    let provider = settings::selected_provider(store);
    let translation = if settings::translation_enabled(store) {
        "on"
    } else {
        "off"
    };
    writeln!(out, "Provider: {} ({})", provider.spec().name, provider)?;
    writeln!(out, "Translation: {translation}")?;
    Ok(true)
}

pub(crate) fn config(
    path: &Path,
    config: &AppConfig,
    write: bool,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let text = ron::ser::to_string_pretty(config, ron::ser::PrettyConfig::new())
        .context("serialize config")?;
    writeln!(out, "{text}")?;
    if write {
        save_config(path, config)?;
        writeln!(out, "Written to {}", path.display())?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesum_engine::LocalStore;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn run_profile(store: &LocalStore, action: ProfileAction) -> (bool, String) {
        let mut out = Vec::new();
        let ok = profile(store, action, Duration::from_secs(2), &mut out).unwrap();
        (ok, String::from_utf8(out).unwrap())
    }

    #[test]
    fn show_creates_defaults_and_masks_key() {
        let store = LocalStore::in_memory();
        let (_, text) = run_profile(&store, ProfileAction::Show { provider: None });
        assert!(text.starts_with("Provider: Google Gemini (gemini)\n"));
        assert!(text.contains("API key: not set\n"));

        let mut stored = settings::load_profile(&store, ProviderId::Openai).unwrap();
        stored.api_key = "sk-1234567890abcd".to_string();
        settings::save_profile(&store, ProviderId::Openai, &stored).unwrap();
        let (_, text) = run_profile(
            &store,
            ProfileAction::Show {
                provider: Some(ProviderId::Openai),
            },
        );
        assert!(text.contains("API key: (sk-1...abcd)\n"));
        assert!(text.contains("Models: gpt-4o-mini, gpt-4o, gpt-3.5-turbo\n"));
    }

    #[test]
    fn set_accepts_listed_model_and_rejects_others() {
        let store = LocalStore::in_memory();
        let (ok, _) = run_profile(
            &store,
            ProfileAction::Set {
                provider: Some(ProviderId::Gemini),
                model: Some("gemini-2.5-pro".to_string()),
                prompt: Some("Be brief".to_string()),
            },
        );
        assert!(ok);
        let saved = settings::load_profile(&store, ProviderId::Gemini).unwrap();
        assert_eq!(saved.model, "gemini-2.5-pro");
        assert_eq!(saved.prompt, "Be brief");

        let mut out = Vec::new();
        let err = profile(
            &store,
            ProfileAction::Set {
                provider: Some(ProviderId::Gemini),
                model: Some("gpt-4o".to_string()),
                prompt: None,
            },
            Duration::from_secs(2),
            &mut out,
        )
        .unwrap_err();
        assert!(err.to_string().contains("not in the gemini model list"));
    }

    #[test]
    fn reset_restores_defaults() {
        let store = LocalStore::in_memory();
        let mut stored = settings::load_profile(&store, ProviderId::Minimax).unwrap();
        stored.api_key = "secret-key-value".to_string();
        stored.prompt = "Custom".to_string();
        settings::save_profile(&store, ProviderId::Minimax, &stored).unwrap();

        let (_, text) = run_profile(
            &store,
            ProfileAction::Reset {
                provider: Some(ProviderId::Minimax),
            },
        );
        assert!(text.starts_with("✓ Reset to defaults\n"));
        assert_eq!(
            settings::load_profile(&store, ProviderId::Minimax).unwrap(),
            ProviderProfile::defaults(ProviderId::Minimax)
        );
    }

    #[test]
    fn validate_without_key_saves_nothing() {
        let store = LocalStore::in_memory();
        let (ok, text) = run_profile(
            &store,
            ProfileAction::Validate {
                provider: Some(ProviderId::Openai),
                api_key: Some("   ".to_string()),
                base_url: None,
                models: None,
            },
        );
        assert!(!ok);
        assert_eq!(text, "API key required\n");
        assert!(!settings::load_profile(&store, ProviderId::Openai)
            .unwrap()
            .has_api_key());
    }

    #[test]
    fn validate_with_unreachable_host_keeps_old_profile() {
        let store = LocalStore::in_memory();
        let (ok, text) = run_profile(
            &store,
            ProfileAction::Validate {
                provider: Some(ProviderId::Openai),
                api_key: Some("sk-new-key-123456".to_string()),
                base_url: Some("http://127.0.0.1:1/v1".to_string()),
                models: Some("gpt-4o, gpt-4o-mini".to_string()),
            },
        );
        assert!(!ok);
        assert!(text.starts_with("✗ Error: "));
        assert_eq!(
            settings::load_profile(&store, ProviderId::Openai).unwrap(),
            ProviderProfile::defaults(ProviderId::Openai)
        );
    }

    #[test]
    fn settings_updates_provider_and_toggle() {
        let store = LocalStore::in_memory();
        let mut out = Vec::new();
        settings(&store, Some(ProviderId::Openai), Some(Toggle::On), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Provider: OpenAI (openai)\nTranslation: on\n"
        );
        assert_eq!(settings::selected_provider(&store), ProviderId::Openai);
        assert!(settings::translation_enabled(&store));
    }

    #[test]
    fn config_write_saves_ron() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pagesum.ron");
        let mut out = Vec::new();
        config(&path, &AppConfig::default(), true, &mut out).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("request_timeout_secs: 30"));
    }
}
