//! Settings stored next to the status record: per-provider profiles, the
//! selected provider and the translation toggle.

use pagesum_core::{ProviderId, ProviderProfile};
use pagesum_logging::pagesum_warn;
use serde_json::{Map, Value};

use crate::store::{KeyValueStore, StoreError};

pub const KEY_PROVIDER: &str = "provider";
pub const KEY_TRANSLATION_ENABLED: &str = "translationEnabled";

/// Loads a profile, creating it from defaults on first access. The merged
/// result is written back so later reads see a complete record.
pub fn load_profile(store: &dyn KeyValueStore, id: ProviderId) -> Result<ProviderProfile, StoreError> {
    let key = id.profile_key();
    let stored = store
        .get(&[key.as_str()])
        .remove(&key)
        .and_then(|value| match serde_json::from_value::<ProviderProfile>(value) {
            Ok(profile) => Some(profile),
            Err(err) => {
                pagesum_warn!("Ignoring unreadable profile {}: {}", key, err);
                None
            }
        });
    let merged = ProviderProfile::merged_with_defaults(stored.clone(), id);
    if stored.as_ref() != Some(&merged) {
        save_profile(store, id, &merged)?;
    }
    Ok(merged)
}

pub fn save_profile(
    store: &dyn KeyValueStore,
    id: ProviderId,
    profile: &ProviderProfile,
) -> Result<(), StoreError> {
    let mut entries = Map::new();
    entries.insert(id.profile_key(), serde_json::to_value(profile)?);
    store.set(entries)
}

/// Restores built-in defaults; the API key is cleared.
pub fn reset_profile(store: &dyn KeyValueStore, id: ProviderId) -> Result<ProviderProfile, StoreError> {
    let defaults = ProviderProfile::defaults(id);
    save_profile(store, id, &defaults)?;
    Ok(defaults)
}

pub fn selected_provider(store: &dyn KeyValueStore) -> ProviderId {
    store
        .get(&[KEY_PROVIDER])
        .get(KEY_PROVIDER)
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default()
}

pub fn set_selected_provider(store: &dyn KeyValueStore, id: ProviderId) -> Result<(), StoreError> {
    let mut entries = Map::new();
    entries.insert(KEY_PROVIDER.to_string(), Value::from(id.as_str()));
    store.set(entries)
}

pub fn translation_enabled(store: &dyn KeyValueStore) -> bool {
    store
        .get(&[KEY_TRANSLATION_ENABLED])
        .get(KEY_TRANSLATION_ENABLED)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

pub fn set_translation_enabled(store: &dyn KeyValueStore, enabled: bool) -> Result<(), StoreError> {
    let mut entries = Map::new();
    entries.insert(KEY_TRANSLATION_ENABLED.to_string(), Value::from(enabled));
    store.set(entries)
}
