use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use pagesum_engine::write_atomically;
use pagesum_logging::{pagesum_info, pagesum_warn, LogDestination};
use serde::{Deserialize, Serialize};

/// Application config, read from a RON file. Every field has a default so a
/// partial file is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub store_path: PathBuf,
    /// One of `file`, `terminal`, `both`, `off`.
    pub log_destination: String,
    pub log_path: PathBuf,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("pagesum_store.json"),
            log_destination: "file".to_string(),
            log_path: pagesum_logging::default_log_path(),
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    pub fn log_destination(&self) -> LogDestination {
        LogDestination::from_name(&self.log_destination).unwrap_or_default()
    }
}

/// Reads the config; a missing or unreadable file yields defaults.
///
/// Called before logging is up, so problems are returned as warnings for the
/// caller to log once the logger exists.
pub(crate) fn load_config(path: &Path) -> (AppConfig, Option<String>) {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return (AppConfig::default(), None);
        }
        Err(err) => {
            return (
                AppConfig::default(),
                Some(format!("Failed to read config from {:?}: {}", path, err)),
            );
        }
    };

    match ron::from_str(&content) {
        Ok(config) => (config, None),
        Err(err) => (
            AppConfig::default(),
            Some(format!("Failed to parse config from {:?}: {}", path, err)),
        ),
    }
}

pub(crate) fn save_config(path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(config, pretty).context("serialize config")?;
    write_atomically(path, content.as_bytes())
        .with_context(|| format!("write config to {}", path.display()))?;
    pagesum_info!("Saved config to {:?}", path);
    Ok(())
}

pub(crate) fn log_config_warning(warning: Option<String>) {
    if let Some(message) = warning {
        pagesum_warn!("{}", message);
    }
}
