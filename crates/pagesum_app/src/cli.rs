//! CLI definitions for pagesum.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pagesum_core::ProviderId;

/// Summarise web pages with an LLM provider.
#[derive(Parser)]
#[command(name = "pagesum")]
#[command(about = "Summarise a page in the background and follow the result")]
#[command(version)]
pub(crate) struct Cli {
    /// Application config file (RON)
    #[arg(short, long, default_value = "pagesum.ron", global = true)]
    pub config: PathBuf,

    /// Override the store file from the config
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Summarise a page and follow progress until it settles
    Summarise {
        /// Page URL or local file path
        #[arg(long)]
        tab: String,

        /// Provider to use instead of the selected one
        #[arg(long)]
        provider: Option<ProviderId>,

        /// Model from the provider's list; becomes the selected model
        #[arg(long)]
        model: Option<String>,

        /// Translate the summary to Chinese
        #[arg(long, conflicts_with = "no_translate")]
        translate: bool,

        /// Skip translation even if enabled in settings
        #[arg(long)]
        no_translate: bool,
    },

    /// Show the last job's status and result
    Status,

    /// Provider profile management
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Selected provider and translation toggle
    Settings {
        /// Provider used by `summarise`
        #[arg(long)]
        provider: Option<ProviderId>,

        /// Translate summaries by default
        #[arg(long)]
        translate: Option<Toggle>,
    },

    /// Show the effective application config
    Config {
        /// Write the effective config to the config path
        #[arg(long)]
        write: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum ProfileAction {
    /// Print a provider profile with the API key masked
    Show {
        #[arg(long)]
        provider: Option<ProviderId>,
    },

    /// Change fields that are saved without a credential check
    Set {
        #[arg(long)]
        provider: Option<ProviderId>,

        /// Selected model; must be in the model list
        #[arg(long)]
        model: Option<String>,

        /// Summary prompt
        #[arg(long)]
        prompt: Option<String>,
    },

    /// Restore a provider profile to its defaults
    Reset {
        #[arg(long)]
        provider: Option<ProviderId>,
    },

    /// Check an API key against the provider and save it when accepted
    Validate {
        #[arg(long)]
        provider: Option<ProviderId>,

        /// Key to check; defaults to the stored key
        #[arg(long)]
        api_key: Option<String>,

        /// Base URL to save with the key
        #[arg(long)]
        base_url: Option<String>,

        /// Comma separated model list; the first entry becomes the model
        #[arg(long)]
        models: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        matches!(self, Toggle::On)
    }
}
