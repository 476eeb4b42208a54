use std::collections::VecDeque;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

use log::LevelFilter;
use pagesum_core::{
    update, DispatchAck, JobRequest, JobStatusKind, Msg, PopupState, ProviderId, TabHandle,
    STATUS_KEYS,
};
use pagesum_engine::{read_status, settings, KeyValueStore, LocalStore, StoreSubscription, BUSY_MESSAGE};
use pagesum_logging::{pagesum_info, pagesum_warn};

use super::commands;
use super::effects::EffectRunner;
use super::persistence::{load_config, log_config_warning, AppConfig};
use super::ui::render::Screen;
use crate::cli::{Cli, Commands};

// How often the follow loop checks whether the worker went idle.
const IDLE_POLL: Duration = Duration::from_millis(250);

pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let (config, warning) = load_config(&cli.config);
    pagesum_logging::initialize(config.log_destination(), LevelFilter::Info, &config.log_path);
    log_config_warning(warning);

    let store_path = cli.store.clone().unwrap_or_else(|| config.store_path.clone());
    pagesum_info!("pagesum starting with store {:?}", store_path);
    let store: Arc<dyn KeyValueStore> = Arc::new(LocalStore::open(store_path));
    let mut out = io::stdout().lock();

    let ok = match cli.command {
        Commands::Summarise {
            tab,
            provider,
            model,
            translate,
            no_translate,
        } => {
            let translate = match (translate, no_translate) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            summarise(store, &config, TabHandle::new(tab), provider, model, translate, out)
        }
        Commands::Status => {
            let popup = Popup::open(store, Screen::new(out))?;
            pagesum_info!("Status view shows {}", popup.status().as_str());
            Ok(true)
        }
        Commands::Profile { action } => {
            commands::profile(store.as_ref(), action, request_timeout(&config), &mut out)
        }
        Commands::Settings {
            provider,
            translate,
        } => commands::settings(store.as_ref(), provider, translate, &mut out),
        Commands::Config { write } => commands::config(&cli.config, &config, write, &mut out),
    }?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn request_timeout(config: &AppConfig) -> Duration {
    Duration::from_secs(config.request_timeout_secs.max(1))
}

fn summarise<W: Write>(
    store: Arc<dyn KeyValueStore>,
    config: &AppConfig,
    tab: TabHandle,
    provider: Option<ProviderId>,
    model: Option<String>,
    translate: Option<bool>,
    out: W,
) -> anyhow::Result<bool> {
    let provider = provider.unwrap_or_else(|| settings::selected_provider(store.as_ref()));
    let mut profile = settings::load_profile(store.as_ref(), provider)?;
    if let Some(model) = model {
        if !profile.models.contains(&model) {
            anyhow::bail!("model '{model}' is not in the {provider} model list");
        }
        if profile.model != model {
            profile.model = model;
            settings::save_profile(store.as_ref(), provider, &profile)?;
        }
    }
    let translate = translate.unwrap_or_else(|| settings::translation_enabled(store.as_ref()));
    let request = JobRequest::from_profile(provider, &profile, translate, tab);

    let runner = EffectRunner::with_store(store.clone(), request_timeout(config))?;
    let mut popup = Popup::open(store, Screen::new(out))?;
    if !popup.trigger_enabled() {
        eprintln!("{BUSY_MESSAGE}");
        runner.shutdown();
        return Ok(false);
    }

    let accepted = popup.click(request, &runner)?;
    if accepted {
        popup.follow(&runner)?;
    }
    runner.shutdown();

    Ok(accepted && popup.status() == JobStatusKind::Done)
}

/// Foreground view over the status record. Holds no job state of its own;
/// closing it and opening a new one shows the same result.
pub(crate) struct Popup<W: Write> {
    store: Arc<dyn KeyValueStore>,
    subscription: StoreSubscription,
    state: PopupState,
    screen: Screen<W>,
    last_ack: Option<DispatchAck>,
}

impl<W: Write> Popup<W> {
    /// Subscribes, reads the record once and draws the first frame.
    pub fn open(store: Arc<dyn KeyValueStore>, screen: Screen<W>) -> io::Result<Self> {
        let subscription = store.subscribe();
        let mut popup = Self {
            store,
            subscription,
            state: PopupState::new(),
            screen,
            last_ack: None,
        };
        popup.observe_record(None)?;
        popup.screen.show(&popup.state.view())?;
        Ok(popup)
    }

    pub fn status(&self) -> JobStatusKind {
        self.state.observed().status
    }

    pub fn trigger_enabled(&self) -> bool {
        self.state.trigger_enabled()
    }

    /// Presses the trigger. Returns whether the worker accepted a job.
    pub fn click(&mut self, request: JobRequest, runner: &EffectRunner) -> io::Result<bool> {
        self.last_ack = None;
        self.dispatch(Msg::SummariseClicked(request), Some(runner))?;
        Ok(self.last_ack.take().is_some_and(|ack| ack.ok))
    }

    /// Re-renders on every status change until the worker goes idle.
    pub fn follow(&mut self, runner: &EffectRunner) -> io::Result<()> {
        loop {
            match self.subscription.recv_timeout(IDLE_POLL) {
                Ok(change) if change.touches_any(&STATUS_KEYS) => {
                    self.observe_record(Some(runner))?
                }
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            if !runner.is_busy() {
                break;
            }
        }

        // The worker is idle so the record is final. If the trigger is still
        // waiting on a record identical to the pre-dispatch one, start over
        // from the record alone.
        if !self.state.trigger_enabled() {
            self.state = PopupState::new();
        }
        self.observe_record(None)?;
        self.screen.show(&self.state.view())
    }

    fn observe_record(&mut self, runner: Option<&EffectRunner>) -> io::Result<()> {
        let status = read_status(self.store.as_ref());
        self.dispatch(Msg::StatusObserved(status), runner)
    }

    fn dispatch(&mut self, msg: Msg, runner: Option<&EffectRunner>) -> io::Result<()> {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            if let Msg::DispatchAcked(ack) = &msg {
                self.last_ack = Some(ack.clone());
            }
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            if state.consume_dirty() {
                self.screen.show(&state.view())?;
            }
            self.state = state;

            if effects.is_empty() {
                continue;
            }
            match runner {
                Some(runner) => inbox.extend(runner.run(effects)),
                None => pagesum_warn!("Dropped {} effect(s): no worker attached", effects.len()),
            }
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.screen.into_inner()
    }
}
