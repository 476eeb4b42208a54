use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use pagesum_core::{DispatchAck, Effect, Msg};
use pagesum_engine::{
    ClientSettings, EngineHandle, HtmlPageExtractor, KeyValueStore, LogNotifier, Orchestrator,
    ReqwestCompletionClient,
};
use pagesum_logging::{pagesum_info, pagesum_warn};

const ACK_TIMEOUT: Duration = Duration::from_secs(5);
const NO_ACK_MESSAGE: &str = "Background worker did not respond";

/// Turns core effects into engine calls and feeds the answers back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    /// Wires the production collaborators around `store`.
    pub fn with_store(store: Arc<dyn KeyValueStore>, request_timeout: Duration) -> anyhow::Result<Self> {
        let client = ReqwestCompletionClient::new(ClientSettings {
            request_timeout,
            ..ClientSettings::default()
        })
        .context("build HTTP client")?;
        let orchestrator = Orchestrator::new(
            store,
            Arc::new(HtmlPageExtractor::default()),
            Arc::new(client),
            Arc::new(LogNotifier),
        );
        Ok(Self::new(EngineHandle::new(orchestrator)))
    }

    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        effects
            .into_iter()
            .map(|effect| match effect {
                Effect::DispatchJob(request) => {
                    pagesum_info!("DispatchJob {}", request);
                    let ack = self
                        .engine
                        .dispatch(request)
                        .recv_timeout(ACK_TIMEOUT)
                        .unwrap_or_else(|err| {
                            pagesum_warn!("No dispatch ack: {}", err);
                            DispatchAck::rejected(NO_ACK_MESSAGE)
                        });
                    Msg::DispatchAcked(ack)
                }
            })
            .collect()
    }

    pub fn is_busy(&self) -> bool {
        self.engine.is_busy()
    }

    /// Waits for the in-flight job before returning.
    pub fn shutdown(self) {
        self.engine.shutdown();
    }
}
