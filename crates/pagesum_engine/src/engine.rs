use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use futures_util::future::join_all;
use pagesum_core::{ControllerMessage, DispatchAck, JobRequest};
use pagesum_logging::{pagesum_error, pagesum_info, pagesum_warn};

use crate::pipeline::Orchestrator;

pub const BUSY_MESSAGE: &str = "A summary is already in progress";

enum EngineCommand {
    Summarise {
        request: JobRequest,
        ack: mpsc::Sender<DispatchAck>,
    },
}

/// Clears the in-flight flag however the job task ends.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Background context: owns a tokio runtime on its own thread and runs at
/// most one job at a time, independent of any foreground instance.
pub struct EngineHandle {
    cmd_tx: Option<mpsc::Sender<EngineCommand>>,
    busy: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(orchestrator: Orchestrator) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let busy = Arc::new(AtomicBool::new(false));
        // Only this handle writes the record from here on.
        if let Err(err) = orchestrator.recover_interrupted() {
            pagesum_error!("Could not settle an interrupted record: {}", err);
        }
        let orchestrator = Arc::new(orchestrator);

        let worker_busy = busy.clone();
        let worker = thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    pagesum_error!("Could not start background runtime: {}", err);
                    return;
                }
            };
            let next_id = AtomicU64::new(1);
            let mut in_flight: Vec<tokio::task::JoinHandle<()>> = Vec::new();

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Summarise { request, ack } => {
                        if worker_busy.swap(true, Ordering::SeqCst) {
                            pagesum_warn!("Rejected job while another is running: {}", request);
                            let _ = ack.send(DispatchAck::rejected(BUSY_MESSAGE));
                            continue;
                        }
                        let job_id = next_id.fetch_add(1, Ordering::Relaxed);
                        pagesum_info!("Accepted job {}: {}", job_id, request);
                        let _ = ack.send(DispatchAck::accepted());

                        let orchestrator = orchestrator.clone();
                        let guard = BusyGuard(worker_busy.clone());
                        in_flight.retain(|handle| !handle.is_finished());
                        in_flight.push(runtime.spawn(async move {
                            let _guard = guard;
                            let outcome = orchestrator.run(&request).await;
                            pagesum_info!("Job {} settled, success={}", job_id, outcome.is_success());
                        }));
                    }
                }
            }

            // Handle dropped: let running jobs reach a terminal state first.
            runtime.block_on(join_all(in_flight));
        });

        Self {
            cmd_tx: Some(cmd_tx),
            busy,
            worker: Some(worker),
        }
    }

    /// Fire-and-forget dispatch. The returned receiver yields the advisory ack.
    pub fn dispatch(&self, request: JobRequest) -> mpsc::Receiver<DispatchAck> {
        let (ack_tx, ack_rx) = mpsc::channel();
        let sent = self.cmd_tx.as_ref().map(|tx| {
            tx.send(EngineCommand::Summarise {
                request,
                ack: ack_tx.clone(),
            })
        });
        if !matches!(sent, Some(Ok(()))) {
            let _ = ack_tx.send(DispatchAck::rejected("Background worker is not running"));
        }
        ack_rx
    }

    pub fn handle_message(&self, message: ControllerMessage) -> mpsc::Receiver<DispatchAck> {
        match message {
            ControllerMessage::Summarise(request) => self.dispatch(request),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Stops accepting work and waits for the in-flight job to settle.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.cmd_tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                pagesum_error!("Background worker panicked");
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
