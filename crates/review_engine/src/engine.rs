use std::sync::{mpsc, Arc};
use std::thread;

use review_logging::{review_debug, review_warn};

use crate::catalog::ModelCatalog;
use crate::dispatch::{Classifier, DispatchSettings, ReqwestClassifier};
use crate::history::{HistorySink, ReqwestHistorySink, RunRecord};
use crate::normalize::normalize;
use crate::{ClassifyRequest, DispatchError, NormalizedRun};

enum EngineCommand {
    Classify { request: ClassifyRequest },
    FetchModels { token: String },
    RecordHistory { record: RunRecord, token: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A classification run finished; the payload is already normalized,
    /// so the state machine never sees producer-specific shapes.
    RunFinished {
        result: Result<NormalizedRun, DispatchError>,
    },
    /// The model catalog answered.
    ModelsFetched {
        result: Result<Vec<String>, DispatchError>,
    },
    // RecordHistory is fire-and-forget: its outcome is logged, never
    // surfaced as an event.
}

/// Owns the worker thread running the async side. Commands go in over a
/// channel; events come back the same way for the caller to poll.
pub struct EngineHandle {
    cmd_tx: Option<mpsc::Sender<EngineCommand>>,
    event_rx: mpsc::Receiver<EngineEvent>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: DispatchSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();
        let classifier = Arc::new(ReqwestClassifier::new(settings.clone()));
        let catalog = Arc::new(ModelCatalog::new(settings.clone()));
        let history = Arc::new(ReqwestHistorySink::new(settings));

        let worker = thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut pending = Vec::new();
            while let Ok(command) = cmd_rx.recv() {
                let classifier = classifier.clone();
                let catalog = catalog.clone();
                let history = history.clone();
                let event_tx = event_tx.clone();
                pending.push(runtime.spawn(async move {
                    handle_command(
                        classifier.as_ref(),
                        catalog.as_ref(),
                        history.as_ref(),
                        command,
                        event_tx,
                    )
                    .await;
                }));
                pending.retain(|task| !task.is_finished());
            }
            // Command channel closed: drain what is still in flight,
            // the detached history posts included, before the runtime
            // is dropped and cancels everything.
            runtime.block_on(async {
                for task in pending {
                    let _ = task.await;
                }
            });
        });

        Self {
            cmd_tx: Some(cmd_tx),
            event_rx,
            worker: Some(worker),
        }
    }

    fn send(&self, command: EngineCommand) {
        if let Some(cmd_tx) = &self.cmd_tx {
            let _ = cmd_tx.send(command);
        }
    }

    pub fn classify(&self, request: ClassifyRequest) {
        self.send(EngineCommand::Classify { request });
    }

    pub fn fetch_models(&self, token: impl Into<String>) {
        self.send(EngineCommand::FetchModels {
            token: token.into(),
        });
    }

    pub fn record_history(&self, record: RunRecord, token: impl Into<String>) {
        self.send(EngineCommand::RecordHistory {
            record,
            token: token.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Closes the command channel and blocks until in-flight work has
    /// finished. Without this, a short-lived caller exits while the
    /// best-effort history post is still on the wire.
    pub fn shutdown(mut self) {
        self.cmd_tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

async fn handle_command(
    classifier: &dyn Classifier,
    catalog: &ModelCatalog,
    history: &dyn HistorySink,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Classify { request } => {
            let result = classifier
                .classify(&request)
                .await
                .map(|raw| normalize(&raw));
            let _ = event_tx.send(EngineEvent::RunFinished { result });
        }
        EngineCommand::FetchModels { token } => {
            let result = catalog.fetch(&token).await;
            let _ = event_tx.send(EngineEvent::ModelsFetched { result });
        }
        EngineCommand::RecordHistory { record, token } => {
            // Best-effort: failures are logged and swallowed.
            match history.record(&record, &token).await {
                Ok(()) => review_debug!(
                    "history saved model={} issue={}",
                    record.model_name,
                    record.issue_number
                ),
                Err(err) => review_warn!("failed to save history: {}", err),
            }
        }
    }
}
