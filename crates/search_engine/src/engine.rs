use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use search_logging::search_error;

use crate::fetch::{Fetcher, ReqwestFetcher};
use crate::scan::{run_scan, ChannelEventSink, GenerationGate, ScanRequest, ScanSettings};
use crate::{EngineEvent, FetchError, Generation};

enum EngineCommand {
    Scan(ScanRequest),
}

/// Runs scans on a background tokio runtime and hands events back over a channel.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    gate: GenerationGate,
}

impl EngineHandle {
    pub fn new(settings: ScanSettings) -> Result<Self, FetchError> {
        let fetcher = ReqwestFetcher::new(settings.fetch.clone())?;
        Ok(Self::with_fetcher(settings, Arc::new(fetcher)))
    }

    pub fn with_fetcher(settings: ScanSettings, fetcher: Arc<dyn Fetcher>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let gate = GenerationGate::new();
        let worker_gate = gate.clone();
        let settings = Arc::new(settings);

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let fetcher = fetcher.clone();
                let settings = settings.clone();
                let gate = worker_gate.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(fetcher.as_ref(), &settings, &gate, command, event_tx).await;
                });
            }
        });

        Self {
            cmd_tx,
            event_rx,
            gate,
        }
    }

    /// Start scanning; any older scan becomes stale immediately.
    pub fn start_scan(&self, request: ScanRequest) {
        self.gate.advance(request.generation);
        let _ = self.cmd_tx.send(EngineCommand::Scan(request));
    }

    /// Mark every scan older than `generation` as stale.
    pub fn invalidate(&self, generation: Generation) {
        self.gate.advance(generation);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    fetcher: &dyn Fetcher,
    settings: &ScanSettings,
    gate: &GenerationGate,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Scan(request) => {
            let sink = ChannelEventSink::new(event_tx.clone());
            if let Err(error) = run_scan(fetcher, &request, settings, gate, &sink).await {
                search_logging::set_search_generation(request.generation);
                search_error!("scan could not start: {error}");
                let _ = event_tx.send(EngineEvent::ScanAborted {
                    generation: request.generation,
                    error,
                });
            }
        }
    }
}
