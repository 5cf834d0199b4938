use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_error, engine_info, engine_warn};

use crate::stream::{ChannelRecordSink, JobStream, ReqwestJobStream, StreamSettings};
use crate::{EngineEvent, FailureKind, RunId, TransportFailure};

enum EngineCommand {
    Start { run_id: RunId },
}

/// Runs job streams on a background tokio runtime and reports their events.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: StreamSettings) -> Self {
        Self::with_stream(Arc::new(ReqwestJobStream::new(settings)))
    }

    pub fn with_stream(stream: Arc<dyn JobStream>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Failed to start engine runtime: {}", err);
                    fail_pending(cmd_rx, event_tx, &err.to_string());
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let stream = stream.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(handle_command(stream, command, event_tx));
            }
        });

        Self { cmd_tx, event_rx }
    }

    /// Starts streaming a run. The caller guarantees one run at a time.
    pub fn start(&self, run_id: RunId) {
        let _ = self.cmd_tx.send(EngineCommand::Start { run_id });
    }

    /// Blocks until the next event; `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    stream: Arc<dyn JobStream>,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Start { run_id } => {
            let sink = ChannelRecordSink::new(event_tx.clone());
            // Run in its own task so a panic still produces a terminal event.
            let task = tokio::spawn(async move { stream.run(run_id, &sink).await });
            let result = match task.await {
                Ok(result) => result,
                Err(err) => {
                    engine_error!("run {}: stream task failed: {}", run_id, err);
                    Err(TransportFailure::new(FailureKind::Aborted, err.to_string()))
                }
            };
            match &result {
                Ok(summary) => engine_info!("run {}: stream ended ({})", run_id, summary),
                Err(failure) => engine_warn!("run {}: {}", run_id, failure),
            }
            let _ = event_tx.send(EngineEvent::RunFinished { run_id, result });
        }
    }
}

/// Without a runtime every requested run fails immediately.
fn fail_pending(
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    reason: &str,
) {
    while let Ok(EngineCommand::Start { run_id }) = cmd_rx.recv() {
        let _ = event_tx.send(EngineEvent::RunFinished {
            run_id,
            result: Err(TransportFailure::new(FailureKind::Aborted, reason)),
        });
    }
}
