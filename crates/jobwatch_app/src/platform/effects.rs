use engine_logging::{engine_info, engine_warn};
use jobwatch_core::{Effect, Msg, RunId, StreamEvent};
use jobwatch_engine::{EngineEvent, EngineHandle, JobRecord, StreamSettings};

/// Executes core effects against the engine and turns engine events into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: StreamSettings) -> Self {
        Self::from_engine(EngineHandle::new(settings))
    }

    pub fn from_engine(engine: EngineHandle) -> Self {
        Self { engine }
    }

    /// Runs the effects; returns the run that settled, if one did.
    pub fn apply(&self, effects: Vec<Effect>) -> Option<RunId> {
        let mut settled = None;
        for effect in effects {
            match effect {
                Effect::StartRun { run_id } => {
                    engine_info!("StartRun run_id={}", run_id);
                    self.engine.start(run_id);
                }
                Effect::RunSettled { run_id } => {
                    engine_info!("RunSettled run_id={}", run_id);
                    settled = Some(run_id);
                }
            }
        }
        settled
    }

    /// Blocks for the next engine event. `None` if the engine has stopped.
    pub fn next_msg(&self) -> Option<Msg> {
        self.engine.recv().map(map_event)
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Record { run_id, record } => Msg::StreamRecord {
            run_id,
            event: map_record(record),
        },
        EngineEvent::RunFinished { run_id, result } => match result {
            Ok(summary) => {
                engine_info!("Run {} stream ended: {}", run_id, summary);
                Msg::StreamEnded { run_id }
            }
            Err(failure) => {
                engine_warn!("Run {} transport failed: {}", run_id, failure);
                Msg::TransportFailed {
                    run_id,
                    reason: failure.to_string(),
                }
            }
        },
    }
}

fn map_record(record: JobRecord) -> StreamEvent {
    match record {
        JobRecord::Terminal(line) => StreamEvent::Terminal(line),
        JobRecord::State(partial) => StreamEvent::State(partial),
        JobRecord::Error(content) => StreamEvent::JobError(content),
        JobRecord::Malformed { line, reason } => StreamEvent::Malformed { line, reason },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobwatch_engine::{FailureKind, RunSummary, TransportFailure};
    use serde_json::json;

    #[test]
    fn records_map_to_stream_messages() {
        let msg = map_event(EngineEvent::Record {
            run_id: 2,
            record: JobRecord::Error(json!("boom")),
        });

        assert_eq!(
            msg,
            Msg::StreamRecord {
                run_id: 2,
                event: StreamEvent::JobError(json!("boom"))
            }
        );
    }

    #[test]
    fn finish_events_map_to_termination_messages() {
        let ended = map_event(EngineEvent::RunFinished {
            run_id: 1,
            result: Ok(RunSummary::default()),
        });
        let failed = map_event(EngineEvent::RunFinished {
            run_id: 1,
            result: Err(TransportFailure::new(FailureKind::HttpStatus(502), "")),
        });

        assert_eq!(ended, Msg::StreamEnded { run_id: 1 });
        assert_eq!(
            failed,
            Msg::TransportFailed {
                run_id: 1,
                reason: "http status 502".to_string()
            }
        );
    }
}
