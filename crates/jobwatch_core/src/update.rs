use engine_logging::engine_debug;

use crate::gate::{self, GateDecision};
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesSelected { group, files } => {
            state.select_files(group, files);
            Vec::new()
        }
        Msg::StartClicked => {
            if state.is_processing() {
                engine_debug!("Start ignored: run {:?} is processing", state.current_run());
                return (state, Vec::new());
            }
            match gate::evaluate(state.inputs()) {
                GateDecision::Ready => start_run(&mut state),
                GateDecision::NeedsConfirmation(missing) => {
                    state.park_for_confirmation(missing);
                    Vec::new()
                }
            }
        }
        Msg::ContinueClicked => {
            // The gate already warned about this exact selection; do not ask twice.
            if state.warning_pending() && !state.is_processing() {
                start_run(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::StreamRecord { run_id, event } => {
            if state.is_current_run(run_id) {
                state.apply_stream_event(event);
            } else {
                engine_debug!("Dropping record for stale run {}", run_id);
            }
            Vec::new()
        }
        Msg::StreamEnded { run_id } => {
            if !state.is_current_run(run_id) {
                engine_debug!("Ignoring end of stale run {}", run_id);
                return (state, Vec::new());
            }
            state.settle_success();
            vec![Effect::RunSettled { run_id }]
        }
        Msg::TransportFailed { run_id, reason } => {
            if !state.is_current_run(run_id) {
                engine_debug!("Ignoring transport failure of stale run {}", run_id);
                return (state, Vec::new());
            }
            state.settle_failure(reason);
            vec![Effect::RunSettled { run_id }]
        }
    };

    (state, effects)
}

fn start_run(state: &mut AppState) -> Vec<Effect> {
    let run_id = state.begin_run();
    vec![Effect::StartRun { run_id }]
}
