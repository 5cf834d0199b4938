use std::sync::Once;

use jobwatch_core::{update, AppState, Effect, Msg, RunId, RunOutcome, Severity, StreamEvent};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// Starts a run through the missing-input warning so no files are needed.
fn running(state: AppState) -> (AppState, RunId) {
    let (state, _) = update(state, Msg::StartClicked);
    let (state, effects) = update(state, Msg::ContinueClicked);
    match effects.as_slice() {
        [Effect::StartRun { run_id }] => (state, *run_id),
        other => panic!("expected a single StartRun, got {other:?}"),
    }
}

fn feed(state: AppState, run_id: RunId, events: Vec<StreamEvent>) -> AppState {
    events.into_iter().fold(state, |state, event| {
        let (state, effects) = update(state, Msg::StreamRecord { run_id, event });
        assert!(effects.is_empty());
        state
    })
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn terminal_records_append_in_arrival_order() {
    init_logging();
    let (state, run_id) = running(AppState::new());

    let state = feed(
        state,
        run_id,
        vec![
            StreamEvent::Terminal("a".to_string()),
            StreamEvent::Terminal("b".to_string()),
        ],
    );

    assert_eq!(state.log().lines(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn state_records_merge_shallowly() {
    init_logging();
    let (state, run_id) = running(AppState::new());

    let state = feed(
        state,
        run_id,
        vec![
            StreamEvent::State(object(json!({"x": 1}))),
            StreamEvent::State(object(json!({"y": 2}))),
        ],
    );
    assert_eq!(state.snapshot().to_value(), json!({"x": 1, "y": 2}));

    let state = feed(
        state,
        run_id,
        vec![StreamEvent::State(object(json!({"x": 2})))],
    );
    assert_eq!(state.snapshot().to_value(), json!({"x": 2, "y": 2}));
    assert!(state.log().is_empty());
}

#[test]
fn clean_end_succeeds_and_clears_busy() {
    init_logging();
    let (state, run_id) = running(AppState::new());
    let state = feed(state, run_id, vec![StreamEvent::Terminal("done".into())]);

    let (state, effects) = update(state, Msg::StreamEnded { run_id });

    assert_eq!(effects, vec![Effect::RunSettled { run_id }]);
    let view = state.view();
    assert!(!view.processing);
    assert!(view.start_enabled);
    assert_eq!(view.outcome, Some(RunOutcome::Succeeded));
    assert_eq!(view.banner.unwrap().severity, Severity::Success);
}

#[test]
fn error_record_fails_run_but_stream_continues() {
    init_logging();
    let (state, run_id) = running(AppState::new());

    let state = feed(
        state,
        run_id,
        vec![
            StreamEvent::JobError(json!("boom")),
            StreamEvent::Terminal("after".into()),
        ],
    );
    assert!(state.is_processing());
    assert_eq!(state.outcome(), Some(&RunOutcome::Failed("boom".into())));

    let (state, effects) = update(state, Msg::StreamEnded { run_id });

    assert_eq!(effects, vec![Effect::RunSettled { run_id }]);
    let view = state.view();
    assert!(!view.processing);
    assert_eq!(view.outcome, Some(RunOutcome::Failed("boom".into())));
    assert_eq!(
        state.log().lines(),
        vec!["Error: boom".to_string(), "after".to_string()]
    );
    assert_eq!(view.banner.unwrap().severity, Severity::Error);
}

#[test]
fn structured_error_content_is_rendered_as_json() {
    init_logging();
    let (state, run_id) = running(AppState::new());

    let state = feed(
        state,
        run_id,
        vec![StreamEvent::JobError(json!({"code": 7}))],
    );

    assert_eq!(
        state.outcome(),
        Some(&RunOutcome::Failed(r#"{"code":7}"#.into()))
    );
    assert_eq!(state.log().lines(), &[r#"Error: {"code":7}"#]);
}

#[test]
fn malformed_line_is_logged_and_run_continues() {
    init_logging();
    let (state, run_id) = running(AppState::new());

    let state = feed(
        state,
        run_id,
        vec![
            StreamEvent::Malformed {
                line: "{not json".into(),
                reason: "key must be a string at line 1 column 2".into(),
            },
            StreamEvent::Terminal("still here".into()),
        ],
    );
    let (state, _) = update(state, Msg::StreamEnded { run_id });

    let view = state.view();
    assert_eq!(state.log().len(), 2);
    assert!(state.log().lines()[0].starts_with("Failed to parse record:"));
    assert!(state.log().lines()[0].contains("{not json"));
    assert_eq!(state.log().lines()[1], "still here");
    assert_eq!(view.outcome, Some(RunOutcome::Succeeded));
}

#[test]
fn transport_failure_fails_run_with_diagnostic_line() {
    init_logging();
    let (state, run_id) = running(AppState::new());
    let state = feed(state, run_id, vec![StreamEvent::Terminal("partial".into())]);

    let (state, effects) = update(
        state,
        Msg::TransportFailed {
            run_id,
            reason: "http status 503".into(),
        },
    );

    assert_eq!(effects, vec![Effect::RunSettled { run_id }]);
    let view = state.view();
    assert!(!view.processing);
    assert_eq!(view.outcome, Some(RunOutcome::Failed("http status 503".into())));
    assert_eq!(
        state.log().lines(),
        vec![
            "partial".to_string(),
            "Transport failure: http status 503".to_string()
        ]
    );
}

#[test]
fn busy_flag_is_cleared_once_and_late_terminations_are_ignored() {
    init_logging();
    let (state, run_id) = running(AppState::new());
    let (state, first) = update(state, Msg::StreamEnded { run_id });
    let (state, second) = update(state, Msg::StreamEnded { run_id });
    let (state, third) = update(
        state,
        Msg::TransportFailed {
            run_id,
            reason: "late".into(),
        },
    );

    assert_eq!(first, vec![Effect::RunSettled { run_id }]);
    assert!(second.is_empty());
    assert!(third.is_empty());
    assert_eq!(state.outcome(), Some(&RunOutcome::Succeeded));
}

#[test]
fn second_run_starts_with_empty_projections() {
    init_logging();
    let (state, first_run) = running(AppState::new());
    let state = feed(
        state,
        first_run,
        vec![
            StreamEvent::Terminal("old".into()),
            StreamEvent::State(object(json!({"iteration_count": 3}))),
            StreamEvent::JobError(json!("failed before")),
        ],
    );
    let (state, _) = update(state, Msg::StreamEnded { run_id: first_run });

    let (state, second_run) = running(state);

    assert_ne!(first_run, second_run);
    let view = state.view();
    assert!(state.log().is_empty());
    assert_eq!(view.log_len, 0);
    assert!(state.snapshot().is_empty());
    assert_eq!(view.outcome, Some(RunOutcome::Running));
}

#[test]
fn records_from_a_stale_run_are_dropped() {
    init_logging();
    let (state, first_run) = running(AppState::new());
    let (state, _) = update(state, Msg::StreamEnded { run_id: first_run });
    let (state, second_run) = running(state);

    let state = feed(
        state,
        first_run,
        vec![StreamEvent::Terminal("from the past".into())],
    );
    let state = feed(state, second_run, vec![StreamEvent::Terminal("now".into())]);

    assert_eq!(state.log().lines(), vec!["now".to_string()]);
}
