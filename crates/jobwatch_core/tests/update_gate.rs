use std::sync::Once;

use jobwatch_core::{
    update, AppState, Effect, InputGroup, Msg, RunOutcome, SelectedFile, Severity,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn select(state: AppState, group: InputGroup, names: &[&str]) -> AppState {
    let files = names
        .iter()
        .map(|name| SelectedFile::new(*name, b"payload".to_vec()))
        .collect();
    let (state, effects) = update(state, Msg::FilesSelected { group, files });
    assert!(effects.is_empty());
    state
}

fn fully_selected() -> AppState {
    let state = select(AppState::new(), InputGroup::Primary, &["a.jpg", "b.jpg"]);
    let state = select(state, InputGroup::Secondary, &["c.png"]);
    select(state, InputGroup::Format, &["format.xlsx"])
}

fn start_runs(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, Effect::StartRun { .. }))
        .count()
}

#[test]
fn start_with_all_inputs_starts_exactly_one_run() {
    init_logging();
    let (state, effects) = update(fully_selected(), Msg::StartClicked);

    assert_eq!(effects, vec![Effect::StartRun { run_id: 1 }]);
    let view = state.view();
    assert!(view.processing);
    assert!(!view.start_enabled);
    assert_eq!(view.start_label, "Processing...");
    assert_eq!(view.outcome, Some(RunOutcome::Running));
}

#[test]
fn start_with_missing_inputs_warns_and_does_not_start() {
    init_logging();
    let state = select(AppState::new(), InputGroup::Secondary, &["c.png"]);

    let (state, effects) = update(state, Msg::StartClicked);

    assert!(effects.is_empty());
    let view = state.view();
    assert!(!view.processing);
    assert!(view.continue_enabled);
    assert_eq!(
        view.outcome,
        Some(RunOutcome::WarningPending(vec![
            InputGroup::Primary,
            InputGroup::Format
        ]))
    );
    let banner = view.banner.expect("warning banner");
    assert_eq!(banner.severity, Severity::Warning);
    assert_eq!(
        banner.text,
        "Warning: no files selected for Primary sample files, Format file. Continue anyway?"
    );
}

#[test]
fn continue_starts_without_asking_again() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StartClicked);

    let (state, effects) = update(state, Msg::ContinueClicked);

    assert_eq!(start_runs(&effects), 1);
    assert_eq!(state.view().outcome, Some(RunOutcome::Running));
    assert!(state.is_processing());
}

#[test]
fn continue_without_pending_warning_is_ignored() {
    init_logging();
    let (state, effects) = update(fully_selected(), Msg::ContinueClicked);
    assert!(effects.is_empty());
    assert_eq!(state.outcome(), None);

    let (state, _) = update(state, Msg::StartClicked);
    let (_state, effects) = update(state, Msg::ContinueClicked);
    assert!(effects.is_empty());
}

#[test]
fn second_start_while_processing_is_ignored() {
    init_logging();
    let (state, first) = update(fully_selected(), Msg::StartClicked);
    let (state, second) = update(state, Msg::StartClicked);

    assert_eq!(start_runs(&first), 1);
    assert!(second.is_empty());
    assert_eq!(state.current_run(), Some(1));
}

#[test]
fn changing_selection_discards_pending_warning() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StartClicked);
    assert!(state.view().continue_enabled);

    let state = select(state, InputGroup::Primary, &["new.jpg"]);
    let view = state.view();

    assert_eq!(view.outcome, None);
    assert!(!view.continue_enabled);
    let (_state, effects) = update(state, Msg::ContinueClicked);
    assert!(effects.is_empty());
}

#[test]
fn rejected_selection_shows_error_and_keeps_previous_files() {
    init_logging();
    let state = select(AppState::new(), InputGroup::Format, &["format.xlsx"]);

    let mut state = select(state, InputGroup::Format, &["one.xlsx", "two.xlsx"]);
    assert!(state.consume_dirty());
    let view = state.view();

    assert_eq!(view.groups[2].files, vec!["format.xlsx".to_string()]);
    let banner = view.banner.expect("error banner");
    assert_eq!(banner.severity, Severity::Error);
    assert!(banner.text.contains("single file"));
}

#[test]
fn group_views_follow_declaration_order() {
    let state = fully_selected();
    let view = state.view();
    let groups: Vec<_> = view.groups.iter().map(|g| g.group).collect();

    assert_eq!(
        groups,
        vec![InputGroup::Primary, InputGroup::Secondary, InputGroup::Format]
    );
    assert_eq!(view.groups[0].summary(), "Selected files: a.jpg, b.jpg");
    assert_eq!(AppState::new().view().groups[1].summary(), "No file selected");
}
