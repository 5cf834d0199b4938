use engine_logging::engine_debug;
use serde_json::Value;

use crate::view_model::{AppViewModel, Banner, GroupView, Severity};
use crate::{InputGroup, InputSets, RunLog, SelectedFile, StatusSnapshot, StreamEvent};

pub type RunId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Running,
    Succeeded,
    /// Start was attempted with empty groups; waiting for the user to continue.
    WarningPending(Vec<InputGroup>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    inputs: InputSets,
    outcome: Option<RunOutcome>,
    processing: bool,
    current_run: Option<RunId>,
    next_run_id: RunId,
    log: RunLog,
    snapshot: StatusSnapshot,
    banner: Option<Banner>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summary of the state for rendering. The log and snapshot are not copied;
    /// read them through [`AppState::log`] and [`AppState::snapshot`].
    pub fn view(&self) -> AppViewModel {
        let warning_pending = matches!(self.outcome, Some(RunOutcome::WarningPending(_)));
        AppViewModel {
            groups: InputGroup::ALL
                .into_iter()
                .map(|group| GroupView::new(group, self.inputs.files(group)))
                .collect(),
            run_id: self.current_run,
            outcome: self.outcome.clone(),
            processing: self.processing,
            start_enabled: !self.processing,
            continue_enabled: warning_pending && !self.processing,
            start_label: if self.processing {
                "Processing..."
            } else {
                "Start processing"
            },
            banner: self.banner.clone(),
            log_len: self.log.len(),
            dirty: self.dirty,
        }
    }

    pub fn inputs(&self) -> &InputSets {
        &self.inputs
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn current_run(&self) -> Option<RunId> {
        self.current_run
    }

    pub fn log(&self) -> &RunLog {
        &self.log
    }

    pub fn snapshot(&self) -> &StatusSnapshot {
        &self.snapshot
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_current_run(&self, run_id: RunId) -> bool {
        self.processing && self.current_run == Some(run_id)
    }

    pub(crate) fn warning_pending(&self) -> bool {
        matches!(self.outcome, Some(RunOutcome::WarningPending(_)))
    }

    pub(crate) fn select_files(&mut self, group: InputGroup, files: Vec<SelectedFile>) {
        match self.inputs.replace(group, files) {
            Ok(()) => {
                // The user was warned about a selection that no longer exists.
                if self.warning_pending() {
                    self.outcome = None;
                    self.banner = None;
                }
            }
            Err(err) => {
                engine_debug!("Rejected selection for {}: {}", group, err);
                self.banner = Some(Banner::new(Severity::Error, format!("Error: {err}")));
            }
        }
        self.mark_dirty();
    }

    pub(crate) fn park_for_confirmation(&mut self, missing: Vec<InputGroup>) {
        let labels = missing
            .iter()
            .map(|group| group.label())
            .collect::<Vec<_>>()
            .join(", ");
        self.banner = Some(Banner::new(
            Severity::Warning,
            format!("Warning: no files selected for {labels}. Continue anyway?"),
        ));
        self.outcome = Some(RunOutcome::WarningPending(missing));
        self.mark_dirty();
    }

    /// Resets both projections and marks the state busy for a new run.
    pub(crate) fn begin_run(&mut self) -> RunId {
        self.next_run_id += 1;
        let run_id = self.next_run_id;
        self.current_run = Some(run_id);
        self.log.clear();
        self.snapshot.clear();
        self.processing = true;
        self.outcome = Some(RunOutcome::Running);
        self.banner = Some(Banner::new(Severity::Info, "Processing started..."));
        self.mark_dirty();
        run_id
    }

    pub(crate) fn apply_stream_event(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Terminal(line) => self.log.push(line),
            StreamEvent::State(partial) => self.snapshot.merge(partial),
            StreamEvent::JobError(content) => {
                let reason = describe_content(&content);
                self.log.push(format!("Error: {reason}"));
                self.fail(reason);
            }
            StreamEvent::Malformed { line, reason } => {
                self.log
                    .push(format!("Failed to parse record: {reason} (line: {line})"));
            }
        }
        self.mark_dirty();
    }

    pub(crate) fn settle_success(&mut self) {
        self.processing = false;
        if self.outcome == Some(RunOutcome::Running) {
            self.outcome = Some(RunOutcome::Succeeded);
            self.banner = Some(Banner::new(Severity::Success, "Processing complete!"));
        }
        self.mark_dirty();
    }

    pub(crate) fn settle_failure(&mut self, reason: String) {
        self.processing = false;
        self.log.push(format!("Transport failure: {reason}"));
        self.fail(reason);
        self.mark_dirty();
    }

    fn fail(&mut self, reason: String) {
        self.banner = Some(Banner::new(Severity::Error, format!("Error: {reason}")));
        self.outcome = Some(RunOutcome::Failed(reason));
    }
}

/// Strings are shown verbatim, anything else as compact JSON.
pub(crate) fn describe_content(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
