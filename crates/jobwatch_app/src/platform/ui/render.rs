use jobwatch_core::{AppViewModel, Banner, RunId, RunOutcome, Severity};
use serde_json::{Map, Value};

/// Turns view models into terminal lines, printing only what changed.
#[derive(Debug, Default)]
pub struct TerminalView {
    shown_run: Option<RunId>,
    printed_lines: usize,
    last_banner: Option<Banner>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// `log` is the current run's full log; only lines past the last call are printed.
    pub fn render(&mut self, view: &AppViewModel, log: &[String]) -> Vec<String> {
        let mut lines = Vec::new();

        if view.run_id.is_some() && view.run_id != self.shown_run {
            self.shown_run = view.run_id;
            self.printed_lines = 0;
            if let Some(run_id) = view.run_id {
                lines.push(format!("=== run {run_id} ==="));
            }
        }

        if view.banner != self.last_banner {
            if let Some(banner) = &view.banner {
                lines.push(format_banner(banner));
            }
            self.last_banner = view.banner.clone();
        }

        // The log only shrinks when a new run cleared it.
        if log.len() < self.printed_lines {
            self.printed_lines = 0;
        }
        lines.extend(
            log[self.printed_lines..]
                .iter()
                .map(|line| format!("  | {line}")),
        );
        self.printed_lines = log.len();

        lines
    }
}

pub fn render_selection(view: &AppViewModel) -> Vec<String> {
    view.groups
        .iter()
        .map(|group| format!("{}: {}", group.label, group.summary()))
        .collect()
}

pub fn render_snapshot(snapshot: &Map<String, Value>) -> String {
    if snapshot.is_empty() {
        return "Status: (empty)".to_string();
    }
    let pretty = serde_json::to_string_pretty(snapshot)
        .unwrap_or_else(|_| Value::Object(snapshot.clone()).to_string());
    format!("Status:\n{pretty}")
}

pub fn outcome_label(outcome: Option<&RunOutcome>) -> String {
    match outcome {
        None => "not started".to_string(),
        Some(RunOutcome::Running) => "running".to_string(),
        Some(RunOutcome::Succeeded) => "succeeded".to_string(),
        Some(RunOutcome::WarningPending(_)) => "warning-pending".to_string(),
        Some(RunOutcome::Failed(reason)) => format!("failed: {reason}"),
    }
}

fn format_banner(banner: &Banner) -> String {
    let tag = match banner.severity {
        Severity::Info => "info",
        Severity::Success => "ok",
        Severity::Warning => "warn",
        Severity::Error => "error",
    };
    format!("[{tag}] {}", banner.text)
}
