use crate::{InputGroup, RunId, RunOutcome, SelectedFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// One-line message shown above the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub severity: Severity,
    pub text: String,
}

impl Banner {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub groups: Vec<GroupView>,
    pub run_id: Option<RunId>,
    pub outcome: Option<RunOutcome>,
    pub processing: bool,
    pub start_enabled: bool,
    pub continue_enabled: bool,
    pub start_label: &'static str,
    pub banner: Option<Banner>,
    pub log_len: usize,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub group: InputGroup,
    pub label: &'static str,
    pub files: Vec<String>,
}

impl GroupView {
    pub(crate) fn new(group: InputGroup, files: &[SelectedFile]) -> Self {
        Self {
            group,
            label: group.label(),
            files: files.iter().map(|file| file.name.clone()).collect(),
        }
    }

    pub fn summary(&self) -> String {
        if self.files.is_empty() {
            "No file selected".to_string()
        } else {
            format!("Selected files: {}", self.files.join(", "))
        }
    }
}
