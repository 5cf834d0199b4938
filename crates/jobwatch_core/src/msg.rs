use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User replaced the selection of one input group.
    FilesSelected {
        group: crate::InputGroup,
        files: Vec<crate::SelectedFile>,
    },
    /// User clicked Start.
    StartClicked,
    /// User chose to continue despite missing inputs.
    ContinueClicked,
    /// A classified record arrived on the run's stream.
    StreamRecord {
        run_id: crate::RunId,
        event: StreamEvent,
    },
    /// The run's stream ended cleanly.
    StreamEnded { run_id: crate::RunId },
    /// The run's transport failed; the stream is closed.
    TransportFailed {
        run_id: crate::RunId,
        reason: String,
    },
}

/// One record from the job stream, already classified by type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Terminal(String),
    State(Map<String, Value>),
    JobError(Value),
    /// A line that was not valid JSON.
    Malformed { line: String, reason: String },
}
