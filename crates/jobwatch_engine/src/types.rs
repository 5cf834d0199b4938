use std::fmt;

use serde_json::{Map, Value};

pub type RunId = u64;

/// A classified record from the job stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRecord {
    Terminal(String),
    State(Map<String, Value>),
    Error(Value),
    /// The line was not valid JSON. Delivered so the user can see it.
    Malformed { line: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Record {
        run_id: RunId,
        record: JobRecord,
    },
    /// Emitted exactly once per run, after its last record.
    RunFinished {
        run_id: RunId,
        result: Result<RunSummary, TransportFailure>,
    },
}

/// Counters for a stream that ended cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub bytes: u64,
    pub records: usize,
    pub blank_lines: usize,
    pub invalid_records: usize,
    pub ignored_records: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes, {} records, {} blank, {} invalid, {} ignored",
            self.bytes, self.records, self.blank_lines, self.invalid_records, self.ignored_records
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    HttpStatus(u16),
    Connect,
    Timeout,
    Network,
    Decode,
    Aborted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Connect => write!(f, "connection failed"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::Aborted => write!(f, "stream task aborted"),
        }
    }
}
