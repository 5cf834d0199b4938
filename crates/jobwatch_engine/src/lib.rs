//! Jobwatch engine: job stream transport, decoding and record classification.
mod decode;
mod engine;
mod lines;
mod record;
mod stream;
mod transcript;
mod types;

pub use decode::{DecodeError, StreamDecoder};
pub use engine::EngineHandle;
pub use lines::LineSplitter;
pub use record::{parse_line, InvalidRecord, ParsedLine};
pub use stream::{
    consume_stream, ChannelRecordSink, JobStream, RecordSink, ReqwestJobStream, StreamConsumer,
    StreamSettings, DEFAULT_ENDPOINT,
};
pub use transcript::{write_transcript, Transcript, TranscriptError};
pub use types::{EngineEvent, FailureKind, JobRecord, RunId, RunSummary, TransportFailure};
