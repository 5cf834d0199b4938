use std::time::Duration;

use bytes::Bytes;
use engine_logging::{engine_debug, engine_info, engine_warn};
use futures_util::{Stream, StreamExt};
use reqwest::header::CONTENT_TYPE;

use crate::decode::StreamDecoder;
use crate::lines::LineSplitter;
use crate::record::{parse_line, ParsedLine};
use crate::{EngineEvent, FailureKind, RunId, RunSummary, TransportFailure};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/process";

#[derive(Debug, Clone)]
pub struct StreamSettings {
    pub endpoint: String,
    /// Limits connection setup only; the stream itself may stay open indefinitely.
    pub connect_timeout: Duration,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

pub trait RecordSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelRecordSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelRecordSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl RecordSink for ChannelRecordSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Source of a job's event stream. Records go to the sink in arrival order;
/// the returned value describes how the stream terminated.
#[async_trait::async_trait]
pub trait JobStream: Send + Sync {
    async fn run(
        &self,
        run_id: RunId,
        sink: &dyn RecordSink,
    ) -> Result<RunSummary, TransportFailure>;
}

/// Incremental decode, split and classify state for one run.
pub struct StreamConsumer {
    run_id: RunId,
    decoder: StreamDecoder,
    splitter: LineSplitter,
    summary: RunSummary,
}

impl StreamConsumer {
    pub fn new(run_id: RunId, decoder: StreamDecoder) -> Self {
        Self {
            run_id,
            decoder,
            splitter: LineSplitter::new(),
            summary: RunSummary::default(),
        }
    }

    pub fn feed(&mut self, chunk: &[u8], sink: &dyn RecordSink) -> Result<(), TransportFailure> {
        self.summary.bytes += chunk.len() as u64;
        let text = self
            .decoder
            .decode(chunk, false)
            .map_err(|err| TransportFailure::new(FailureKind::Decode, err.to_string()))?;
        for line in self.splitter.push(&text) {
            self.handle_line(&line, sink);
        }
        Ok(())
    }

    /// Flushes the decoder and any unterminated last line.
    pub fn finish(mut self, sink: &dyn RecordSink) -> Result<RunSummary, TransportFailure> {
        let text = self
            .decoder
            .decode(&[], true)
            .map_err(|err| TransportFailure::new(FailureKind::Decode, err.to_string()))?;
        let mut lines = self.splitter.push(&text);
        lines.extend(self.splitter.finish());
        for line in lines {
            self.handle_line(&line, sink);
        }
        Ok(self.summary)
    }

    fn handle_line(&mut self, line: &str, sink: &dyn RecordSink) {
        match parse_line(line) {
            ParsedLine::Blank => self.summary.blank_lines += 1,
            ParsedLine::Record(record) => {
                self.summary.records += 1;
                sink.emit(EngineEvent::Record {
                    run_id: self.run_id,
                    record,
                });
            }
            ParsedLine::Invalid(invalid) => {
                self.summary.invalid_records += 1;
                engine_warn!(
                    "run {}: discarding invalid record ({}): {}",
                    self.run_id,
                    invalid,
                    line
                );
            }
            ParsedLine::Unknown { kind } => {
                self.summary.ignored_records += 1;
                engine_warn!("run {}: ignoring record of unknown type {:?}", self.run_id, kind);
            }
        }
    }
}

/// Drives a consumer over a chunk stream until it ends or fails.
pub async fn consume_stream<S>(
    run_id: RunId,
    chunks: S,
    decoder: StreamDecoder,
    sink: &dyn RecordSink,
) -> Result<RunSummary, TransportFailure>
where
    S: Stream<Item = Result<Bytes, TransportFailure>>,
{
    let mut chunks = std::pin::pin!(chunks);
    let mut consumer = StreamConsumer::new(run_id, decoder);
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        engine_debug!("run {}: received {} bytes", run_id, chunk.len());
        consumer.feed(&chunk, sink)?;
    }
    consumer.finish(sink)
}

#[derive(Debug, Clone)]
pub struct ReqwestJobStream {
    settings: StreamSettings,
}

impl ReqwestJobStream {
    pub fn new(settings: StreamSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, TransportFailure> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .build()
            .map_err(|err| TransportFailure::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl JobStream for ReqwestJobStream {
    async fn run(
        &self,
        run_id: RunId,
        sink: &dyn RecordSink,
    ) -> Result<RunSummary, TransportFailure> {
        let endpoint = url::Url::parse(&self.settings.endpoint)
            .map_err(|err| TransportFailure::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        let client = self.build_client()?;

        engine_info!("run {}: GET {}", run_id, endpoint);
        let response = client
            .get(endpoint.as_str())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportFailure::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        let decoder = StreamDecoder::for_content_type(content_type);
        engine_debug!(
            "run {}: streaming {:?} as {}",
            run_id,
            content_type,
            decoder.encoding_name()
        );

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_reqwest_error));
        consume_stream(run_id, chunks, decoder, sink).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        return TransportFailure::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_connect() {
        return TransportFailure::new(FailureKind::Connect, err.to_string());
    }
    TransportFailure::new(FailureKind::Network, err.to_string())
}
