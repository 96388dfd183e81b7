//! Server-sent event handling for streamed completions.

use medimind_logging::log_stream_chunk;
use medimind_models::StreamChunk;
use medimind_types::END_OF_SEQUENCE_MARKER;

use crate::error::RemoteError;

/// One decoded SSE event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    Data(String),
    Done,
}

/// Incremental line decoder for `data: {json}` streams.
///
/// Bytes are buffered until a full line is available, so multi-byte
/// characters split across network chunks decode correctly.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning the events completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<SseEvent>, RemoteError> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(line_end) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=line_end).collect();
            if let Some(event) = parse_line(&line[..line.len() - 1])? {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Flush a trailing line that was not newline-terminated
    pub fn finish(&mut self) -> Result<Vec<SseEvent>, RemoteError> {
        let rest = std::mem::take(&mut self.buffer);
        Ok(parse_line(&rest)?.into_iter().collect())
    }
}

fn parse_line(raw: &[u8]) -> Result<Option<SseEvent>, RemoteError> {
    let line = std::str::from_utf8(raw)
        .map_err(|e| RemoteError::MalformedStream(format!("invalid UTF-8 in stream: {}", e)))?;
    let line = line.strip_suffix('\r').unwrap_or(line);

    // Blank separators, comments and other SSE fields carry no content
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let data = data.trim_start();
    if data.trim() == "[DONE]" {
        return Ok(Some(SseEvent::Done));
    }
    Ok(Some(SseEvent::Data(data.to_string())))
}

/// Accumulates content fragments from stream chunks in arrival order
#[derive(Debug, Default)]
pub struct StreamAggregator {
    content: String,
    chunks: usize,
}

impl StreamAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one `data:` payload and append its content fragment
    pub fn accept(&mut self, data: &str) -> Result<(), RemoteError> {
        self.chunks += 1;
        log_stream_chunk(self.chunks, data);

        let chunk: StreamChunk = serde_json::from_str(data).map_err(|e| {
            RemoteError::MalformedStream(format!("chunk #{}: {}", self.chunks, e))
        })?;
        if let Some(fragment) = chunk.content() {
            self.content.push_str(fragment);
        }
        Ok(())
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Final text with every end-of-sequence marker removed
    pub fn finish(self) -> String {
        self.content.replace(END_OF_SEQUENCE_MARKER, "")
    }
}
