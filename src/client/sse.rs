//! Server-Sent Events handling for streaming JSON-RPC methods.
//!
//! The `data:` lines of each event are parsed into one raw JSON value.
//! Events are not unwrapped or typed here: every streamed JSON-RPC response
//! has to pass the same classifier as a unary one.

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::{TckError, TckResult};

/// A stream of raw JSON events from a SUT.
///
/// # Example
///
/// ```no_run
/// # async fn example(mut stream: a2a_tck::client::SseStream) {
/// while let Some(event) = stream.next().await {
///     match event {
///         Ok(value) => println!("event: {value}"),
///         Err(e) => eprintln!("stream error: {e}"),
///     }
/// }
/// # }
/// ```
pub struct SseStream {
    receiver: mpsc::Receiver<TckResult<Value>>,
    _task: tokio::task::JoinHandle<()>,
}

impl std::fmt::Debug for SseStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SseStream").finish_non_exhaustive()
    }
}

impl SseStream {
    /// Create an `SseStream` from a raw `reqwest::Response`.
    ///
    /// A SUT that answers a streaming request with a plain JSON body (for
    /// example a JSON-RPC error) yields that body as the only event.
    pub(crate) fn from_response(response: reqwest::Response) -> Self {
        let (tx, rx) = mpsc::channel(64);

        let is_event_stream = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("text/event-stream"))
            .unwrap_or(false);

        let task = tokio::spawn(async move {
            let outcome = if is_event_stream {
                parse_sse_stream(response, &tx).await
            } else {
                forward_single_body(response, &tx).await
            };
            if let Err(e) = outcome {
                let _ = tx.send(Err(e)).await;
            }
        });

        Self {
            receiver: rx,
            _task: task,
        }
    }

    /// Get the next event from the stream.
    ///
    /// Returns `None` when the SUT closed the stream.
    pub async fn next(&mut self) -> Option<TckResult<Value>> {
        self.receiver.recv().await
    }

    /// Drain the stream, stopping at the first transport error.
    pub async fn collect_all(mut self) -> TckResult<Vec<Value>> {
        let mut events = Vec::new();
        while let Some(event) = self.next().await {
            events.push(event?);
        }
        Ok(events)
    }
}

async fn forward_single_body(
    response: reqwest::Response,
    tx: &mpsc::Sender<TckResult<Value>>,
) -> TckResult<()> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| TckError::Transport(format!("failed to read response body: {e}")))?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| TckError::InvalidJson(format!("failed to parse response body: {e}")))?;
    let _ = tx.send(Ok(value)).await;
    Ok(())
}

/// Reads an SSE body and sends one parsed JSON value per event to `tx`.
async fn parse_sse_stream(
    response: reqwest::Response,
    tx: &mpsc::Sender<TckResult<Value>>,
) -> TckResult<()> {
    use futures::StreamExt;

    let mut chunks = response.bytes_stream();
    // Bytes, not text: a chunk boundary may split a multi-byte character.
    let mut pending: Vec<u8> = Vec::new();
    let mut event = EventBuffer::default();

    while let Some(chunk) = chunks.next().await {
        let chunk =
            chunk.map_err(|e| TckError::Transport(format!("error reading SSE stream: {e}")))?;
        pending.extend_from_slice(&chunk);

        while let Some(line) = take_line(&mut pending)? {
            if let Some(value) = event.push_line(&line)? {
                if tx.send(Ok(value)).await.is_err() {
                    return Ok(());
                }
            }
        }
    }

    // The body may end without the blank line that closes the last event.
    let rest = decode_line(&pending)?.trim_end_matches('\r').to_string();
    if !rest.is_empty() {
        event.push_line(&rest)?;
    }
    if let Some(value) = event.finish()? {
        let _ = tx.send(Ok(value)).await;
    }

    Ok(())
}

/// Removes the first complete line from `pending`, without its `\n` or `\r\n`.
fn take_line(pending: &mut Vec<u8>) -> TckResult<Option<String>> {
    let Some(newline) = pending.iter().position(|b| *b == b'\n') else {
        return Ok(None);
    };
    let raw: Vec<u8> = pending.drain(..=newline).collect();
    let line = decode_line(&raw[..newline])?;
    Ok(Some(line.trim_end_matches('\r').to_string()))
}

fn decode_line(raw: &[u8]) -> TckResult<&str> {
    std::str::from_utf8(raw)
        .map_err(|e| TckError::Transport(format!("invalid UTF-8 in SSE stream: {e}")))
}

/// Collects the `data:` lines of one event until the blank line ending it.
///
/// Consecutive `data:` lines are joined with `\n`, so JSON split across
/// lines parses as one value. Comments and `event:`/`id:`/`retry:` fields
/// are ignored.
#[derive(Debug, Default)]
struct EventBuffer {
    data: Vec<String>,
}

impl EventBuffer {
    /// Feeds one line. Returns the event's JSON once a blank line closes it.
    fn push_line(&mut self, line: &str) -> TckResult<Option<Value>> {
        if line.is_empty() {
            return self.finish();
        }
        if let Some(data) = line.strip_prefix("data:") {
            let data = data.strip_prefix(' ').unwrap_or(data);
            self.data.push(data.to_string());
        }
        Ok(None)
    }

    /// Parses and clears whatever data has been collected.
    fn finish(&mut self) -> TckResult<Option<Value>> {
        let joined = self.data.join("\n");
        self.data.clear();

        let data = joined.trim();
        if data.is_empty() || data == "[DONE]" {
            return Ok(None);
        }

        serde_json::from_str(data).map(Some).map_err(|e| {
            TckError::InvalidJson(format!("SSE event is not JSON: {e} (data: {data})"))
        })
    }
}
