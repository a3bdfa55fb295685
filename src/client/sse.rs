//! Server-Sent Events parsing for streamed task snapshots.
//!
//! Implements the grammar from §4.2: zero-or-more `event: update` frames
//! followed by exactly one `event: complete` or `event: error` terminator,
//! with `:`-prefixed keep-alive comments ignored in between. Handles
//! multi-line `data:` fields, CRLF and bare-LF line endings, and partial
//! lines split across TCP chunks.

use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;

use crate::error::{A2AError, A2AResult};
use crate::types::Task;
use crate::utils::constants::DEFAULT_STREAM_TIMEOUT_SECS;

/// The terminator (or lack of one) that produced a [`Chunk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Update,
    Complete,
    Error,
}

#[derive(Debug, Clone)]
pub struct Chunk {
    pub kind: ChunkKind,
    pub task: Task,
}

/// A stream of parsed task snapshots from a `/tasks/stream` response.
pub struct SseStream {
    receiver: mpsc::Receiver<A2AResult<Chunk>>,
    _task: tokio::task::JoinHandle<()>,
}

impl std::fmt::Debug for SseStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SseStream").finish_non_exhaustive()
    }
}

impl SseStream {
    pub(crate) fn from_response(response: reqwest::Response) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let task = tokio::spawn(async move {
            if let Err(e) = parse_sse_body(response, &tx).await {
                let _ = tx.send(Err(e)).await;
            }
        });
        Self {
            receiver: rx,
            _task: task,
        }
    }

    pub async fn next(&mut self) -> Option<A2AResult<Chunk>> {
        self.receiver.recv().await
    }
}

/// One buffered SSE frame: an `event:` name plus accumulated `data:` lines.
#[derive(Default)]
struct PendingFrame {
    event: Option<String>,
    data_lines: Vec<String>,
}

impl PendingFrame {
    fn is_empty(&self) -> bool {
        self.event.is_none() && self.data_lines.is_empty()
    }

    fn take(&mut self) -> Option<(String, String)> {
        if self.data_lines.is_empty() {
            self.event = None;
            return None;
        }
        let event = self.event.take().unwrap_or_else(|| "message".to_string());
        let data = std::mem::take(&mut self.data_lines).join("\n");
        Some((event, data))
    }
}

async fn parse_sse_body(
    response: reqwest::Response,
    tx: &mpsc::Sender<A2AResult<Chunk>>,
) -> A2AResult<()> {
    let mut stream = response.bytes_stream();
    let mut buffer = String::new();
    let mut frame = PendingFrame::default();
    let idle_timeout = Duration::from_secs(DEFAULT_STREAM_TIMEOUT_SECS);

    loop {
        let next = tokio::time::timeout(idle_timeout, stream.next()).await;
        let chunk_result = match next {
            Ok(Some(result)) => result,
            Ok(None) => break,
            Err(_) => {
                let _ = tx
                    .send(Err(A2AError::Timeout(
                        "no data received on event stream within the idle timeout".to_string(),
                    )))
                    .await;
                return Ok(());
            }
        };

        let bytes = chunk_result
            .map_err(|e| A2AError::response(format!("error reading event stream: {e}")))?;
        let text = String::from_utf8_lossy(&bytes);
        buffer.push_str(&text);

        while let Some(newline_pos) = buffer.find('\n') {
            let line = buffer[..newline_pos].trim_end_matches('\r').to_string();
            buffer = buffer[newline_pos + 1..].to_string();
            process_line(&line, &mut frame, tx).await?;
        }
    }

    if !frame.is_empty() {
        emit_frame(&mut frame, tx).await?;
    }

    Ok(())
}

async fn process_line(
    line: &str,
    frame: &mut PendingFrame,
    tx: &mpsc::Sender<A2AResult<Chunk>>,
) -> A2AResult<()> {
    if line.is_empty() {
        // Blank line: frame boundary.
        emit_frame(frame, tx).await?;
        return Ok(());
    }

    if line.starts_with(':') {
        // Comment / keep-alive — ignored.
        return Ok(());
    }

    if let Some(rest) = line.strip_prefix("event:") {
        frame.event = Some(rest.trim().to_string());
        return Ok(());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        frame.data_lines.push(rest.trim_start().to_string());
        return Ok(());
    }

    // `id:`, `retry:`, or anything else — not part of this wire contract.
    Ok(())
}

async fn emit_frame(
    frame: &mut PendingFrame,
    tx: &mpsc::Sender<A2AResult<Chunk>>,
) -> A2AResult<()> {
    let Some((event, data)) = frame.take() else {
        return Ok(());
    };

    let kind = match event.as_str() {
        "update" => ChunkKind::Update,
        "complete" => ChunkKind::Complete,
        "error" => ChunkKind::Error,
        other => {
            tracing::debug!(event = other, "ignoring unrecognized SSE event type");
            return Ok(());
        }
    };

    if kind == ChunkKind::Error {
        let message = serde_json::from_str::<serde_json::Value>(&data)
            .ok()
            .and_then(|v| v.get("error").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or(data);
        let _ = tx.send(Err(A2AError::response(message))).await;
        return Ok(());
    }

    let task: Task = serde_json::from_str(&data)
        .map_err(|e| A2AError::response(format!("invalid task snapshot in event stream: {e}")))?;

    if tx.send(Ok(Chunk { kind, task })).await.is_err() {
        // Receiver dropped — stop parsing.
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn process_line_accumulates_multiline_data() {
        let mut frame = PendingFrame::default();
        let (tx, mut rx) = mpsc::channel(4);

        process_line("event: update", &mut frame, &tx).await.unwrap();
        process_line(
            "data: {\"id\":\"t-1\",\"status\":{\"state\":\"submitted\"},\"history\":[],\"artifacts\":[]}",
            &mut frame,
            &tx,
        )
        .await
        .unwrap();
        process_line("", &mut frame, &tx).await.unwrap();

        let chunk = rx.recv().await.unwrap().unwrap();
        assert_eq!(chunk.kind, ChunkKind::Update);
        assert_eq!(chunk.task.id, "t-1");
    }

    #[tokio::test]
    async fn keep_alive_comment_is_ignored() {
        let mut frame = PendingFrame::default();
        let (tx, mut rx) = mpsc::channel(4);
        process_line(": keep-alive", &mut frame, &tx).await.unwrap();
        process_line("", &mut frame, &tx).await.unwrap();
        assert!(frame.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn error_event_carries_message() {
        let mut frame = PendingFrame::default();
        let (tx, mut rx) = mpsc::channel(4);
        process_line("event: error", &mut frame, &tx).await.unwrap();
        process_line("data: {\"error\":\"boom\"}", &mut frame, &tx)
            .await
            .unwrap();
        process_line("", &mut frame, &tx).await.unwrap();

        let err = rx.recv().await.unwrap().unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
