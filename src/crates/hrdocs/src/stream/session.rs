//! Client-side execution session
//!
//! Consumes a chunked response body, reassembles its text fragments, and
//! tracks the state machine
//! `idle -> awaiting_first_byte -> streaming -> completed | failed | cancelled`.
//! A session runs once.

use std::collections::VecDeque;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;

use crate::stream::decoder::FrameDecoder;
use crate::stream::frame::Frame;

/// Transport failure while reading the body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Transport error: {0}")]
pub struct TransportError(pub String);

/// Raw response body chunks
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, TransportError>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    Idle,
    AwaitingFirstByte,
    Streaming,
    Completed,
    Failed,
    Cancelled,
}

impl ExecutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionState::Completed | ExecutionState::Failed | ExecutionState::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionState::Idle => "idle",
            ExecutionState::AwaitingFirstByte => "awaiting_first_byte",
            ExecutionState::Streaming => "streaming",
            ExecutionState::Completed => "completed",
            ExecutionState::Failed => "failed",
            ExecutionState::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered text fragments received so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    fragments: Vec<String>,
}

impl Transcript {
    pub fn push(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// All fragments concatenated
    pub fn text(&self) -> String {
        self.fragments.concat()
    }
}

/// Requests cancellation of a running session
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Final result of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionOutcome {
    pub state: ExecutionState,
    pub transcript: Transcript,
    pub error: Option<String>,
}

impl ExecutionOutcome {
    pub fn is_completed(&self) -> bool {
        self.state == ExecutionState::Completed
    }

    /// Run `side_effect` only for a completed execution
    pub fn on_completed<F: FnOnce(&ExecutionOutcome)>(&self, side_effect: F) -> bool {
        if self.is_completed() {
            side_effect(self);
            true
        } else {
            false
        }
    }
}

pub struct ExecutionSession {
    chunks: Option<ChunkStream>,
    decoder: FrameDecoder,
    pending: VecDeque<Frame>,
    state: ExecutionState,
    transcript: Transcript,
    error: Option<String>,
    eof: bool,
    cancel_rx: watch::Receiver<bool>,
    cancel_tx: Arc<watch::Sender<bool>>,
}

impl ExecutionSession {
    pub fn new(chunks: ChunkStream) -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            chunks: Some(chunks),
            decoder: FrameDecoder::new(),
            pending: VecDeque::new(),
            state: ExecutionState::Idle,
            transcript: Transcript::default(),
            error: None,
            eof: false,
            cancel_rx: rx,
            cancel_tx: Arc::new(tx),
        }
    }

    /// Session whose request failed before any body arrived
    pub fn failed(error: impl Into<String>) -> Self {
        let mut session = Self::new(Box::pin(futures::stream::empty()));
        session.fail(error.into());
        session
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: self.cancel_tx.clone(),
        }
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Next text fragment, or `None` once the session reached a terminal state
    pub async fn next_fragment(&mut self) -> Option<String> {
        loop {
            if self.state.is_terminal() {
                return None;
            }

            // Cancellation wins over frames already decoded but not yet handed out.
            if *self.cancel_rx.borrow() {
                self.cancelled();
                return None;
            }

            if let Some(frame) = self.pending.pop_front() {
                match frame {
                    Frame::Text(text) => {
                        self.transcript.push(text.clone());
                        return Some(text);
                    }
                    Frame::Error(message) => {
                        self.fail(message);
                        return None;
                    }
                    Frame::Finish(reason) => {
                        tracing::debug!(reason = %reason, "Producer finished");
                        self.transition(ExecutionState::Completed);
                        self.chunks = None;
                        return None;
                    }
                    Frame::Ignored => continue,
                }
            }

            if self.eof {
                self.transition(ExecutionState::Completed);
                return None;
            }

            if self.state == ExecutionState::Idle {
                self.transition(ExecutionState::AwaitingFirstByte);
            }

            let Some(chunks) = self.chunks.as_mut() else {
                self.eof = true;
                continue;
            };

            let cancel_rx = &mut self.cancel_rx;
            let next = tokio::select! {
                biased;
                Ok(_) = cancel_rx.wait_for(|cancelled| *cancelled) => None,
                item = chunks.next() => Some(item),
            };

            match next {
                None => {
                    self.cancelled();
                    return None;
                }
                Some(Some(Ok(bytes))) => {
                    if bytes.is_empty() {
                        continue;
                    }
                    if self.state == ExecutionState::AwaitingFirstByte {
                        self.transition(ExecutionState::Streaming);
                    }
                    let frames = self.decoder.push(&bytes);
                    self.pending.extend(frames);
                }
                Some(Some(Err(e))) => {
                    self.fail(e.to_string());
                    return None;
                }
                Some(None) => {
                    let frames = self.decoder.finish();
                    self.pending.extend(frames);
                    self.chunks = None;
                    self.eof = true;
                }
            }
        }
    }

    /// Drain the session to a terminal state
    pub async fn run(mut self) -> ExecutionOutcome {
        while self.next_fragment().await.is_some() {}
        self.into_outcome()
    }

    /// Drain the session, handing each fragment to `on_fragment` as it arrives
    pub async fn run_with<F: FnMut(&str)>(mut self, mut on_fragment: F) -> ExecutionOutcome {
        while let Some(fragment) = self.next_fragment().await {
            on_fragment(&fragment);
        }
        self.into_outcome()
    }

    fn into_outcome(self) -> ExecutionOutcome {
        ExecutionOutcome {
            state: self.state,
            transcript: self.transcript,
            error: self.error,
        }
    }

    fn transition(&mut self, next: ExecutionState) {
        tracing::debug!(from = %self.state, to = %next, "Execution state change");
        self.state = next;
    }

    fn fail(&mut self, error: String) {
        tracing::warn!(error = %error, fragments = self.transcript.len(), "Execution failed");
        self.error = Some(error);
        self.chunks = None;
        self.transition(ExecutionState::Failed);
    }

    fn cancelled(&mut self) {
        self.chunks = None;
        self.pending.clear();
        self.transition(ExecutionState::Cancelled);
    }
}
