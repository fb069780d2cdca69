//! Chunk-to-frame decoder
//!
//! Chunk boundaries carry no meaning: bytes are buffered until a `\n`
//! arrives, so a frame (or a multi-byte character) split across chunks is
//! decoded exactly as if it had arrived whole.

use crate::stream::frame::Frame;

#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    /// Leading bytes of `buffer` already known to hold no `\n`
    scanned: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk; returns the meaningful frames it completed, in order.
    ///
    /// Each byte is scanned once and the consumed prefix is drained once per
    /// call, so a chunk holding many lines costs time linear in its length.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        let mut line_start = 0;
        let mut search_from = self.scanned;
        while let Some(offset) = self.buffer[search_from..].iter().position(|&b| b == b'\n') {
            let line_end = search_from + offset;
            push_line(&mut frames, &self.buffer[line_start..line_end]);
            line_start = line_end + 1;
            search_from = line_start;
        }

        self.buffer.drain(..line_start);
        self.scanned = self.buffer.len();
        frames
    }

    /// End of data: an unterminated final line is still decoded.
    pub fn finish(&mut self) -> Vec<Frame> {
        let mut frames = Vec::new();
        self.scanned = 0;
        if !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            push_line(&mut frames, &line);
        }
        frames
    }

    /// Bytes held back waiting for a line terminator
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }
}

fn push_line(frames: &mut Vec<Frame>, line: &[u8]) {
    let line = String::from_utf8_lossy(line);
    match Frame::parse_line(&line) {
        Frame::Ignored => {}
        frame => frames.push(frame),
    }
}
