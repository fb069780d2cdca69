//! Incremental decoder for `text/event-stream` bodies.

/// One decoded server-sent event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A `data:` line.
    Data(String),
    /// The `data: [DONE]` terminator.
    Done,
}

/// Buffers raw bytes until whole lines are available.
///
/// Splitting happens on bytes, so a multi-byte UTF-8 character cut by a chunk
/// boundary is reassembled before decoding.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    scanned: usize,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and collect every event completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        let mut line_start = 0;
        let mut search_from = self.scanned;
        while let Some(offset) = self.buffer[search_from..].iter().position(|b| *b == b'\n') {
            let line_end = search_from + offset;
            if let Some(event) = Self::parse_line(&self.buffer[line_start..line_end]) {
                events.push(event);
            }
            line_start = line_end + 1;
            search_from = line_start;
        }

        self.buffer.drain(..line_start);
        self.scanned = self.buffer.len();
        events
    }

    /// Flush a trailing line that never got its terminator.
    pub fn finish(&mut self) -> Vec<SseEvent> {
        self.scanned = 0;
        let rest = std::mem::take(&mut self.buffer);
        Self::parse_line(&rest).into_iter().collect()
    }

    fn parse_line(raw: &[u8]) -> Option<SseEvent> {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim_end_matches('\r');
        let data = line.strip_prefix("data:")?.trim_start();

        if data == "[DONE]" {
            Some(SseEvent::Done)
        } else {
            Some(SseEvent::Data(data.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"a\"").is_empty());
        let events = decoder.push(b":1}\r\n\ndata: [DONE]\n");
        assert_eq!(
            events,
            vec![SseEvent::Data("{\"a\":1}".to_string()), SseEvent::Done]
        );
    }

    #[test]
    fn test_ignores_comments_and_event_names() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b": keep-alive\nevent: message\ndata: x\n");
        assert_eq!(events, vec![SseEvent::Data("x".to_string())]);
    }

    #[test]
    fn test_multibyte_character_split() {
        let bytes = "data: caf\u{e9}\n".as_bytes();
        let mut decoder = SseDecoder::new();
        let cut = bytes.len() - 2;
        assert!(decoder.push(&bytes[..cut]).is_empty());
        assert_eq!(decoder.push(&bytes[cut..]), vec![SseEvent::Data("caf\u{e9}".into())]);
    }

    #[test]
    fn test_finish_flushes_unterminated_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: tail").is_empty());
        assert_eq!(decoder.finish(), vec![SseEvent::Data("tail".into())]);
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn test_many_events_in_one_chunk() {
        let body: String = (0..1_000).map(|i| format!("data: {i}\n\n")).collect();
        let mut decoder = SseDecoder::new();
        let events = decoder.push(body.as_bytes());
        assert_eq!(events.len(), 1_000);
        assert_eq!(events[999], SseEvent::Data("999".to_string()));
        assert!(decoder.finish().is_empty());
    }
}
