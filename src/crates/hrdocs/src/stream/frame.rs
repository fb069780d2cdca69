//! Line frames of the execution stream
//!
//! Two encodings share one line-oriented transport:
//!
//! - legacy: `0:"<escaped text>"` carries text; other `<code>:` lines are
//!   control lines a reader skips. Writers JSON-escape the text, readers only
//!   strip the surrounding quotes, so escapes reach the transcript as written.
//! - NDJSON v1: one `{"v":1,"type":...}` object per line, lossless

use serde::{Deserialize, Serialize};

/// Media type announcing NDJSON v1 frames
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Media type of the legacy line protocol
pub const LEGACY_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

const NDJSON_VERSION: u32 = 1;

/// Encoding chosen for one response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    #[default]
    Legacy,
    NdjsonV1,
}

impl WireFormat {
    /// NDJSON when the client lists it in `Accept`, legacy otherwise
    pub fn from_accept(accept: Option<&str>) -> Self {
        let wants_ndjson = accept
            .map(|value| {
                value
                    .split(',')
                    .any(|media| media.split(';').next().map(str::trim) == Some(NDJSON_CONTENT_TYPE))
            })
            .unwrap_or(false);
        if wants_ndjson {
            WireFormat::NdjsonV1
        } else {
            WireFormat::Legacy
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            WireFormat::Legacy => LEGACY_CONTENT_TYPE,
            WireFormat::NdjsonV1 => NDJSON_CONTENT_TYPE,
        }
    }
}

/// One decoded line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Payload text fragment
    Text(String),
    /// Producer reported a failure
    Error(String),
    /// Producer finished normally
    Finish(String),
    /// Control or unrecognised line
    Ignored,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum NdjsonBody {
    Text { text: String },
    Error { message: String },
    Finish { reason: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct NdjsonFrame {
    v: u32,
    #[serde(flatten)]
    body: NdjsonBody,
}

impl Frame {
    pub fn text(text: impl Into<String>) -> Self {
        Frame::Text(text.into())
    }

    /// Encode as one newline-terminated line. `Ignored` encodes to nothing.
    pub fn encode(&self, format: WireFormat) -> Option<String> {
        let line = match format {
            WireFormat::Legacy => match self {
                Frame::Text(text) => format!("0:{}", json_string(text)),
                Frame::Error(message) => format!("3:{}", json_string(message)),
                Frame::Finish(reason) => {
                    format!("d:{}", serde_json::json!({ "finishReason": reason }))
                }
                Frame::Ignored => return None,
            },
            WireFormat::NdjsonV1 => {
                let body = match self {
                    Frame::Text(text) => NdjsonBody::Text { text: text.clone() },
                    Frame::Error(message) => NdjsonBody::Error {
                        message: message.clone(),
                    },
                    Frame::Finish(reason) => NdjsonBody::Finish {
                        reason: reason.clone(),
                    },
                    Frame::Ignored => return None,
                };
                serde_json::to_string(&NdjsonFrame {
                    v: NDJSON_VERSION,
                    body,
                })
                .ok()?
            }
        };
        Some(line + "\n")
    }

    /// Decode one line (without its `\n`). Either encoding is accepted.
    pub fn parse_line(line: &str) -> Frame {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(rest) = line.strip_prefix("0:") {
            return Frame::Text(decode_legacy_payload(rest));
        }

        if line.starts_with('{') {
            return match serde_json::from_str::<NdjsonFrame>(line) {
                Ok(frame) if frame.v == NDJSON_VERSION => match frame.body {
                    NdjsonBody::Text { text } => Frame::Text(text),
                    NdjsonBody::Error { message } => Frame::Error(message),
                    NdjsonBody::Finish { reason } => Frame::Finish(reason),
                },
                Ok(frame) => {
                    tracing::debug!(version = frame.v, "Skipping frame with unknown version");
                    Frame::Ignored
                }
                Err(_) => Frame::Ignored,
            };
        }

        Frame::Ignored
    }
}

fn json_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// Strip one leading and one trailing quote when both are present. The text
/// between them is kept byte for byte.
fn decode_legacy_payload(rest: &str) -> String {
    rest.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(rest)
        .to_string()
}
