//! Incremental text-stream protocol
//!
//! Framing ([`frame`]), byte-to-frame reassembly ([`decoder`]) and the
//! client-side session state machine ([`session`]).

pub mod decoder;
pub mod frame;
pub mod session;

pub use decoder::FrameDecoder;
pub use frame::{Frame, WireFormat, LEGACY_CONTENT_TYPE, NDJSON_CONTENT_TYPE};
pub use session::{
    CancelHandle, ChunkStream, ExecutionOutcome, ExecutionSession, ExecutionState, Transcript,
    TransportError,
};
