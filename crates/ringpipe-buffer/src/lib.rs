//! Fixed-capacity circular character buffer.
//!
//! This is the lowest layer of ringpipe. A [`CircularBuffer`] decouples a
//! producer writing characters from a consumer reading them:
//! - Writes and reads move independent cursors that wrap modulo capacity
//! - Characters can be pushed back in front of the read cursor (`unread`)
//! - Look-ahead (`peek`, `peek_all`) never changes the observable state
//!
//! Everything else (line and expression framing) builds on the primitives
//! exported here.

pub mod config;
pub mod error;
pub mod pipe;
pub mod region;
pub mod stream;
pub mod underflow;

pub use config::{PipeConfig, DEFAULT_CAPACITY};
pub use error::{PipeError, Result};
pub use pipe::{CircularBuffer, Mark, Snapshot};
pub use region::{clockwise_extract, wrapping_copy};
pub use stream::{CharSink, CharSource, Sink, Source};
pub use underflow::{FailOnUnderflow, Shortfall, SubstituteOnUnderflow, UnderflowHandler};
