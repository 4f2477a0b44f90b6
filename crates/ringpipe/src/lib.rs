//! Bounded circular character pipes with line and expression framing.
//!
//! ringpipe decouples a producer of characters from a consumer with a
//! fixed-capacity ring, and frames the character stream into lines or
//! structured expressions on top of it.
//!
//! # Crate Structure
//!
//! - [`buffer`]: The circular buffer, region helpers and stream adapters
//! - [`frame`]: Line and expression framing built on the buffer

/// Re-export buffer types.
pub mod buffer {
    pub use ringpipe_buffer::*;
}

/// Re-export framing types.
pub mod frame {
    pub use ringpipe_frame::*;
}

pub use ringpipe_buffer::{CircularBuffer, PipeError};
pub use ringpipe_frame::{Framed, FramingConfig, FramingError};
