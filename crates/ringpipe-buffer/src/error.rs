/// Errors raised by pipe operations.
///
/// A failed operation never mutates the pipe: counters and backing storage
/// are exactly as they were before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipeError {
    /// The write or unread would exceed the pipe's capacity.
    #[error("pipe overflow ({requested} chars requested, {available} free of {capacity})")]
    Overflow {
        requested: usize,
        available: usize,
        capacity: usize,
    },

    /// The read asked for more characters than are pending.
    #[error("pipe underflow ({requested} chars requested, {available} available)")]
    Underflow { requested: usize, available: usize },

    /// A region offset does not reference an existing slot.
    #[error("invalid offset {offset} for region of length {len}")]
    InvalidOffset { offset: usize, len: usize },

    /// Clockwise extraction was attempted on an empty buffer.
    #[error("cannot extract a region from an empty buffer")]
    EmptyBuffer,

    /// A pipe must hold at least one character.
    #[error("pipe capacity must be greater than zero")]
    ZeroCapacity,
}

impl PipeError {
    /// Returns true for [`PipeError::Underflow`].
    pub fn is_underflow(&self) -> bool {
        matches!(self, Self::Underflow { .. })
    }

    /// Returns true for [`PipeError::Overflow`].
    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow { .. })
    }
}

pub type Result<T> = std::result::Result<T, PipeError>;
