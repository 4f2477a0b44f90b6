/// Default pipe capacity: 64 Ki characters.
pub const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Configuration for a [`CircularBuffer`](crate::CircularBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipeConfig {
    /// Number of character slots. Fixed for the lifetime of the pipe.
    pub capacity: usize,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl PipeConfig {
    /// Configuration with an explicit capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }
}
