use ringpipe_buffer::PipeError;

/// Errors that can occur while framing lines or expressions.
#[derive(Debug, thiserror::Error)]
pub enum FramingError {
    /// The underlying pipe rejected an operation.
    #[error("pipe error: {0}")]
    Pipe(#[from] PipeError),

    /// A line delimiter must contain at least one character.
    #[error("line delimiter must not be empty")]
    EmptyDelimiter,

    /// The characters do not form a structured expression.
    #[error("malformed expression: {0}")]
    Malformed(String),

    /// The delimited expression is not valid JSON.
    #[error("invalid JSON expression: {0}")]
    Json(#[from] serde_json::Error),
}

impl FramingError {
    /// Returns true when the pipe ran out of data before a frame ended.
    pub fn is_underflow(&self) -> bool {
        matches!(self, Self::Pipe(err) if err.is_underflow())
    }

    /// Returns true when the pipe had no room for a frame.
    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::Pipe(err) if err.is_overflow())
    }
}

pub type Result<T> = std::result::Result<T, FramingError>;
