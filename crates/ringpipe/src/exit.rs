use std::fmt;
use std::io;

use ringpipe_buffer::PipeError;
use ringpipe_frame::FramingError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => DATA_INVALID,
        io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn pipe_error(context: &str, err: PipeError) -> CliError {
    match err {
        PipeError::ZeroCapacity => CliError::new(USAGE, format!("{context}: {err}")),
        PipeError::Overflow { .. } | PipeError::Underflow { .. } => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn framing_error(context: &str, err: FramingError) -> CliError {
    match err {
        FramingError::Pipe(err) => pipe_error(context, err),
        FramingError::EmptyDelimiter => CliError::new(USAGE, format!("{context}: {err}")),
        FramingError::Malformed(_) | FramingError::Json(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_framing_errors_to_exit_codes() {
        assert_eq!(
            framing_error("x", FramingError::EmptyDelimiter).code,
            USAGE
        );
        assert_eq!(
            framing_error("x", FramingError::Malformed("]".into())).code,
            DATA_INVALID
        );
        assert_eq!(
            framing_error("x", FramingError::Pipe(PipeError::ZeroCapacity)).code,
            USAGE
        );
        assert_eq!(
            pipe_error("x", PipeError::EmptyBuffer).code,
            INTERNAL
        );
    }

    #[test]
    fn message_includes_context() {
        let err = pipe_error(
            "write failed",
            PipeError::Underflow {
                requested: 2,
                available: 1,
            },
        );
        assert_eq!(err.code, FAILURE);
        assert!(err.to_string().starts_with("write failed: pipe underflow"));
    }
}
