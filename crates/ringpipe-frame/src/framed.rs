use ringpipe_buffer::CircularBuffer;

use crate::config::FramingConfig;
use crate::error::Result;
use crate::expression::JsonExpressions;

/// Line and expression framing over a borrowed pipe.
///
/// Holds no state of its own beyond the delimiter configuration and the
/// expression format. Read operations live in `reader.rs`,
/// write operations in `writer.rs`.
#[derive(Debug)]
pub struct Framed<'a, E = JsonExpressions> {
    pub(crate) pipe: &'a mut CircularBuffer,
    pub(crate) config: FramingConfig,
    pub(crate) format: E,
}

impl<'a> Framed<'a, JsonExpressions> {
    /// Frame `pipe` with the platform delimiter and JSON expressions.
    pub fn new(pipe: &'a mut CircularBuffer) -> Self {
        Self {
            pipe,
            config: FramingConfig::default(),
            format: JsonExpressions,
        }
    }

    /// Frame `pipe` with explicit configuration and JSON expressions.
    pub fn with_config(pipe: &'a mut CircularBuffer, config: FramingConfig) -> Result<Self> {
        Self::with_format(pipe, config, JsonExpressions)
    }
}

impl<'a, E> Framed<'a, E> {
    /// Frame `pipe` with explicit configuration and expression format.
    pub fn with_format(pipe: &'a mut CircularBuffer, config: FramingConfig, format: E) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            pipe,
            config,
            format,
        })
    }

    /// Borrow the underlying pipe.
    pub fn get_ref(&self) -> &CircularBuffer {
        &*self.pipe
    }

    /// Mutably borrow the underlying pipe.
    pub fn get_mut(&mut self) -> &mut CircularBuffer {
        &mut *self.pipe
    }

    /// Release the pipe borrow.
    pub fn into_inner(self) -> &'a mut CircularBuffer {
        self.pipe
    }

    /// Current framing configuration.
    pub fn config(&self) -> &FramingConfig {
        &self.config
    }

    /// Switch between failing and returning partial lines on underflow.
    pub fn set_partial_on_underflow(&mut self, partial: bool) {
        self.config.partial_on_underflow = partial;
    }
}
