//! Single-character pull and push adapters over a pipe.
//!
//! Expression readers and printers work one character at a time through
//! [`CharSource`] and [`CharSink`] and never see the circular storage behind
//! them.

use tracing::debug;

use crate::error::{PipeError, Result};
use crate::pipe::CircularBuffer;

/// A pull-based character stream that supports pushing characters back.
pub trait CharSource {
    /// Take the next character.
    fn next_char(&mut self) -> Result<char>;

    /// Push `ch` back so the next call to `next_char` returns it.
    fn unread_char(&mut self, ch: char) -> Result<()>;
}

/// A push-based character stream.
pub trait CharSink {
    /// Append one character.
    fn put_char(&mut self, ch: char) -> Result<()>;

    /// Append every character of `text`, stopping at the first error.
    fn put_str(&mut self, text: &str) -> Result<()> {
        for ch in text.chars() {
            self.put_char(ch)?;
        }
        Ok(())
    }
}

impl CharSink for String {
    fn put_char(&mut self, ch: char) -> Result<()> {
        self.push(ch);
        Ok(())
    }
}

/// Pull adapter returned by [`CircularBuffer::as_source`] and
/// [`CircularBuffer::as_strict_source`].
#[derive(Debug)]
pub struct Source<'a> {
    pipe: &'a mut CircularBuffer,
    recover: bool,
}

/// Push adapter returned by [`CircularBuffer::as_sink`].
#[derive(Debug)]
pub struct Sink<'a> {
    pipe: &'a mut CircularBuffer,
}

impl CircularBuffer {
    /// Expose the pipe as a character source. Short reads go through the
    /// underflow handler.
    ///
    /// Characters of a substitute beyond the first are parked in the pipe,
    /// so a substitute longer than `capacity + 1` fails with `Overflow` and
    /// is dropped whole.
    pub fn as_source(&mut self) -> Source<'_> {
        Source {
            pipe: self,
            recover: true,
        }
    }

    /// Expose the pipe as a character source that fails with `Underflow`
    /// instead of consulting the handler.
    pub fn as_strict_source(&mut self) -> Source<'_> {
        Source {
            pipe: self,
            recover: false,
        }
    }

    /// Expose the pipe as a character sink.
    pub fn as_sink(&mut self) -> Sink<'_> {
        Sink { pipe: self }
    }
}

impl Source<'_> {
    /// Borrow the pipe behind this source.
    pub fn get_ref(&self) -> &CircularBuffer {
        &*self.pipe
    }

    /// Mutably borrow the pipe behind this source.
    pub fn get_mut(&mut self) -> &mut CircularBuffer {
        &mut *self.pipe
    }
}

impl CharSource for Source<'_> {
    fn next_char(&mut self) -> Result<char> {
        let read = if self.recover {
            self.pipe.read(1)?
        } else {
            self.pipe.try_read(1)?
        };

        // A handler may substitute more than one character; keep the surplus
        // in the pipe for the following reads.
        let mut chars = read.chars();
        let first = chars.next().ok_or(PipeError::Underflow {
            requested: 1,
            available: 0,
        })?;
        let rest = chars.as_str();
        if rest.is_empty() {
            return Ok(first);
        }

        let surplus = rest.chars().count();
        if surplus > self.pipe.remaining() {
            debug!(
                surplus,
                capacity = self.pipe.capacity(),
                "substitute does not fit the pipe, dropping it"
            );
            return Err(PipeError::Overflow {
                requested: surplus,
                available: self.pipe.remaining(),
                capacity: self.pipe.capacity(),
            });
        }
        self.pipe.unread_str(rest)?;
        Ok(first)
    }

    fn unread_char(&mut self, ch: char) -> Result<()> {
        self.pipe.unread(ch)
    }
}

impl Sink<'_> {
    /// Borrow the pipe behind this sink.
    pub fn get_ref(&self) -> &CircularBuffer {
        &*self.pipe
    }
}

impl CharSink for Sink<'_> {
    fn put_char(&mut self, ch: char) -> Result<()> {
        self.pipe.write_chars(&[ch])
    }
}
