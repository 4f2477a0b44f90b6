use ringpipe_buffer::{CharSource, Mark, PipeError, Source};
use tracing::{debug, trace};

use crate::error::Result;
use crate::expression::ExpressionFormat;
use crate::framed::Framed;

impl<E> Framed<'_, E> {
    /// The next character, without consuming it.
    pub fn peek(&mut self) -> Result<char> {
        Ok(self.pipe.peek()?)
    }

    /// Every pending character without consuming any. Empty when the pipe
    /// is empty.
    pub fn peek_all(&self) -> Result<String> {
        Ok(self.pipe.peek_all()?)
    }

    /// Read characters until the delimiter has been matched. The delimiter
    /// is part of the returned line.
    ///
    /// Short reads go through the pipe's underflow handler. If the pipe
    /// runs dry first, the consumed characters are pushed back and the call
    /// fails with `Underflow`, unless `partial_on_underflow` is set and at
    /// least one character was read. A handler that keeps substituting
    /// characters without ever producing the delimiter makes this call read
    /// forever.
    pub fn read_line(&mut self) -> Result<String> {
        self.take_line(true)
    }

    /// Read the next line and push it back. Never consults the underflow
    /// handler.
    pub fn peek_line(&mut self) -> Result<String> {
        let mark = self.pipe.mark();
        let line = self.take_line(false)?;
        self.pipe.rewind(mark, &line)?;
        Ok(line)
    }

    fn take_line(&mut self, recover: bool) -> Result<String> {
        let delimiter = self.config.delimiter.as_str();
        let mark = self.pipe.mark();
        let mut source = if recover {
            self.pipe.as_source()
        } else {
            self.pipe.as_strict_source()
        };

        let mut line = String::new();
        loop {
            match source.next_char() {
                Ok(ch) => {
                    line.push(ch);
                    if line.ends_with(delimiter) {
                        trace!(chars = line.chars().count(), "line delimiter matched");
                        return Ok(line);
                    }
                }
                Err(err) => {
                    if err.is_underflow() && self.config.partial_on_underflow && !line.is_empty() {
                        return Ok(line);
                    }
                    if !line.is_empty() {
                        debug!(
                            chars = line.chars().count(),
                            "incomplete line, restoring consumed chars"
                        );
                    }
                    source.get_mut().rewind(mark, &line)?;
                    return Err(err.into());
                }
            }
        }
    }
}

impl<E: ExpressionFormat> Framed<'_, E> {
    /// Read one expression through the pipe's source adapter.
    ///
    /// An incomplete expression (the pipe underflows first) is pushed back
    /// and reported as `Underflow`. The characters of a malformed
    /// expression stay consumed.
    pub fn read_expression(&mut self) -> Result<E::Value> {
        let mut source = Recording::new(self.pipe.as_source());
        match self.format.read_expression(&mut source) {
            Ok(value) => Ok(value),
            Err(err) if err.is_underflow() => {
                source.restore()?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Read the next expression and push every consumed character back.
    pub fn peek_expression(&mut self) -> Result<E::Value> {
        let mut source = Recording::new(self.pipe.as_strict_source());
        let result = self.format.read_expression(&mut source);
        source.restore()?;
        result
    }
}

/// Source wrapper that remembers what it handed out so it can be undone.
struct Recording<'a> {
    source: Source<'a>,
    mark: Mark,
    consumed: String,
}

impl<'a> Recording<'a> {
    fn new(source: Source<'a>) -> Self {
        let mark = source.get_ref().mark();
        Self {
            source,
            mark,
            consumed: String::new(),
        }
    }

    fn restore(mut self) -> Result<()> {
        if !self.consumed.is_empty() {
            debug!(
                chars = self.consumed.chars().count(),
                "restoring consumed expression chars"
            );
        }
        self.source.get_mut().rewind(self.mark, &self.consumed)?;
        Ok(())
    }
}

impl CharSource for Recording<'_> {
    fn next_char(&mut self) -> std::result::Result<char, PipeError> {
        let ch = self.source.next_char()?;
        self.consumed.push(ch);
        Ok(ch)
    }

    fn unread_char(&mut self, ch: char) -> std::result::Result<(), PipeError> {
        self.source.unread_char(ch)?;
        self.consumed.pop();
        Ok(())
    }
}
