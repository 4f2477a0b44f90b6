use ringpipe_buffer::{CharSink, PipeError};

use crate::error::Result;
use crate::expression::ExpressionFormat;
use crate::framed::Framed;

impl<E> Framed<'_, E> {
    /// Write `text` followed by the delimiter as a single write.
    ///
    /// Fails with `Overflow` without writing anything when the whole line
    /// does not fit.
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        let mut line = String::with_capacity(text.len() + self.config.delimiter.len());
        line.push_str(text);
        line.push_str(&self.config.delimiter);
        self.pipe.write(&line)?;
        Ok(())
    }
}

impl<E: ExpressionFormat> Framed<'_, E> {
    /// Print `value` through the pipe's sink adapter.
    ///
    /// The printed form is staged first, so an expression that does not fit
    /// fails with `Overflow` and leaves nothing in the pipe.
    pub fn write_expression(&mut self, value: &E::Value) -> Result<()> {
        let mut staged = String::new();
        self.format.write_expression(value, &mut staged)?;

        let needed = staged.chars().count();
        if needed > self.pipe.remaining() {
            return Err(PipeError::Overflow {
                requested: needed,
                available: self.pipe.remaining(),
                capacity: self.pipe.capacity(),
            }
            .into());
        }

        self.pipe.as_sink().put_str(&staged)?;
        Ok(())
    }
}
