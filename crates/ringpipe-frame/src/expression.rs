//! Structured-expression capability.
//!
//! The pipe has no notion of where an expression ends. An
//! [`ExpressionFormat`] pulls characters one at a time and stops exactly at
//! the end of the expression, pushing back any look-ahead it needed.

use ringpipe_buffer::{CharSink, CharSource};
use tracing::trace;

use crate::error::{FramingError, Result};

/// Reads and prints structured expressions one character at a time.
pub trait ExpressionFormat {
    /// The parsed form of an expression.
    type Value;

    /// Read one expression from `source`, consuming exactly the characters
    /// that belong to it.
    fn read_expression(&mut self, source: &mut dyn CharSource) -> Result<Self::Value>;

    /// Print `value` to `sink`.
    fn write_expression(&mut self, value: &Self::Value, sink: &mut dyn CharSink) -> Result<()>;
}

/// JSON values, one per expression.
///
/// Boundaries are found with a bracket and string scanner; the delimited
/// text is then parsed by `serde_json`. Leading whitespace is skipped. A
/// bare scalar ends at the first whitespace or structural character, which
/// is pushed back. Values are printed compactly followed by `\n` so that a
/// trailing scalar is always terminated.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExpressions;

impl ExpressionFormat for JsonExpressions {
    type Value = serde_json::Value;

    fn read_expression(&mut self, source: &mut dyn CharSource) -> Result<Self::Value> {
        let text = scan_json(source)?;
        trace!(chars = text.chars().count(), "delimited JSON expression");
        Ok(serde_json::from_str(&text)?)
    }

    fn write_expression(&mut self, value: &Self::Value, sink: &mut dyn CharSink) -> Result<()> {
        let text = serde_json::to_string(value)?;
        sink.put_str(&text)?;
        sink.put_char('\n')?;
        Ok(())
    }
}

fn scan_json(source: &mut dyn CharSource) -> Result<String> {
    let first = loop {
        let ch = source.next_char()?;
        if !ch.is_whitespace() {
            break ch;
        }
    };

    let mut text = String::new();
    text.push(first);
    match first {
        '{' | '[' => scan_container(source, &mut text)?,
        '"' => scan_string(source, &mut text)?,
        '}' | ']' | ',' | ':' => {
            return Err(FramingError::Malformed(format!(
                "unexpected '{first}' at start of expression"
            )))
        }
        _ => scan_scalar(source, &mut text)?,
    }
    Ok(text)
}

// Called after the opening quote has been pushed.
fn scan_string(source: &mut dyn CharSource, text: &mut String) -> Result<()> {
    let mut escaped = false;
    loop {
        let ch = source.next_char()?;
        text.push(ch);
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '"' {
            return Ok(());
        }
    }
}

fn scan_container(source: &mut dyn CharSource, text: &mut String) -> Result<()> {
    let mut depth = 1usize;
    while depth > 0 {
        let ch = source.next_char()?;
        text.push(ch);
        match ch {
            '"' => scan_string(source, text)?,
            '{' | '[' => depth += 1,
            '}' | ']' => depth -= 1,
            _ => {}
        }
    }
    Ok(())
}

fn scan_scalar(source: &mut dyn CharSource, text: &mut String) -> Result<()> {
    loop {
        let ch = source.next_char()?;
        if ch.is_whitespace() || matches!(ch, '{' | '}' | '[' | ']' | ',' | ':' | '"') {
            source.unread_char(ch)?;
            return Ok(());
        }
        text.push(ch);
    }
}
