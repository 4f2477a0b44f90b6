use std::fmt;

use tracing::debug;

use crate::config::PipeConfig;
use crate::error::{PipeError, Result};
use crate::region::{clockwise_extract, wrapping_copy};
use crate::underflow::{FailOnUnderflow, Shortfall, UnderflowHandler};

/// A fixed-capacity circular character buffer.
///
/// State is tracked with four counters: the read cursor, the write cursor,
/// the number of written-but-unread characters and the number of slots that
/// are free to be overwritten. The write cursor is derived:
///
/// ```text
/// num_written + num_unwritten == capacity
/// write_pos == (read_pos + num_written) % capacity
/// ```
///
/// Emptiness and fullness are always judged from `num_written`, never from
/// cursor equality, because `read_pos == write_pos` holds in both states.
pub struct CircularBuffer {
    backing: Vec<char>,
    read_pos: usize,
    num_written: usize,
    num_unwritten: usize,
    handler: Box<dyn UnderflowHandler>,
}

/// Point-in-time copy of a pipe's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Next slot to be read.
    pub read_pos: usize,
    /// Written-but-unread characters.
    pub num_written: usize,
    /// Full contents of the backing array, including stale slots.
    pub backing: Vec<char>,
}

/// Read position captured by [`CircularBuffer::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    read_pos: usize,
    num_written: usize,
}

impl Snapshot {
    pub fn capacity(&self) -> usize {
        self.backing.len()
    }

    pub fn num_unwritten(&self) -> usize {
        self.capacity() - self.num_written
    }

    pub fn write_pos(&self) -> usize {
        (self.read_pos + self.num_written) % self.capacity()
    }

    /// The pending characters, in read order.
    pub fn content(&self) -> String {
        if self.num_written == 0 {
            return String::new();
        }
        clockwise_extract(&self.backing, self.read_pos, self.write_pos())
            .map(|chars| chars.into_iter().collect())
            .unwrap_or_default()
    }
}

impl CircularBuffer {
    /// Create a pipe with [`DEFAULT_CAPACITY`](crate::DEFAULT_CAPACITY) slots
    /// that fails reads on underflow.
    pub fn new() -> Self {
        let capacity = PipeConfig::default().capacity;
        Self {
            backing: vec!['\0'; capacity],
            read_pos: 0,
            num_written: 0,
            num_unwritten: capacity,
            handler: Box::new(FailOnUnderflow),
        }
    }

    /// Create a pipe with `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_handler(capacity, FailOnUnderflow)
    }

    /// Create a pipe from explicit configuration.
    pub fn with_config(config: PipeConfig) -> Result<Self> {
        Self::with_capacity(config.capacity)
    }

    /// Create a pipe with `capacity` slots and a custom underflow handler.
    pub fn with_handler<H>(capacity: usize, handler: H) -> Result<Self>
    where
        H: UnderflowHandler + 'static,
    {
        if capacity == 0 {
            return Err(PipeError::ZeroCapacity);
        }
        Ok(Self {
            backing: vec!['\0'; capacity],
            read_pos: 0,
            num_written: 0,
            num_unwritten: capacity,
            handler: Box::new(handler),
        })
    }

    /// Replace the underflow handler.
    pub fn set_underflow_handler<H>(&mut self, handler: H)
    where
        H: UnderflowHandler + 'static,
    {
        self.handler = Box::new(handler);
    }

    pub fn capacity(&self) -> usize {
        self.backing.len()
    }

    /// Number of written characters waiting to be read.
    pub fn len(&self) -> usize {
        self.num_written
    }

    /// Number of slots a write may still fill.
    pub fn remaining(&self) -> usize {
        self.num_unwritten
    }

    pub fn is_empty(&self) -> bool {
        self.num_written == 0
    }

    pub fn is_full(&self) -> bool {
        self.num_unwritten == 0
    }

    pub fn read_pos(&self) -> usize {
        self.read_pos
    }

    pub fn write_pos(&self) -> usize {
        (self.read_pos + self.num_written) % self.capacity()
    }

    /// Write `text` at the write cursor.
    ///
    /// Fails with `Overflow` if the pending characters plus `text` would
    /// exceed capacity.
    pub fn write(&mut self, text: &str) -> Result<()> {
        let chars: Vec<char> = text.chars().collect();
        self.write_chars(&chars)
    }

    /// Write a slice of characters at the write cursor.
    pub fn write_chars(&mut self, chars: &[char]) -> Result<()> {
        if chars.is_empty() {
            return Ok(());
        }
        self.check_room(chars.len())?;

        let write_pos = self.write_pos();
        wrapping_copy(chars, &mut self.backing, write_pos)?;
        self.num_written += chars.len();
        self.num_unwritten -= chars.len();
        Ok(())
    }

    /// Read `count` characters from the read cursor.
    ///
    /// When fewer than `count` characters are pending the underflow handler
    /// decides the outcome; the pipe itself is left untouched.
    pub fn read(&mut self, count: usize) -> Result<String> {
        if count > self.num_written {
            let shortfall = Shortfall {
                requested: count,
                available: self.num_written,
            };
            debug!(
                requested = shortfall.requested,
                available = shortfall.available,
                "pipe underflow, invoking handler"
            );
            return self.handler.on_underflow(shortfall);
        }
        self.take(count)
    }

    /// Like [`read`](Self::read), but fails with `Underflow` without
    /// consulting the handler.
    pub fn try_read(&mut self, count: usize) -> Result<String> {
        if count > self.num_written {
            return Err(PipeError::Underflow {
                requested: count,
                available: self.num_written,
            });
        }
        self.take(count)
    }

    /// Drain every pending character.
    pub fn read_all(&mut self) -> Result<String> {
        self.try_read(self.num_written)
    }

    /// Push `ch` back in front of the read cursor so the next read returns
    /// it.
    pub fn unread(&mut self, ch: char) -> Result<()> {
        self.check_room(1)?;
        self.push_front(ch);
        Ok(())
    }

    /// Push `text` back so that subsequent reads reproduce it in order.
    pub fn unread_str(&mut self, text: &str) -> Result<()> {
        let chars: Vec<char> = text.chars().collect();
        self.check_room(chars.len())?;
        for &ch in chars.iter().rev() {
            self.push_front(ch);
        }
        Ok(())
    }

    /// The next character, without consuming it.
    pub fn peek(&mut self) -> Result<char> {
        let read = self.try_read(1)?;
        let ch = read.chars().next().ok_or(PipeError::Underflow {
            requested: 1,
            available: 0,
        })?;
        self.unread(ch)?;
        Ok(ch)
    }

    /// Every pending character, in read order, without consuming them.
    pub fn peek_all(&self) -> Result<String> {
        if self.num_written == 0 {
            return Ok(String::new());
        }
        let chars = clockwise_extract(&self.backing, self.read_pos, self.write_pos())?;
        Ok(chars.into_iter().collect())
    }

    /// Discard all pending characters. Backing slots are not erased.
    pub fn clear(&mut self) {
        self.read_pos = self.write_pos();
        self.num_written = 0;
        self.num_unwritten = self.capacity();
    }

    /// Capture the read position so a multi-character read can be undone
    /// with [`rewind`](Self::rewind).
    pub fn mark(&self) -> Mark {
        Mark {
            read_pos: self.read_pos,
            num_written: self.num_written,
        }
    }

    /// Return to the state captured by `mark`.
    ///
    /// `consumed` is every character handed out since the mark, in order.
    /// The handler only runs once the pipe is drained, so only as many
    /// leading characters of `consumed` as the pipe held at the mark came
    /// from it. The rest were substituted and are dropped, as is any
    /// substitute surplus still pending. The pipe must not have been
    /// written to since the mark.
    pub fn rewind(&mut self, mark: Mark, consumed: &str) -> Result<()> {
        let taken: Vec<char> = consumed.chars().take(mark.num_written).collect();
        wrapping_copy(&taken, &mut self.backing, mark.read_pos)?;
        self.read_pos = mark.read_pos;
        self.num_written = mark.num_written;
        self.num_unwritten = self.capacity() - mark.num_written;
        Ok(())
    }

    /// Copy the externally observable state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            read_pos: self.read_pos,
            num_written: self.num_written,
            backing: self.backing.clone(),
        }
    }

    fn check_room(&self, requested: usize) -> Result<()> {
        if requested + self.num_written > self.capacity() {
            debug!(
                requested,
                available = self.num_unwritten,
                capacity = self.capacity(),
                "pipe overflow, rejecting"
            );
            return Err(PipeError::Overflow {
                requested,
                available: self.num_unwritten,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }

    fn take(&mut self, count: usize) -> Result<String> {
        if count == 0 {
            return Ok(String::new());
        }
        let end = (self.read_pos + count) % self.capacity();
        let chars = clockwise_extract(&self.backing, self.read_pos, end)?;
        self.read_pos = end;
        self.num_written -= count;
        self.num_unwritten += count;
        Ok(chars.into_iter().collect())
    }

    fn push_front(&mut self, ch: char) {
        let capacity = self.capacity();
        self.read_pos = (self.read_pos + capacity - 1) % capacity;
        self.backing[self.read_pos] = ch;
        self.num_written += 1;
        self.num_unwritten -= 1;
    }
}

impl Default for CircularBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CircularBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircularBuffer")
            .field("capacity", &self.capacity())
            .field("read_pos", &self.read_pos)
            .field("write_pos", &self.write_pos())
            .field("num_written", &self.num_written)
            .field("num_unwritten", &self.num_unwritten)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::underflow::SubstituteOnUnderflow;

    fn pipe(capacity: usize) -> CircularBuffer {
        CircularBuffer::with_capacity(capacity).unwrap()
    }

    fn assert_counters(pipe: &CircularBuffer) {
        assert_eq!(pipe.len() + pipe.remaining(), pipe.capacity());
        assert_eq!(
            pipe.write_pos(),
            (pipe.read_pos() + pipe.len()) % pipe.capacity()
        );
    }

    #[test]
    fn fresh_pipe_state() {
        let pipe = pipe(5);
        assert_eq!(pipe.capacity(), 5);
        assert_eq!(pipe.len(), 0);
        assert_eq!(pipe.remaining(), 5);
        assert_eq!((pipe.read_pos(), pipe.write_pos()), (0, 0));
        assert!(pipe.is_empty());
        assert!(!pipe.is_full());
    }

    #[test]
    fn default_capacity() {
        let pipe = CircularBuffer::new();
        assert_eq!(pipe.capacity(), crate::DEFAULT_CAPACITY);
        assert_eq!(CircularBuffer::default().capacity(), 65536);
    }

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(
            CircularBuffer::with_capacity(0).unwrap_err(),
            PipeError::ZeroCapacity
        );
        assert!(CircularBuffer::with_config(PipeConfig::with_capacity(0)).is_err());
    }

    #[test]
    fn worked_example_capacity_five() {
        let mut pipe = pipe(5);

        pipe.write("w").unwrap();
        assert_eq!((pipe.len(), pipe.write_pos()), (1, 1));

        pipe.write("w").unwrap();
        assert_eq!((pipe.len(), pipe.write_pos()), (2, 2));

        assert_eq!(pipe.read(1).unwrap(), "w");
        assert_eq!((pipe.len(), pipe.read_pos()), (1, 1));

        pipe.write("abc").unwrap();
        assert_eq!((pipe.len(), pipe.write_pos()), (4, 0));
        assert_counters(&pipe);

        assert_eq!(pipe.read(4).unwrap(), "wabc");
        assert!(pipe.is_empty());
    }

    #[test]
    fn round_trip_across_wrap() {
        let mut pipe = pipe(4);
        pipe.write("xyz").unwrap();
        assert_eq!(pipe.read(3).unwrap(), "xyz");

        pipe.write("abcd").unwrap();
        assert!(pipe.is_full());
        assert_counters(&pipe);
        assert_eq!(pipe.read(4).unwrap(), "abcd");
        assert_eq!(pipe.read_pos(), 3);
    }

    #[test]
    fn overflow_boundary_leaves_state_unchanged() {
        let mut pipe = pipe(5);
        pipe.write("ab").unwrap();
        pipe.write("cde").unwrap();
        assert!(pipe.is_full());

        let before = pipe.snapshot();
        let err = pipe.write("f").unwrap_err();
        assert_eq!(
            err,
            PipeError::Overflow {
                requested: 1,
                available: 0,
                capacity: 5
            }
        );
        assert_eq!(pipe.snapshot(), before);
    }

    #[test]
    fn oversized_write_on_partial_pipe_rejected() {
        let mut pipe = pipe(5);
        pipe.write("abc").unwrap();
        let before = pipe.snapshot();
        assert!(pipe.write("xyz").unwrap_err().is_overflow());
        assert_eq!(pipe.snapshot(), before);
    }

    #[test]
    fn underflow_boundary_leaves_state_unchanged() {
        let mut pipe = pipe(5);
        pipe.write("abc").unwrap();

        let before = pipe.snapshot();
        let err = pipe.read(4).unwrap_err();
        assert_eq!(
            err,
            PipeError::Underflow {
                requested: 4,
                available: 3
            }
        );
        assert_eq!(pipe.snapshot(), before);

        assert_eq!(pipe.read(3).unwrap(), "abc");
    }

    #[test]
    fn zero_length_operations_are_noops() {
        let mut pipe = pipe(3);
        pipe.write("abc").unwrap();
        let before = pipe.snapshot();

        pipe.write("").unwrap();
        assert_eq!(pipe.read(0).unwrap(), "");
        assert_eq!(pipe.snapshot(), before);

        let mut empty = self::pipe(3);
        assert_eq!(empty.read(0).unwrap(), "");
    }

    #[test]
    fn unread_wraps_backwards() {
        let mut pipe = pipe(3);
        pipe.unread('z').unwrap();
        assert_eq!(pipe.read_pos(), 2);
        assert_eq!(pipe.len(), 1);
        assert_counters(&pipe);
        assert_eq!(pipe.read(1).unwrap(), "z");
        assert_eq!(pipe.read_pos(), 0);
    }

    #[test]
    fn unread_into_full_pipe_overflows() {
        let mut pipe = pipe(2);
        pipe.write("ab").unwrap();
        let before = pipe.snapshot();
        assert!(pipe.unread('x').unwrap_err().is_overflow());
        assert_eq!(pipe.snapshot(), before);
    }

    #[test]
    fn unread_replaces_next_read_value() {
        let mut pipe = pipe(4);
        pipe.write("abc").unwrap();
        assert_eq!(pipe.read(1).unwrap(), "a");
        pipe.unread('X').unwrap();
        assert_eq!(pipe.read_all().unwrap(), "Xbc");
    }

    #[test]
    fn unread_str_restores_order() {
        let mut pipe = pipe(6);
        pipe.write("tail").unwrap();
        pipe.unread_str("head-").unwrap_err();
        pipe.unread_str("he").unwrap();
        assert_eq!(pipe.peek_all().unwrap(), "hetail");
        assert!(pipe.is_full());
    }

    #[test]
    fn peek_is_idempotent() {
        let mut pipe = pipe(3);
        pipe.write("ab").unwrap();
        pipe.read(1).unwrap();
        pipe.write("cd").unwrap();

        let before = pipe.snapshot();
        for _ in 0..4 {
            assert_eq!(pipe.peek().unwrap(), 'b');
            assert_eq!(pipe.peek_all().unwrap(), "bcd");
        }
        assert_eq!(pipe.snapshot(), before);
    }

    #[test]
    fn peek_on_empty_pipe_fails_without_handler() {
        let mut pipe =
            CircularBuffer::with_handler(2, SubstituteOnUnderflow("?".to_string())).unwrap();
        assert!(pipe.peek().unwrap_err().is_underflow());
        assert_eq!(pipe.peek_all().unwrap(), "");
        assert!(pipe.is_empty());
    }

    #[test]
    fn peek_all_on_full_pipe_returns_everything() {
        let mut pipe = pipe(4);
        pipe.write("ab").unwrap();
        pipe.read(2).unwrap();
        pipe.write("wxyz").unwrap();
        assert_eq!(pipe.read_pos(), pipe.write_pos());
        assert_eq!(pipe.peek_all().unwrap(), "wxyz");
    }

    #[test]
    fn handler_substitutes_value_without_mutation() {
        let mut pipe =
            CircularBuffer::with_handler(4, SubstituteOnUnderflow("~".to_string())).unwrap();
        pipe.write("a").unwrap();
        let before = pipe.snapshot();

        assert_eq!(pipe.read(2).unwrap(), "~");
        assert_eq!(pipe.snapshot(), before);
        assert!(pipe.try_read(2).unwrap_err().is_underflow());
    }

    #[test]
    fn handler_can_be_replaced() {
        let mut pipe = pipe(2);
        assert!(pipe.read(1).is_err());
        pipe.set_underflow_handler(|s: Shortfall| -> Result<String> {
            Ok(format!("{}/{}", s.available, s.requested))
        });
        assert_eq!(pipe.read(1).unwrap(), "0/1");
    }

    #[test]
    fn clear_discards_pending() {
        let mut pipe = pipe(4);
        pipe.write("abc").unwrap();
        pipe.clear();
        assert!(pipe.is_empty());
        assert_eq!(pipe.read_pos(), 3);
        assert_counters(&pipe);
        pipe.write("wxyz").unwrap();
        assert_eq!(pipe.read_all().unwrap(), "wxyz");
    }

    #[test]
    fn snapshot_exposes_state() {
        let mut pipe = pipe(5);
        pipe.write("hello").unwrap();
        pipe.read(2).unwrap();

        let snap = pipe.snapshot();
        assert_eq!(snap.read_pos, 2);
        assert_eq!(snap.num_written, 3);
        assert_eq!(snap.num_unwritten(), 2);
        assert_eq!(snap.write_pos(), 0);
        assert_eq!(snap.backing.iter().collect::<String>(), "hello");
        assert_eq!(snap.content(), "llo");
    }

    #[test]
    fn multibyte_characters_occupy_one_slot() {
        let mut pipe = pipe(3);
        pipe.write("é→λ").unwrap();
        assert!(pipe.is_full());
        assert_eq!(pipe.read(2).unwrap(), "é→");
    }

    #[test]
    fn debug_omits_backing() {
        let pipe = pipe(3);
        let rendered = format!("{pipe:?}");
        assert!(rendered.contains("capacity: 3"));
        assert!(!rendered.contains("backing"));
    }

    #[test]
    fn rewind_restores_marked_state() {
        let mut pipe = pipe(4);
        pipe.write("ab").unwrap();
        pipe.read(1).unwrap();
        pipe.write("cd").unwrap();
        let before = pipe.snapshot();
        let mark = pipe.mark();

        assert_eq!(pipe.read(3).unwrap(), "bcd");
        // Surplus substitute parked over the slots just read.
        pipe.unread_str("YZ").unwrap();
        pipe.rewind(mark, "bcdX").unwrap();

        assert_eq!(pipe.snapshot(), before);
        assert_eq!(pipe.read_all().unwrap(), "bcd");
    }

    #[test]
    fn rewind_keeps_unconsumed_tail() {
        let mut pipe = pipe(4);
        pipe.write("abcd").unwrap();
        let before = pipe.snapshot();
        let mark = pipe.mark();

        pipe.read(2).unwrap();
        pipe.rewind(mark, "ab").unwrap();
        assert_eq!(pipe.snapshot(), before);
    }
}
