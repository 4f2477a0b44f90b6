//! Wrap-aware copies into and out of a physically circular slice.
//!
//! Both helpers validate every length and offset before touching memory, so
//! an error leaves the destination untouched.

use crate::error::{PipeError, Result};

/// Copy all of `source` into `dest` starting at `dest_offset`, wrapping to
/// index 0 when the copy runs past the end of `dest`.
///
/// Fails with `Overflow` if `source` cannot fit in `dest` even with
/// wraparound, and with `InvalidOffset` if `dest_offset` is not an existing
/// slot of `dest`.
pub fn wrapping_copy<T: Copy>(source: &[T], dest: &mut [T], dest_offset: usize) -> Result<()> {
    if source.len() > dest.len() {
        return Err(PipeError::Overflow {
            requested: source.len(),
            available: dest.len(),
            capacity: dest.len(),
        });
    }
    if dest_offset >= dest.len() {
        return Err(PipeError::InvalidOffset {
            offset: dest_offset,
            len: dest.len(),
        });
    }

    let head = (dest.len() - dest_offset).min(source.len());
    dest[dest_offset..dest_offset + head].copy_from_slice(&source[..head]);
    let tail = source.len() - head;
    dest[..tail].copy_from_slice(&source[head..]);
    Ok(())
}

/// Extract the logical region that starts at `start` and runs forward,
/// wrapping past the end, up to but excluding `end`.
///
/// `start == end` denotes a full buffer and yields every slot rotated to
/// begin at `start`. Callers must special-case an empty logical region
/// themselves.
///
/// ```text
/// buffer "abcd":   start=1,end=3 -> "bc"
///                  start=3,end=1 -> "da"
///                  start=3,end=3 -> "dabc"
/// ```
pub fn clockwise_extract<T: Copy>(buffer: &[T], start: usize, end: usize) -> Result<Vec<T>> {
    if buffer.is_empty() {
        return Err(PipeError::EmptyBuffer);
    }
    if start >= buffer.len() {
        return Err(PipeError::InvalidOffset {
            offset: start,
            len: buffer.len(),
        });
    }
    if end > buffer.len() {
        return Err(PipeError::InvalidOffset {
            offset: end,
            len: buffer.len(),
        });
    }

    if start < end {
        return Ok(buffer[start..end].to_vec());
    }

    let mut out = Vec::with_capacity(buffer.len() - start + end);
    out.extend_from_slice(&buffer[start..]);
    out.extend_from_slice(&buffer[..end]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn extract(s: &str, start: usize, end: usize) -> String {
        clockwise_extract(&chars(s), start, end)
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn copy_without_wrap() {
        let mut dest = chars(".....");
        wrapping_copy(&chars("ab"), &mut dest, 1).unwrap();
        assert_eq!(dest, chars(".ab.."));
    }

    #[test]
    fn copy_wraps_to_front() {
        let mut dest = chars(".....");
        wrapping_copy(&chars("abc"), &mut dest, 3).unwrap();
        assert_eq!(dest, chars("c..ab"));
    }

    #[test]
    fn copy_fills_whole_destination_from_middle() {
        let mut dest = chars(".....");
        wrapping_copy(&chars("abcde"), &mut dest, 2).unwrap();
        assert_eq!(dest, chars("deabc"));
    }

    #[test]
    fn copy_empty_source_is_noop() {
        let mut dest = chars("xyz");
        wrapping_copy(&[], &mut dest, 2).unwrap();
        assert_eq!(dest, chars("xyz"));
    }

    #[test]
    fn copy_rejects_oversized_source() {
        let mut dest = chars("...");
        let err = wrapping_copy(&chars("abcd"), &mut dest, 0).unwrap_err();
        assert!(matches!(err, PipeError::Overflow { requested: 4, .. }));
        assert_eq!(dest, chars("..."));
    }

    #[test]
    fn copy_rejects_offset_past_last_slot() {
        let mut dest = chars("...");
        let err = wrapping_copy(&chars("a"), &mut dest, 3).unwrap_err();
        assert_eq!(err, PipeError::InvalidOffset { offset: 3, len: 3 });
        assert_eq!(dest, chars("..."));
    }

    #[test]
    fn extract_table() {
        assert_eq!(extract("abcd", 1, 3), "bc");
        assert_eq!(extract("abcd", 3, 1), "da");
        assert_eq!(extract("abcd", 3, 3), "dabc");
        assert_eq!(extract("abcd", 0, 0), "abcd");
        assert_eq!(extract("abcd", 0, 4), "abcd");
        assert_eq!(extract("abcd", 2, 0), "cd");
    }

    #[test]
    fn extract_empty_buffer_fails() {
        let empty: [char; 0] = [];
        assert_eq!(
            clockwise_extract(&empty, 0, 0).unwrap_err(),
            PipeError::EmptyBuffer
        );
    }

    #[test]
    fn extract_rejects_out_of_range_cursor() {
        let buf = chars("abc");
        assert!(matches!(
            clockwise_extract(&buf, 3, 1),
            Err(PipeError::InvalidOffset { offset: 3, .. })
        ));
        assert!(matches!(
            clockwise_extract(&buf, 0, 4),
            Err(PipeError::InvalidOffset { offset: 4, .. })
        ));
    }
}
