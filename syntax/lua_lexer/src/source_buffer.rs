//! Sentinel-terminated source buffer.
//!
//! The scanner reads bytes through a cursor that relies on a trailing NUL
//! (`0x00`) sentinel instead of bounds checks. Input may itself end with one
//! NUL byte as an explicit end-of-input marker; the buffer strips it so it
//! never shows up as content.

use crate::cursor::Cursor;

/// Source text plus sentinel padding.
pub struct SourceBuffer {
    /// Source bytes followed by a single NUL sentinel.
    bytes: Vec<u8>,
    /// Length of actual source content (excludes the sentinel).
    source_len: u32,
}

impl SourceBuffer {
    /// Build a buffer from source text.
    ///
    /// One trailing NUL byte in the input is treated as the optional
    /// end-of-input sentinel and dropped.
    ///
    /// # Panics
    /// Panics if the source exceeds `u32::MAX` bytes; callers feed file-sized
    /// inputs, which are far below that.
    pub fn new(source: &str) -> Self {
        let trimmed = source.strip_suffix('\0').unwrap_or(source);
        let source_len = u32::try_from(trimmed.len())
            .unwrap_or_else(|_| panic!("source too large: {} bytes", trimmed.len()));
        let mut bytes = Vec::with_capacity(trimmed.len() + 1);
        bytes.extend_from_slice(trimmed.as_bytes());
        bytes.push(0);
        SourceBuffer { bytes, source_len }
    }

    /// Length of the source content in bytes.
    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// Cursor positioned at the start of the buffer.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.bytes, self.source_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_appended() {
        let buf = SourceBuffer::new("x = 1");
        assert_eq!(buf.source_len(), 5);
        let mut cursor = buf.cursor();
        for _ in 0..5 {
            cursor.advance();
        }
        assert_eq!(cursor.current(), 0);
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_trailing_nul_stripped() {
        let buf = SourceBuffer::new("return\0");
        assert_eq!(buf.source_len(), 6);
    }

    #[test]
    fn test_empty_source() {
        let buf = SourceBuffer::new("");
        assert_eq!(buf.source_len(), 0);
        assert!(buf.cursor().is_eof());
    }
}
