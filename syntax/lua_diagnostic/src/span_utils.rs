//! Span-to-source mapping helpers for rendering.

use lua_ir::Span;

/// 1-based line/column position.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Map a byte offset to a 1-based line/column pair.
///
/// Columns count bytes, which is what editors using byte-indexed columns
/// expect; offsets past the end clamp to the last position.
pub fn line_col(source: &str, offset: u32) -> LineCol {
    let offset = (offset as usize).min(source.len());
    let before = &source.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() as u32 + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |p| p + 1);
    LineCol {
        line,
        col: (offset - line_start) as u32 + 1,
    }
}

/// The full text of the line containing `offset` (without the newline).
pub fn line_text(source: &str, offset: u32) -> &str {
    let offset = (offset as usize).min(source.len());
    let bytes = source.as_bytes();
    let start = bytes[..offset]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |p| p + 1);
    let end = bytes[offset..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(source.len(), |p| offset + p);
    &source[start..end]
}

/// Clamp a span to one line for caret rendering: the reported underline
/// never crosses the newline of the line it starts on.
pub fn clamp_to_line(source: &str, span: Span) -> Span {
    let text = line_text(source, span.start);
    let lc = line_col(source, span.start);
    let line_start = span.start - (lc.col - 1);
    let line_end = line_start + text.len() as u32;
    Span::new(span.start, span.end.min(line_end).max(span.start))
}
