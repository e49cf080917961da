//! Lexical error reporting.

use std::fmt;

use lua_ir::Span;

/// A lexical error with a precise source location.
///
/// The lexer never aborts: it records the error, keeps the text it consumed
/// as a token (so the parser can point at it), and continues scanning.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum LexErrorKind {
    /// Quoted string hit a newline or end of input before its closing quote.
    UnterminatedString,
    /// Long-bracket string with no closer of the same level.
    UnterminatedLongString { level: u8 },
    /// Block comment with no closer of the same level.
    UnterminatedBlockComment { level: u8 },
    /// Number literal with a missing digit sequence (e.g. `0x`, `1e+`).
    MalformedNumber,
    /// Byte sequence that starts no token.
    UnexpectedCharacter,
    /// NUL byte before the end of input.
    InteriorNul,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { kind, span }
    }

    /// Human-readable message.
    pub fn message(&self) -> String {
        match &self.kind {
            LexErrorKind::UnterminatedString => "unterminated string literal".to_string(),
            LexErrorKind::UnterminatedLongString { level } => format!(
                "unterminated long string: no closing `]{}]` before end of input",
                "=".repeat(*level as usize)
            ),
            LexErrorKind::UnterminatedBlockComment { level } => format!(
                "unterminated block comment: no closing `]{}]` before end of input",
                "=".repeat(*level as usize)
            ),
            LexErrorKind::MalformedNumber => "malformed number literal".to_string(),
            LexErrorKind::UnexpectedCharacter => "unexpected character".to_string(),
            LexErrorKind::InteriorNul => "NUL byte before end of input".to_string(),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message(), self.span)
    }
}
