//! Rich diagnostics.
//!
//! A diagnostic carries a code, a severity, a message, labeled spans, and
//! free-form notes. Errors are built with a fluent API:
//!
//! ```
//! use lua_diagnostic::{Diagnostic, ErrorCode};
//! use lua_ir::Span;
//!
//! let d = Diagnostic::error(ErrorCode::E1002)
//!     .with_message("expected `end` to close `while`")
//!     .with_label(Span::new(0, 5), "block opened here");
//! assert_eq!(d.code, ErrorCode::E1002);
//! ```

use std::fmt;

use lua_ir::Span;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A labeled span with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    /// The main error location.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Related context (e.g. where an unclosed block was opened).
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A diagnostic with the context needed for a useful report.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn error(code: ErrorCode) -> Self {
        Self::new(code, Severity::Error)
    }

    pub fn warning(code: ErrorCode) -> Self {
        Self::new(code, Severity::Warning)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a primary label.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Span of the first primary label, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|l| l.is_primary)
            .or_else(|| self.labels.first())
            .map(|l| l.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let d = Diagnostic::error(ErrorCode::E1001)
            .with_message("expected `then`")
            .with_label(Span::new(10, 12), "found `do`")
            .with_secondary_label(Span::new(0, 2), "`if` started here")
            .with_note("every `if` condition is followed by `then`");
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.labels.len(), 2);
        assert_eq!(d.primary_span(), Some(Span::new(10, 12)));
        assert_eq!(d.notes.len(), 1);
    }

    #[test]
    fn test_primary_span_falls_back_to_first_label() {
        let d = Diagnostic::error(ErrorCode::E1002)
            .with_secondary_label(Span::new(5, 7), "opened here");
        assert_eq!(d.primary_span(), Some(Span::new(5, 7)));
    }
}
