//! Terminal rendering for diagnostics.
//!
//! Renders in the familiar compiler shape:
//!
//! ```text
//! error[E1002]: expected `end` to close `while` block
//!   --> tests/fixture.lua:3:1
//!    |
//!  3 | while x do
//!    | ^^^^^ block opened here
//!    = note: ...
//! ```

use std::fmt::Write as _;

use lua_ir::Span;

use crate::span_utils::{clamp_to_line, line_col, line_text};
use crate::{Diagnostic, Label};

/// Render one diagnostic against its source text.
///
/// `origin` is the display name of the input (usually a path).
pub fn render(diagnostic: &Diagnostic, origin: &str, source: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}[{}]: {}",
        diagnostic.severity, diagnostic.code, diagnostic.message
    );

    if let Some(span) = diagnostic.primary_span() {
        let lc = line_col(source, span.start);
        let _ = writeln!(out, "  --> {origin}:{}:{}", lc.line, lc.col);
    }

    let gutter = diagnostic
        .labels
        .iter()
        .map(|l| line_col(source, l.span.start).line)
        .max()
        .map_or(1, |line| line.to_string().len());

    if !diagnostic.labels.is_empty() {
        let _ = writeln!(out, "{:gutter$} |", "");
    }
    for label in &diagnostic.labels {
        render_label(&mut out, label, source, gutter);
    }

    for note in &diagnostic.notes {
        let _ = writeln!(out, "{:gutter$} = note: {note}", "");
    }
    out
}

fn render_label(out: &mut String, label: &Label, source: &str, gutter: usize) {
    let lc = line_col(source, label.span.start);
    let text = line_text(source, label.span.start);
    let clamped = clamp_to_line(source, label.span);
    let underline_start = (lc.col - 1) as usize;
    let underline_len = (clamped.len().max(1)) as usize;
    let marker = if label.is_primary { "^" } else { "-" };

    let _ = writeln!(out, "{:>gutter$} | {text}", lc.line);
    let _ = writeln!(
        out,
        "{:gutter$} | {:underline_start$}{} {}",
        "",
        "",
        marker.repeat(underline_len),
        label.message
    );
}

/// Render a batch of diagnostics separated by blank lines.
pub fn render_all(diagnostics: &[Diagnostic], origin: &str, source: &str) -> String {
    let mut out = String::new();
    for (i, d) in diagnostics.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&render(d, origin, source));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_basic() {
        let source = "while x do\n  f()\n";
        let d = Diagnostic::error(ErrorCode::E1002)
            .with_message("expected `end` to close `while` block")
            .with_label(Span::new(0, 5), "block opened here");
        let rendered = render(&d, "fixture.lua", source);
        assert_eq!(
            rendered,
            "error[E1002]: expected `end` to close `while` block\n\
             \x20 --> fixture.lua:1:1\n\
             \x20 |\n\
             1 | while x do\n\
             \x20 | ^^^^^ block opened here\n"
        );
    }

    #[test]
    fn test_render_includes_notes_and_secondary() {
        let source = "if x\nthen end\n";
        let d = Diagnostic::error(ErrorCode::E1001)
            .with_message("expected `then`")
            .with_label(Span::new(5, 9), "found here")
            .with_secondary_label(Span::new(0, 2), "`if` started here")
            .with_note("conditions are followed by `then`");
        let rendered = render(&d, "x.lua", source);
        assert!(rendered.contains("--> x.lua:2:1"));
        assert!(rendered.contains("^^^^ found here"));
        assert!(rendered.contains("-- `if` started here"));
        assert!(rendered.contains("= note: conditions are followed by `then`"));
    }

    #[test]
    fn test_render_all_separates() {
        let source = "x\ny\n";
        let a = Diagnostic::error(ErrorCode::E1001)
            .with_message("first")
            .with_label(Span::new(0, 1), "a");
        let b = Diagnostic::error(ErrorCode::E1001)
            .with_message("second")
            .with_label(Span::new(2, 3), "b");
        let rendered = render_all(&[a, b], "x.lua", source);
        assert_eq!(rendered.matches("error[E1001]").count(), 2);
    }
}
