//! Incremental reparsing.
//!
//! Conservative prefix reuse: keep the longest run of top-level items that
//! ends strictly before the edited range, minus one item as a lookahead
//! margin (documentation attachment and the statement-boundary tie-break
//! both look ahead), and re-derive everything from that boundary out of a
//! fresh lex of the new buffer. Reused items keep their spans — they lie
//! entirely before the edit — and their arena ids stay valid because the
//! previous arena is carried forward wholesale.

use lua_ir::{Edit, StringInterner};

use crate::{parse_with, ParseResult, Parser, PrecedenceTable, Seed};

/// Reparse `new_source` after `edit`, reusing `previous` where safe.
///
/// Falls back to a full parse when nothing can be reused. The previous
/// result is not consumed; independent callers may hold on to it.
pub fn reparse(
    previous: &ParseResult,
    new_source: &str,
    edit: Edit,
    interner: &StringInterner,
    table: &PrecedenceTable,
) -> ParseResult {
    let items = &previous.program.items;
    let before_edit = items.partition_point(|item| item.span().end < edit.start);
    // One extra item of margin: its recognition may have depended on
    // lookahead that now crosses the edit.
    let keep = before_edit.saturating_sub(1);
    if keep == 0 {
        return parse_with(new_source, interner, table);
    }

    let boundary = items[keep - 1].span().end;
    tracing::debug!(kept = keep, boundary, "incremental reparse");

    let (tokens, lex_errors) = lua_lexer::lex(new_source, interner);
    let start_index = tokens.first_at_or_after(boundary);

    let kept_items = items[..keep].to_vec();
    let mut seed_errors: Vec<_> = previous
        .errors
        .iter()
        .filter(|e| e.span.end <= boundary)
        .cloned()
        .collect();
    seed_errors.extend(
        lex_errors
            .iter()
            .filter(|e| e.span.start >= boundary)
            .map(crate::lex_error_to_parse_error),
    );

    let parser = Parser::resume(
        &tokens,
        new_source,
        interner,
        table,
        previous.arena.clone(),
        start_index,
    );
    parser.parse_program(Some(Seed {
        shebang: previous.program.shebang,
        items: kept_items,
        errors: seed_errors,
    }))
}
