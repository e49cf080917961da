//! Lexer for Lua plus its documentation micro-language surface.
//!
//! [`lex`] turns a source buffer into a [`TokenList`]: scan raw tokens over
//! a sentinel-terminated buffer, then resolve keywords and intern
//! identifiers. Comment tokens stay in the list — the parser treats plain
//! comments as trivia but consumes `---` doc lines as grammar input.
//!
//! [`lex_at`] lexes a slice at an absolute base offset; the documentation
//! mini-parser uses it to re-lex tag-line remainders while keeping spans
//! absolute.

mod cursor;
mod error;
mod keywords;
mod scanner;
mod source_buffer;

pub use cursor::Cursor;
pub use error::{LexError, LexErrorKind};
pub use keywords::keyword_kind;
pub use scanner::{probe_long_bracket, scan_long_bracket, LongBracket};
pub use source_buffer::SourceBuffer;

use lua_ir::{Span, StringInterner, Token, TokenKind, TokenList};

/// Lex `source` into a token list plus any lexical errors.
///
/// The returned list is never empty: its last token is always `Eof`.
pub fn lex(source: &str, interner: &StringInterner) -> (TokenList, Vec<LexError>) {
    lex_at(source, 0, interner)
}

/// Lex `source` as if it started at byte offset `base`.
///
/// All token and error spans are shifted by `base`. Shebang recognition is
/// disabled for non-zero bases (a shebang exists only at file offset 0).
pub fn lex_at(source: &str, base: u32, interner: &StringInterner) -> (TokenList, Vec<LexError>) {
    let buffer = SourceBuffer::new(source);
    let mut scanner = scanner::Scanner::new(buffer.cursor(), base == 0);
    let mut tokens = TokenList::with_capacity(source.len() / 4 + 1);

    loop {
        let mut token = scanner.next_token();
        if let TokenKind::Ident(_) = token.kind {
            let text = token.span.slice(source);
            token.kind = match keyword_kind(text) {
                Some(kw) => kw,
                None => TokenKind::Ident(interner.intern(text)),
            };
        }
        if base != 0 {
            token = Token::new(
                token.kind,
                Span::new(token.span.start + base, token.span.end + base),
            );
        }
        let is_eof = token.kind == TokenKind::Eof;
        tokens.push(token);
        if is_eof {
            break;
        }
    }

    let mut errors = scanner.take_errors();
    if base != 0 {
        for e in &mut errors {
            e.span = Span::new(e.span.start + base, e.span.end + base);
        }
    }
    (tokens, errors)
}
