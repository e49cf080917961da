//! Token cursor for the parser.
//!
//! Skips trivia (plain comments) between every token — but never inside
//! string content, which the lexer already consumed as opaque spans. `---`
//! doc lines are not trivia: the documentation grammar consumes them.

use lua_ir::{Span, Token, TokenKind, TokenList, TokenTag};

/// Cursor over a [`TokenList`] with a dense tag slice for one-byte checks.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    tags: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor at the start of the stream (past any leading trivia).
    pub fn new(tokens: &'a TokenList) -> Self {
        Self::at(tokens, 0)
    }

    /// Cursor at a token index (used by the incremental reparse).
    pub fn at(tokens: &'a TokenList, pos: usize) -> Self {
        let mut cursor = Cursor {
            tokens,
            tags: tokens.tags(),
            pos: pos.min(tokens.len().saturating_sub(1)),
        };
        cursor.skip_trivia();
        cursor
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Current token.
    ///
    /// Invariant: the position is always valid; the last token is EOF.
    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    #[inline]
    pub fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Discriminant tag of the current token (single byte load).
    #[inline]
    pub fn current_tag(&self) -> u8 {
        self.tags[self.pos]
    }

    #[inline]
    pub fn check(&self, tag: TokenTag) -> bool {
        self.current_tag() == tag.index()
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.current_tag() == TokenTag::Eof.index()
    }

    /// Span of the previous non-trivia token.
    pub fn previous_span(&self) -> Span {
        let mut i = self.pos;
        while i > 0 {
            i -= 1;
            if !self.tokens[i].kind.is_trivia() {
                return self.tokens[i].span;
            }
        }
        Span::DUMMY
    }

    /// The `n`-th non-trivia token after the current one
    /// (`peek_token(0)` is the current token).
    pub fn peek_token(&self, n: usize) -> &Token {
        let mut remaining = n;
        let mut i = self.pos;
        loop {
            if remaining == 0 {
                return &self.tokens[i];
            }
            if i + 1 >= self.tokens.len() {
                return &self.tokens[self.tokens.len() - 1];
            }
            i += 1;
            if !self.tokens[i].kind.is_trivia() {
                remaining -= 1;
            }
        }
    }

    /// Tag of the `n`-th non-trivia token after the current one
    /// (`peek_tag(0)` is the current tag).
    pub fn peek_tag(&self, n: usize) -> u8 {
        let mut remaining = n;
        let mut i = self.pos;
        loop {
            if remaining == 0 {
                return self.tags[i];
            }
            if i + 1 >= self.tokens.len() {
                return TokenTag::Eof.index();
            }
            i += 1;
            if !self.tokens[i].kind.is_trivia() {
                remaining -= 1;
            }
        }
    }

    /// Advance past the current token (and any following trivia), returning
    /// the token that was current.
    pub fn advance(&mut self) -> &'a Token {
        let tokens: &'a TokenList = self.tokens;
        let token = &tokens[self.pos];
        if self.pos + 1 < tokens.len() {
            self.pos += 1;
            self.skip_trivia();
        }
        token
    }

    fn skip_trivia(&mut self) {
        while self.pos + 1 < self.tokens.len() && self.tokens[self.pos].kind.is_trivia() {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lua_ir::StringInterner;

    fn tokens(source: &str) -> TokenList {
        let interner = StringInterner::new();
        let (tokens, _) = lua_lexer::lex(source, &interner);
        tokens
    }

    #[test]
    fn test_trivia_skipped() {
        let list = tokens("a --[[ c ]] b -- tail\nc");
        let mut cursor = Cursor::new(&list);
        assert!(cursor.check(TokenTag::Ident));
        cursor.advance();
        assert!(cursor.check(TokenTag::Ident)); // block comment skipped
        cursor.advance();
        assert!(cursor.check(TokenTag::Ident)); // line comment skipped
        cursor.advance();
        assert!(cursor.at_end());
    }

    #[test]
    fn test_doc_lines_not_skipped() {
        let list = tokens("--- doc\nx");
        let cursor = Cursor::new(&list);
        assert!(cursor.check(TokenTag::DocLine));
    }

    #[test]
    fn test_peek_tag_skips_trivia() {
        let list = tokens("a -- c\n= 1");
        let cursor = Cursor::new(&list);
        assert_eq!(cursor.peek_tag(0), TokenTag::Ident.index());
        assert_eq!(cursor.peek_tag(1), TokenTag::Assign.index());
        assert_eq!(cursor.peek_tag(2), TokenTag::Number.index());
        assert_eq!(cursor.peek_tag(3), TokenTag::Eof.index());
        assert_eq!(cursor.peek_tag(9), TokenTag::Eof.index());
    }

    #[test]
    fn test_advance_at_eof_saturates() {
        let list = tokens("");
        let mut cursor = Cursor::new(&list);
        assert!(cursor.at_end());
        cursor.advance();
        assert!(cursor.at_end());
    }

    #[test]
    fn test_previous_span_skips_trivia() {
        let list = tokens("a --[[x]] b");
        let mut cursor = Cursor::new(&list);
        let a_span = cursor.current_span();
        cursor.advance();
        assert_eq!(cursor.previous_span(), a_span);
    }

    #[test]
    fn test_leading_trivia_skipped_on_construction() {
        let list = tokens("-- header\nx = 1");
        let cursor = Cursor::new(&list);
        assert!(cursor.check(TokenTag::Ident));
    }
}
