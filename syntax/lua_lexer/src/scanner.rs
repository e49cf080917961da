//! Hand-written scanner.
//!
//! Produces one [`Token`] per call over a sentinel-terminated [`Cursor`].
//! Keyword resolution and identifier interning are deferred to the lexing
//! entry point; the scanner emits `Ident(Name::EMPTY)` placeholders.
//!
//! The two stateful token families — long-bracket strings and block
//! comments — are recognized by [`scan_long_bracket`], an ordinary function
//! whose nesting level is a local counter probed from the opener. A closer
//! with a different `=` count is ordinary content.

use lua_ir::{Name, Span, StrForm, Token, TokenKind};

use crate::cursor::Cursor;
use crate::error::{LexError, LexErrorKind};

/// Result of scanning a long-bracket construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LongBracket {
    /// `=` count of the opener.
    pub level: u8,
    /// Raw content between the delimiters (possibly empty).
    pub content: Span,
    /// Closing delimiter span; `None` when end of input arrived first.
    pub close: Option<Span>,
}

/// Probe for a long-bracket opener (`[`, `=`*n, `[`) at the cursor.
///
/// Returns the level without moving the cursor. Levels above 255 are not
/// treated as openers.
pub fn probe_long_bracket(cursor: &Cursor<'_>) -> Option<u8> {
    if cursor.current() != b'[' {
        return None;
    }
    let mut count: u32 = 0;
    while cursor.peek(1 + count) == b'=' {
        count += 1;
        if count > u32::from(u8::MAX) {
            return None;
        }
    }
    if cursor.peek(1 + count) == b'[' {
        Some(count as u8)
    } else {
        None
    }
}

/// Consume a long-bracket construct whose opener (level already probed)
/// starts at the cursor.
///
/// The content runs until the first `]`, `=`*level, `]` sequence; bracket
/// runs with any other count are ordinary content. On missing closer the
/// cursor stops at end of input and `close` is `None` — the consumed span is
/// still reported so the caller can surface a precise error location.
pub fn scan_long_bracket(cursor: &mut Cursor<'_>, level: u8) -> LongBracket {
    cursor.advance_by(2 + u32::from(level)); // [ ={level} [
    let content_start = cursor.pos();
    loop {
        if !cursor.seek_byte(b']') {
            // End of input before any candidate closer.
            return LongBracket {
                level,
                content: Span::new(content_start, cursor.pos()),
                close: None,
            };
        }
        let mut count: u32 = 0;
        while cursor.peek(1 + count) == b'=' {
            count += 1;
        }
        if count == u32::from(level) && cursor.peek(1 + count) == b']' {
            let content_end = cursor.pos();
            cursor.advance_by(2 + count);
            return LongBracket {
                level,
                content: Span::new(content_start, content_end),
                close: Some(Span::new(content_end, cursor.pos())),
            };
        }
        // Wrong level; this `]` is content.
        cursor.advance();
    }
}

/// One-token-at-a-time scanner.
pub(crate) struct Scanner<'a> {
    cursor: Cursor<'a>,
    errors: Vec<LexError>,
    /// Shebangs exist only at file offset 0; re-lexed slices disable this.
    allow_shebang: bool,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(cursor: Cursor<'a>, allow_shebang: bool) -> Self {
        Scanner {
            cursor,
            errors: Vec::new(),
            allow_shebang,
        }
    }

    pub(crate) fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    fn error(&mut self, kind: LexErrorKind, span: Span) {
        self.errors.push(LexError::new(kind, span));
    }

    fn token(&self, kind: TokenKind, start: u32) -> Token {
        Token::new(kind, Span::new(start, self.cursor.pos()))
    }

    /// Produce the next token, skipping whitespace. Returns `Eof` forever
    /// once the source is exhausted.
    pub(crate) fn next_token(&mut self) -> Token {
        self.cursor
            .eat_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'));
        let start = self.cursor.pos();
        match self.cursor.current() {
            0 => {
                if self.cursor.is_eof() {
                    Token::new(TokenKind::Eof, Span::point(start))
                } else {
                    self.cursor.advance();
                    let span = Span::new(start, self.cursor.pos());
                    self.error(LexErrorKind::InteriorNul, span);
                    Token::new(TokenKind::Error, span)
                }
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(start),
            b'0'..=b'9' => self.number(start),
            b'"' | b'\'' => self.quoted_string(start),
            b'[' => self.bracket_or_long_string(start),
            b'-' => self.minus_or_comment(start),
            b'=' => self.one_or_two(start, b'=', TokenKind::Assign, TokenKind::EqEq),
            b'~' => self.one_or_two(start, b'=', TokenKind::Tilde, TokenKind::NotEq),
            b'<' => self.angle(start, TokenKind::Lt, TokenKind::LtEq, TokenKind::Shl),
            b'>' => self.angle(start, TokenKind::Gt, TokenKind::GtEq, TokenKind::Shr),
            b'/' => self.one_or_two(start, b'/', TokenKind::Slash, TokenKind::SlashSlash),
            b'.' => self.dot(start),
            b'#' => self.hash_or_shebang(start),
            b'+' => self.single(start, TokenKind::Plus),
            b'*' => self.single(start, TokenKind::Star),
            b'%' => self.single(start, TokenKind::Percent),
            b'^' => self.single(start, TokenKind::Caret),
            b'&' => self.single(start, TokenKind::Amp),
            b'|' => self.single(start, TokenKind::Pipe),
            b'(' => self.single(start, TokenKind::LParen),
            b')' => self.single(start, TokenKind::RParen),
            b'{' => self.single(start, TokenKind::LBrace),
            b'}' => self.single(start, TokenKind::RBrace),
            b']' => self.single(start, TokenKind::RBracket),
            b';' => self.single(start, TokenKind::Semicolon),
            b':' => self.single(start, TokenKind::Colon),
            b',' => self.single(start, TokenKind::Comma),
            b'?' => self.single(start, TokenKind::Question),
            b'`' => self.single(start, TokenKind::Backtick),
            b'@' => self.single(start, TokenKind::At),
            _ => self.unexpected(start),
        }
    }

    fn single(&mut self, start: u32, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.token(kind, start)
    }

    fn one_or_two(&mut self, start: u32, second: u8, one: TokenKind, two: TokenKind) -> Token {
        self.cursor.advance();
        if self.cursor.current() == second {
            self.cursor.advance();
            self.token(two, start)
        } else {
            self.token(one, start)
        }
    }

    /// `<` family: `<`, `<=`, `<<` (mirrored for `>`).
    fn angle(&mut self, start: u32, plain: TokenKind, eq: TokenKind, shift: TokenKind) -> Token {
        let first = self.cursor.current();
        self.cursor.advance();
        if self.cursor.current() == b'=' {
            self.cursor.advance();
            self.token(eq, start)
        } else if self.cursor.current() == first {
            self.cursor.advance();
            self.token(shift, start)
        } else {
            self.token(plain, start)
        }
    }

    fn identifier(&mut self, start: u32) -> Token {
        self.cursor.eat_while(is_ident_continue);
        // Keyword resolution and interning happen in the lexing entry point.
        self.token(TokenKind::Ident(Name::EMPTY), start)
    }

    fn dot(&mut self, start: u32) -> Token {
        if self.cursor.peek(1).is_ascii_digit() {
            return self.number(start);
        }
        self.cursor.advance();
        if self.cursor.current() == b'.' {
            self.cursor.advance();
            if self.cursor.current() == b'.' {
                self.cursor.advance();
                self.token(TokenKind::Ellipsis, start)
            } else {
                self.token(TokenKind::Concat, start)
            }
        } else {
            self.token(TokenKind::Dot, start)
        }
    }

    fn hash_or_shebang(&mut self, start: u32) -> Token {
        if self.allow_shebang && start == 0 && self.cursor.peek(1) == b'!' {
            self.cursor.eat_until_newline();
            return self.token(TokenKind::Shebang, start);
        }
        self.single(start, TokenKind::Hash)
    }

    // ─── Numbers ──────────────────────────────────────────────────────────

    fn number(&mut self, start: u32) -> Token {
        if self.cursor.current() == b'0'
            && matches!(self.cursor.peek(1), b'x' | b'X')
        {
            return self.hex_number(start);
        }
        // Decimal: digits, optional fraction, optional signed exponent.
        // Entry may be at `.` (e.g. `.5`).
        self.cursor.eat_while(|b| b.is_ascii_digit());
        if self.cursor.current() == b'.' {
            self.cursor.advance();
            self.cursor.eat_while(|b| b.is_ascii_digit());
        }
        if matches!(self.cursor.current(), b'e' | b'E') {
            self.exponent(start);
        }
        self.token(TokenKind::Number, start)
    }

    fn hex_number(&mut self, start: u32) -> Token {
        self.cursor.advance_by(2); // 0x
        let digits_start = self.cursor.pos();
        self.cursor.eat_while(|b| b.is_ascii_hexdigit());
        let mut has_digits = self.cursor.pos() > digits_start;
        if self.cursor.current() == b'.' {
            self.cursor.advance();
            let frac_start = self.cursor.pos();
            self.cursor.eat_while(|b| b.is_ascii_hexdigit());
            has_digits |= self.cursor.pos() > frac_start;
        }
        if !has_digits {
            let span = Span::new(start, self.cursor.pos());
            self.error(LexErrorKind::MalformedNumber, span);
        }
        if matches!(self.cursor.current(), b'p' | b'P') {
            self.exponent(start);
        }
        self.token(TokenKind::Number, start)
    }

    /// Signed exponent after `e`/`E`/`p`/`P`; a missing digit run is a
    /// malformed-number error, with the text still consumed as one token.
    fn exponent(&mut self, start: u32) {
        self.cursor.advance();
        if matches!(self.cursor.current(), b'+' | b'-') {
            self.cursor.advance();
        }
        let digits_start = self.cursor.pos();
        self.cursor.eat_while(|b| b.is_ascii_digit());
        if self.cursor.pos() == digits_start {
            let span = Span::new(start, self.cursor.pos());
            self.error(LexErrorKind::MalformedNumber, span);
        }
    }

    // ─── Strings ──────────────────────────────────────────────────────────

    fn quoted_string(&mut self, start: u32) -> Token {
        let quote = self.cursor.current();
        self.cursor.advance();
        loop {
            if !self.cursor.seek_byte3(quote, b'\\', b'\n') {
                break; // end of input
            }
            match self.cursor.current() {
                b'\\' => {
                    // Skip the escape introducer and the escaped byte; the
                    // content is kept raw, we only need to not stop at an
                    // escaped quote.
                    self.cursor.advance();
                    self.cursor.advance();
                }
                b'\n' => break, // unterminated at line end
                _ => {
                    // Closing quote.
                    self.cursor.advance();
                    let form = StrForm::Quoted {
                        double: quote == b'"',
                        terminated: true,
                    };
                    return self.token(TokenKind::Str(form), start);
                }
            }
        }
        let span = Span::new(start, self.cursor.pos());
        self.error(LexErrorKind::UnterminatedString, span);
        Token::new(
            TokenKind::Str(StrForm::Quoted {
                double: quote == b'"',
                terminated: false,
            }),
            span,
        )
    }

    fn bracket_or_long_string(&mut self, start: u32) -> Token {
        let Some(level) = probe_long_bracket(&self.cursor) else {
            return self.single(start, TokenKind::LBracket);
        };
        let scan = scan_long_bracket(&mut self.cursor, level);
        let terminated = scan.close.is_some();
        if !terminated {
            let span = Span::new(start, self.cursor.pos());
            self.error(LexErrorKind::UnterminatedLongString { level }, span);
        }
        self.token(TokenKind::Str(StrForm::Long { level, terminated }), start)
    }

    // ─── Comments ─────────────────────────────────────────────────────────

    fn minus_or_comment(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.current() != b'-' {
            return self.token(TokenKind::Minus, start);
        }
        self.cursor.advance(); // second '-'
        if probe_long_bracket(&self.cursor).is_some() {
            return self.block_comment(start);
        }
        if self.cursor.current() == b'-' {
            // `---` documentation line; content runs to end of line.
            self.cursor.advance();
            self.cursor.eat_until_newline();
            return self.token(TokenKind::DocLine, start);
        }
        self.cursor.eat_until_newline();
        self.token(TokenKind::LineComment, start)
    }

    fn block_comment(&mut self, start: u32) -> Token {
        // Caller verified the opener.
        let level = probe_long_bracket(&self.cursor).unwrap_or(0);
        let scan = scan_long_bracket(&mut self.cursor, level);
        let terminated = scan.close.is_some();
        if !terminated {
            let span = Span::new(start, self.cursor.pos());
            self.error(LexErrorKind::UnterminatedBlockComment { level }, span);
        }
        self.token(TokenKind::BlockComment { level, terminated }, start)
    }

    // ─── Errors ───────────────────────────────────────────────────────────

    /// Consume one full UTF-8 sequence so spans stay on char boundaries.
    fn unexpected(&mut self, start: u32) -> Token {
        self.cursor.advance();
        while !self.cursor.is_eof() && self.cursor.current() & 0xC0 == 0x80 {
            self.cursor.advance();
        }
        let span = Span::new(start, self.cursor.pos());
        self.error(LexErrorKind::UnexpectedCharacter, span);
        Token::new(TokenKind::Error, span)
    }
}

#[inline]
fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
