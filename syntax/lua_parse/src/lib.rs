//! Recursive descent parser for Lua plus its documentation annotations.
//!
//! [`parse`] drives the pipeline: lex, then a single forward pass that
//! assembles the [`Program`] tree. Expression parsing is precedence-climbing
//! over the immutable [`PrecedenceTable`]; the documentation grammar is a
//! separate mini-parser invoked only when a `---` line is recognized.
//!
//! Errors attach to the smallest enclosing construct and never abort the
//! parse; the parser resynchronizes at statement and doc-block boundaries.

mod cursor;
mod grammar;
mod incremental;
mod precedence;
mod recovery;
mod stack;

#[cfg(test)]
mod tests;

pub use cursor::Cursor;
pub use incremental::reparse;
pub use precedence::{level, Assoc, BinaryEntry, PrecedenceTable};
pub use recovery::{synchronize, TokenSet, BLOCK_END, EXPR_START, STMT_START};

use lua_diagnostic::{Diagnostic, ErrorCode};
use lua_ir::ast::{Item, NameRef, Program};
use lua_ir::{Span, StringInterner, SyntaxArena, Token, TokenKind, TokenList, TokenTag};
use lua_lexer::{LexError, LexErrorKind};

/// Parse error with an error code for rich diagnostics.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParseError {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Location of the error.
    pub span: Span,
    /// Description of the expected construct, when known.
    pub expected: Option<String>,
    /// Related location (e.g. where an unclosed block was opened).
    pub related: Option<(String, Span)>,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            expected: None,
            related: None,
        }
    }

    #[must_use]
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    #[must_use]
    pub fn with_related(mut self, message: impl Into<String>, span: Span) -> Self {
        self.related = Some((message.into(), span));
        self
    }

    /// Convert to a full diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = self.expected.as_deref().unwrap_or("here");
        let mut d = Diagnostic::error(self.code)
            .with_message(&self.message)
            .with_label(self.span, label);
        if let Some((message, span)) = &self.related {
            d = d.with_secondary_label(*span, message.clone());
        }
        d
    }
}

/// Result of one parse: the tree, its arena, and every error found.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParseResult {
    pub program: Program,
    pub arena: SyntaxArena,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All errors as diagnostics, in source order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors.iter().map(ParseError::to_diagnostic).collect()
    }
}

/// State carried over from a previous parse by the incremental reparse.
pub(crate) struct Seed {
    pub(crate) shebang: Option<Span>,
    pub(crate) items: Vec<Item>,
    pub(crate) errors: Vec<ParseError>,
}

/// Parser state.
///
/// Also instantiated over re-lexed documentation line remainders; the arena
/// moves into the sub-parser and back so ids stay in one namespace.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: SyntaxArena,
    table: &'a PrecedenceTable,
    source: &'a str,
    interner: &'a StringInterner,
    errors: Vec<ParseError>,
    /// Brace nesting inside documentation table-literal types; bounds
    /// unparenthesized `fun(...)` return lists (see grammar::doc_ty).
    doc_brace_depth: u32,
    /// A `>>` token half-consumed as the `>` of a nested `table<K, V>`.
    doc_pending_gt: bool,
}

impl<'a> Parser<'a> {
    /// Create a parser over a token stream.
    pub fn new(
        tokens: &'a TokenList,
        source: &'a str,
        interner: &'a StringInterner,
        table: &'a PrecedenceTable,
    ) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            arena: SyntaxArena::new(),
            table,
            source,
            interner,
            errors: Vec::new(),
            doc_brace_depth: 0,
            doc_pending_gt: false,
        }
    }

    /// Create a parser resuming mid-stream with a pre-populated arena.
    pub(crate) fn resume(
        tokens: &'a TokenList,
        source: &'a str,
        interner: &'a StringInterner,
        table: &'a PrecedenceTable,
        arena: SyntaxArena,
        start_index: usize,
    ) -> Self {
        Parser {
            cursor: Cursor::at(tokens, start_index),
            arena,
            table,
            source,
            interner,
            errors: Vec::new(),
            doc_brace_depth: 0,
            doc_pending_gt: false,
        }
    }

    // ─── Cursor delegation ────────────────────────────────────────────────

    #[inline]
    pub(crate) fn current(&self) -> &Token {
        self.cursor.current()
    }

    #[inline]
    pub(crate) fn current_kind(&self) -> &TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    pub(crate) fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    pub(crate) fn current_tag(&self) -> u8 {
        self.cursor.current_tag()
    }

    #[inline]
    pub(crate) fn check(&self, tag: TokenTag) -> bool {
        self.cursor.check(tag)
    }

    #[inline]
    pub(crate) fn at_end(&self) -> bool {
        self.cursor.at_end()
    }

    #[inline]
    pub(crate) fn peek_tag(&self, n: usize) -> u8 {
        self.cursor.peek_tag(n)
    }

    #[inline]
    pub(crate) fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    pub(crate) fn advance(&mut self) -> &'a Token {
        self.cursor.advance()
    }

    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.cursor.position()
    }

    // ─── Error helpers ────────────────────────────────────────────────────

    pub(crate) fn record(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Consume a token of the given tag or fail with `E1001`.
    pub(crate) fn expect(&mut self, tag: TokenTag, what: &str) -> Result<Span, ParseError> {
        if self.check(tag) {
            Ok(self.advance().span)
        } else {
            Err(ParseError::new(
                ErrorCode::E1001,
                format!("expected {what}, found {}", self.current_kind()),
                self.current_span(),
            )
            .with_expected(what))
        }
    }

    /// Consume an identifier or fail.
    pub(crate) fn expect_ident(&mut self, what: &str) -> Result<NameRef, ParseError> {
        if let TokenKind::Ident(name) = *self.current_kind() {
            let span = self.advance().span;
            Ok(NameRef { name, span })
        } else {
            Err(ParseError::new(
                ErrorCode::E1001,
                format!("expected {what}, found {}", self.current_kind()),
                self.current_span(),
            )
            .with_expected(what))
        }
    }

    // ─── Arena helpers ────────────────────────────────────────────────────

    #[inline]
    pub(crate) fn alloc(&mut self, expr: lua_ir::ast::Expr) -> lua_ir::ExprId {
        self.arena.alloc_expr(expr)
    }

    #[inline]
    pub(crate) fn expr_span(&self, id: lua_ir::ExprId) -> Span {
        self.arena.expr(id).span
    }

    /// Placeholder expression for recovery.
    pub(crate) fn error_expr(&mut self, span: Span) -> lua_ir::ExprId {
        self.alloc(lua_ir::ast::Expr {
            kind: lua_ir::ast::ExprKind::Error,
            span,
        })
    }

    /// Run `f` over a parser for a re-lexed slice of the input.
    ///
    /// `text` is lexed at absolute offset `base`; the arena moves into the
    /// sub-parser and back so allocated ids remain valid here. Returns the
    /// closure result plus any lexical errors from the slice (the caller
    /// decides which of those matter — errors inside free-form description
    /// text are dropped).
    pub(crate) fn with_subtokens<R>(
        &mut self,
        text: &str,
        base: u32,
        f: impl FnOnce(&mut Parser<'_>) -> R,
    ) -> (R, Vec<LexError>) {
        let (tokens, lex_errors) = lua_lexer::lex_at(text, base, self.interner);
        let mut sub = Parser {
            cursor: Cursor::new(&tokens),
            arena: std::mem::take(&mut self.arena),
            table: self.table,
            source: self.source,
            interner: self.interner,
            errors: Vec::new(),
            doc_brace_depth: 0,
            doc_pending_gt: false,
        };
        let result = f(&mut sub);
        self.arena = sub.arena;
        self.errors.extend(sub.errors);
        (result, lex_errors)
    }
}

/// Map a lexical error to a parse error with its code.
pub(crate) fn lex_error_to_parse_error(error: &LexError) -> ParseError {
    let code = match error.kind {
        LexErrorKind::UnterminatedString => ErrorCode::E0001,
        LexErrorKind::UnterminatedLongString { .. } => ErrorCode::E0002,
        LexErrorKind::UnterminatedBlockComment { .. } => ErrorCode::E0003,
        LexErrorKind::MalformedNumber => ErrorCode::E0004,
        LexErrorKind::UnexpectedCharacter | LexErrorKind::InteriorNul => ErrorCode::E0005,
    };
    ParseError::new(code, error.message(), error.span)
}

/// Parse `source` with a freshly constructed precedence table.
pub fn parse(source: &str, interner: &StringInterner) -> ParseResult {
    let table = PrecedenceTable::lua();
    parse_with(source, interner, &table)
}

/// Parse `source` with a caller-owned precedence table.
///
/// The table is immutable and may be shared by any number of concurrent
/// parser instances.
pub fn parse_with(
    source: &str,
    interner: &StringInterner,
    table: &PrecedenceTable,
) -> ParseResult {
    let (tokens, lex_errors) = lua_lexer::lex(source, interner);
    tracing::debug!(tokens = tokens.len(), bytes = source.len(), "parsing");
    let mut parser = Parser::new(&tokens, source, interner, table);
    parser
        .errors
        .extend(lex_errors.iter().map(lex_error_to_parse_error));
    parser.parse_program(None)
}
