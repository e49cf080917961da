//! Program assembly.
//!
//! Top level: optional shebang, then statements and documentation
//! constructs interleaved in any order, then an optional module return.
//! After the module return only trivia and the end-of-input sentinel may
//! remain; anything else is reported and parsing continues so the rest of
//! the input is still recognized.

use lua_diagnostic::ErrorCode;
use lua_ir::ast::{Item, Program, Statement, StatementKind};
use lua_ir::{Span, TokenTag};

use crate::grammar::DocItem;
use crate::recovery::{self, TokenSet, STMT_START};
use crate::{ParseResult, Parser, Seed};

/// Tokens a documentation block can attach forward to.
const DOC_ATTACH: TokenSet = TokenSet::new()
    .with(TokenTag::KwLocal)
    .with(TokenTag::KwFunction)
    .with(TokenTag::KwIf)
    .with(TokenTag::KwWhile)
    .with(TokenTag::KwRepeat)
    .with(TokenTag::KwFor)
    .with(TokenTag::KwDo)
    .with(TokenTag::KwReturn)
    .with(TokenTag::KwBreak)
    .with(TokenTag::Ident)
    .with(TokenTag::LParen);

impl Parser<'_> {
    /// Top-level production. `seed` carries reused state from an
    /// incremental reparse.
    pub(crate) fn parse_program(mut self, seed: Option<Seed>) -> ParseResult {
        let (shebang, mut items) = match seed {
            Some(seed) => {
                self.errors.extend(seed.errors);
                (seed.shebang, seed.items)
            }
            None => {
                let shebang = self
                    .check(TokenTag::Shebang)
                    .then(|| self.advance().span);
                (shebang, Vec::new())
            }
        };
        let mut trailing_return: Option<Statement> = None;

        while !self.at_end() {
            if self.check(TokenTag::DocLine) {
                match self.parse_doc_item() {
                    DocItem::Block(block) => {
                        if self.at_end() || !self.starts_statement() {
                            items.push(Item::DocBlock(block));
                        } else {
                            self.push_statement(&mut items, Some(block));
                        }
                    }
                    DocItem::Brief(brief) => items.push(Item::Brief(brief)),
                    DocItem::Tag(tag) => items.push(Item::Tag(tag)),
                    DocItem::Config(config) => items.push(Item::Config(config)),
                    DocItem::Command(command) => items.push(Item::Command(command)),
                }
                continue;
            }

            if self.check(TokenTag::KwReturn) {
                match self.parse_module_return() {
                    Ok(statement) => {
                        if self.at_end() {
                            trailing_return = Some(statement);
                            break;
                        }
                        self.record(
                            crate::ParseError::new(
                                ErrorCode::E1008,
                                "statement after the module return".to_string(),
                                self.current_span(),
                            )
                            .with_related("module return here", statement.span),
                        );
                        items.push(Item::Statement(statement));
                    }
                    Err(error) => {
                        self.record(error);
                        self.recover_to_statement();
                    }
                }
                continue;
            }

            if self.check(TokenTag::KwBreak) {
                self.record(crate::ParseError::new(
                    ErrorCode::E1001,
                    "`break` outside of a block".to_string(),
                    self.current_span(),
                ));
            }

            self.push_statement(&mut items, None);
        }

        let end = u32::try_from(self.source.len()).unwrap_or(u32::MAX);
        let program = Program {
            shebang,
            items,
            trailing_return,
            span: Span::new(0, end),
        };
        let mut errors = self.errors;
        errors.sort_by_key(|e| (e.span.start, e.span.end));
        ParseResult {
            program,
            arena: self.arena,
            errors,
        }
    }

    /// Parse one statement into `items`, with recovery.
    fn push_statement(
        &mut self,
        items: &mut Vec<Item>,
        doc: Option<lua_ir::ast::DocBlock>,
    ) -> bool {
        let before = self.position();
        match self.parse_statement(doc) {
            Ok(statement) => {
                items.push(Item::Statement(statement));
                true
            }
            Err(error) => {
                tracing::debug!(at = %error.span, "top-level recovery");
                self.record(error);
                self.recover_to_statement();
                if self.position() == before && !self.at_end() {
                    self.advance();
                }
                false
            }
        }
    }

    fn recover_to_statement(&mut self) {
        recovery::synchronize(&mut self.cursor, STMT_START);
    }

    /// Whether the current token can begin a statement (used to decide if a
    /// documentation block attaches forward or stands alone).
    fn starts_statement(&self) -> bool {
        DOC_ATTACH.contains_raw(self.current_tag())
    }

    /// Module return with optional trailing `;`.
    fn parse_module_return(&mut self) -> Result<Statement, crate::ParseError> {
        let start = self.current_span();
        let ret = self.parse_return()?;
        let semicolon = self
            .check(TokenTag::Semicolon)
            .then(|| self.advance().span);
        let end = semicolon.unwrap_or_else(|| self.previous_span());
        Ok(Statement {
            documentation: None,
            kind: StatementKind::Return(ret),
            span: start.merge(end),
            semicolon,
        })
    }
}
