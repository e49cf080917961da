//! Table constructor parsing.
//!
//! `{ field (sep field)* sep? }` with `,` and `;` accepted uniformly and a
//! trailing separator permitted. Field forms: `[k] = v`, `name = v`, `v`.

use lua_ir::ast::{FieldSep, TableConstructor, TableField, TableFieldKind};
use lua_ir::{Span, TokenKind, TokenTag};

use crate::recovery::TokenSet;
use crate::{ParseError, Parser};

const FIELD_RECOVERY: TokenSet = TokenSet::new()
    .with(TokenTag::Comma)
    .with(TokenTag::Semicolon)
    .with(TokenTag::RBrace)
    .with(TokenTag::Eof);

impl Parser<'_> {
    pub(crate) fn parse_table_constructor(&mut self) -> Result<TableConstructor, ParseError> {
        let lbrace = self.expect(TokenTag::LBrace, "`{`")?;
        let mut fields = Vec::new();

        while !self.check(TokenTag::RBrace) && !self.at_end() {
            let kind = match self.parse_table_field() {
                Ok(kind) => kind,
                Err(error) => {
                    self.record(error);
                    self.synchronize_fields();
                    if !matches!(
                        self.current_kind(),
                        TokenKind::Comma | TokenKind::Semicolon
                    ) {
                        break;
                    }
                    let span = self.current_span();
                    self.error_field(span)
                }
            };
            let sep = match self.current_kind() {
                TokenKind::Comma => Some(FieldSep::Comma(self.advance().span)),
                TokenKind::Semicolon => Some(FieldSep::Semicolon(self.advance().span)),
                _ => None,
            };
            let done = sep.is_none();
            fields.push(TableField { kind, sep });
            if done {
                break;
            }
        }

        let rbrace = match self.expect(TokenTag::RBrace, "`}`") {
            Ok(span) => span,
            Err(error) => {
                let span = Span::point(self.previous_span().end);
                self.record(error.with_related("table opened here", lbrace));
                span
            }
        };
        Ok(TableConstructor {
            lbrace,
            fields,
            rbrace,
        })
    }

    fn parse_table_field(&mut self) -> Result<TableFieldKind, ParseError> {
        match self.current_kind() {
            TokenKind::LBracket => {
                let lbracket = self.advance().span;
                let key = self.parse_expr()?;
                let rbracket = self.expect(TokenTag::RBracket, "`]`")?;
                let eq = self.expect(TokenTag::Assign, "`=`")?;
                let value = self.parse_expr()?;
                Ok(TableFieldKind::Keyed {
                    lbracket,
                    key,
                    rbracket,
                    eq,
                    value,
                })
            }
            TokenKind::Ident(_) if self.peek_tag(1) == TokenTag::Assign.index() => {
                let name = self.expect_ident("a field name")?;
                let eq = self.advance().span;
                let value = self.parse_expr()?;
                Ok(TableFieldKind::Named { name, eq, value })
            }
            _ => Ok(TableFieldKind::Positional(self.parse_expr()?)),
        }
    }

    fn synchronize_fields(&mut self) {
        while !self.at_end() && !FIELD_RECOVERY.contains_raw(self.current_tag()) {
            self.advance();
        }
    }

    fn error_field(&mut self, span: Span) -> TableFieldKind {
        TableFieldKind::Positional(self.error_expr(span))
    }
}
