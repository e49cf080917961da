//! Expression parsing.
//!
//! Precedence climbing over the table: each binary operator binds at its
//! level, right-associative operators (`..`, `^`) re-enter at the same
//! level, left-associative ones at level + 1. Unary operators bind at the
//! unary level, which sits under `^` — so `-2^2` is `-(2^2)` while `-a + b`
//! is `(-a) + b`.

use lua_diagnostic::ErrorCode;
use lua_ir::ast::{
    CallArgs, Expr, ExprKind, FunctionBody, FunctionCall, LuaString, NameRef, ParamList,
};
use lua_ir::{ExprId, Span, Token, TokenKind, TokenTag};

use crate::precedence::Assoc;
use crate::stack::ensure_sufficient_stack;
use crate::{ParseError, Parser};

/// Build the delimiter triple for a string token.
pub(crate) fn lua_string_from(token: &Token) -> LuaString {
    let TokenKind::Str(form) = token.kind else {
        return LuaString {
            start: token.span,
            content: None,
            end: None,
        };
    };
    let start = Span::new(token.span.start, token.span.start + form.open_len());
    let content_end = token.span.end - form.close_len();
    let content = (content_end > start.end).then(|| Span::new(start.end, content_end));
    let end = form
        .is_terminated()
        .then(|| Span::new(content_end, token.span.end));
    LuaString {
        start,
        content,
        end,
    }
}

impl Parser<'_> {
    /// Parse a full expression.
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_expr(crate::level::OR)
    }

    /// Precedence-climbing loop.
    fn parse_binary_expr(&mut self, min_level: i8) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| {
            let mut lhs = if let Some(op) = self.table.unary(self.current_kind()) {
                let op_span = self.advance().span;
                let operand = self.parse_binary_expr(self.table.unary_level())?;
                let span = op_span.merge(self.expr_span(operand));
                self.alloc(Expr {
                    kind: ExprKind::Unary {
                        op,
                        op_span,
                        operand,
                    },
                    span,
                })
            } else {
                self.parse_primary_expr()?
            };

            loop {
                let Some(entry) = self.table.binary_raw(self.current_tag()) else {
                    break;
                };
                if entry.level < min_level {
                    break;
                }
                let op_span = self.advance().span;
                let next_min = match entry.assoc {
                    Assoc::Left => entry.level + 1,
                    Assoc::Right => entry.level,
                };
                let rhs = self.parse_binary_expr(next_min)?;
                let span = self.expr_span(lhs).merge(self.expr_span(rhs));
                lhs = self.alloc(Expr {
                    kind: ExprKind::Binary {
                        op: entry.op,
                        op_span,
                        lhs,
                        rhs,
                    },
                    span,
                });
            }
            Ok(lhs)
        })
    }

    fn parse_primary_expr(&mut self) -> Result<ExprId, ParseError> {
        let span = self.current_span();
        let kind = match self.current_kind() {
            TokenKind::Nil => Some(ExprKind::Nil),
            TokenKind::True => Some(ExprKind::True),
            TokenKind::False => Some(ExprKind::False),
            TokenKind::Number => Some(ExprKind::Number),
            TokenKind::Ellipsis => Some(ExprKind::Ellipsis),
            _ => None,
        };
        if let Some(kind) = kind {
            self.advance();
            return Ok(self.alloc(Expr { kind, span }));
        }

        match self.current_kind() {
            TokenKind::Str(_) => {
                let token = self.advance();
                let string = lua_string_from(token);
                Ok(self.alloc(Expr {
                    kind: ExprKind::Str(string),
                    span: token.span,
                }))
            }
            TokenKind::Function => {
                let function_kw = self.advance().span;
                let body = self.parse_function_body(function_kw)?;
                let end = body.end_kw.map_or_else(|| self.previous_span(), |s| s);
                let span = function_kw.merge(end);
                Ok(self.alloc(Expr {
                    kind: ExprKind::Function { function_kw, body },
                    span,
                }))
            }
            TokenKind::LBrace => {
                let table = self.parse_table_constructor()?;
                let span = table.lbrace.merge(table.rbrace);
                Ok(self.alloc(Expr {
                    kind: ExprKind::Table(table),
                    span,
                }))
            }
            TokenKind::Ident(_) | TokenKind::LParen => self.parse_prefix_chain(),
            _ => Err(ParseError::new(
                ErrorCode::E1004,
                format!("expected expression, found {}", self.current_kind()),
                self.current_span(),
            )
            .with_expected("an expression")),
        }
    }

    /// Parse a prefix-expression: a name or parenthesized expression
    /// followed by any chain of `.name`, `[k]`, `:m(args)`, and call
    /// suffixes.
    pub(crate) fn parse_prefix_chain(&mut self) -> Result<ExprId, ParseError> {
        let mut base = match *self.current_kind() {
            TokenKind::Ident(name) => {
                let span = self.advance().span;
                self.alloc(Expr {
                    kind: ExprKind::Name(NameRef { name, span }),
                    span,
                })
            }
            TokenKind::LParen => {
                let lparen = self.advance().span;
                let expr = self.parse_expr()?;
                let rparen = self.expect(TokenTag::RParen, "`)`")?;
                let span = lparen.merge(rparen);
                self.alloc(Expr {
                    kind: ExprKind::Paren {
                        lparen,
                        expr,
                        rparen,
                    },
                    span,
                })
            }
            _ => {
                return Err(ParseError::new(
                    ErrorCode::E1004,
                    format!("expected expression, found {}", self.current_kind()),
                    self.current_span(),
                )
                .with_expected("an expression"))
            }
        };

        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    let dot = self.advance().span;
                    let name = self.expect_ident("a field name")?;
                    let span = self.expr_span(base).merge(name.span);
                    base = self.alloc(Expr {
                        kind: ExprKind::Field {
                            prefix: base,
                            dot,
                            name,
                        },
                        span,
                    });
                }
                TokenKind::LBracket => {
                    let lbracket = self.advance().span;
                    let index = self.parse_expr()?;
                    let rbracket = self.expect(TokenTag::RBracket, "`]`")?;
                    let span = self.expr_span(base).merge(rbracket);
                    base = self.alloc(Expr {
                        kind: ExprKind::Index {
                            prefix: base,
                            lbracket,
                            index,
                            rbracket,
                        },
                        span,
                    });
                }
                TokenKind::Colon => {
                    let colon = self.advance().span;
                    let name = self.expect_ident("a method name")?;
                    let args = self.parse_call_args().ok_or_else(|| {
                        ParseError::new(
                            ErrorCode::E1001,
                            "expected call arguments after method name".to_string(),
                            self.current_span(),
                        )
                        .with_expected("`(`, a table, or a string")
                    })??;
                    let span = self.expr_span(base).merge(self.call_args_end(&args));
                    base = self.alloc(Expr {
                        kind: ExprKind::Call(FunctionCall {
                            prefix: base,
                            method: Some((colon, name)),
                            args,
                        }),
                        span,
                    });
                }
                TokenKind::LParen | TokenKind::LBrace | TokenKind::Str(_) => {
                    let Some(args) = self.parse_call_args() else {
                        break;
                    };
                    let args = args?;
                    let span = self.expr_span(base).merge(self.call_args_end(&args));
                    base = self.alloc(Expr {
                        kind: ExprKind::Call(FunctionCall {
                            prefix: base,
                            method: None,
                            args,
                        }),
                        span,
                    });
                }
                _ => break,
            }
        }
        Ok(base)
    }

    /// Call-argument forms; `None` when the current token starts none.
    fn parse_call_args(&mut self) -> Option<Result<CallArgs, ParseError>> {
        match self.current_kind() {
            TokenKind::LParen => Some(self.parse_paren_args()),
            TokenKind::LBrace => Some(self.parse_table_constructor().map(|table| {
                let span = table.lbrace.merge(table.rbrace);
                let id = self.alloc(Expr {
                    kind: ExprKind::Table(table),
                    span,
                });
                CallArgs::Table(id)
            })),
            TokenKind::Str(_) => {
                let token = self.advance();
                let string = lua_string_from(token);
                let id = self.alloc(Expr {
                    kind: ExprKind::Str(string),
                    span: token.span,
                });
                Some(Ok(CallArgs::Str(id)))
            }
            _ => None,
        }
    }

    fn parse_paren_args(&mut self) -> Result<CallArgs, ParseError> {
        let lparen = self.advance().span;
        let mut args = Vec::new();
        if !self.check(TokenTag::RParen) {
            args.push(self.parse_expr()?);
            while self.check(TokenTag::Comma) {
                self.advance();
                args.push(self.parse_expr()?);
            }
        }
        let rparen = self.expect(TokenTag::RParen, "`)`")?;
        Ok(CallArgs::Parens {
            lparen,
            args,
            rparen,
        })
    }

    fn call_args_end(&self, args: &CallArgs) -> Span {
        match args {
            CallArgs::Parens { rparen, .. } => *rparen,
            CallArgs::Table(id) | CallArgs::Str(id) => self.expr_span(*id),
        }
    }

    /// `( params ) block end` — the shared function implementation.
    ///
    /// `opener` is the `function` keyword, used to point at the construct
    /// when its `end` is missing.
    pub(crate) fn parse_function_body(&mut self, opener: Span) -> Result<FunctionBody, ParseError> {
        let lparen = self.expect(TokenTag::LParen, "`(`")?;
        let mut params = ParamList::default();
        loop {
            match *self.current_kind() {
                TokenKind::Ellipsis => {
                    params.ellipsis = Some(self.advance().span);
                    break;
                }
                TokenKind::Ident(name) => {
                    let span = self.advance().span;
                    params.names.push(NameRef { name, span });
                    if self.check(TokenTag::Comma) {
                        self.advance();
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        let rparen = self.expect(TokenTag::RParen, "`)`")?;
        let block = self.parse_block(crate::recovery::TokenSet::new().with(TokenTag::KwEnd));
        let end_kw = self.expect_block_end("function", opener);
        Ok(FunctionBody {
            lparen,
            params,
            rparen,
            block,
            end_kw,
        })
    }
}
