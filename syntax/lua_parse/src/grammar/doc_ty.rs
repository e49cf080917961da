//! Documentation type expressions.
//!
//! Recursive grammar over the re-lexed tag-line token stream. Binding, loose
//! to tight: union (`A|B`, right-assoc), optional (`A?`), array (`A[]`),
//! then the atoms — builtins, dotted names (optionally backticked), string
//! literals, parenthesized types, `table<K, V>`, table literals, and
//! `fun(...)` signatures. Parenthesization overrides.

use lua_diagnostic::ErrorCode;
use lua_ir::ast::{
    DocBuiltin, DocFunctionParam, DocFunctionReturn, DocName, DocParamName, DocTableKey,
    DocTablePair, DocType, DocTypeKind, NameRef,
};
use lua_ir::{DocTypeId, Span, TokenKind, TokenTag};

use crate::grammar::expr::lua_string_from;
use crate::stack::ensure_sufficient_stack;
use crate::{ParseError, Parser};

impl Parser<'_> {
    #[inline]
    pub(crate) fn doc_ty_span(&self, id: DocTypeId) -> Span {
        self.arena.doc_type(id).span
    }

    fn alloc_ty(&mut self, kind: DocTypeKind, span: Span) -> DocTypeId {
        self.arena.alloc_doc_type(DocType { kind, span })
    }

    /// Error placeholder type for recovery.
    pub(crate) fn error_doc_type(&mut self, span: Span) -> DocTypeId {
        self.alloc_ty(DocTypeKind::Error, span)
    }

    /// Parse a full type expression.
    pub(crate) fn parse_doc_type(&mut self) -> Result<DocTypeId, ParseError> {
        ensure_sufficient_stack(|| {
            let lhs = self.parse_doc_type_member()?;
            if self.check(TokenTag::Pipe) {
                let pipe = self.advance().span;
                let rhs = self.parse_doc_type()?; // unions associate right
                let span = self.doc_ty_span(lhs).merge(self.doc_ty_span(rhs));
                return Ok(self.alloc_ty(DocTypeKind::Union { lhs, pipe, rhs }, span));
            }
            Ok(lhs)
        })
    }

    /// Postfix forms plus the optional marker; `?` binds looser than `[]`.
    fn parse_doc_type_member(&mut self) -> Result<DocTypeId, ParseError> {
        let mut ty = self.parse_doc_type_postfix()?;
        while self.check(TokenTag::Question) {
            let question = self.advance().span;
            let span = self.doc_ty_span(ty).merge(question);
            ty = self.alloc_ty(DocTypeKind::Optional { inner: ty, question }, span);
        }
        Ok(ty)
    }

    fn parse_doc_type_postfix(&mut self) -> Result<DocTypeId, ParseError> {
        let mut ty = self.parse_doc_type_atom()?;
        while self.check(TokenTag::LBracket) && self.peek_tag(1) == TokenTag::RBracket.index() {
            let lbracket = self.advance().span;
            let rbracket = self.advance().span;
            let brackets = lbracket.merge(rbracket);
            let span = self.doc_ty_span(ty).merge(brackets);
            ty = self.alloc_ty(DocTypeKind::Array { element: ty, brackets }, span);
        }
        Ok(ty)
    }

    fn parse_doc_type_atom(&mut self) -> Result<DocTypeId, ParseError> {
        match *self.current_kind() {
            // `nil` and `function` arrive as Lua keywords in the sub-stream.
            TokenKind::Nil => {
                let span = self.advance().span;
                Ok(self.alloc_ty(DocTypeKind::Builtin(DocBuiltin::Nil), span))
            }
            TokenKind::Function => {
                let fun_kw = self.advance().span;
                if self.check(TokenTag::LParen) {
                    self.parse_doc_function_type(fun_kw)
                } else {
                    Ok(self.alloc_ty(DocTypeKind::Builtin(DocBuiltin::Function), fun_kw))
                }
            }
            TokenKind::Ident(name) => {
                let span = self.current_span();
                let followed_by_dot = self.peek_tag(1) == TokenTag::Dot.index();
                let text = self.interner.lookup(name);
                match text.as_str() {
                    "fun" => {
                        let fun_kw = self.advance().span;
                        if self.check(TokenTag::LParen) {
                            return self.parse_doc_function_type(fun_kw);
                        }
                        Ok(self.alloc_ty(DocTypeKind::Builtin(DocBuiltin::Function), fun_kw))
                    }
                    "table" if self.peek_tag(1) == TokenTag::Lt.index() => {
                        self.parse_doc_key_value_type()
                    }
                    _ => {
                        if !followed_by_dot {
                            if let Some(builtin) = doc_builtin(&text) {
                                self.advance();
                                return Ok(self.alloc_ty(DocTypeKind::Builtin(builtin), span));
                            }
                        }
                        let name = self.parse_doc_name()?;
                        let span = name.span;
                        Ok(self.alloc_ty(DocTypeKind::Named(name), span))
                    }
                }
            }
            TokenKind::Backtick => {
                let name = self.parse_doc_name()?;
                let span = name.span;
                Ok(self.alloc_ty(DocTypeKind::Named(name), span))
            }
            TokenKind::Str(_) => {
                let token = self.advance();
                let literal = lua_string_from(token);
                Ok(self.alloc_ty(DocTypeKind::Literal(literal), token.span))
            }
            TokenKind::LParen => {
                let lparen = self.advance().span;
                let inner = self.parse_doc_type()?;
                let rparen = self.expect(TokenTag::RParen, "`)`")?;
                let span = lparen.merge(rparen);
                Ok(self.alloc_ty(
                    DocTypeKind::Paren {
                        lparen,
                        inner,
                        rparen,
                    },
                    span,
                ))
            }
            TokenKind::LBrace => self.parse_doc_table_literal(),
            _ => Err(ParseError::new(
                ErrorCode::E1005,
                format!("expected a type, found {}", self.current_kind()),
                self.current_span(),
            )
            .with_expected("a type")),
        }
    }

    /// `table<K, V>`; the closing `>` may be half of a `>>` token when
    /// tables nest.
    fn parse_doc_key_value_type(&mut self) -> Result<DocTypeId, ParseError> {
        let table_kw = self.advance().span;
        self.expect(TokenTag::Lt, "`<`")?;
        let key = self.parse_doc_type()?;
        self.expect(TokenTag::Comma, "`,`")?;
        let value = self.parse_doc_type()?;
        let gt = self.expect_doc_gt()?;
        let span = table_kw.merge(gt);
        Ok(self.alloc_ty(
            DocTypeKind::KeyValue {
                table_kw,
                key,
                value,
                gt,
            },
            span,
        ))
    }

    /// Consume one `>`, splitting a `>>` in two for nested `table<...>`.
    fn expect_doc_gt(&mut self) -> Result<Span, ParseError> {
        if self.doc_pending_gt {
            self.doc_pending_gt = false;
            let span = self.advance().span;
            return Ok(Span::new(span.end - 1, span.end));
        }
        match self.current_kind() {
            TokenKind::Gt => Ok(self.advance().span),
            TokenKind::Shr => {
                let span = self.current_span();
                self.doc_pending_gt = true;
                Ok(Span::new(span.start, span.start + 1))
            }
            _ => Err(ParseError::new(
                ErrorCode::E1005,
                format!("expected `>`, found {}", self.current_kind()),
                self.current_span(),
            )
            .with_expected("`>`")),
        }
    }

    /// `{ key[?]: type, ... }` with a trailing comma permitted.
    fn parse_doc_table_literal(&mut self) -> Result<DocTypeId, ParseError> {
        let lbrace = self.advance().span;
        self.doc_brace_depth += 1;
        let result = self.parse_doc_table_pairs();
        self.doc_brace_depth -= 1;
        let pairs = result?;
        let rbrace = self.expect(TokenTag::RBrace, "`}`")?;
        let span = lbrace.merge(rbrace);
        Ok(self.alloc_ty(
            DocTypeKind::TableLiteral {
                lbrace,
                pairs,
                rbrace,
            },
            span,
        ))
    }

    fn parse_doc_table_pairs(&mut self) -> Result<Vec<DocTablePair>, ParseError> {
        let mut pairs = Vec::new();
        while !self.check(TokenTag::RBrace) && !self.at_end() {
            pairs.push(self.parse_doc_table_pair()?);
            if self.check(TokenTag::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(pairs)
    }

    fn parse_doc_table_pair(&mut self) -> Result<DocTablePair, ParseError> {
        let (key, bracketed) = match *self.current_kind() {
            TokenKind::LBracket => {
                self.advance();
                let key = match self.current_kind() {
                    TokenKind::Str(_) => {
                        let token = self.advance();
                        DocTableKey::Str(lua_string_from(token))
                    }
                    TokenKind::Number => DocTableKey::Number(self.advance().span),
                    _ => DocTableKey::Type(self.parse_doc_type()?),
                };
                self.expect(TokenTag::RBracket, "`]`")?;
                (key, true)
            }
            TokenKind::Ident(name) => {
                let span = self.advance().span;
                (DocTableKey::Name(NameRef { name, span }), false)
            }
            _ => {
                return Err(ParseError::new(
                    ErrorCode::E1005,
                    format!("expected a table key, found {}", self.current_kind()),
                    self.current_span(),
                )
                .with_expected("a table key"))
            }
        };
        let optional = self
            .check(TokenTag::Question)
            .then(|| self.advance().span);
        self.expect(TokenTag::Colon, "`:`")?;
        let value = self.parse_doc_type()?;
        Ok(DocTablePair {
            key,
            bracketed,
            optional,
            value,
        })
    }

    /// `fun(params) [: returns]`.
    fn parse_doc_function_type(&mut self, fun_kw: Span) -> Result<DocTypeId, ParseError> {
        self.expect(TokenTag::LParen, "`(`")?;
        let mut params = Vec::new();
        while !self.check(TokenTag::RParen) && !self.at_end() {
            params.push(self.parse_doc_function_param()?);
            if self.check(TokenTag::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        let rparen = self.expect(TokenTag::RParen, "`)`")?;

        let mut returns = Vec::new();
        let mut returns_parens = false;
        let mut end = rparen;
        if self.check(TokenTag::Colon) {
            self.advance();
            if self.check(TokenTag::LParen) {
                returns_parens = true;
                self.advance();
                loop {
                    returns.push(self.parse_doc_function_return()?);
                    if self.check(TokenTag::Comma) {
                        self.advance();
                    } else {
                        break;
                    }
                }
                end = self.expect(TokenTag::RParen, "`)`")?;
            } else {
                loop {
                    returns.push(self.parse_doc_function_return()?);
                    // Inside a table-literal pair an unparenthesized comma
                    // belongs to the pair list, not this return list.
                    if self.doc_brace_depth == 0 && self.check(TokenTag::Comma) {
                        self.advance();
                    } else {
                        break;
                    }
                }
                if let Some(last) = returns.last() {
                    end = self.doc_function_return_end(last).unwrap_or(end);
                }
            }
        }

        let span = fun_kw.merge(end);
        Ok(self.alloc_ty(
            DocTypeKind::Function {
                fun_kw,
                params,
                rparen,
                returns,
                returns_parens,
            },
            span,
        ))
    }

    fn parse_doc_function_param(&mut self) -> Result<DocFunctionParam, ParseError> {
        let name = match *self.current_kind() {
            TokenKind::Ellipsis => DocParamName::Ellipsis(self.advance().span),
            TokenKind::Ident(name) => {
                let span = self.advance().span;
                let name_ref = NameRef { name, span };
                if self.check(TokenTag::Question) {
                    DocParamName::Optional(name_ref, self.advance().span)
                } else {
                    DocParamName::Name(name_ref)
                }
            }
            _ => {
                return Err(ParseError::new(
                    ErrorCode::E1005,
                    format!("expected a parameter name, found {}", self.current_kind()),
                    self.current_span(),
                )
                .with_expected("a parameter name or `...`"))
            }
        };
        let ty = if self.check(TokenTag::Colon) {
            self.advance();
            Some(self.parse_doc_type()?)
        } else {
            None
        };
        Ok(DocFunctionParam { name, ty })
    }

    /// A return entry: `name[?]: type` when the lookahead says so, a bare
    /// type otherwise (the grammar's type-first choice order).
    fn parse_doc_function_return(&mut self) -> Result<DocFunctionReturn, ParseError> {
        if let TokenKind::Ident(name) = *self.current_kind() {
            let named = self.peek_tag(1) == TokenTag::Colon.index()
                || (self.peek_tag(1) == TokenTag::Question.index()
                    && self.peek_tag(2) == TokenTag::Colon.index());
            if named {
                let span = self.advance().span;
                let name_ref = NameRef { name, span };
                let question = self
                    .check(TokenTag::Question)
                    .then(|| self.advance().span);
                self.advance(); // :
                let ty = self.parse_doc_type()?;
                return Ok(DocFunctionReturn {
                    name: Some((name_ref, question)),
                    ty: Some(ty),
                });
            }
        }
        let ty = self.parse_doc_type()?;
        Ok(DocFunctionReturn {
            name: None,
            ty: Some(ty),
        })
    }

    fn doc_function_return_end(&self, ret: &DocFunctionReturn) -> Option<Span> {
        ret.ty
            .map(|ty| self.doc_ty_span(ty))
            .or_else(|| ret.name.as_ref().map(|(n, q)| q.unwrap_or(n.span)))
    }

    /// Dotted documentation identifier, optionally backtick-quoted.
    pub(crate) fn parse_doc_name(&mut self) -> Result<DocName, ParseError> {
        let backtick_open = self
            .check(TokenTag::Backtick)
            .then(|| self.advance().span);
        let first = self.expect_ident("a name")?;
        let mut segments = vec![first];
        while self.check(TokenTag::Dot) {
            self.advance();
            segments.push(self.expect_ident("a name after `.`")?);
        }
        let mut span = backtick_open.unwrap_or(first.span);
        span = span.merge(segments.last().map_or(first.span, |n| n.span));
        if backtick_open.is_some() {
            let close = self.expect(TokenTag::Backtick, "`` ` ``")?;
            span = span.merge(close);
        }
        Ok(DocName {
            segments,
            backticked: backtick_open.is_some(),
            span,
        })
    }
}

/// Builtin type names that arrive as identifiers.
fn doc_builtin(text: &str) -> Option<DocBuiltin> {
    Some(match text {
        "any" => DocBuiltin::Any,
        "boolean" | "bool" => DocBuiltin::Boolean,
        "string" => DocBuiltin::String,
        "number" => DocBuiltin::Number,
        "integer" => DocBuiltin::Integer,
        "table" => DocBuiltin::Table,
        "thread" => DocBuiltin::Thread,
        "userdata" => DocBuiltin::Userdata,
        "lightuserdata" => DocBuiltin::Lightuserdata,
        _ => return None,
    })
}
