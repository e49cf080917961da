//! Statement and block parsing.
//!
//! Every block construct tracks which terminator keyword it expects and
//! reports `E1002` with the opener location when it is missing. At statement
//! start, a reference is a declarator when the statement continues with `=`
//! or `,`, and must otherwise end as a call — the documented resolution of
//! the declarator/prefix-expression ambiguity.

use lua_diagnostic::ErrorCode;
use lua_ir::ast::{
    Assignment, Block, DoBlock, DocBlock, ElseClause, ElseifClause, Expr, ExprKind, ForHeader,
    ForStatement, FunctionDeclaration, FunctionName, IfStatement, LocalDeclaration,
    RepeatStatement, ReturnStatement, Statement, StatementKind, WhileStatement,
};
use lua_ir::{ExprId, Span, TokenKind, TokenTag};

use crate::grammar::DocItem;
use crate::recovery::{self, TokenSet, BLOCK_END, EXPR_START, STMT_START};
use crate::{ParseError, Parser};

const END_ONLY: TokenSet = TokenSet::new().with(TokenTag::KwEnd);
const UNTIL_ONLY: TokenSet = TokenSet::new().with(TokenTag::KwUntil);
const IF_BRANCH: TokenSet = TokenSet::new()
    .with(TokenTag::KwEnd)
    .with(TokenTag::KwElseif)
    .with(TokenTag::KwElse);

impl Parser<'_> {
    /// Parse one statement, attaching `doc` if provided.
    pub(crate) fn parse_statement(
        &mut self,
        doc: Option<DocBlock>,
    ) -> Result<Statement, ParseError> {
        let start = doc
            .as_ref()
            .map_or_else(|| self.current_span(), |d| d.span);
        let kind = match self.current_kind() {
            TokenKind::Local => self.parse_local()?,
            TokenKind::Function => self.parse_function_declaration()?,
            TokenKind::Do => self.parse_do()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::Repeat => self.parse_repeat()?,
            TokenKind::If => self.parse_if()?,
            TokenKind::For => self.parse_for()?,
            TokenKind::Return => StatementKind::Return(self.parse_return()?),
            TokenKind::Break => StatementKind::Break {
                break_kw: self.advance().span,
            },
            TokenKind::Ident(_) | TokenKind::LParen => self.parse_assignment_or_call()?,
            _ => {
                // A stray block terminator here means no construct is open:
                // the input continues past the end of the program.
                let code = if BLOCK_END.contains_raw(self.current_tag()) && !self.at_end() {
                    ErrorCode::E1007
                } else {
                    ErrorCode::E1001
                };
                return Err(ParseError::new(
                    code,
                    format!("expected statement, found {}", self.current_kind()),
                    self.current_span(),
                )
                .with_expected("a statement"))
            }
        };
        let semicolon = self
            .check(TokenTag::Semicolon)
            .then(|| self.advance().span);
        let end = semicolon.unwrap_or_else(|| self.previous_span());
        Ok(Statement {
            documentation: doc,
            kind,
            span: start.merge(end),
            semicolon,
        })
    }

    /// Parse a statement sequence until a token in `terminators` (or EOF).
    ///
    /// `return`/`break` must be block-final: any statement after one gets an
    /// `E1008`, but parsing continues so the rest is still recognized.
    pub(crate) fn parse_block(&mut self, terminators: TokenSet) -> Block {
        let start = self.current_span().start;
        let mut statements: Vec<Statement> = Vec::new();
        let recovery_set = STMT_START.union(terminators).union(BLOCK_END);

        while !self.at_end() && !terminators.contains_raw(self.current_tag()) {
            // Blocks never terminate on these; stop so the enclosing
            // construct reports its own mismatch instead of swallowing them.
            if BLOCK_END.contains_raw(self.current_tag()) {
                break;
            }

            let doc = if self.check(TokenTag::DocLine) {
                match self.parse_doc_item() {
                    DocItem::Block(block) => Some(block),
                    other => {
                        self.record(ParseError::new(
                            ErrorCode::E1005,
                            "project documentation is only recognized at the top level"
                                .to_string(),
                            other.span(),
                        ));
                        continue;
                    }
                }
            } else {
                None
            };

            if let Some(block) = &doc {
                if self.at_end()
                    || terminators.contains_raw(self.current_tag())
                    || self.check(TokenTag::DocLine)
                {
                    self.record(ParseError::new(
                        ErrorCode::E1005,
                        "documentation block is not followed by a statement".to_string(),
                        block.span,
                    ));
                    continue;
                }
            }

            if let Some(prev) = statements.last() {
                if matches!(
                    prev.kind,
                    StatementKind::Return(_) | StatementKind::Break { .. }
                ) {
                    self.record(
                        ParseError::new(
                            ErrorCode::E1008,
                            "statement after the end of the block".to_string(),
                            self.current_span(),
                        )
                        .with_related("block ends here", prev.span),
                    );
                }
            }

            let before = self.position();
            match self.parse_statement(doc) {
                Ok(statement) => statements.push(statement),
                Err(error) => {
                    tracing::debug!(at = %error.span, "statement recovery");
                    self.record(error);
                    recovery::synchronize(&mut self.cursor, recovery_set);
                    if self.position() == before && !self.at_end() {
                        self.advance();
                    }
                }
            }
        }

        let end = self.previous_span().end.max(start);
        Block {
            statements,
            span: Span::new(start, end),
        }
    }

    /// Consume the `end` of a block construct or report `E1002`.
    pub(crate) fn expect_block_end(
        &mut self,
        construct: &'static str,
        opener: Span,
    ) -> Option<Span> {
        if self.check(TokenTag::KwEnd) {
            return Some(self.advance().span);
        }
        self.record(
            ParseError::new(
                ErrorCode::E1002,
                format!(
                    "expected `end` to close `{construct}`, found {}",
                    self.current_kind()
                ),
                self.current_span(),
            )
            .with_expected("`end`")
            .with_related(format!("`{construct}` opened here"), opener),
        );
        None
    }

    // ─── Declarations and assignment ──────────────────────────────────────

    fn parse_local(&mut self) -> Result<StatementKind, ParseError> {
        let local_kw = self.advance().span;
        if self.check(TokenTag::KwFunction) {
            let function_kw = self.advance().span;
            let name = self.expect_ident("a function name")?;
            let body = self.parse_function_body(function_kw)?;
            return Ok(StatementKind::FunctionDeclaration(FunctionDeclaration {
                local_kw: Some(local_kw),
                function_kw,
                name: FunctionName {
                    segments: vec![name],
                    method: None,
                },
                body,
            }));
        }

        let mut names = vec![self.expect_ident("a variable name")?];
        while self.check(TokenTag::Comma) {
            self.advance();
            names.push(self.expect_ident("a variable name")?);
        }

        let mut eq = None;
        let mut values = Vec::new();
        if self.check(TokenTag::Assign) {
            eq = Some(self.advance().span);
            values.push(self.parse_expr()?);
            while self.check(TokenTag::Comma) {
                if self.is_pair_extension() {
                    self.advance(); // ,
                    names.push(self.expect_ident("a variable name")?);
                    self.advance(); // =
                    values.push(self.parse_expr()?);
                } else {
                    self.advance();
                    values.push(self.parse_expr()?);
                }
            }
        }
        Ok(StatementKind::LocalDeclaration(LocalDeclaration {
            local_kw,
            names,
            eq,
            values,
        }))
    }

    /// `, name =` after a value extends the declaration with another
    /// name/value pair, keeping both lists in source order. This is what
    /// makes `local x = 1, y = 2` mean names `[x, y]`, values `[1, 2]`.
    fn is_pair_extension(&self) -> bool {
        self.peek_tag(1) == TokenTag::Ident.index() && self.peek_tag(2) == TokenTag::Assign.index()
    }

    fn parse_function_declaration(&mut self) -> Result<StatementKind, ParseError> {
        let function_kw = self.advance().span;
        let mut segments = vec![self.expect_ident("a function name")?];
        while self.check(TokenTag::Dot) {
            self.advance();
            segments.push(self.expect_ident("a name after `.`")?);
        }
        let method = if self.check(TokenTag::Colon) {
            let colon = self.advance().span;
            Some((colon, self.expect_ident("a method name")?))
        } else {
            None
        };
        let body = self.parse_function_body(function_kw)?;
        Ok(StatementKind::FunctionDeclaration(FunctionDeclaration {
            local_kw: None,
            function_kw,
            name: FunctionName { segments, method },
            body,
        }))
    }

    /// Statement starting with a reference: the declarator tie-break.
    ///
    /// Parse one suffixed expression; `=`/`,` next means assignment (each
    /// target must be a variable form), otherwise it must already be a call.
    fn parse_assignment_or_call(&mut self) -> Result<StatementKind, ParseError> {
        let first = self.parse_prefix_chain()?;

        if !matches!(
            self.current_kind(),
            TokenKind::Assign | TokenKind::Comma
        ) {
            if let ExprKind::Call(call) = &self.arena.expr(first).kind {
                return Ok(StatementKind::Call(call.clone()));
            }
            return Err(ParseError::new(
                ErrorCode::E1001,
                "expected `=`, `,`, or call arguments after this expression".to_string(),
                self.expr_span(first),
            )
            .with_expected("an assignment or a call"));
        }

        let mut targets = vec![first];
        self.check_assignment_target(first);
        while self.check(TokenTag::Comma) {
            self.advance();
            let target = self.parse_prefix_chain()?;
            self.check_assignment_target(target);
            targets.push(target);
        }
        let eq = self.expect(TokenTag::Assign, "`=`")?;
        let mut values = vec![self.parse_expr()?];
        while self.check(TokenTag::Comma) {
            if self.is_pair_extension() {
                self.advance(); // ,
                let name = self.expect_ident("a variable name")?;
                let id = self.alloc(Expr {
                    kind: ExprKind::Name(name),
                    span: name.span,
                });
                targets.push(id);
                self.advance(); // =
                values.push(self.parse_expr()?);
            } else {
                self.advance();
                values.push(self.parse_expr()?);
            }
        }
        Ok(StatementKind::Assignment(Assignment {
            targets,
            eq,
            values,
        }))
    }

    fn check_assignment_target(&mut self, target: ExprId) {
        if !self.arena.expr(target).kind.is_var() {
            let span = self.expr_span(target);
            self.record(
                ParseError::new(
                    ErrorCode::E1003,
                    "cannot assign to this expression".to_string(),
                    span,
                )
                .with_expected("a name, `t[k]`, or `t.k`"),
            );
        }
    }

    // ─── Control flow ─────────────────────────────────────────────────────

    fn parse_do(&mut self) -> Result<StatementKind, ParseError> {
        let do_kw = self.advance().span;
        let block = self.parse_block(END_ONLY);
        let end_kw = self.expect_block_end("do", do_kw);
        Ok(StatementKind::Do(DoBlock {
            do_kw,
            block,
            end_kw,
        }))
    }

    fn parse_while(&mut self) -> Result<StatementKind, ParseError> {
        let while_kw = self.advance().span;
        let condition = self.parse_expr_or_recover();
        let do_kw = self.expect(TokenTag::KwDo, "`do`")?;
        let block = self.parse_block(END_ONLY);
        let end_kw = self.expect_block_end("while", while_kw);
        Ok(StatementKind::While(WhileStatement {
            while_kw,
            condition,
            do_kw,
            block,
            end_kw,
        }))
    }

    fn parse_repeat(&mut self) -> Result<StatementKind, ParseError> {
        let repeat_kw = self.advance().span;
        let block = self.parse_block(UNTIL_ONLY);
        let (until_kw, condition) = if self.check(TokenTag::KwUntil) {
            let until = self.advance().span;
            (Some(until), Some(self.parse_expr_or_recover()))
        } else {
            self.record(
                ParseError::new(
                    ErrorCode::E1002,
                    format!(
                        "expected `until` to close `repeat`, found {}",
                        self.current_kind()
                    ),
                    self.current_span(),
                )
                .with_expected("`until`")
                .with_related("`repeat` opened here", repeat_kw),
            );
            (None, None)
        };
        Ok(StatementKind::Repeat(RepeatStatement {
            repeat_kw,
            block,
            until_kw,
            condition,
        }))
    }

    fn parse_if(&mut self) -> Result<StatementKind, ParseError> {
        let if_kw = self.advance().span;
        let condition = self.parse_expr_or_recover();
        let then_kw = self.expect(TokenTag::KwThen, "`then`")?;
        let block = self.parse_block(IF_BRANCH);

        let mut elseifs = Vec::new();
        while self.check(TokenTag::KwElseif) {
            let elseif_kw = self.advance().span;
            let condition = self.parse_expr_or_recover();
            let then_kw = self.expect(TokenTag::KwThen, "`then`")?;
            let block = self.parse_block(IF_BRANCH);
            elseifs.push(ElseifClause {
                elseif_kw,
                condition,
                then_kw,
                block,
            });
        }

        let else_clause = if self.check(TokenTag::KwElse) {
            let else_kw = self.advance().span;
            let block = self.parse_block(END_ONLY);
            Some(ElseClause { else_kw, block })
        } else {
            None
        };

        let end_kw = self.expect_block_end("if", if_kw);
        Ok(StatementKind::If(IfStatement {
            if_kw,
            condition,
            then_kw,
            block,
            elseifs,
            else_clause,
            end_kw,
        }))
    }

    fn parse_for(&mut self) -> Result<StatementKind, ParseError> {
        let for_kw = self.advance().span;
        let first = self.expect_ident("a loop variable")?;

        let header = if self.check(TokenTag::Assign) {
            let eq = self.advance().span;
            let start = self.parse_expr()?;
            self.expect(TokenTag::Comma, "`,`")?;
            let finish = self.parse_expr()?;
            let step = if self.check(TokenTag::Comma) {
                self.advance();
                Some(self.parse_expr()?)
            } else {
                None
            };
            ForHeader::Numeric {
                var: first,
                eq,
                start,
                finish,
                step,
            }
        } else {
            let mut names = vec![first];
            while self.check(TokenTag::Comma) {
                self.advance();
                names.push(self.expect_ident("a loop variable")?);
            }
            let in_kw = self.expect(TokenTag::KwIn, "`in`")?;
            let mut exprs = vec![self.parse_expr()?];
            while self.check(TokenTag::Comma) {
                self.advance();
                exprs.push(self.parse_expr()?);
            }
            ForHeader::Generic {
                names,
                in_kw,
                exprs,
            }
        };

        let do_kw = self.expect(TokenTag::KwDo, "`do`")?;
        let block = self.parse_block(END_ONLY);
        let end_kw = self.expect_block_end("for", for_kw);
        Ok(StatementKind::For(ForStatement {
            for_kw,
            header,
            do_kw,
            block,
            end_kw,
        }))
    }

    pub(crate) fn parse_return(&mut self) -> Result<ReturnStatement, ParseError> {
        let return_kw = self.advance().span;
        let mut values = Vec::new();
        if EXPR_START.contains_raw(self.current_tag()) {
            values.push(self.parse_expr()?);
            while self.check(TokenTag::Comma) {
                self.advance();
                values.push(self.parse_expr()?);
            }
        }
        Ok(ReturnStatement { return_kw, values })
    }

    /// Parse an expression; on failure record the error and produce an
    /// `Error` placeholder so the enclosing construct can continue.
    fn parse_expr_or_recover(&mut self) -> ExprId {
        let span = self.current_span();
        match self.parse_expr() {
            Ok(id) => id,
            Err(error) => {
                self.record(error);
                self.error_expr(Span::point(span.start))
            }
        }
    }
}
