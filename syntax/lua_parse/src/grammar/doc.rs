//! Documentation grammar.
//!
//! A documentation block is a maximal run of consecutive `---` lines. The
//! core grammar never branches on documentation except at the attachment
//! points; everything here runs only once a `DocLine` token is current.
//!
//! Tag payloads are parsed by re-lexing the line remainder at its absolute
//! byte offset ([`Parser::with_subtokens`]), so spans in the produced nodes
//! point into the original buffer. Free-form description text is taken as a
//! raw span; lexical noise inside it is dropped.

use lua_diagnostic::ErrorCode;
use lua_ir::ast::{
    DocBlock, DocBrief, DocClass, DocCommand, DocConfig, DocEnumAlt, DocField, DocGeneric,
    DocGenericParam, DocLine, DocLineKind, DocParam, DocParamName, DocReturn, DocTag, DocText,
    DocTypeDecl, DocVisibility,
};
use lua_ir::{ExprId, Span, Token, TokenKind, TokenTag};

use crate::{lex_error_to_parse_error, ParseError, Parser};

/// One recognized documentation construct.
pub(crate) enum DocItem {
    Block(DocBlock),
    Brief(DocBrief),
    Tag(DocTag),
    Config(DocConfig),
    Command(DocCommand),
}

impl DocItem {
    pub(crate) fn span(&self) -> Span {
        match self {
            DocItem::Block(b) => b.span,
            DocItem::Brief(b) => b.span,
            DocItem::Tag(t) => t.span,
            DocItem::Config(c) => c.span,
            DocItem::Command(c) => c.span,
        }
    }
}

/// Marker and content spans of a `---` line token.
fn line_spans(token: &Token) -> (Span, Span) {
    let marker = Span::new(token.span.start, token.span.start + 3);
    (marker, Span::new(marker.end, token.span.end))
}

/// Leading `@tag` word of a doc line's content, with the byte offset of the
/// `@` inside the content.
fn leading_tag(text: &str) -> Option<(usize, &str)> {
    let trimmed = text.trim_start();
    let at = text.len() - trimmed.len();
    let rest = trimmed.strip_prefix('@')?;
    let word_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    (word_len > 0).then(|| (at, &rest[..word_len]))
}

/// `@brief [[` / `@brief ]]` style line shapes.
fn tag_with_bracket(text: &str, tag: &str, bracket: &str) -> bool {
    text.trim()
        .strip_prefix('@')
        .and_then(|t| t.strip_prefix(tag))
        .is_some_and(|rest| rest.trim() == bracket)
}

const TOP_LEVEL_TAGS: [&str; 4] = ["brief", "command", "tag", "config"];

impl Parser<'_> {
    /// Parse the documentation construct starting at the current `DocLine`.
    pub(crate) fn parse_doc_item(&mut self) -> DocItem {
        let token = *self.current();
        let (_, content) = line_spans(&token);
        let text = content.slice(self.source).to_string();

        if let Some((at, word)) = leading_tag(&text) {
            match word {
                "brief" if tag_with_bracket(&text, "brief", "[[") => {
                    return self.parse_doc_brief(token)
                }
                "command" => {
                    if let Some(item) = self.parse_doc_command(token, &text, content) {
                        return item;
                    }
                }
                "tag" => return self.parse_doc_tag(token, &text, content, at),
                "config" => return self.parse_doc_config(token, &text, content, at),
                _ => {}
            }
        }
        DocItem::Block(self.collect_doc_block())
    }

    // ─── Block collection ─────────────────────────────────────────────────

    /// Collect the maximal run of `---` lines into one block.
    fn collect_doc_block(&mut self) -> DocBlock {
        let start = self.current_span().start;
        let mut end = start;
        let mut lines: Vec<DocLine> = Vec::new();

        while self.check(TokenTag::DocLine) {
            let token = *self.current();
            let (marker, content) = line_spans(&token);
            let text = content.slice(self.source).to_string();
            let trimmed = text.trim_start();
            let lead = text.len() - trimmed.len();

            // A top-level container line ends the block; the program
            // grammar picks it up as its own item.
            if let Some((_, word)) = leading_tag(&text) {
                if TOP_LEVEL_TAGS.contains(&word) && !lines.is_empty() {
                    break;
                }
            }

            let kind = if trimmed.is_empty() {
                // Blank lines are ignorable, never comment text: the blank
                // pattern is matched first.
                Some(DocLineKind::Blank)
            } else if trimmed.starts_with('@') {
                Some(self.parse_doc_tag_line(token, &text, content, lead))
            } else if trimmed.starts_with('|') {
                match self.parse_doc_enum_alt(token, content, lead) {
                    Some(alt) => {
                        if !attach_enum_alt(&mut lines, alt) {
                            // `|` line with no preceding `@param`: comment.
                            Some(DocLineKind::Comment(content))
                        } else {
                            None
                        }
                    }
                    None => Some(DocLineKind::Error(content)),
                }
            } else if fold_continuation(&mut lines, token.span) {
                // Absorbed into the preceding description.
                None
            } else {
                Some(DocLineKind::Comment(content))
            };

            match kind {
                // Field lines directly after a class belong to the class.
                Some(DocLineKind::Field(field)) if ends_with_class(&lines) => {
                    if let Some(DocLine {
                        kind: DocLineKind::Class(class),
                        ..
                    }) = lines.last_mut()
                    {
                        class.fields.push(field);
                    }
                }
                Some(kind) => lines.push(DocLine {
                    marker,
                    kind,
                    span: token.span,
                }),
                None => {}
            }

            end = token.span.end;
            self.advance();
        }

        DocBlock {
            lines,
            span: Span::new(start, end),
        }
    }

    // ─── Tag lines ────────────────────────────────────────────────────────

    /// Parse one `@tag` line into its line kind.
    fn parse_doc_tag_line(
        &mut self,
        token: Token,
        text: &str,
        content: Span,
        lead: usize,
    ) -> DocLineKind {
        let Some((at, word)) = leading_tag(text) else {
            return DocLineKind::Comment(content);
        };
        debug_assert_eq!(at, lead);
        let rest_off = at + 1 + word.len();
        let rest = &text[rest_off..];
        let base = content.start + rest_off as u32;

        match word {
            "class" => self.parse_doc_class_line(token, rest, base, content),
            "field" => self.parse_doc_field_line(token, rest, base, content),
            "generic" => self.parse_doc_generic_line(rest, base, content),
            "param" => self.parse_doc_param_line(rest, base, content),
            "return" => self.parse_doc_return_line(rest, base, content),
            "type" => self.parse_doc_typedecl_line(rest, base, content),
            "note" => DocLineKind::Note(rest_span(content, rest_off, text)),
            "see" => DocLineKind::See(rest_span(content, rest_off, text)),
            "todo" => DocLineKind::Todo(rest_span(content, rest_off, text)),
            "usage" => DocLineKind::Usage(rest_span(content, rest_off, text)),
            "varargs" => DocLineKind::Varargs(rest_span(content, rest_off, text)),
            "eval" => match self.parse_doc_expr(rest, base) {
                Some(expr) => DocLineKind::Eval(expr),
                None => DocLineKind::Error(content),
            },
            "brief" | "command" => {
                // Routed here only when the container shape was malformed.
                self.record(ParseError::new(
                    ErrorCode::E1005,
                    format!("malformed `@{word}` container line"),
                    content,
                ));
                DocLineKind::Error(content)
            }
            other => {
                self.record(ParseError::new(
                    ErrorCode::E1005,
                    format!("unknown documentation tag `@{other}`"),
                    content,
                ));
                DocLineKind::Error(content)
            }
        }
    }

    fn parse_doc_class_line(
        &mut self,
        _token: Token,
        rest: &str,
        base: u32,
        content: Span,
    ) -> DocLineKind {
        let (result, lex_errors) = self.with_subtokens(rest, base, |p| {
            let exact = p.parse_doc_exact_modifier();
            let name = match p.parse_doc_name() {
                Ok(name) => name,
                Err(error) => return Err(error),
            };
            let parent = if p.check(TokenTag::Colon) {
                p.advance();
                match p.parse_doc_name() {
                    Ok(parent) => Some(parent),
                    Err(error) => return Err(error),
                }
            } else {
                None
            };
            Ok(DocClass {
                exact,
                name,
                parent,
                fields: Vec::new(),
            })
        });
        self.keep_lex_errors(lex_errors, content.end);
        match result {
            Ok(class) => DocLineKind::Class(class),
            Err(error) => {
                self.record(error);
                DocLineKind::Error(content)
            }
        }
    }

    fn parse_doc_exact_modifier(&mut self) -> Option<Span> {
        if !self.check(TokenTag::LParen) {
            return None;
        }
        let TokenKind::Ident(name) = self.cursor.peek_token(1).kind else {
            return None;
        };
        if self.interner.lookup(name) != "exact" || self.peek_tag(2) != TokenTag::RParen.index() {
            return None;
        }
        let open = self.advance().span;
        self.advance();
        let close = self.advance().span;
        Some(open.merge(close))
    }

    fn parse_doc_field_line(
        &mut self,
        token: Token,
        rest: &str,
        base: u32,
        content: Span,
    ) -> DocLineKind {
        let content_end = content.end;
        let (result, lex_errors) = self.with_subtokens(rest, base, |p| {
            let visibility = p.parse_doc_visibility();
            let name = p.expect_ident("a field name")?;
            let optional = p.check(TokenTag::Question).then(|| p.advance().span);
            let ty = match p.parse_doc_type() {
                Ok(ty) => ty,
                Err(error) => {
                    let span = p.current_span();
                    p.record(error);
                    p.error_doc_type(span)
                }
            };
            let description = p.take_line_description(content_end, true);
            Ok::<_, ParseError>((visibility, name, optional, ty, description))
        });
        let boundary = result
            .as_ref()
            .ok()
            .and_then(|r| r.4.as_ref().map(|d| d.head.start))
            .unwrap_or(content_end);
        self.keep_lex_errors(lex_errors, boundary);
        match result {
            Ok((visibility, name, optional, ty, description)) => DocLineKind::Field(DocField {
                line: token.span,
                visibility,
                name,
                optional,
                ty,
                description,
            }),
            Err(error) => {
                self.record(error);
                DocLineKind::Error(content)
            }
        }
    }

    fn parse_doc_visibility(&mut self) -> Option<(DocVisibility, Span)> {
        let TokenKind::Ident(name) = *self.current_kind() else {
            return None;
        };
        // Only a visibility word when another identifier follows; otherwise
        // `---@field public number` would eat the field's name.
        if self.peek_tag(1) != TokenTag::Ident.index() {
            return None;
        }
        let vis = match self.interner.lookup(name).as_str() {
            "public" => DocVisibility::Public,
            "protected" => DocVisibility::Protected,
            "private" => DocVisibility::Private,
            _ => return None,
        };
        Some((vis, self.advance().span))
    }

    fn parse_doc_generic_line(&mut self, rest: &str, base: u32, content: Span) -> DocLineKind {
        let (result, lex_errors) = self.with_subtokens(rest, base, |p| {
            let mut params = Vec::new();
            loop {
                let name = p.expect_ident("a generic name")?;
                let parent = if p.check(TokenTag::Colon) {
                    p.advance();
                    Some(p.parse_doc_type()?)
                } else {
                    None
                };
                params.push(DocGenericParam { name, parent });
                if p.check(TokenTag::Comma) {
                    p.advance();
                } else {
                    break;
                }
            }
            Ok::<_, ParseError>(DocGeneric { params })
        });
        self.keep_lex_errors(lex_errors, content.end);
        match result {
            Ok(generic) => DocLineKind::Generic(generic),
            Err(error) => {
                self.record(error);
                DocLineKind::Error(content)
            }
        }
    }

    fn parse_doc_param_line(&mut self, rest: &str, base: u32, content: Span) -> DocLineKind {
        let content_end = content.end;
        let (result, lex_errors) = self.with_subtokens(rest, base, |p| {
            let name = match *p.current_kind() {
                TokenKind::Ellipsis => DocParamName::Ellipsis(p.advance().span),
                TokenKind::Ident(name) => {
                    let span = p.advance().span;
                    let name_ref = lua_ir::ast::NameRef { name, span };
                    if p.check(TokenTag::Question) {
                        DocParamName::Optional(name_ref, p.advance().span)
                    } else {
                        DocParamName::Name(name_ref)
                    }
                }
                _ => {
                    return Err(ParseError::new(
                        ErrorCode::E1005,
                        format!("expected a parameter name, found {}", p.current_kind()),
                        p.current_span(),
                    )
                    .with_expected("a parameter name or `...`"))
                }
            };
            let ty = match p.parse_doc_type() {
                Ok(ty) => ty,
                Err(error) => {
                    let span = p.current_span();
                    p.record(error);
                    p.error_doc_type(span)
                }
            };
            let description = p
                .take_line_description(content_end, true)
                .map(|d| d.head);
            Ok::<_, ParseError>((name, ty, description))
        });
        let boundary = result
            .as_ref()
            .ok()
            .and_then(|r| r.2.map(|d| d.start))
            .unwrap_or(content_end);
        self.keep_lex_errors(lex_errors, boundary);
        match result {
            Ok((name, ty, description)) => DocLineKind::Param(DocParam {
                name,
                ty,
                description,
                alternatives: Vec::new(),
            }),
            Err(error) => {
                self.record(error);
                DocLineKind::Error(content)
            }
        }
    }

    fn parse_doc_return_line(&mut self, rest: &str, base: u32, content: Span) -> DocLineKind {
        let content_end = content.end;
        let (result, lex_errors) = self.with_subtokens(rest, base, |p| {
            let ty = p.parse_doc_type()?;
            let mut name = None;
            let mut description = None;
            match *p.current_kind() {
                TokenKind::Eof => {}
                TokenKind::Colon | TokenKind::Hash => {
                    p.advance();
                    description = p.take_line_description(content_end, false);
                }
                TokenKind::Ident(n) => {
                    let span = p.advance().span;
                    name = Some(lua_ir::ast::NameRef { name: n, span });
                    description = p.take_line_description(content_end, false);
                }
                _ => {
                    return Err(ParseError::new(
                        ErrorCode::E1005,
                        format!(
                            "expected a return name or description, found {}",
                            p.current_kind()
                        ),
                        p.current_span(),
                    ))
                }
            }
            Ok::<_, ParseError>(DocReturn {
                ty,
                name,
                description,
            })
        });
        let boundary = result
            .as_ref()
            .ok()
            .and_then(|r| r.description.as_ref().map(|d| d.head.start))
            .unwrap_or(content_end);
        self.keep_lex_errors(lex_errors, boundary);
        match result {
            Ok(ret) => DocLineKind::Return(ret),
            Err(error) => {
                self.record(error);
                DocLineKind::Error(content)
            }
        }
    }

    fn parse_doc_typedecl_line(&mut self, rest: &str, base: u32, content: Span) -> DocLineKind {
        let (result, lex_errors) = self.with_subtokens(rest, base, |p| {
            let mut types = vec![p.parse_doc_type()?];
            while p.check(TokenTag::Comma) {
                p.advance();
                types.push(p.parse_doc_type()?);
            }
            Ok::<_, ParseError>(DocTypeDecl { types })
        });
        self.keep_lex_errors(lex_errors, content.end);
        match result {
            Ok(decl) => DocLineKind::TypeDecl(decl),
            Err(error) => {
                self.record(error);
                DocLineKind::Error(content)
            }
        }
    }

    /// `--- | <type> [# description]` alternative line for a `@param`.
    fn parse_doc_enum_alt(&mut self, token: Token, content: Span, lead: usize) -> Option<DocEnumAlt> {
        let pipe_off = content.start + lead as u32;
        let pipe = Span::new(pipe_off, pipe_off + 1);
        let rest_off = lead + 1;
        let text = content.slice(self.source).to_string();
        let rest = &text[rest_off..];
        let base = content.start + rest_off as u32;
        let content_end = content.end;

        let (result, lex_errors) = self.with_subtokens(rest, base, |p| {
            let ty = p.parse_doc_type()?;
            let description = match p.current_kind() {
                TokenKind::Hash => {
                    p.advance();
                    p.take_line_description(content_end, false).map(|d| d.head)
                }
                TokenKind::Eof => None,
                _ => p.take_line_description(content_end, false).map(|d| d.head),
            };
            Ok::<_, ParseError>((ty, description))
        });
        let boundary = result
            .as_ref()
            .ok()
            .and_then(|r| r.1.map(|d| d.start))
            .unwrap_or(content_end);
        self.keep_lex_errors(lex_errors, boundary);
        match result {
            Ok((ty, description)) => Some(DocEnumAlt {
                line: token.span,
                pipe,
                ty,
                description,
            }),
            Err(error) => {
                self.record(error);
                None
            }
        }
    }

    // ─── Top-level containers ─────────────────────────────────────────────

    /// `---@brief [[` ... `---@brief ]]`.
    fn parse_doc_brief(&mut self, open_token: Token) -> DocItem {
        let open = open_token.span;
        self.advance();
        let mut lines = Vec::new();
        let mut close = None;
        let mut end = open.end;

        while self.check(TokenTag::DocLine) {
            let token = *self.current();
            let (_, content) = line_spans(&token);
            let text = content.slice(self.source);
            if tag_with_bracket(text, "brief", "]]") {
                close = Some(token.span);
                end = token.span.end;
                self.advance();
                break;
            }
            lines.push(content);
            end = token.span.end;
            self.advance();
        }

        if close.is_none() {
            self.record(
                ParseError::new(
                    ErrorCode::E1006,
                    "`@brief [[` block is missing its `---@brief ]]` closer".to_string(),
                    open,
                )
                .with_expected("`---@brief ]]`"),
            );
        }
        DocItem::Brief(DocBrief {
            open,
            lines,
            close,
            span: Span::new(open.start, end),
        })
    }

    /// `---@command <usage> [[` ... `---@command ]]`.
    ///
    /// Returns `None` when the line does not have the container shape (then
    /// the block collector reports it as an unknown tag).
    fn parse_doc_command(&mut self, open_token: Token, text: &str, content: Span) -> Option<DocItem> {
        let after = text.trim_start().strip_prefix("@command")?;
        let bracket_rel = after.find("[[")?;
        if !after[bracket_rel + 2..].trim().is_empty() {
            return None;
        }
        let lead = (text.len() - text.trim_start().len()) + "@command".len();
        let usage_text = &after[..bracket_rel];
        let usage_trim_start = usage_text.len() - usage_text.trim_start().len();
        let usage_start = content.start + (lead + usage_trim_start) as u32;
        let usage_len = usage_text.trim().len() as u32;
        let usage = Span::new(usage_start, usage_start + usage_len);

        let open = open_token.span;
        self.advance();
        let mut lines = Vec::new();
        let mut close = None;
        let mut end = open.end;

        while self.check(TokenTag::DocLine) {
            let token = *self.current();
            let (_, line_content) = line_spans(&token);
            let line_text = line_content.slice(self.source);
            if tag_with_bracket(line_text, "command", "]]") {
                close = Some(token.span);
                end = token.span.end;
                self.advance();
                break;
            }
            lines.push(line_content);
            end = token.span.end;
            self.advance();
        }

        if close.is_none() {
            self.record(
                ParseError::new(
                    ErrorCode::E1006,
                    "`@command` block is missing its `---@command ]]` closer".to_string(),
                    open,
                )
                .with_expected("`---@command ]]`"),
            );
        }
        Some(DocItem::Command(DocCommand {
            open,
            usage,
            lines,
            close,
            span: Span::new(open.start, end),
        }))
    }

    /// `---@tag <text>`.
    fn parse_doc_tag(&mut self, token: Token, text: &str, content: Span, at: usize) -> DocItem {
        let rest_off = at + "@tag".len();
        let rest = &text[rest_off..];
        let trim_start = rest.len() - rest.trim_start().len();
        let start = content.start + (rest_off + trim_start) as u32;
        let tag_text = Span::new(start, start + rest.trim().len() as u32);
        if tag_text.is_empty() {
            self.record(ParseError::new(
                ErrorCode::E1005,
                "`@tag` requires text".to_string(),
                content,
            ));
        }
        self.advance();
        DocItem::Tag(DocTag {
            text: tag_text,
            span: token.span,
        })
    }

    /// `---@config <expression>`.
    fn parse_doc_config(&mut self, token: Token, text: &str, content: Span, at: usize) -> DocItem {
        let rest_off = at + "@config".len();
        let rest = &text[rest_off..];
        let base = content.start + rest_off as u32;
        let expr = self
            .parse_doc_expr(rest, base)
            .unwrap_or_else(|| self.error_expr(content));
        self.advance();
        DocItem::Config(DocConfig {
            expr,
            span: token.span,
        })
    }

    // ─── Shared helpers ───────────────────────────────────────────────────

    /// Parse an embedded expression from a line remainder (`@config`,
    /// `@eval`). All lexical errors count: this is expression context.
    fn parse_doc_expr(&mut self, rest: &str, base: u32) -> Option<ExprId> {
        let (result, lex_errors) = self.with_subtokens(rest, base, |p| {
            let expr = p.parse_expr()?;
            if !p.at_end() {
                p.record(ParseError::new(
                    ErrorCode::E1005,
                    format!("unexpected {} after expression", p.current_kind()),
                    p.current_span(),
                ));
            }
            Ok::<_, ParseError>(expr)
        });
        for e in &lex_errors {
            self.record(lex_error_to_parse_error(e));
        }
        match result {
            Ok(expr) => Some(expr),
            Err(error) => {
                self.record(error);
                None
            }
        }
    }

    /// Rest-of-line description starting at the current sub-token.
    ///
    /// With `colon_intro`, a leading `:` is consumed as the separator. The
    /// description is the raw text from the next token to end of line.
    fn take_line_description(&mut self, content_end: u32, colon_intro: bool) -> Option<DocText> {
        if colon_intro && self.check(TokenTag::Colon) {
            self.advance();
        }
        if self.at_end() {
            return None;
        }
        let start = self.current_span().start;
        (start < content_end).then(|| DocText {
            head: Span::new(start, content_end),
            extra: Vec::new(),
        })
    }

    /// Keep only lexical errors before `boundary` (structured part); noise
    /// inside free-form description text is dropped.
    fn keep_lex_errors(&mut self, errors: Vec<lua_lexer::LexError>, boundary: u32) {
        for e in &errors {
            if e.span.start < boundary {
                self.record(lex_error_to_parse_error(e));
            }
        }
    }
}

/// Whether the last collected line is a `@class`.
fn ends_with_class(lines: &[DocLine]) -> bool {
    matches!(
        lines.last(),
        Some(DocLine {
            kind: DocLineKind::Class(_),
            ..
        })
    )
}

/// Attach an enum alternative to the preceding `@param` line, if any.
fn attach_enum_alt(lines: &mut [DocLine], alt: DocEnumAlt) -> bool {
    if let Some(DocLine {
        kind: DocLineKind::Param(param),
        ..
    }) = lines.last_mut()
    {
        param.alternatives.push(alt);
        true
    } else {
        false
    }
}

/// Fold a plain continuation line into the preceding description, when the
/// preceding line is a `@field`/`@return` (or a class field) that has one.
fn fold_continuation(lines: &mut [DocLine], line_span: Span) -> bool {
    let target = match lines.last_mut() {
        Some(DocLine {
            kind: DocLineKind::Class(class),
            ..
        }) => class
            .fields
            .last_mut()
            .and_then(|f| f.description.as_mut()),
        Some(DocLine {
            kind: DocLineKind::Field(field),
            ..
        }) => field.description.as_mut(),
        Some(DocLine {
            kind: DocLineKind::Return(ret),
            ..
        }) => ret.description.as_mut(),
        _ => None,
    };
    match target {
        Some(text) => {
            text.extra.push(line_span);
            true
        }
        None => false,
    }
}

/// Span of the rest of a line after a tag word, trimmed.
fn rest_span(content: Span, rest_off: usize, text: &str) -> Span {
    let rest = &text[rest_off..];
    let trim_start = rest.len() - rest.trim_start().len();
    let start = content.start + (rest_off + trim_start) as u32;
    Span::new(start, start + rest.trim().len() as u32)
}
