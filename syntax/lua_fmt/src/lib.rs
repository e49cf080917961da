//! Canonical printer for the Lua syntax tree.
//!
//! Emits every non-trivia token of the tree in order: re-lexing the output
//! yields the same token text stream as the original input (documentation
//! lines, strings, and numbers are reproduced verbatim from their source
//! spans; plain comments are trivia and are dropped). Printing is
//! deterministic, so `print ∘ parse` is a fixpoint on its own output.

use lua_ir::ast::{
    Block, CallArgs, DocBlock, DocField, DocLine, DocLineKind, ExprKind, FieldSep, ForHeader,
    FunctionBody, FunctionCall, Item, Program, Statement, StatementKind, TableFieldKind, UnaryOp,
};
use lua_ir::{ExprId, Span, SyntaxArena};

/// Print a parsed program back to canonical source text.
///
/// `source` must be the buffer the tree was parsed from; variable-text
/// leaves (identifiers, numbers, strings, documentation lines) are sliced
/// out of it.
pub fn print(program: &Program, arena: &SyntaxArena, source: &str) -> String {
    let mut printer = Printer {
        arena,
        source,
        out: String::with_capacity(source.len()),
        indent: 0,
    };
    printer.program(program);
    printer.out
}

struct Printer<'a> {
    arena: &'a SyntaxArena,
    source: &'a str,
    out: String,
    indent: usize,
}

impl Printer<'_> {
    fn slice(&self, span: Span) -> &str {
        span.slice(self.source)
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn program(&mut self, program: &Program) {
        if let Some(shebang) = program.shebang {
            let text = self.slice(shebang).to_string();
            self.push(&text);
            self.out.push('\n');
        }
        for (i, item) in program.items.iter().enumerate() {
            if i > 0 || program.shebang.is_some() {
                self.newline();
            }
            self.item(item);
        }
        if let Some(ret) = &program.trailing_return {
            if !program.items.is_empty() || program.shebang.is_some() {
                self.newline();
            }
            self.statement(ret);
        }
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn item(&mut self, item: &Item) {
        match item {
            Item::Statement(statement) => self.statement(statement),
            Item::DocBlock(block) => self.doc_block(block),
            Item::Brief(brief) => {
                self.raw_line(brief.open);
                for content in &brief.lines {
                    self.doc_content_line(*content);
                }
                if let Some(close) = brief.close {
                    self.raw_line(close);
                }
                self.trim_trailing_newline();
            }
            Item::Command(command) => {
                self.raw_line(command.open);
                for content in &command.lines {
                    self.doc_content_line(*content);
                }
                if let Some(close) = command.close {
                    self.raw_line(close);
                }
                self.trim_trailing_newline();
            }
            Item::Tag(tag) => {
                let text = self.slice(tag.span).to_string();
                self.push(&text);
            }
            Item::Config(config) => {
                let text = self.slice(config.span).to_string();
                self.push(&text);
            }
        }
    }

    /// A full `---` line, verbatim, followed by a newline.
    fn raw_line(&mut self, span: Span) {
        let text = self.slice(span).to_string();
        self.push(&text);
        self.newline();
    }

    /// A brief/command content span (text after the `---` marker).
    fn doc_content_line(&mut self, content: Span) {
        let text = self.slice(content).to_string();
        self.push("---");
        self.push(&text);
        self.newline();
    }

    fn trim_trailing_newline(&mut self) {
        while self.out.ends_with([' ', '\n']) {
            self.out.pop();
        }
    }

    // ─── Documentation blocks ─────────────────────────────────────────────

    fn doc_block(&mut self, block: &DocBlock) {
        for line in &block.lines {
            self.doc_line(line);
        }
        self.trim_trailing_newline();
    }

    fn doc_line(&mut self, line: &DocLine) {
        self.raw_line(line.span);
        match &line.kind {
            DocLineKind::Class(class) => {
                for field in &class.fields {
                    self.doc_field_lines(field);
                }
            }
            DocLineKind::Field(field) => self.doc_description_extras(field),
            DocLineKind::Param(param) => {
                for alt in &param.alternatives {
                    self.raw_line(alt.line);
                }
            }
            DocLineKind::Return(ret) => {
                if let Some(description) = &ret.description {
                    for extra in &description.extra {
                        self.raw_line(*extra);
                    }
                }
            }
            _ => {}
        }
    }

    fn doc_field_lines(&mut self, field: &DocField) {
        self.raw_line(field.line);
        self.doc_description_extras(field);
    }

    fn doc_description_extras(&mut self, field: &DocField) {
        if let Some(description) = &field.description {
            for extra in &description.extra {
                self.raw_line(*extra);
            }
        }
    }

    // ─── Statements ───────────────────────────────────────────────────────

    fn statement(&mut self, statement: &Statement) {
        if let Some(doc) = &statement.documentation {
            self.doc_block(doc);
            self.newline();
        }
        match &statement.kind {
            StatementKind::Assignment(assign) => {
                self.expr_list(&assign.targets);
                self.push(" = ");
                self.expr_list(&assign.values);
            }
            StatementKind::LocalDeclaration(decl) => {
                self.push("local ");
                for (i, name) in decl.names.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    let text = self.slice(name.span).to_string();
                    self.push(&text);
                }
                if !decl.values.is_empty() {
                    self.push(" = ");
                    self.expr_list(&decl.values);
                }
            }
            StatementKind::FunctionDeclaration(decl) => {
                if decl.local_kw.is_some() {
                    self.push("local ");
                }
                self.push("function ");
                for (i, segment) in decl.name.segments.iter().enumerate() {
                    if i > 0 {
                        self.push(".");
                    }
                    let text = self.slice(segment.span).to_string();
                    self.push(&text);
                }
                if let Some((_, method)) = &decl.name.method {
                    self.push(":");
                    let text = self.slice(method.span).to_string();
                    self.push(&text);
                }
                self.function_body(&decl.body);
            }
            StatementKind::Call(call) => self.call(call),
            StatementKind::Do(stmt) => {
                self.push("do");
                self.block(&stmt.block);
                self.push("end");
            }
            StatementKind::While(stmt) => {
                self.push("while ");
                self.expr(stmt.condition);
                self.push(" do");
                self.block(&stmt.block);
                self.push("end");
            }
            StatementKind::Repeat(stmt) => {
                self.push("repeat");
                self.block(&stmt.block);
                self.push("until ");
                if let Some(condition) = stmt.condition {
                    self.expr(condition);
                }
            }
            StatementKind::If(stmt) => {
                self.push("if ");
                self.expr(stmt.condition);
                self.push(" then");
                self.block(&stmt.block);
                for clause in &stmt.elseifs {
                    self.push("elseif ");
                    self.expr(clause.condition);
                    self.push(" then");
                    self.block(&clause.block);
                }
                if let Some(clause) = &stmt.else_clause {
                    self.push("else");
                    self.block(&clause.block);
                }
                self.push("end");
            }
            StatementKind::For(stmt) => {
                self.push("for ");
                match &stmt.header {
                    ForHeader::Numeric {
                        var,
                        start,
                        finish,
                        step,
                        ..
                    } => {
                        let text = self.slice(var.span).to_string();
                        self.push(&text);
                        self.push(" = ");
                        self.expr(*start);
                        self.push(", ");
                        self.expr(*finish);
                        if let Some(step) = step {
                            self.push(", ");
                            self.expr(*step);
                        }
                    }
                    ForHeader::Generic { names, exprs, .. } => {
                        for (i, name) in names.iter().enumerate() {
                            if i > 0 {
                                self.push(", ");
                            }
                            let text = self.slice(name.span).to_string();
                            self.push(&text);
                        }
                        self.push(" in ");
                        self.expr_list(exprs);
                    }
                }
                self.push(" do");
                self.block(&stmt.block);
                self.push("end");
            }
            StatementKind::Return(ret) => {
                self.push("return");
                if !ret.values.is_empty() {
                    self.push(" ");
                    self.expr_list(&ret.values);
                }
            }
            StatementKind::Break { .. } => self.push("break"),
        }
        if statement.semicolon.is_some() {
            self.push(";");
        }
    }

    fn block(&mut self, block: &Block) {
        self.indent += 1;
        for statement in &block.statements {
            self.newline();
            self.statement(statement);
        }
        self.indent -= 1;
        self.newline();
    }

    // ─── Expressions ──────────────────────────────────────────────────────

    fn expr_list(&mut self, exprs: &[ExprId]) {
        for (i, id) in exprs.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(*id);
        }
    }

    fn expr(&mut self, id: ExprId) {
        let node = self.arena.expr(id);
        match &node.kind {
            ExprKind::Nil => self.push("nil"),
            ExprKind::True => self.push("true"),
            ExprKind::False => self.push("false"),
            ExprKind::Number => {
                let text = self.slice(node.span).to_string();
                self.push(&text);
            }
            ExprKind::Str(string) => {
                let text = self.slice(string.span()).to_string();
                self.push(&text);
            }
            ExprKind::Ellipsis => self.push("..."),
            ExprKind::Function { body, .. } => {
                self.push("function");
                self.function_body(body);
            }
            ExprKind::Name(name) => {
                let text = self.slice(name.span).to_string();
                self.push(&text);
            }
            ExprKind::Index { prefix, index, .. } => {
                self.expr(*prefix);
                self.push("[");
                self.expr(*index);
                self.push("]");
            }
            ExprKind::Field { prefix, name, .. } => {
                self.expr(*prefix);
                self.push(".");
                let text = self.slice(name.span).to_string();
                self.push(&text);
            }
            ExprKind::Call(call) => self.call(call),
            ExprKind::Paren { expr, .. } => {
                self.push("(");
                self.expr(*expr);
                self.push(")");
            }
            ExprKind::Table(table) => {
                if table.fields.is_empty() {
                    self.push("{}");
                    return;
                }
                self.push("{ ");
                for field in &table.fields {
                    match &field.kind {
                        TableFieldKind::Positional(value) => self.expr(*value),
                        TableFieldKind::Named { name, value, .. } => {
                            let text = self.slice(name.span).to_string();
                            self.push(&text);
                            self.push(" = ");
                            self.expr(*value);
                        }
                        TableFieldKind::Keyed { key, value, .. } => {
                            self.push("[");
                            self.expr(*key);
                            self.push("] = ");
                            self.expr(*value);
                        }
                    }
                    match field.sep {
                        Some(FieldSep::Comma(_)) => self.push(", "),
                        Some(FieldSep::Semicolon(_)) => self.push("; "),
                        None => self.push(" "),
                    }
                }
                self.push("}");
            }
            ExprKind::Binary { op, lhs, rhs, .. } => {
                self.expr(*lhs);
                self.push(" ");
                self.push(op.text());
                self.push(" ");
                self.expr(*rhs);
            }
            ExprKind::Unary { op, operand, .. } => {
                self.push(op.text());
                let needs_space = match op {
                    UnaryOp::Not => true,
                    UnaryOp::Neg => matches!(
                        self.arena.expr(*operand).kind,
                        ExprKind::Unary {
                            op: UnaryOp::Neg,
                            ..
                        }
                    ),
                    _ => false,
                };
                if needs_space {
                    self.push(" ");
                }
                self.expr(*operand);
            }
            ExprKind::Error => {}
        }
    }

    fn call(&mut self, call: &FunctionCall) {
        self.expr(call.prefix);
        if let Some((_, method)) = &call.method {
            self.push(":");
            let text = self.slice(method.span).to_string();
            self.push(&text);
        }
        match &call.args {
            CallArgs::Parens { args, .. } => {
                self.push("(");
                self.expr_list(args);
                self.push(")");
            }
            CallArgs::Table(id) | CallArgs::Str(id) => self.expr(*id),
        }
    }

    fn function_body(&mut self, body: &FunctionBody) {
        self.push("(");
        for (i, name) in body.params.names.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            let text = self.slice(name.span).to_string();
            self.push(&text);
        }
        if body.params.ellipsis.is_some() {
            if !body.params.names.is_empty() {
                self.push(", ");
            }
            self.push("...");
        }
        self.push(")");
        self.block(&body.block);
        self.push("end");
    }
}

#[cfg(test)]
mod tests;
