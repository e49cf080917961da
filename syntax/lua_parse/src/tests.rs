use lua_diagnostic::ErrorCode;
use lua_ir::ast::{
    BinaryOp, DocLineKind, DocParamName, DocTypeKind, ExprKind, FieldSep, ForHeader, Item,
    StatementKind, TableFieldKind, UnaryOp,
};
use lua_ir::{ExprId, StringInterner};
use pretty_assertions::assert_eq;

use crate::{parse, ParseResult};

fn parse_source(source: &str) -> ParseResult {
    let interner = StringInterner::new();
    parse(source, &interner)
}

fn parse_clean(source: &str) -> ParseResult {
    let result = parse_source(source);
    assert!(
        !result.has_errors(),
        "unexpected errors in {source:?}: {:#?}",
        result.errors
    );
    result
}

fn first_statement(result: &ParseResult) -> &StatementKind {
    match &result.program.items[0] {
        Item::Statement(s) => &s.kind,
        other => panic!("expected statement, got {other:?}"),
    }
}

/// The single expression of `local x = <expr>` sources.
fn expr_of(result: &ParseResult) -> ExprId {
    match first_statement(result) {
        StatementKind::LocalDeclaration(decl) => decl.values[0],
        other => panic!("expected local declaration, got {other:?}"),
    }
}

// ─── Expressions ──────────────────────────────────────────────────────────

#[test]
fn test_literals() {
    let result = parse_clean("local x = nil");
    assert!(matches!(
        result.arena.expr(expr_of(&result)).kind,
        ExprKind::Nil
    ));

    let result = parse_clean("local x = 3.14");
    assert!(matches!(
        result.arena.expr(expr_of(&result)).kind,
        ExprKind::Number
    ));

    let result = parse_clean("local x = 'str'");
    assert!(matches!(
        result.arena.expr(expr_of(&result)).kind,
        ExprKind::Str(_)
    ));
}

#[test]
fn test_precedence_mul_under_add() {
    let result = parse_clean("local x = 1 + 2 * 3");
    let ExprKind::Binary { op, rhs, .. } = &result.arena.expr(expr_of(&result)).kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert!(matches!(
        result.arena.expr(*rhs).kind,
        ExprKind::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}

#[test]
fn test_power_right_associative() {
    // 2^3^2 parses as 2^(3^2)
    let result = parse_clean("local x = 2^3^2");
    let ExprKind::Binary { op, lhs, rhs, .. } = &result.arena.expr(expr_of(&result)).kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::Pow);
    assert!(matches!(result.arena.expr(*lhs).kind, ExprKind::Number));
    assert!(matches!(
        result.arena.expr(*rhs).kind,
        ExprKind::Binary {
            op: BinaryOp::Pow,
            ..
        }
    ));
}

#[test]
fn test_concat_right_associative() {
    // a..b..c parses as a..(b..c)
    let result = parse_clean("local x = a..b..c");
    let ExprKind::Binary { op, lhs, rhs, .. } = &result.arena.expr(expr_of(&result)).kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::Concat);
    assert!(matches!(result.arena.expr(*lhs).kind, ExprKind::Name(_)));
    assert!(matches!(
        result.arena.expr(*rhs).kind,
        ExprKind::Binary {
            op: BinaryOp::Concat,
            ..
        }
    ));
}

#[test]
fn test_subtraction_left_associative() {
    // 1-2-3 parses as (1-2)-3
    let result = parse_clean("local x = 1-2-3");
    let ExprKind::Binary { op, lhs, rhs, .. } = &result.arena.expr(expr_of(&result)).kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::Sub);
    assert!(matches!(
        result.arena.expr(*lhs).kind,
        ExprKind::Binary {
            op: BinaryOp::Sub,
            ..
        }
    ));
    assert!(matches!(result.arena.expr(*rhs).kind, ExprKind::Number));
}

#[test]
fn test_unary_binds_tighter_than_add_looser_than_pow() {
    // -2^2 parses as -(2^2)
    let result = parse_clean("local x = -2^2");
    let ExprKind::Unary { op, operand, .. } = &result.arena.expr(expr_of(&result)).kind else {
        panic!("expected unary");
    };
    assert_eq!(*op, UnaryOp::Neg);
    assert!(matches!(
        result.arena.expr(*operand).kind,
        ExprKind::Binary {
            op: BinaryOp::Pow,
            ..
        }
    ));

    // -a + b parses as (-a) + b
    let result = parse_clean("local x = -a + b");
    assert!(matches!(
        result.arena.expr(expr_of(&result)).kind,
        ExprKind::Binary {
            op: BinaryOp::Add,
            ..
        }
    ));
}

#[test]
fn test_unary_forms() {
    for (source, op) in [
        ("local x = not a", UnaryOp::Not),
        ("local x = #a", UnaryOp::Len),
        ("local x = -a", UnaryOp::Neg),
        ("local x = ~a", UnaryOp::BitNot),
    ] {
        let result = parse_clean(source);
        let ExprKind::Unary { op: got, .. } = &result.arena.expr(expr_of(&result)).kind else {
            panic!("expected unary in {source}");
        };
        assert_eq!(*got, op, "{source}");
    }
}

#[test]
fn test_bitwise_and_floor_div_operators() {
    let result = parse_clean("local x = a | b ~ c & d << e >> f // g");
    assert!(matches!(
        result.arena.expr(expr_of(&result)).kind,
        ExprKind::Binary {
            op: BinaryOp::BitOr,
            ..
        }
    ));
}

#[test]
fn test_prefix_chain() {
    let result = parse_clean("local x = t.a[1].b");
    let ExprKind::Field { prefix, .. } = &result.arena.expr(expr_of(&result)).kind else {
        panic!("expected field access");
    };
    assert!(matches!(
        result.arena.expr(*prefix).kind,
        ExprKind::Index { .. }
    ));
}

#[test]
fn test_call_argument_forms() {
    // Parenthesized list, bare table, bare string.
    parse_clean("f(1, 2)");
    parse_clean("f{ a = 1 }");
    parse_clean("f'text'");
    parse_clean("f[[long text]]");
}

#[test]
fn test_method_call_sugar() {
    let result = parse_clean("obj:name(1)");
    let StatementKind::Call(call) = first_statement(&result) else {
        panic!("expected call statement");
    };
    assert!(call.method.is_some());
    assert!(matches!(
        result.arena.expr(call.prefix).kind,
        ExprKind::Name(_)
    ));
}

#[test]
fn test_anonymous_function_expression() {
    let result = parse_clean("local f = function(a, b, ...) return a end");
    let ExprKind::Function { body, .. } = &result.arena.expr(expr_of(&result)).kind else {
        panic!("expected function");
    };
    assert_eq!(body.params.names.len(), 2);
    assert!(body.params.ellipsis.is_some());
    assert!(body.end_kw.is_some());
}

// ─── Tables ───────────────────────────────────────────────────────────────

#[test]
fn test_table_constructor_separators() {
    // Both separators accepted uniformly, trailing separator allowed.
    let result = parse_clean("local t = {1,2;3,}");
    let ExprKind::Table(table) = &result.arena.expr(expr_of(&result)).kind else {
        panic!("expected table");
    };
    assert_eq!(table.fields.len(), 3);
    for field in &table.fields {
        assert!(matches!(field.kind, TableFieldKind::Positional(_)));
    }
    assert!(matches!(table.fields[0].sep, Some(FieldSep::Comma(_))));
    assert!(matches!(table.fields[1].sep, Some(FieldSep::Semicolon(_))));
    assert!(matches!(table.fields[2].sep, Some(FieldSep::Comma(_))));
}

#[test]
fn test_table_field_forms() {
    let result = parse_clean("local t = { x = 1, [k] = 2, 3 }");
    let ExprKind::Table(table) = &result.arena.expr(expr_of(&result)).kind else {
        panic!("expected table");
    };
    assert!(matches!(table.fields[0].kind, TableFieldKind::Named { .. }));
    assert!(matches!(table.fields[1].kind, TableFieldKind::Keyed { .. }));
    assert!(matches!(table.fields[2].kind, TableFieldKind::Positional(_)));
}

#[test]
fn test_empty_table() {
    parse_clean("local t = {}");
}

// ─── Statements ───────────────────────────────────────────────────────────

#[test]
fn test_local_pair_extension() {
    // Targets and values keep left-to-right order independently.
    let interner = StringInterner::new();
    let result = parse("local x = 1, y = 2", &interner);
    assert!(!result.has_errors(), "{:#?}", result.errors);
    let StatementKind::LocalDeclaration(decl) = first_statement(&result) else {
        panic!("expected local");
    };
    let names: Vec<String> = decl
        .names
        .iter()
        .map(|n| interner.lookup(n.name))
        .collect();
    assert_eq!(names, vec!["x", "y"]);
    assert_eq!(decl.values.len(), 2);
}

#[test]
fn test_local_fewer_values_than_names() {
    let result = parse_clean("local x, y = 1");
    let StatementKind::LocalDeclaration(decl) = first_statement(&result) else {
        panic!("expected local");
    };
    assert_eq!(decl.names.len(), 2);
    assert_eq!(decl.values.len(), 1);
}

#[test]
fn test_multi_assignment() {
    let result = parse_clean("a, b.c = 1, 2");
    let StatementKind::Assignment(assign) = first_statement(&result) else {
        panic!("expected assignment");
    };
    assert_eq!(assign.targets.len(), 2);
    assert_eq!(assign.values.len(), 2);
}

#[test]
fn test_assignment_to_call_is_error() {
    let result = parse_source("f() = 1");
    assert!(result
        .errors
        .iter()
        .any(|e| e.code == ErrorCode::E1003));
}

#[test]
fn test_statement_neither_assignment_nor_call() {
    let result = parse_source("x.y\nlocal ok = 1");
    assert!(result
        .errors
        .iter()
        .any(|e| e.code == ErrorCode::E1001));
    // Recovery keeps the rest of the input.
    assert!(result
        .program
        .items
        .iter()
        .any(|i| matches!(i, Item::Statement(s) if matches!(s.kind, StatementKind::LocalDeclaration(_)))));
}

#[test]
fn test_control_flow_forms() {
    parse_clean("do local x = 1 end");
    parse_clean("while x do f() end");
    parse_clean("repeat f() until x");
    parse_clean("if a then f() elseif b then g() elseif c then h() else i() end");
    parse_clean("for i = 1, 10 do f(i) end");
    parse_clean("for i = 1, 10, 2 do f(i) end");
    parse_clean("for k, v in pairs(t) do f(k, v) end");
}

#[test]
fn test_function_declarations() {
    let result = parse_clean("function a.b.c:m(x) return x end");
    let StatementKind::FunctionDeclaration(decl) = first_statement(&result) else {
        panic!("expected function declaration");
    };
    assert_eq!(decl.name.segments.len(), 3);
    assert!(decl.name.method.is_some());
    assert!(decl.local_kw.is_none());

    let result = parse_clean("local function f() end");
    let StatementKind::FunctionDeclaration(decl) = first_statement(&result) else {
        panic!("expected function declaration");
    };
    assert!(decl.local_kw.is_some());
    assert_eq!(decl.name.segments.len(), 1);
}

#[test]
fn test_missing_end_reports_e1002() {
    let result = parse_source("while x do f()");
    assert!(result.errors.iter().any(|e| e.code == ErrorCode::E1002));

    let result = parse_source("repeat f()");
    assert!(result.errors.iter().any(|e| e.code == ErrorCode::E1002));

    let result = parse_source("if a then f()");
    assert!(result.errors.iter().any(|e| e.code == ErrorCode::E1002));
}

#[test]
fn test_mismatched_terminator() {
    // `until` cannot close a `while`.
    let result = parse_source("while x do f() until y");
    assert!(result.errors.iter().any(|e| e.code == ErrorCode::E1002));
}

#[test]
fn test_return_must_be_last_in_block() {
    let result = parse_source("function f() return 1 local x = 2 end");
    assert!(result.errors.iter().any(|e| e.code == ErrorCode::E1008));
}

#[test]
fn test_break_statement() {
    parse_clean("while x do break end");
}

#[test]
fn test_semicolons_are_kept() {
    let result = parse_clean("f(); g();");
    for item in &result.program.items {
        let Item::Statement(s) = item else {
            panic!("expected statement");
        };
        assert!(s.semicolon.is_some());
    }
}

// ─── Program assembly ─────────────────────────────────────────────────────

#[test]
fn test_shebang() {
    let result = parse_clean("#!/usr/bin/env lua\nlocal x = 1");
    assert!(result.program.shebang.is_some());
}

#[test]
fn test_module_return_is_trailing() {
    let result = parse_clean("local M = {}\nreturn M");
    assert!(result.program.trailing_return.is_some());
    assert_eq!(result.program.items.len(), 1);
}

#[test]
fn test_statement_after_module_return_is_error() {
    let result = parse_source("return M\nlocal x = 1");
    assert!(result.errors.iter().any(|e| e.code == ErrorCode::E1008));
    assert!(result.program.trailing_return.is_none());
}

#[test]
fn test_stray_end_is_trailing_input() {
    let result = parse_source("local x = 1\nend");
    assert!(result.errors.iter().any(|e| e.code == ErrorCode::E1007));
}

#[test]
fn test_empty_program() {
    let result = parse_clean("");
    assert!(result.program.items.is_empty());
    assert!(result.program.trailing_return.is_none());
}

#[test]
fn test_recovery_continues_after_bad_statement() {
    let result = parse_source("local = 1\nlocal ok = 2\nf(");
    assert!(result.has_errors());
    let locals = result
        .program
        .items
        .iter()
        .filter(|i| {
            matches!(i, Item::Statement(s) if matches!(s.kind, StatementKind::LocalDeclaration(_)))
        })
        .count();
    assert_eq!(locals, 1);
}

#[test]
fn test_unterminated_long_string_does_not_abort() {
    let result = parse_source("local a = 1\nlocal s = [[open\nlocal b = 2");
    assert!(result.errors.iter().any(|e| e.code == ErrorCode::E0002));
    // The first statement still parsed.
    assert!(matches!(
        first_statement(&result),
        StatementKind::LocalDeclaration(_)
    ));
}

// ─── Documentation ────────────────────────────────────────────────────────

#[test]
fn test_param_doc_attaches_to_function() {
    let interner = StringInterner::new();
    let result = parse("---@param x number\nlocal function f(x) end", &interner);
    assert!(!result.has_errors(), "{:#?}", result.errors);

    let Item::Statement(statement) = &result.program.items[0] else {
        panic!("expected statement");
    };
    assert!(matches!(
        statement.kind,
        StatementKind::FunctionDeclaration(_)
    ));
    let doc = statement
        .documentation
        .as_ref()
        .unwrap_or_else(|| panic!("documentation not attached"));
    assert_eq!(doc.lines.len(), 1);
    let DocLineKind::Param(param) = &doc.lines[0].kind else {
        panic!("expected @param line, got {:?}", doc.lines[0].kind);
    };
    let DocParamName::Name(name) = &param.name else {
        panic!("expected plain name");
    };
    assert_eq!(interner.lookup(name.name), "x");
    assert!(matches!(
        result.arena.doc_type(param.ty).kind,
        DocTypeKind::Builtin(lua_ir::ast::DocBuiltin::Number)
    ));
    assert!(param.description.is_none());
}

#[test]
fn test_doc_block_attaches_to_assignment_and_local() {
    let result = parse_clean("---@type integer\nlocal x = 1");
    let Item::Statement(s) = &result.program.items[0] else {
        panic!("expected statement");
    };
    assert!(s.documentation.is_some());

    let result = parse_clean("--- doc\nM.x = 1");
    let Item::Statement(s) = &result.program.items[0] else {
        panic!("expected statement");
    };
    assert!(s.documentation.is_some());
}

#[test]
fn test_standalone_class_block() {
    let interner = StringInterner::new();
    let result = parse(
        "---@class Config: Base\n---@field name string: display name\n---@field count? integer\n",
        &interner,
    );
    assert!(!result.has_errors(), "{:#?}", result.errors);
    let Item::DocBlock(block) = &result.program.items[0] else {
        panic!("expected doc block, got {:?}", result.program.items[0]);
    };
    assert_eq!(block.lines.len(), 1);
    let DocLineKind::Class(class) = &block.lines[0].kind else {
        panic!("expected class line");
    };
    assert_eq!(interner.lookup(class.name.segments[0].name), "Config");
    assert!(class.parent.is_some());
    assert_eq!(class.fields.len(), 2);
    assert!(class.fields[0].description.is_some());
    assert!(class.fields[1].optional.is_some());
}

#[test]
fn test_class_exact_modifier() {
    let result = parse_clean("---@class (exact) Point\n---@field x number\n---@field y number\n");
    let Item::DocBlock(block) = &result.program.items[0] else {
        panic!("expected doc block");
    };
    let DocLineKind::Class(class) = &block.lines[0].kind else {
        panic!("expected class line");
    };
    assert!(class.exact.is_some());
    assert_eq!(class.fields.len(), 2);
}

#[test]
fn test_field_visibility() {
    let result = parse_clean("---@field private cache table\nlocal M = {}");
    let Item::Statement(s) = &result.program.items[0] else {
        panic!("expected statement");
    };
    let doc = s
        .documentation
        .as_ref()
        .unwrap_or_else(|| panic!("expected doc"));
    let DocLineKind::Field(field) = &doc.lines[0].kind else {
        panic!("expected field line");
    };
    assert!(matches!(
        field.visibility,
        Some((lua_ir::ast::DocVisibility::Private, _))
    ));
}

#[test]
fn test_generic_and_return_tags() {
    let interner = StringInterner::new();
    let result = parse(
        "---@generic T: table, U\n---@param list T[]\n---@return U converted values\nlocal function map(list) end",
        &interner,
    );
    assert!(!result.has_errors(), "{:#?}", result.errors);
    let Item::Statement(s) = &result.program.items[0] else {
        panic!("expected statement");
    };
    let doc = s
        .documentation
        .as_ref()
        .unwrap_or_else(|| panic!("expected doc"));
    let DocLineKind::Generic(generic) = &doc.lines[0].kind else {
        panic!("expected generic");
    };
    assert_eq!(generic.params.len(), 2);
    assert!(generic.params[0].parent.is_some());
    assert!(generic.params[1].parent.is_none());

    let DocLineKind::Return(ret) = &doc.lines[2].kind else {
        panic!("expected return");
    };
    assert!(ret.name.is_some());
    assert!(ret.description.is_some());
}

#[test]
fn test_param_enum_alternatives() {
    let result = parse_clean(
        "---@param mode string picker mode\n--- | 'insert' # insert things\n--- | 'select'\nlocal function pick(mode) end",
    );
    let Item::Statement(s) = &result.program.items[0] else {
        panic!("expected statement");
    };
    let doc = s
        .documentation
        .as_ref()
        .unwrap_or_else(|| panic!("expected doc"));
    let DocLineKind::Param(param) = &doc.lines[0].kind else {
        panic!("expected param");
    };
    assert_eq!(param.alternatives.len(), 2);
    assert!(param.alternatives[0].description.is_some());
    assert!(param.alternatives[1].description.is_none());
}

#[test]
fn test_doc_blank_line_is_ignorable() {
    // Conflict (ii): blank classifies as ignorable, not comment text.
    let result = parse_clean("--- heading\n---\n--- body\nlocal x = 1");
    let Item::Statement(s) = &result.program.items[0] else {
        panic!("expected statement");
    };
    let doc = s
        .documentation
        .as_ref()
        .unwrap_or_else(|| panic!("expected doc"));
    assert!(matches!(doc.lines[0].kind, DocLineKind::Comment(_)));
    assert!(matches!(doc.lines[1].kind, DocLineKind::Blank));
    assert!(matches!(doc.lines[2].kind, DocLineKind::Comment(_)));
}

#[test]
fn test_doc_freeform_tags() {
    let result = parse_clean(
        "---@note this is a note\n---@see other.module\n---@todo fix later\n---@usage call it\n---@varargs any\nlocal x = 1",
    );
    let Item::Statement(s) = &result.program.items[0] else {
        panic!("expected statement");
    };
    let doc = s
        .documentation
        .as_ref()
        .unwrap_or_else(|| panic!("expected doc"));
    assert!(matches!(doc.lines[0].kind, DocLineKind::Note(_)));
    assert!(matches!(doc.lines[1].kind, DocLineKind::See(_)));
    assert!(matches!(doc.lines[2].kind, DocLineKind::Todo(_)));
    assert!(matches!(doc.lines[3].kind, DocLineKind::Usage(_)));
    assert!(matches!(doc.lines[4].kind, DocLineKind::Varargs(_)));
}

#[test]
fn test_doc_eval_embeds_expression() {
    let result = parse_clean("---@eval { description = require('mod').desc }\nlocal x = 1");
    let Item::Statement(s) = &result.program.items[0] else {
        panic!("expected statement");
    };
    let doc = s
        .documentation
        .as_ref()
        .unwrap_or_else(|| panic!("expected doc"));
    let DocLineKind::Eval(expr) = &doc.lines[0].kind else {
        panic!("expected eval");
    };
    assert!(matches!(
        result.arena.expr(*expr).kind,
        ExprKind::Table(_)
    ));
}

#[test]
fn test_description_noise_is_not_a_lex_error() {
    // An apostrophe in free-form description text must not surface as an
    // unterminated-string error.
    let result = parse_source("---@param x number don't worry about it\nlocal function f(x) end");
    assert!(!result.has_errors(), "{:#?}", result.errors);
}

#[test]
fn test_field_description_continuation_lines() {
    let result = parse_clean(
        "---@field handler fun(): nil: called on each event\n--- across multiple lines\nlocal M = {}",
    );
    let Item::Statement(s) = &result.program.items[0] else {
        panic!("expected statement");
    };
    let doc = s
        .documentation
        .as_ref()
        .unwrap_or_else(|| panic!("expected doc"));
    let DocLineKind::Field(field) = &doc.lines[0].kind else {
        panic!("expected field line");
    };
    let description = field
        .description
        .as_ref()
        .unwrap_or_else(|| panic!("expected description"));
    assert_eq!(description.extra.len(), 1);
    // The continuation line is folded, not kept as a comment line.
    assert_eq!(doc.lines.len(), 1);
}

#[test]
fn test_unknown_doc_tag_is_error() {
    let result = parse_source("---@bogus stuff\nlocal x = 1");
    assert!(result.errors.iter().any(|e| e.code == ErrorCode::E1005));
}

// ─── Top-level documentation constructs ───────────────────────────────────

#[test]
fn test_brief_container() {
    let result = parse_clean(
        "---@brief [[\n--- This module does things.\n--- Across lines.\n---@brief ]]\nlocal x = 1",
    );
    let Item::Brief(brief) = &result.program.items[0] else {
        panic!("expected brief, got {:?}", result.program.items[0]);
    };
    assert_eq!(brief.lines.len(), 2);
    assert!(brief.close.is_some());
}

#[test]
fn test_brief_unterminated() {
    let result = parse_source("---@brief [[\n--- text\nlocal x = 1");
    assert!(result.errors.iter().any(|e| e.code == ErrorCode::E1006));
}

#[test]
fn test_tag_and_config() {
    let result = parse_clean("---@tag my-plugin.setup\n---@config { name = 'x' }\nlocal x = 1");
    assert!(matches!(result.program.items[0], Item::Tag(_)));
    let Item::Config(config) = &result.program.items[1] else {
        panic!("expected config");
    };
    assert!(matches!(
        result.arena.expr(config.expr).kind,
        ExprKind::Table(_)
    ));
}

#[test]
fn test_command_container() {
    let interner = StringInterner::new();
    let source = "---@command MyCmd [[\n--- Run the thing.\n---@command ]]\n";
    let result = parse(source, &interner);
    assert!(!result.has_errors(), "{:#?}", result.errors);
    let Item::Command(command) = &result.program.items[0] else {
        panic!("expected command");
    };
    assert_eq!(command.usage.slice(source), "MyCmd");
    assert_eq!(command.lines.len(), 1);
    assert!(command.close.is_some());
}

// ─── Documentation types ──────────────────────────────────────────────────

fn parse_type_of(source: &str) -> (ParseResult, lua_ir::DocTypeId) {
    let result = parse_source(source);
    assert!(!result.has_errors(), "{source:?}: {:#?}", result.errors);
    let Item::Statement(s) = &result.program.items[0] else {
        panic!("expected statement");
    };
    let doc = s
        .documentation
        .as_ref()
        .unwrap_or_else(|| panic!("expected doc"));
    let DocLineKind::TypeDecl(decl) = &doc.lines[0].kind else {
        panic!("expected @type line");
    };
    let ty = decl.types[0];
    (result, ty)
}

#[test]
fn test_doc_type_union_right_assoc() {
    let (result, ty) = parse_type_of("---@type string|number|nil\nlocal x");
    let DocTypeKind::Union { rhs, .. } = &result.arena.doc_type(ty).kind else {
        panic!("expected union");
    };
    assert!(matches!(
        result.arena.doc_type(*rhs).kind,
        DocTypeKind::Union { .. }
    ));
}

#[test]
fn test_doc_type_optional_and_array() {
    // `?` binds looser than `[]`: string[]? is optional(array(string)).
    let (result, ty) = parse_type_of("---@type string[]?\nlocal x");
    let DocTypeKind::Optional { inner, .. } = &result.arena.doc_type(ty).kind else {
        panic!("expected optional");
    };
    assert!(matches!(
        result.arena.doc_type(*inner).kind,
        DocTypeKind::Array { .. }
    ));
}

#[test]
fn test_doc_type_union_binds_loosest() {
    // A|B[] is A | (B[])
    let (result, ty) = parse_type_of("---@type A|B[]\nlocal x");
    let DocTypeKind::Union { lhs, rhs, .. } = &result.arena.doc_type(ty).kind else {
        panic!("expected union");
    };
    assert!(matches!(
        result.arena.doc_type(*lhs).kind,
        DocTypeKind::Named(_)
    ));
    assert!(matches!(
        result.arena.doc_type(*rhs).kind,
        DocTypeKind::Array { .. }
    ));
}

#[test]
fn test_doc_type_paren_overrides() {
    // (A|B)[] is array of the union.
    let (result, ty) = parse_type_of("---@type (A|B)[]\nlocal x");
    let DocTypeKind::Array { element, .. } = &result.arena.doc_type(ty).kind else {
        panic!("expected array");
    };
    assert!(matches!(
        result.arena.doc_type(*element).kind,
        DocTypeKind::Paren { .. }
    ));
}

#[test]
fn test_doc_type_key_value_nested() {
    // The closing `>>` of nested tables splits into two `>`.
    let (result, ty) = parse_type_of("---@type table<string, table<string, integer>>\nlocal x");
    let DocTypeKind::KeyValue { value, .. } = &result.arena.doc_type(ty).kind else {
        panic!("expected table<K,V>");
    };
    assert!(matches!(
        result.arena.doc_type(*value).kind,
        DocTypeKind::KeyValue { .. }
    ));
}

#[test]
fn test_doc_type_table_literal() {
    let (result, ty) = parse_type_of("---@type { name: string, age?: integer, [1]: boolean }\nlocal x");
    let DocTypeKind::TableLiteral { pairs, .. } = &result.arena.doc_type(ty).kind else {
        panic!("expected table literal");
    };
    assert_eq!(pairs.len(), 3);
    assert!(pairs[1].optional.is_some());
    assert!(pairs[2].bracketed);
}

#[test]
fn test_doc_type_function() {
    let (result, ty) = parse_type_of("---@type fun(a: string, b?: integer, ...): table, nil\nlocal x");
    let DocTypeKind::Function {
        params, returns, ..
    } = &result.arena.doc_type(ty).kind
    else {
        panic!("expected function type");
    };
    assert_eq!(params.len(), 3);
    assert!(matches!(params[1].name, DocParamName::Optional(..)));
    assert!(matches!(params[2].name, DocParamName::Ellipsis(_)));
    assert_eq!(returns.len(), 2);
}

#[test]
fn test_doc_type_named_return() {
    let (result, ty) = parse_type_of("---@type fun(): ok: boolean\nlocal x");
    let DocTypeKind::Function { returns, .. } = &result.arena.doc_type(ty).kind else {
        panic!("expected function type");
    };
    assert_eq!(returns.len(), 1);
    assert!(returns[0].name.is_some());
}

#[test]
fn test_doc_type_literal_and_backtick() {
    let (result, ty) = parse_type_of("---@type 'exact'\nlocal x");
    assert!(matches!(
        result.arena.doc_type(ty).kind,
        DocTypeKind::Literal(_)
    ));

    let (result, ty) = parse_type_of("---@type `vim.api`\nlocal x");
    let DocTypeKind::Named(name) = &result.arena.doc_type(ty).kind else {
        panic!("expected named");
    };
    assert!(name.backticked);
    assert_eq!(name.segments.len(), 2);
}

#[test]
fn test_doc_type_dotted_builtin_prefix_is_a_path() {
    // `string.buffer` is a named path, not the builtin `string`.
    let (result, ty) = parse_type_of("---@type string.buffer\nlocal x");
    let DocTypeKind::Named(name) = &result.arena.doc_type(ty).kind else {
        panic!("expected named path");
    };
    assert_eq!(name.segments.len(), 2);
}

// ─── Generic for & misc ───────────────────────────────────────────────────

#[test]
fn test_numeric_for_fields() {
    let result = parse_clean("for i = 1, 10, 2 do end");
    let StatementKind::For(stmt) = first_statement(&result) else {
        panic!("expected for");
    };
    let ForHeader::Numeric { step, .. } = &stmt.header else {
        panic!("expected numeric header");
    };
    assert!(step.is_some());
}

#[test]
fn test_parallel_parses_share_table_and_interner() {
    use std::sync::Arc;
    let table = Arc::new(crate::PrecedenceTable::lua());
    let interner = Arc::new(StringInterner::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let table = Arc::clone(&table);
            let interner = Arc::clone(&interner);
            std::thread::spawn(move || {
                let source = format!("local x{i} = shared + {i}");
                let result = crate::parse_with(&source, &interner, &table);
                assert!(!result.has_errors());
            })
        })
        .collect();
    for handle in handles {
        handle.join().ok();
    }
}

#[test]
fn test_deeply_nested_expression_does_not_overflow() {
    let mut source = String::from("local x = ");
    for _ in 0..2000 {
        source.push('(');
    }
    source.push('1');
    for _ in 0..2000 {
        source.push(')');
    }
    let result = parse_source(&source);
    assert!(!result.has_errors());
}
