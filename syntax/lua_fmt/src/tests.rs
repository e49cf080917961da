use lua_ir::StringInterner;
use pretty_assertions::assert_eq;

use crate::print;

/// Non-trivia token texts of a source buffer.
fn token_texts(source: &str) -> Vec<String> {
    let interner = StringInterner::new();
    let (tokens, errors) = lua_lexer::lex(source, &interner);
    assert!(errors.is_empty(), "lex errors in {source:?}: {errors:?}");
    tokens
        .iter()
        .filter(|t| !t.kind.is_trivia() && t.kind != lua_ir::TokenKind::Eof)
        .map(|t| t.span.slice(source).to_string())
        .collect()
}

fn print_source(source: &str) -> String {
    let interner = StringInterner::new();
    let result = lua_parse::parse(source, &interner);
    assert!(
        !result.has_errors(),
        "parse errors in {source:?}: {:#?}",
        result.errors
    );
    print(&result.program, &result.arena, source)
}

/// Round-trip: printing reproduces the non-trivia token text stream.
fn assert_round_trip(source: &str) {
    let printed = print_source(source);
    assert_eq!(
        token_texts(&printed),
        token_texts(source),
        "token stream mismatch for {source:?}\nprinted:\n{printed}"
    );
}

/// Idempotence: the printed form is a fixpoint of `print ∘ parse`.
fn assert_idempotent(source: &str) {
    let printed = print_source(source);
    let reprinted = print_source(&printed);
    assert_eq!(printed, reprinted, "print not idempotent for {source:?}");
}

const SAMPLES: &[&str] = &[
    "local x = 1",
    "local x, y = 1, 2",
    "x = 1",
    "a, b.c[1] = f(), 2",
    "f(1, 2)",
    "obj:method(a)",
    "f{ a = 1 }",
    "f'text'",
    "f[[long text]]",
    "local s = [==[ ]=] still inside ]==]",
    "local s = 'quoted \\' escape'",
    "local t = {1,2;3,}",
    "local t = { x = 1, [k] = 2, 3 }",
    "local t = {}",
    "local n = 0xA.8p2 + 1e-5 + .5",
    "local f = function(a, ...) return a end",
    "function a.b.c:m(x) return x end",
    "local function f() end",
    "do local x = 1 end",
    "while x do f() end",
    "repeat f() until done",
    "if a then f() elseif b then g() else h() end",
    "for i = 1, 10, 2 do f(i) end",
    "for k, v in pairs(t) do f(k, v) end",
    "while x do break end",
    "f(); g();",
    "local x = 2^3^2",
    "local x = a..b..c",
    "local x = 1-2-3",
    "local x = -2^2",
    "local x = not a and #b or -c",
    "local x = a | b ~ c & d << e >> f // g",
    "return setmetatable({}, mt)",
    "#!/usr/bin/env lua\nlocal M = {}\nreturn M",
    "---@param x number\nlocal function f(x) end",
    "---@param mode string picker mode\n--- | 'insert' # insert\n--- | 'select'\nlocal function pick(mode) end",
    "---@class Config: Base\n---@field name string: display\n---@field count? integer\n",
    "---@class (exact) Point\n---@field x number\n---@field y number\n",
    "---@generic T: table, U\n---@param list T[]\n---@return U converted\nlocal function map(list) end",
    "---@type table<string, table<string, integer>>\nlocal x",
    "---@type fun(a: string, b?: integer, ...): table, nil\nlocal x",
    "---@type { name: string, age?: integer }\nlocal x",
    "--- heading\n---\n--- body\nlocal x = 1",
    "---@note remember this\n---@see other.mod\nlocal x = 1",
    "---@eval { d = require('m').d }\nlocal x = 1",
    "---@brief [[\n--- Module summary.\n--- More text.\n---@brief ]]\nlocal x = 1",
    "---@tag plugin.setup\n---@config { defaults = true }\nlocal x = 1",
    "---@command MyCmd [[\n--- Runs the thing.\n---@command ]]\n",
    "---@field handler fun(): nil: called on each event\n--- across multiple lines\nlocal M = {}",
    "---@return table state: resulting state\n--- with more detail\nlocal function get() end",
];

#[test]
fn test_round_trip_samples() {
    for source in SAMPLES {
        assert_round_trip(source);
    }
}

#[test]
fn test_idempotence_samples() {
    for source in SAMPLES {
        assert_idempotent(source);
    }
}

#[test]
fn test_comments_are_trivia_and_dropped() {
    let source = "local a = 1 -- trailing\n--[[ block ]] local b = 2";
    let printed = print_source(source);
    assert!(!printed.contains("trailing"));
    assert!(!printed.contains("block"));
    // But the statements survive with their tokens intact.
    let interner = StringInterner::new();
    let (tokens, _) = lua_lexer::lex(&printed, &interner);
    let texts: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind != lua_ir::TokenKind::Eof)
        .map(|t| t.span.slice(&printed).to_string())
        .collect();
    assert_eq!(texts, vec!["local", "a", "=", "1", "local", "b", "=", "2"]);
}

#[test]
fn test_string_content_reproduced_verbatim() {
    // Escape sequences are never decoded or re-encoded.
    let source = r#"local s = "a\nb\t\"c\" d""#;
    let printed = print_source(source);
    assert!(printed.contains(r#""a\nb\t\"c\" d""#));
}

#[test]
fn test_negation_of_negation_does_not_form_a_comment() {
    let source = "local x = - -y";
    assert_round_trip(source);
    let printed = print_source(source);
    assert!(!printed.contains("--"), "{printed}");
}

#[test]
fn test_pair_extension_prints_canonically() {
    // `local x = 1, y = 2` normalizes to the canonical multi-target form;
    // the canonical form is then a fixpoint.
    let interner = StringInterner::new();
    let result = lua_parse::parse("local x = 1, y = 2", &interner);
    assert!(!result.has_errors());
    let printed = print(&result.program, &result.arena, "local x = 1, y = 2");
    assert_eq!(printed.trim_end(), "local x, y = 1, 2");
    assert_idempotent("local x = 1, y = 2");
}
