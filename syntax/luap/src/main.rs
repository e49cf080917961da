//! Lua syntax recognizer CLI.
//!
//! Subcommands: `tokens`, `parse`, `check`, `fmt`. Each reads one `.lua`
//! file, runs the pipeline, and reports on stdout/stderr. `check` exits
//! nonzero when the input has syntax errors.

use std::process::ExitCode;

use lua_diagnostic::emitter;
use lua_ir::StringInterner;
use lua_parse::PrecedenceTable;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::FAILURE;
    }

    let command = args[1].as_str();
    match command {
        "tokens" | "parse" | "check" | "fmt" => {}
        "help" | "--help" | "-h" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        other => {
            eprintln!("error: unknown command `{other}`");
            print_usage();
            return ExitCode::FAILURE;
        }
    }

    let Some(path) = args.get(2) else {
        eprintln!("Usage: luap {command} <file.lua>");
        return ExitCode::FAILURE;
    };

    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("error: cannot read `{path}`: {error}");
            return ExitCode::FAILURE;
        }
    };

    match command {
        "tokens" => run_tokens(path, &source),
        "parse" => run_parse(path, &source),
        "check" => run_check(path, &source),
        "fmt" => run_fmt(path, &source),
        _ => ExitCode::FAILURE,
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_tree::HierarchicalLayer::new(2))
        .init();
}

fn print_usage() {
    eprintln!("Usage: luap <command> <file.lua>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  tokens   Dump the token stream");
    eprintln!("  parse    Dump the syntax tree");
    eprintln!("  check    Report syntax errors (exit 1 if any)");
    eprintln!("  fmt      Print the canonical form");
}

fn run_tokens(path: &str, source: &str) -> ExitCode {
    let interner = StringInterner::new();
    let (tokens, errors) = lua_lexer::lex(source, &interner);
    for token in &tokens {
        let lc = lua_diagnostic::span_utils::line_col(source, token.span.start);
        println!(
            "{:>4}:{:<3} {:?} {:?}",
            lc.line,
            lc.col,
            token.kind,
            token.span.slice(source)
        );
    }
    for error in &errors {
        eprintln!("{path}: {error}");
    }
    if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_parse(path: &str, source: &str) -> ExitCode {
    let interner = StringInterner::new();
    let table = PrecedenceTable::lua();
    let result = lua_parse::parse_with(source, &interner, &table);
    println!("{:#?}", result.program);
    report(&result, path, source);
    ExitCode::SUCCESS
}

fn run_check(path: &str, source: &str) -> ExitCode {
    let interner = StringInterner::new();
    let table = PrecedenceTable::lua();
    let result = lua_parse::parse_with(source, &interner, &table);
    report(&result, path, source);
    if result.has_errors() {
        let n = result.errors.len();
        eprintln!("{path}: {n} error{}", if n == 1 { "" } else { "s" });
        ExitCode::FAILURE
    } else {
        println!("{path}: ok");
        ExitCode::SUCCESS
    }
}

fn run_fmt(path: &str, source: &str) -> ExitCode {
    let interner = StringInterner::new();
    let table = PrecedenceTable::lua();
    let result = lua_parse::parse_with(source, &interner, &table);
    if result.has_errors() {
        report(&result, path, source);
        eprintln!("{path}: refusing to format input with syntax errors");
        return ExitCode::FAILURE;
    }
    print!("{}", lua_fmt::print(&result.program, &result.arena, source));
    ExitCode::SUCCESS
}

fn report(result: &lua_parse::ParseResult, path: &str, source: &str) {
    let diagnostics = result.diagnostics();
    if !diagnostics.is_empty() {
        eprint!("{}", emitter::render_all(&diagnostics, path, source));
    }
}
