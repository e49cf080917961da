//! Error codes.
//!
//! Stable, searchable codes: `E0xxx` lexical, `E1xxx` structural and
//! documentation-grammar errors. Changing a code is a breaking change for
//! anything that filters diagnostics by it.

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Unterminated quoted string.
    E0001,
    /// Unterminated long-bracket string.
    E0002,
    /// Unterminated block comment.
    E0003,
    /// Malformed number literal.
    E0004,
    /// Unexpected character.
    E0005,

    /// Unexpected token (expected a specific construct).
    E1001,
    /// Control-flow construct missing its required terminator.
    E1002,
    /// Invalid assignment target.
    E1003,
    /// Expected an expression.
    E1004,
    /// Malformed documentation tag.
    E1005,
    /// Unterminated documentation container (`@brief`/`@command`).
    E1006,
    /// Trailing input after the program end.
    E1007,
    /// Statement after a block-final `return`/`break`.
    E1008,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
        }
    }

    /// Short description for `--explain`-style output.
    pub const fn description(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "a quoted string was not closed before the end of the line",
            ErrorCode::E0002 => {
                "a long-bracket string was not closed; the closer must repeat the opener's `=` count"
            }
            ErrorCode::E0003 => {
                "a block comment was not closed; the closer must repeat the opener's `=` count"
            }
            ErrorCode::E0004 => "a number literal is missing required digits",
            ErrorCode::E0005 => "a character that cannot start any token",
            ErrorCode::E1001 => "the parser expected a different token here",
            ErrorCode::E1002 => "a block construct is missing its terminator keyword",
            ErrorCode::E1003 => "only names, `t[k]`, and `t.k` can be assigned to",
            ErrorCode::E1004 => "an expression was expected here",
            ErrorCode::E1005 => "a documentation tag does not match its field grammar",
            ErrorCode::E1006 => "a `@brief`/`@command` block is missing its `]]` closer line",
            ErrorCode::E1007 => "input remains after the end of the program",
            ErrorCode::E1008 => "`return`/`break` must be the last statement of a block",
        }
    }

    /// Lexical errors come from the scanner, the rest from the parser.
    pub const fn is_lexical(self) -> bool {
        matches!(
            self,
            ErrorCode::E0001
                | ErrorCode::E0002
                | ErrorCode::E0003
                | ErrorCode::E0004
                | ErrorCode::E0005
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_strings() {
        assert_eq!(ErrorCode::E0002.as_str(), "E0002");
        assert_eq!(ErrorCode::E1002.to_string(), "E1002");
    }

    #[test]
    fn test_lexical_classification() {
        assert!(ErrorCode::E0001.is_lexical());
        assert!(!ErrorCode::E1001.is_lexical());
    }
}
