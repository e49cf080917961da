//! Core types for the Lua + documentation-annotation recognizer.
//!
//! Owns everything the lexer and parser share: spans, interned names, the
//! token model, the syntax tree with its arena, and the edit description
//! used for incremental reparsing. This crate has no parsing logic.

pub mod ast;

mod arena;
mod incremental;
mod name;
mod span;
mod token;

pub use arena::{DocTypeId, ExprId, SyntaxArena};
pub use incremental::Edit;
pub use name::{Name, StringInterner};
pub use span::Span;
pub use token::{StrForm, Token, TokenKind, TokenList, TokenTag};
