//! Documentation-annotation nodes.
//!
//! A [`DocBlock`] is a maximal run of consecutive `---` lines; each line is
//! classified by [`DocLineKind`]. The recursive type sub-language lives in
//! [`DocTypeKind`], arena-allocated like expressions.

use crate::{DocTypeId, ExprId, Span};

use super::expr::{LuaString, NameRef};

/// A run of one-or-more `---` documentation lines.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocBlock {
    pub lines: Vec<DocLine>,
    pub span: Span,
}

/// One `---` line.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocLine {
    /// Span of the `---` marker.
    pub marker: Span,
    pub kind: DocLineKind,
    /// Full line span including the marker.
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DocLineKind {
    /// Plain comment text after the marker.
    Comment(Span),
    /// Blank line; classified as ignorable, never as comment text
    /// (first-match order, blank pattern first).
    Blank,
    Class(DocClass),
    /// A `@field` line with no preceding `@class` in the block.
    Field(DocField),
    Generic(DocGeneric),
    Param(DocParam),
    Return(DocReturn),
    TypeDecl(DocTypeDecl),
    Note(Span),
    See(Span),
    Todo(Span),
    Usage(Span),
    Varargs(Span),
    /// `@eval <expr>` — the expression is parsed here, evaluated downstream.
    Eval(ExprId),
    /// Malformed tag line; the parse error is recorded separately.
    Error(Span),
}

/// Dotted documentation identifier, optionally backtick-quoted: `` `a.b` ``.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocName {
    pub segments: Vec<NameRef>,
    pub backticked: bool,
    pub span: Span,
}

/// Description text; continuation `---` lines (no `@`) fold into `extra`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocText {
    pub head: Span,
    pub extra: Vec<Span>,
}

/// `@class [(exact)] name [: parent]` plus its following `@field` lines.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocClass {
    pub exact: Option<Span>,
    pub name: DocName,
    pub parent: Option<DocName>,
    pub fields: Vec<DocField>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DocVisibility {
    Public,
    Protected,
    Private,
}

impl DocVisibility {
    pub const fn text(self) -> &'static str {
        match self {
            DocVisibility::Public => "public",
            DocVisibility::Protected => "protected",
            DocVisibility::Private => "private",
        }
    }
}

/// `@field [visibility] name[?] type [: description]`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocField {
    /// Full line span including the `---` marker (fields absorbed by a
    /// `@class` keep their own lines).
    pub line: Span,
    pub visibility: Option<(DocVisibility, Span)>,
    pub name: NameRef,
    /// `?` optional marker.
    pub optional: Option<Span>,
    pub ty: DocTypeId,
    pub description: Option<DocText>,
}

/// `@generic name [: parent] {, name [: parent]}`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocGeneric {
    pub params: Vec<DocGenericParam>,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocGenericParam {
    pub name: NameRef,
    pub parent: Option<DocTypeId>,
}

/// Parameter name: `x`, `x?`, or `...`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DocParamName {
    Name(NameRef),
    Optional(NameRef, Span),
    Ellipsis(Span),
}

/// `@param name type [description]` plus `--- | alt` enum lines.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocParam {
    pub name: DocParamName,
    pub ty: DocTypeId,
    pub description: Option<Span>,
    pub alternatives: Vec<DocEnumAlt>,
}

/// One `--- | <type> [# description]` alternative line.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocEnumAlt {
    /// Span of the whole alternative line including its `---` marker.
    pub line: Span,
    pub pipe: Span,
    pub ty: DocTypeId,
    pub description: Option<Span>,
}

/// `@return type [name [description] | (:|#) description]`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocReturn {
    pub ty: DocTypeId,
    pub name: Option<NameRef>,
    pub description: Option<DocText>,
}

/// `@type type {, type}`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocTypeDecl {
    pub types: Vec<DocTypeId>,
}

/// Built-in type names of the documentation language.
///
/// `boolean`/`bool` and `function`/`fun` are surface aliases; the node span
/// preserves which spelling appeared.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DocBuiltin {
    Nil,
    Any,
    Boolean,
    String,
    Number,
    Integer,
    Function,
    Table,
    Thread,
    Userdata,
    Lightuserdata,
}

/// A documentation type expression node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocType {
    pub kind: DocTypeKind,
    pub span: Span,
}

/// Recursive type sub-language.
///
/// Union and optional associate right and bind looser than the array, table
/// and function forms; parenthesization overrides.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DocTypeKind {
    Builtin(DocBuiltin),
    Named(DocName),
    /// String literal type.
    Literal(LuaString),
    /// `A|B`
    Union {
        lhs: DocTypeId,
        pipe: Span,
        rhs: DocTypeId,
    },
    /// `A?`
    Optional {
        inner: DocTypeId,
        question: Span,
    },
    /// `(A)`
    Paren {
        lparen: Span,
        inner: DocTypeId,
        rparen: Span,
    },
    /// `A[]`
    Array {
        element: DocTypeId,
        brackets: Span,
    },
    /// `table<K, V>`
    KeyValue {
        table_kw: Span,
        key: DocTypeId,
        value: DocTypeId,
        gt: Span,
    },
    /// `{ k: v, ... }`
    TableLiteral {
        lbrace: Span,
        pairs: Vec<DocTablePair>,
        rbrace: Span,
    },
    /// `fun(params) [: returns]`
    Function {
        fun_kw: Span,
        params: Vec<DocFunctionParam>,
        rparen: Span,
        returns: Vec<DocFunctionReturn>,
        /// Whether the return list was parenthesized.
        returns_parens: bool,
    },
    /// Placeholder produced by error recovery.
    Error,
}

/// Key of a table-literal pair: `name` or `[string|number|type]`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DocTableKey {
    Name(NameRef),
    Str(LuaString),
    Number(Span),
    Type(DocTypeId),
}

/// `key[?]: value` inside a table-literal type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocTablePair {
    pub key: DocTableKey,
    /// Whether the key was written in brackets.
    pub bracketed: bool,
    pub optional: Option<Span>,
    pub value: DocTypeId,
}

/// `fun(...)` parameter: `name[?] [: type]` or `...[?] [: type]`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocFunctionParam {
    pub name: DocParamName,
    pub ty: Option<DocTypeId>,
}

/// `fun(...): ...` return entry: a bare type, or `name[?] [: type]`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocFunctionReturn {
    pub name: Option<(NameRef, Option<Span>)>,
    pub ty: Option<DocTypeId>,
}

/// `---@brief [[ ... ---@brief ]]` top-level block.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocBrief {
    /// Span of the opening `---@brief [[` line.
    pub open: Span,
    /// Content spans, one per `---` line (text after the marker).
    pub lines: Vec<Span>,
    /// Span of the closing `---@brief ]]` line; `None` when unterminated.
    pub close: Option<Span>,
    pub span: Span,
}

/// `---@tag <text>` top-level line.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocTag {
    pub text: Span,
    pub span: Span,
}

/// `---@config <expression>` top-level line.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocConfig {
    pub expr: ExprId,
    pub span: Span,
}

/// `---@command <usage> [[ ... ---@command ]]` top-level block.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocCommand {
    pub open: Span,
    pub usage: Span,
    pub lines: Vec<Span>,
    pub close: Option<Span>,
    pub span: Span,
}
