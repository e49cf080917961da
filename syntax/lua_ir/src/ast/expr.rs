//! Expression nodes.
//!
//! Expressions are arena-allocated ([`crate::SyntaxArena`]) and referenced by
//! [`ExprId`]. Every node carries the spans of its variable-text leaves and
//! enough delimiter/separator structure for a printer to reproduce the
//! original non-trivia token stream.

use crate::{ExprId, Name, Span};

/// An identifier occurrence: interned name plus its source span.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NameRef {
    pub name: Name,
    pub span: Span,
}

/// String literal as a delimiter triple.
///
/// `content` is the raw slice between the delimiters, never re-escaped.
/// `end` is `None` only when the closer was missing at end of input (the
/// lexer reports the error; the node still records what was consumed).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LuaString {
    pub start: Span,
    pub content: Option<Span>,
    pub end: Option<Span>,
}

impl LuaString {
    /// Full source span of the literal.
    pub fn span(&self) -> Span {
        let end = self
            .end
            .or(self.content)
            .map_or(self.start.end, |s| s.end);
        Span::new(self.start.start, end)
    }
}

/// Binary operators, in source-surface form.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    Or,
    And,
    Lt,
    LtEq,
    Eq,
    NotEq,
    GtEq,
    Gt,
    BitOr,
    BitXor,
    BitAnd,
    Shl,
    Shr,
    Concat,
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl BinaryOp {
    /// Source text of the operator.
    pub const fn text(self) -> &'static str {
        match self {
            BinaryOp::Or => "or",
            BinaryOp::And => "and",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "~=",
            BinaryOp::GtEq => ">=",
            BinaryOp::Gt => ">",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "~",
            BinaryOp::BitAnd => "&",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Concat => "..",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
        }
    }
}

/// Unary operators: `not`, `#`, `-`, `~`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    Not,
    Len,
    Neg,
    BitNot,
}

impl UnaryOp {
    pub const fn text(self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
            UnaryOp::Len => "#",
            UnaryOp::Neg => "-",
            UnaryOp::BitNot => "~",
        }
    }
}

/// Call argument forms: `f(a, b)`, `f{ ... }`, `f"..."`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallArgs {
    Parens {
        lparen: Span,
        args: Vec<ExprId>,
        rparen: Span,
    },
    /// Bare table constructor argument.
    Table(ExprId),
    /// Bare string literal argument.
    Str(ExprId),
}

/// A function call, including method-call sugar.
///
/// `obj:name(args)` keeps its surface structure here; it desugars to a call
/// of `obj.name` with `obj` as an implicit first argument, which is the
/// consumer's job, not the recognizer's.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionCall {
    pub prefix: ExprId,
    /// `:name` for method calls.
    pub method: Option<(Span, NameRef)>,
    pub args: CallArgs,
}

/// Table field separator: `,` or `;` (accepted uniformly).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldSep {
    Comma(Span),
    Semicolon(Span),
}

impl FieldSep {
    pub const fn text(self) -> &'static str {
        match self {
            FieldSep::Comma(_) => ",",
            FieldSep::Semicolon(_) => ";",
        }
    }
}

/// One table-constructor field.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableField {
    pub kind: TableFieldKind,
    /// Separator following this field; the last field's is optional.
    pub sep: Option<FieldSep>,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableFieldKind {
    /// `value`
    Positional(ExprId),
    /// `name = value`
    Named {
        name: NameRef,
        eq: Span,
        value: ExprId,
    },
    /// `[key] = value`
    Keyed {
        lbracket: Span,
        key: ExprId,
        rbracket: Span,
        eq: Span,
        value: ExprId,
    },
}

/// `{ field, ... }`
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableConstructor {
    pub lbrace: Span,
    pub fields: Vec<TableField>,
    pub rbrace: Span,
}

/// Parameter list of a function body.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamList {
    pub names: Vec<NameRef>,
    /// Trailing `...`.
    pub ellipsis: Option<Span>,
}

/// `( params ) block end` — shared by anonymous functions and declarations.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionBody {
    pub lparen: Span,
    pub params: ParamList,
    pub rparen: Span,
    pub block: super::Block,
    /// Explicit `end` marker. `None` only when recovery hit end of input.
    pub end_kw: Option<Span>,
}

/// An expression node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    Nil,
    True,
    False,
    /// Numeric literal; raw text is the node span.
    Number,
    Str(LuaString),
    /// `...`
    Ellipsis,
    /// `function (params) block end`
    Function {
        function_kw: Span,
        body: FunctionBody,
    },
    /// Plain variable reference.
    Name(NameRef),
    /// `prefix[index]`
    Index {
        prefix: ExprId,
        lbracket: Span,
        index: ExprId,
        rbracket: Span,
    },
    /// `prefix.name`
    Field {
        prefix: ExprId,
        dot: Span,
        name: NameRef,
    },
    Call(FunctionCall),
    /// `( expr )`
    Paren {
        lparen: Span,
        expr: ExprId,
        rparen: Span,
    },
    Table(TableConstructor),
    Binary {
        op: BinaryOp,
        op_span: Span,
        lhs: ExprId,
        rhs: ExprId,
    },
    Unary {
        op: UnaryOp,
        op_span: Span,
        operand: ExprId,
    },
    /// Placeholder produced by error recovery.
    Error,
}

impl ExprKind {
    /// Prefix-expressions: the subset valid before an index, field access,
    /// or call suffix.
    pub const fn is_prefix_expr(&self) -> bool {
        matches!(
            self,
            ExprKind::Name(_)
                | ExprKind::Index { .. }
                | ExprKind::Field { .. }
                | ExprKind::Call(_)
                | ExprKind::Paren { .. }
        )
    }

    /// Valid assignment targets: `name`, `prefix[k]`, `prefix.name`.
    ///
    /// Calls and parenthesized expressions are prefix-expressions but not
    /// variables, which is what the declarator tie-break checks.
    pub const fn is_var(&self) -> bool {
        matches!(
            self,
            ExprKind::Name(_) | ExprKind::Index { .. } | ExprKind::Field { .. }
        )
    }
}
