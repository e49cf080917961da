//! Statement and program nodes.

use crate::{ExprId, Span};

use super::doc::{DocBlock, DocBrief, DocCommand, DocConfig, DocTag};
use super::expr::{FunctionBody, FunctionCall, NameRef};

/// A sequence of statements inside a construct (function body, loop body,
/// branch). Block-final `return`/`break` appear as ordinary statements; the
/// parser enforces that nothing follows them.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// A statement with its optional trailing `;` separator.
///
/// A documentation block immediately preceding a statement attaches here;
/// consumers care about it on declarations, but the recognizer attaches it
/// uniformly so no doc line is lost.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statement {
    pub documentation: Option<DocBlock>,
    pub kind: StatementKind,
    pub span: Span,
    pub semicolon: Option<Span>,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatementKind {
    Assignment(Assignment),
    LocalDeclaration(LocalDeclaration),
    FunctionDeclaration(FunctionDeclaration),
    /// A function call in statement position.
    Call(FunctionCall),
    Do(DoBlock),
    While(WhileStatement),
    Repeat(RepeatStatement),
    If(IfStatement),
    For(ForStatement),
    Return(ReturnStatement),
    Break {
        break_kw: Span,
    },
}

/// `targets = values`.
///
/// Targets are arena expressions restricted to variable forms
/// ([`crate::ast::ExprKind::is_var`]); the parser rejects anything else.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub targets: Vec<ExprId>,
    pub eq: Span,
    pub values: Vec<ExprId>,
}

/// `local names [= values]`.
///
/// `local x = 1, y = 2` extends the name list pairwise: names `[x, y]`,
/// values `[1, 2]`. Fewer values than names is valid; the lists keep their
/// own left-to-right order.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalDeclaration {
    pub local_kw: Span,
    pub names: Vec<NameRef>,
    pub eq: Option<Span>,
    pub values: Vec<ExprId>,
}

/// Dotted, optionally colon-qualified function name: `a.b.c:m`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionName {
    /// `a.b.c` — at least one segment.
    pub segments: Vec<NameRef>,
    /// `:m` method suffix.
    pub method: Option<(Span, NameRef)>,
}

impl FunctionName {
    pub fn span(&self) -> Span {
        let first = self.segments.first().map_or(Span::DUMMY, |n| n.span);
        let last = self
            .method
            .as_ref()
            .map(|(_, n)| n.span)
            .or_else(|| self.segments.last().map(|n| n.span))
            .unwrap_or(first);
        first.merge(last)
    }
}

/// `function name body` or `local function name body`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionDeclaration {
    /// Present for `local function`; local functions take a plain name.
    pub local_kw: Option<Span>,
    pub function_kw: Span,
    pub name: FunctionName,
    pub body: FunctionBody,
}

/// `do block end`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DoBlock {
    pub do_kw: Span,
    pub block: Block,
    pub end_kw: Option<Span>,
}

/// `while cond do block end`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhileStatement {
    pub while_kw: Span,
    pub condition: ExprId,
    pub do_kw: Span,
    pub block: Block,
    pub end_kw: Option<Span>,
}

/// `repeat block until cond`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepeatStatement {
    pub repeat_kw: Span,
    pub block: Block,
    pub until_kw: Option<Span>,
    pub condition: Option<ExprId>,
}

/// `if cond then block {elseif cond then block} [else block] end`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IfStatement {
    pub if_kw: Span,
    pub condition: ExprId,
    pub then_kw: Span,
    pub block: Block,
    pub elseifs: Vec<ElseifClause>,
    pub else_clause: Option<ElseClause>,
    pub end_kw: Option<Span>,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElseifClause {
    pub elseif_kw: Span,
    pub condition: ExprId,
    pub then_kw: Span,
    pub block: Block,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElseClause {
    pub else_kw: Span,
    pub block: Block,
}

/// `for ... do block end`, numeric or generic.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForStatement {
    pub for_kw: Span,
    pub header: ForHeader,
    pub do_kw: Span,
    pub block: Block,
    pub end_kw: Option<Span>,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForHeader {
    /// `var = start, finish [, step]`
    Numeric {
        var: NameRef,
        eq: Span,
        start: ExprId,
        finish: ExprId,
        step: Option<ExprId>,
    },
    /// `names in exprs`
    Generic {
        names: Vec<NameRef>,
        in_kw: Span,
        exprs: Vec<ExprId>,
    },
}

/// `return [exprs]`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReturnStatement {
    pub return_kw: Span,
    pub values: Vec<ExprId>,
}

/// One top-level program item.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Item {
    Statement(Statement),
    /// Standalone documentation block (e.g. a `---@class` not attached to a
    /// declaration).
    DocBlock(DocBlock),
    Brief(DocBrief),
    Tag(DocTag),
    Config(DocConfig),
    Command(DocCommand),
}

impl Item {
    pub fn span(&self) -> Span {
        match self {
            Item::Statement(s) => s.span,
            Item::DocBlock(b) => b.span,
            Item::Brief(b) => b.span,
            Item::Tag(t) => t.span,
            Item::Config(c) => c.span,
            Item::Command(c) => c.span,
        }
    }
}

/// Root of one parse.
///
/// Invariant: `trailing_return`, if present, is the last item of the module;
/// nothing but trivia and the optional end-of-input sentinel may follow it.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    pub shebang: Option<Span>,
    pub items: Vec<Item>,
    /// Module-level `return`, always last.
    pub trailing_return: Option<Statement>,
    pub span: Span,
}
