//! Syntax tree node definitions.

mod doc;
mod expr;
mod stmt;

pub use doc::{
    DocBlock, DocBrief, DocBuiltin, DocClass, DocCommand, DocConfig, DocEnumAlt, DocField,
    DocFunctionParam, DocFunctionReturn, DocGeneric, DocGenericParam, DocLine, DocLineKind,
    DocName, DocParam, DocParamName, DocReturn, DocTablePair, DocTableKey, DocTag, DocText,
    DocType, DocTypeDecl, DocTypeKind, DocVisibility,
};
pub use expr::{
    BinaryOp, CallArgs, Expr, ExprKind, FieldSep, FunctionBody, FunctionCall, LuaString, NameRef,
    ParamList, TableConstructor, TableField, TableFieldKind, UnaryOp,
};
pub use stmt::{
    Assignment, Block, DoBlock, ElseClause, ElseifClause, ForHeader, ForStatement,
    FunctionDeclaration, FunctionName, IfStatement, Item, LocalDeclaration, Program,
    RepeatStatement, ReturnStatement, Statement, StatementKind, WhileStatement,
};
