//! Flat arena storage for expressions and documentation types.
//!
//! Recursive nodes reference children through typed ids instead of boxing,
//! which keeps the tree `Clone`/`Eq`/`Hash`-friendly and lets the
//! incremental reparse carry a previous arena forward wholesale.

use std::fmt;

use crate::ast::{DocType, Expr};

/// Id of an expression in a [`SyntaxArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Id of a documentation type in a [`SyntaxArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocTypeId(u32);

impl DocTypeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for DocTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocTypeId({})", self.0)
    }
}

/// Arena owning every expression and documentation-type node of one parse.
///
/// Nodes are immutable once allocated. Ids from a cloned arena remain valid
/// in the clone, which is what the incremental reparse relies on.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SyntaxArena {
    exprs: Vec<Expr>,
    doc_types: Vec<DocType>,
}

impl SyntaxArena {
    pub fn new() -> Self {
        SyntaxArena::default()
    }

    /// Allocate an expression, returning its id.
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = u32::try_from(self.exprs.len())
            .unwrap_or_else(|_| panic!("expression arena overflow: {} nodes", self.exprs.len()));
        self.exprs.push(expr);
        ExprId(id)
    }

    /// Allocate a documentation type, returning its id.
    pub fn alloc_doc_type(&mut self, ty: DocType) -> DocTypeId {
        let id = u32::try_from(self.doc_types.len()).unwrap_or_else(|_| {
            panic!("doc type arena overflow: {} nodes", self.doc_types.len())
        });
        self.doc_types.push(ty);
        DocTypeId(id)
    }

    /// Fetch an expression.
    ///
    /// # Panics
    /// Panics on an id from a different arena generation; ids handed out by
    /// this arena (or a clone it grew from) are always valid.
    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Fetch a documentation type.
    #[inline]
    pub fn doc_type(&self, id: DocTypeId) -> &DocType {
        &self.doc_types[id.index()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn doc_type_count(&self) -> usize {
        self.doc_types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExprKind, DocTypeKind};
    use crate::Span;

    #[test]
    fn test_alloc_round_trip() {
        let mut arena = SyntaxArena::new();
        let id = arena.alloc_expr(Expr {
            kind: ExprKind::Nil,
            span: Span::new(0, 3),
        });
        assert!(matches!(arena.expr(id).kind, ExprKind::Nil));
        assert_eq!(arena.expr(id).span, Span::new(0, 3));
    }

    #[test]
    fn test_clone_preserves_ids() {
        let mut arena = SyntaxArena::new();
        let id = arena.alloc_expr(Expr {
            kind: ExprKind::True,
            span: Span::new(0, 4),
        });
        let mut clone = arena.clone();
        let later = clone.alloc_doc_type(DocType {
            kind: DocTypeKind::Error,
            span: Span::DUMMY,
        });
        assert!(matches!(clone.expr(id).kind, ExprKind::True));
        assert!(matches!(clone.doc_type(later).kind, DocTypeKind::Error));
    }
}
