//! Operator precedence table.
//!
//! An immutable value constructed once ([`PrecedenceTable::lua`]) and passed
//! by reference into every parser instance — never a process-global. The
//! named levels cover the full priority ladder the grammar is built on,
//! including the statement/program levels the statement parser uses to give
//! outer constructs higher binding at boundaries.

use lua_ir::ast::{BinaryOp, UnaryOp};
use lua_ir::{TokenKind, TokenTag};

/// Named priority levels, lowest binding first.
pub mod level {
    pub const COMMA: i8 = -1;
    pub const FUNCTION: i8 = 1;
    pub const DEFAULT: i8 = 1;
    /// Tie-break level: declarator-vs-prefix-expression resolution and
    /// documentation union/optional binding.
    pub const PRIORITY: i8 = 2;
    pub const OR: i8 = 3;
    pub const AND: i8 = 4;
    pub const COMPARE: i8 = 5;
    pub const BIT_OR: i8 = 6;
    pub const BIT_XOR: i8 = 7;
    pub const BIT_AND: i8 = 8;
    pub const SHIFT: i8 = 9;
    pub const CONCAT: i8 = 10;
    pub const PLUS: i8 = 11;
    pub const MULTI: i8 = 12;
    pub const UNARY: i8 = 13;
    pub const POWER: i8 = 14;
    pub const STATEMENT: i8 = 15;
    pub const PROGRAM: i8 = 16;
}

/// Operator associativity.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Assoc {
    Left,
    Right,
}

/// One binary operator entry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct BinaryEntry {
    pub op: BinaryOp,
    pub level: i8,
    pub assoc: Assoc,
}

/// Immutable precedence configuration.
///
/// All binary operators are left-associative except `..` and `^`.
#[derive(Clone, Debug)]
pub struct PrecedenceTable {
    /// Indexed by [`TokenTag`] discriminant; `None` for non-operators.
    binary: [Option<BinaryEntry>; 128],
    unary_level: i8,
}

impl PrecedenceTable {
    /// The Lua table.
    pub fn lua() -> Self {
        let mut binary: [Option<BinaryEntry>; 128] = [None; 128];
        let mut set = |tag: TokenTag, op: BinaryOp, lvl: i8, assoc: Assoc| {
            binary[tag.index() as usize] = Some(BinaryEntry {
                op,
                level: lvl,
                assoc,
            });
        };

        set(TokenTag::KwOr, BinaryOp::Or, level::OR, Assoc::Left);
        set(TokenTag::KwAnd, BinaryOp::And, level::AND, Assoc::Left);
        set(TokenTag::Lt, BinaryOp::Lt, level::COMPARE, Assoc::Left);
        set(TokenTag::LtEq, BinaryOp::LtEq, level::COMPARE, Assoc::Left);
        set(TokenTag::EqEq, BinaryOp::Eq, level::COMPARE, Assoc::Left);
        set(TokenTag::NotEq, BinaryOp::NotEq, level::COMPARE, Assoc::Left);
        set(TokenTag::GtEq, BinaryOp::GtEq, level::COMPARE, Assoc::Left);
        set(TokenTag::Gt, BinaryOp::Gt, level::COMPARE, Assoc::Left);
        set(TokenTag::Pipe, BinaryOp::BitOr, level::BIT_OR, Assoc::Left);
        set(TokenTag::Tilde, BinaryOp::BitXor, level::BIT_XOR, Assoc::Left);
        set(TokenTag::Amp, BinaryOp::BitAnd, level::BIT_AND, Assoc::Left);
        set(TokenTag::Shl, BinaryOp::Shl, level::SHIFT, Assoc::Left);
        set(TokenTag::Shr, BinaryOp::Shr, level::SHIFT, Assoc::Left);
        set(TokenTag::Concat, BinaryOp::Concat, level::CONCAT, Assoc::Right);
        set(TokenTag::Plus, BinaryOp::Add, level::PLUS, Assoc::Left);
        set(TokenTag::Minus, BinaryOp::Sub, level::PLUS, Assoc::Left);
        set(TokenTag::Star, BinaryOp::Mul, level::MULTI, Assoc::Left);
        set(TokenTag::Slash, BinaryOp::Div, level::MULTI, Assoc::Left);
        set(
            TokenTag::SlashSlash,
            BinaryOp::FloorDiv,
            level::MULTI,
            Assoc::Left,
        );
        set(TokenTag::Percent, BinaryOp::Mod, level::MULTI, Assoc::Left);
        set(TokenTag::Caret, BinaryOp::Pow, level::POWER, Assoc::Right);

        PrecedenceTable {
            binary,
            unary_level: level::UNARY,
        }
    }

    /// Binary operator entry for a token, if it is one.
    #[inline]
    pub fn binary(&self, tag: TokenTag) -> Option<BinaryEntry> {
        self.binary[tag.index() as usize]
    }

    /// Binary operator entry for a raw tag byte.
    #[inline]
    pub fn binary_raw(&self, tag: u8) -> Option<BinaryEntry> {
        if tag < 128 {
            self.binary[tag as usize]
        } else {
            None
        }
    }

    /// Unary operator for a token: `not`, `#`, `-`, `~`.
    #[inline]
    pub fn unary(&self, kind: &TokenKind) -> Option<UnaryOp> {
        match kind {
            TokenKind::Not => Some(UnaryOp::Not),
            TokenKind::Hash => Some(UnaryOp::Len),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        }
    }

    /// Binding level of unary operators.
    #[inline]
    pub fn unary_level(&self) -> i8 {
        self.unary_level
    }
}
