//! Error recovery.
//!
//! Token sets with O(1) bitset membership, and synchronization helpers that
//! skip to the next plausible statement or block boundary so one malformed
//! construct does not suppress recognition of the rest of the input.

use lua_ir::TokenTag;

use crate::cursor::Cursor;

/// A set of token tags backed by a `u128` bitset.
///
/// Every [`TokenTag`] index is below 128, so one word covers the alphabet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    /// Empty set.
    #[inline]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Add a tag (builder pattern for const contexts).
    #[inline]
    #[must_use]
    pub const fn with(self, tag: TokenTag) -> Self {
        Self(self.0 | (1u128 << tag.index()))
    }

    /// Union of two sets.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Membership test.
    #[inline]
    pub const fn contains(&self, tag: TokenTag) -> bool {
        (self.0 & (1u128 << tag.index())) != 0
    }

    /// Membership test on a raw tag byte.
    #[inline]
    pub const fn contains_raw(&self, tag: u8) -> bool {
        tag < 128 && (self.0 & (1u128 << tag)) != 0
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }
}

impl Default for TokenSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokens that can begin a statement; used to resynchronize after an error.
pub const STMT_START: TokenSet = TokenSet::new()
    .with(TokenTag::KwLocal)
    .with(TokenTag::KwFunction)
    .with(TokenTag::KwIf)
    .with(TokenTag::KwWhile)
    .with(TokenTag::KwRepeat)
    .with(TokenTag::KwFor)
    .with(TokenTag::KwDo)
    .with(TokenTag::KwReturn)
    .with(TokenTag::KwBreak)
    .with(TokenTag::DocLine)
    .with(TokenTag::Eof);

/// Tokens that terminate some enclosing block.
pub const BLOCK_END: TokenSet = TokenSet::new()
    .with(TokenTag::KwEnd)
    .with(TokenTag::KwElse)
    .with(TokenTag::KwElseif)
    .with(TokenTag::KwUntil)
    .with(TokenTag::Eof);

/// Tokens that can begin an expression.
pub const EXPR_START: TokenSet = TokenSet::new()
    .with(TokenTag::KwNil)
    .with(TokenTag::KwTrue)
    .with(TokenTag::KwFalse)
    .with(TokenTag::Number)
    .with(TokenTag::Str)
    .with(TokenTag::Ellipsis)
    .with(TokenTag::KwFunction)
    .with(TokenTag::Ident)
    .with(TokenTag::LParen)
    .with(TokenTag::LBrace)
    .with(TokenTag::KwNot)
    .with(TokenTag::Hash)
    .with(TokenTag::Minus)
    .with(TokenTag::Tilde);

/// Advance the cursor until reaching a token in `recovery` or EOF.
///
/// Returns `true` if a recovery token was found before end of input.
pub fn synchronize(cursor: &mut Cursor<'_>, recovery: TokenSet) -> bool {
    while !cursor.at_end() {
        if recovery.contains_raw(cursor.current_tag()) {
            return true;
        }
        cursor.advance();
    }
    false
}
