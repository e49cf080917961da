//! Edit description for incremental reparsing.

use crate::Span;

/// A single replaced byte range.
///
/// The bytes `start..old_end` of the previous buffer were replaced by the
/// bytes `start..new_end` of the new buffer. Insertions have
/// `start == old_end`; deletions have `start == new_end`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edit {
    pub start: u32,
    pub old_end: u32,
    pub new_end: u32,
}

impl Edit {
    /// Replacement of `old` (in the previous buffer) by a new range of
    /// `new_len` bytes.
    pub fn replace(old: Span, new_len: u32) -> Self {
        Edit {
            start: old.start,
            old_end: old.end,
            new_end: old.start + new_len,
        }
    }

    /// Insertion of `len` bytes at `offset`.
    pub fn insert(offset: u32, len: u32) -> Self {
        Edit {
            start: offset,
            old_end: offset,
            new_end: offset + len,
        }
    }

    /// Signed growth of the buffer.
    pub fn delta(&self) -> i64 {
        i64::from(self.new_end) - i64::from(self.old_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_constructors() {
        let e = Edit::replace(Span::new(4, 10), 2);
        assert_eq!(e, Edit { start: 4, old_end: 10, new_end: 6 });
        assert_eq!(e.delta(), -4);

        let i = Edit::insert(8, 3);
        assert_eq!(i, Edit { start: 8, old_end: 8, new_end: 11 });
        assert_eq!(i.delta(), 3);
    }
}
