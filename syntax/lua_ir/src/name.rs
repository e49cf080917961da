//! Interned identifier names.
//!
//! `Name` is a 4-byte id into a [`StringInterner`]. Interning gives O(1)
//! equality and hashing for identifiers, keywords used as doc builtins, and
//! dotted path segments, and keeps tree nodes `Copy`-friendly.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;

/// Interned string id.
///
/// Ids are only meaningful relative to the interner that produced them.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Name(u32);

impl Name {
    /// The pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    /// Raw index into the interner's storage.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

/// Internal storage behind the lock.
struct InternTable {
    map: FxHashMap<Box<str>, u32>,
    strings: Vec<Box<str>>,
}

/// Thread-safe string interner.
///
/// Independent parses may share one interner across threads; lookups take a
/// read lock, interning a new string takes a short write lock.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let mut table = InternTable {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        };
        table.map.insert(Box::from(""), 0);
        table.strings.push(Box::from(""));
        StringInterner {
            table: RwLock::new(table),
        }
    }

    /// Intern a string, returning its id.
    pub fn intern(&self, s: &str) -> Name {
        {
            let table = self.table.read();
            if let Some(&idx) = table.map.get(s) {
                return Name(idx);
            }
        }
        let mut table = self.table.write();
        // Another thread may have interned it between the locks.
        if let Some(&idx) = table.map.get(s) {
            return Name(idx);
        }
        let idx = u32::try_from(table.strings.len()).unwrap_or_else(|_| {
            panic!("interner exceeded capacity: {} strings", table.strings.len())
        });
        table.strings.push(Box::from(s));
        table.map.insert(Box::from(s), idx);
        Name(idx)
    }

    /// Look up the string for an id.
    ///
    /// Returns an owned copy; names resolve rarely (diagnostics, printing),
    /// so the clone is not on a hot path.
    pub fn lookup(&self, name: Name) -> String {
        let table = self.table.read();
        table
            .strings
            .get(name.0 as usize)
            .map(|s| s.to_string())
            .unwrap_or_default()
    }

    /// Run a closure over the string for an id without cloning.
    pub fn with_str<R>(&self, name: Name, f: impl FnOnce(&str) -> R) -> R {
        let table = self.table.read();
        let s = table
            .strings
            .get(name.0 as usize)
            .map_or("", |s| s.as_ref());
        f(s)
    }

    /// Number of interned strings (including the empty string).
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Always false: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedup() {
        let interner = StringInterner::new();
        let a = interner.intern("print");
        let b = interner.intern("print");
        let c = interner.intern("pairs");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_lookup_round_trip() {
        let interner = StringInterner::new();
        let name = interner.intern("tbl_extend");
        assert_eq!(interner.lookup(name), "tbl_extend");
        interner.with_str(name, |s| assert_eq!(s, "tbl_extend"));
    }

    #[test]
    fn test_empty_pre_interned() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }

    #[test]
    fn test_concurrent_interning() {
        use std::sync::Arc;
        let interner = Arc::new(StringInterner::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let interner = Arc::clone(&interner);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        interner.intern(&format!("name_{}", i % 10));
                        let _ = t;
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().ok();
        }
        // 10 distinct names plus the empty string.
        assert_eq!(interner.len(), 11);
    }
}
