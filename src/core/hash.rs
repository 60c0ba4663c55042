//! Name interning by hashing
//!
//! Tag and attribute identity is decided by comparing 32-bit polynomial
//! hashes rather than text. Two variants exist:
//! - case-sensitive: accumulates raw bytes
//! - case-insensitive: folds ASCII letters to lower case first, leaving
//!   non-ASCII and symbol bytes untouched
//!
//! Distinct names can collide. By default a collision is silently treated
//! as identity; an `Interner` built with verification enabled confirms every
//! hash hit with a text comparison under the same case rule.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash of a tag or attribute name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameHash(pub u32);

impl fmt::Display for NameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Letter-case rule for tag names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameCase {
    #[default]
    Sensitive,
    Insensitive,
}

#[inline]
fn accumulate(hash: u32, b: u8) -> u32 {
    hash.wrapping_mul(31).wrapping_add(u32::from(b))
}

/// Case-sensitive polynomial hash
#[inline]
pub fn hash_case_sensitive(bytes: &[u8]) -> NameHash {
    NameHash(bytes.iter().fold(0, |h, &b| accumulate(h, b)))
}

/// Case-insensitive polynomial hash (ASCII letters folded)
#[inline]
pub fn hash_case_insensitive(bytes: &[u8]) -> NameHash {
    NameHash(
        bytes
            .iter()
            .fold(0, |h, &b| accumulate(h, b.to_ascii_lowercase())),
    )
}

/// Hashing and name comparison under one case rule
///
/// Selected once per parser instance; used both when the grammar is built
/// and while scanning, so every identity check agrees on the case rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Interner {
    case: NameCase,
    verify: bool,
}

impl Interner {
    pub fn new(case: NameCase, verify: bool) -> Self {
        Interner { case, verify }
    }

    pub fn case(&self) -> NameCase {
        self.case
    }

    /// Whether hash hits are confirmed by text comparison
    pub fn verifies(&self) -> bool {
        self.verify
    }

    /// Hash `len` bytes of `input` starting at `offset`
    ///
    /// The range is clamped to the input.
    #[inline]
    pub fn hash(&self, input: &[u8], offset: usize, len: usize) -> NameHash {
        let end = offset.saturating_add(len).min(input.len());
        let start = offset.min(end);
        self.hash_bytes(&input[start..end])
    }

    #[inline]
    pub fn hash_bytes(&self, bytes: &[u8]) -> NameHash {
        match self.case {
            NameCase::Sensitive => hash_case_sensitive(bytes),
            NameCase::Insensitive => hash_case_insensitive(bytes),
        }
    }

    #[inline]
    pub fn hash_name(&self, name: &str) -> NameHash {
        self.hash_bytes(name.as_bytes())
    }

    /// Text equality under the case rule
    #[inline]
    pub fn same_name(&self, a: &str, b: &str) -> bool {
        match self.case {
            NameCase::Sensitive => a == b,
            NameCase::Insensitive => a.eq_ignore_ascii_case(b),
        }
    }

    /// Confirm that two names whose hashes are equal are the same name
    ///
    /// Always true unless verification is enabled.
    #[inline]
    pub fn confirm(&self, a: &str, b: &str) -> bool {
        !self.verify || self.same_name(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_case_sensitive(b"div"), hash_case_sensitive(b"div"));
        assert_eq!(hash_case_sensitive(b""), NameHash(0));
        assert_eq!(hash_case_sensitive(b"ab"), NameHash(97 * 31 + 98));
    }

    #[test]
    fn test_case_rules() {
        assert_ne!(hash_case_sensitive(b"DIV"), hash_case_sensitive(b"div"));
        assert_eq!(hash_case_insensitive(b"DIV"), hash_case_insensitive(b"div"));
        assert_eq!(hash_case_insensitive(b"dIv"), hash_case_sensitive(b"div"));
        // Non-ASCII bytes are not folded
        assert_ne!(
            hash_case_insensitive("Ä".as_bytes()),
            hash_case_insensitive("ä".as_bytes())
        );
    }

    #[test]
    fn test_interner_slices() {
        let interner = Interner::new(NameCase::Insensitive, false);
        let input = b"<SCRIPT>";
        assert_eq!(interner.hash(input, 1, 6), interner.hash_name("script"));
        assert_eq!(interner.hash(input, 6, 100), interner.hash_name("T>"));
        assert_eq!(interner.hash(input, 100, 3), NameHash(0));
    }

    #[test]
    fn test_collision_confirmation() {
        // "Aa" and "BB" collide under the 31-polynomial
        assert_eq!(hash_case_sensitive(b"Aa"), hash_case_sensitive(b"BB"));

        let lenient = Interner::new(NameCase::Sensitive, false);
        assert!(lenient.confirm("Aa", "BB"));

        let verified = Interner::new(NameCase::Sensitive, true);
        assert!(!verified.confirm("Aa", "BB"));
        assert!(verified.confirm("Aa", "Aa"));
    }
}
