//! Byte cursor over markup input
//!
//! Wraps the input with a current position and applies takers at it. The
//! byte-class predicates used throughout the tokenizer live here too; every
//! delimiter they stop at is ASCII, so offsets produced by the scanner always
//! fall on UTF-8 character boundaries of the original `&str`.

use super::takers::{CharRun, Taker};
use memchr::{memchr, memmem, memrchr};

pub(crate) const WHITESPACE: CharRun = CharRun(is_whitespace);

/// Scanner over the bytes of a markup text
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Get the current position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the current position, clamped to the input length
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.input.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Underlying bytes
    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.input
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Byte at an absolute offset
    #[inline]
    pub fn byte_at(&self, at: usize) -> Option<u8> {
        self.input.get(at).copied()
    }

    /// Apply a taker at an absolute offset without moving
    #[inline]
    pub fn take_at<T: Taker>(&self, taker: &T, at: usize) -> Option<usize> {
        taker.take(self.input, at)
    }

    /// Apply a taker at the current position, advancing on success
    ///
    /// Returns the matched range start and end.
    #[inline]
    pub fn take<T: Taker>(&mut self, taker: &T) -> Option<(usize, usize)> {
        let start = self.pos;
        let end = taker.take(self.input, start)?;
        self.set_position(end);
        Some((start, self.pos))
    }

    /// Offset of the first non-whitespace byte at or after `at`
    #[inline]
    pub fn skip_whitespace_at(&self, at: usize) -> usize {
        WHITESPACE.take(self.input, at).unwrap_or(at)
    }

    /// Find next occurrence of a byte at or after `from`
    #[inline]
    pub fn find_byte_from(&self, byte: u8, from: usize) -> Option<usize> {
        let rest = self.input.get(from..)?;
        memchr(byte, rest).map(|i| from + i)
    }

    /// Find the last occurrence of a byte in the input
    #[inline]
    pub fn rfind_byte(&self, byte: u8) -> Option<usize> {
        memrchr(byte, self.input)
    }

    /// Find next occurrence of a byte sequence at or after `from`
    #[inline]
    pub fn find_from(&self, needle: &[u8], from: usize) -> Option<usize> {
        let rest = self.input.get(from..)?;
        memmem::find(rest, needle).map(|i| from + i)
    }

    /// Check if input has `needle` at `at`
    #[inline]
    pub fn starts_with_at(&self, at: usize, needle: &[u8]) -> bool {
        self.input
            .get(at..)
            .is_some_and(|rest| rest.starts_with(needle))
    }
}

/// Whitespace between markup tokens (space, tab, newline, form feed, carriage return)
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0c)
}

/// First byte of a tag name: ASCII letter, underscore, colon, or non-ASCII
#[inline]
pub fn is_tag_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || matches!(b, b'_' | b':') || b >= 0x80
}

/// Continuation of a tag name
#[inline]
pub fn is_tag_name_char(b: u8) -> bool {
    !is_whitespace(b) && !matches!(b, b'/' | b'>')
}

/// Continuation of an attribute name
#[inline]
pub fn is_attribute_name_char(b: u8) -> bool {
    !is_whitespace(b) && !matches!(b, b'/' | b'>' | b'=')
}

/// Byte of an unquoted attribute value
#[inline]
pub fn is_unquoted_value_char(b: u8) -> bool {
    !is_whitespace(b) && b != b'>'
}

/// Byte of a processing-instruction target
#[inline]
pub fn is_pi_target_char(b: u8) -> bool {
    !is_whitespace(b) && !matches!(b, b'?' | b'>')
}

/// Byte of a doctype name or keyword
#[inline]
pub fn is_doctype_word_char(b: u8) -> bool {
    !is_whitespace(b) && b != b'>'
}
