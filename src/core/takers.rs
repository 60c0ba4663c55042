//! Scanning primitives ("takers")
//!
//! A taker inspects the input starting at an offset and reports the offset
//! just past the construct it recognises, or `None` when the construct does
//! not start there. Takers never mutate the input and never backtrack;
//! control flow comes from composing them:
//! - `Char` / `CharClass`: exactly one byte
//! - `Literal`: a fixed byte string, optionally ASCII case-insensitive
//! - `Repeat` / `CharRun`: zero or more repetitions, never fails
//! - `Until`: scan to a terminator (byte, class, or literal) with
//!   inclusive/exclusive and open-ended/closed policies
//! - tuples: sequence, short-circuiting on the first failing step
//!
//! Byte and literal terminators go through memchr, so they pick up SIMD
//! acceleration where it is available.

use memchr::{memchr, memmem};

/// A position-advancing match rule over a byte slice
pub trait Taker {
    /// Match at `at`, returning the end offset of the match
    fn take(&self, input: &[u8], at: usize) -> Option<usize>;
}

impl<T: Taker + ?Sized> Taker for &T {
    #[inline]
    fn take(&self, input: &[u8], at: usize) -> Option<usize> {
        (**self).take(input, at)
    }
}

/// Matches one byte equal to the given one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Char(pub u8);

impl Taker for Char {
    #[inline]
    fn take(&self, input: &[u8], at: usize) -> Option<usize> {
        (input.get(at) == Some(&self.0)).then_some(at + 1)
    }
}

/// Matches one byte satisfying a predicate
#[derive(Clone, Copy)]
pub struct CharClass(pub fn(u8) -> bool);

impl Taker for CharClass {
    #[inline]
    fn take(&self, input: &[u8], at: usize) -> Option<usize> {
        match input.get(at) {
            Some(&b) if (self.0)(b) => Some(at + 1),
            _ => None,
        }
    }
}

/// Matches a fixed byte string
#[derive(Debug, Clone, Copy)]
pub struct Literal<'s> {
    needle: &'s [u8],
    ignore_ascii_case: bool,
}

impl<'s> Literal<'s> {
    /// Case-sensitive literal
    pub const fn new(needle: &'s [u8]) -> Self {
        Literal {
            needle,
            ignore_ascii_case: false,
        }
    }

    /// Literal compared with ASCII letters folded
    pub const fn ignore_case(needle: &'s [u8]) -> Self {
        Literal {
            needle,
            ignore_ascii_case: true,
        }
    }
}

impl Taker for Literal<'_> {
    #[inline]
    fn take(&self, input: &[u8], at: usize) -> Option<usize> {
        let end = at.checked_add(self.needle.len())?;
        let candidate = input.get(at..end)?;
        let matched = if self.ignore_ascii_case {
            candidate.eq_ignore_ascii_case(self.needle)
        } else {
            candidate == self.needle
        };
        matched.then_some(end)
    }
}

/// Applies a taker until it fails or stops advancing
///
/// Returns the furthest offset reached and never fails, so a zero-width
/// inner match cannot loop forever.
#[derive(Debug, Clone, Copy)]
pub struct Repeat<T>(pub T);

impl<T: Taker> Taker for Repeat<T> {
    fn take(&self, input: &[u8], at: usize) -> Option<usize> {
        let mut pos = at;
        while let Some(next) = self.0.take(input, pos) {
            if next <= pos {
                break;
            }
            pos = next;
        }
        Some(pos)
    }
}

/// Fast path for `Repeat(CharClass(f))`
#[derive(Clone, Copy)]
pub struct CharRun(pub fn(u8) -> bool);

impl Taker for CharRun {
    #[inline]
    fn take(&self, input: &[u8], at: usize) -> Option<usize> {
        let run = input
            .get(at..)
            .map_or(0, |rest| rest.iter().take_while(|&&b| (self.0)(b)).count());
        Some(at + run)
    }
}

/// Matches the inner taker or nothing
#[derive(Debug, Clone, Copy)]
pub struct Maybe<T>(pub T);

impl<T: Taker> Taker for Maybe<T> {
    #[inline]
    fn take(&self, input: &[u8], at: usize) -> Option<usize> {
        Some(self.0.take(input, at).unwrap_or(at))
    }
}

/// Whether the terminator of an `Until` is part of the consumed range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    Inclusive,
    Exclusive,
}

/// What an `Until` does when its terminator never shows up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unterminated {
    /// Succeed at end of input
    OpenEnded,
    /// Fail
    Closed,
}

/// Terminator searched for by `Until`
#[derive(Clone, Copy)]
pub enum Stop<'s> {
    Byte(u8),
    Class(fn(u8) -> bool),
    Literal(&'s [u8]),
}

/// Advances until a terminator is found
#[derive(Clone, Copy)]
pub struct Until<'s> {
    stop: Stop<'s>,
    inclusion: Inclusion,
    unterminated: Unterminated,
}

impl<'s> Until<'s> {
    /// Exclusive, open-ended scan to `stop`
    pub const fn new(stop: Stop<'s>) -> Self {
        Until {
            stop,
            inclusion: Inclusion::Exclusive,
            unterminated: Unterminated::OpenEnded,
        }
    }

    pub const fn byte(b: u8) -> Self {
        Self::new(Stop::Byte(b))
    }

    pub const fn class(f: fn(u8) -> bool) -> Self {
        Self::new(Stop::Class(f))
    }

    pub const fn literal(needle: &'s [u8]) -> Self {
        Self::new(Stop::Literal(needle))
    }

    /// Consume the terminator as well
    pub const fn inclusive(mut self) -> Self {
        self.inclusion = Inclusion::Inclusive;
        self
    }

    /// Fail instead of running to end of input
    pub const fn closed(mut self) -> Self {
        self.unterminated = Unterminated::Closed;
        self
    }

    /// Locate the terminator at or after `at`, as (start, length)
    #[inline]
    pub fn find(&self, input: &[u8], at: usize) -> Option<(usize, usize)> {
        let rest = input.get(at..)?;
        match self.stop {
            Stop::Byte(b) => memchr(b, rest).map(|i| (at + i, 1)),
            Stop::Class(f) => rest.iter().position(|&b| f(b)).map(|i| (at + i, 1)),
            Stop::Literal(needle) => memmem::find(rest, needle).map(|i| (at + i, needle.len())),
        }
    }
}

impl Taker for Until<'_> {
    fn take(&self, input: &[u8], at: usize) -> Option<usize> {
        match self.find(input, at) {
            Some((start, len)) => Some(match self.inclusion {
                Inclusion::Inclusive => start + len,
                Inclusion::Exclusive => start,
            }),
            None => match self.unterminated {
                Unterminated::OpenEnded => Some(input.len().max(at)),
                Unterminated::Closed => None,
            },
        }
    }
}

macro_rules! sequence_taker {
    ($($name:ident),+) => {
        impl<$($name: Taker),+> Taker for ($($name,)+) {
            #[allow(non_snake_case)]
            #[inline]
            fn take(&self, input: &[u8], at: usize) -> Option<usize> {
                let ($($name,)+) = self;
                let pos = at;
                $(let pos = $name.take(input, pos)?;)+
                Some(pos)
            }
        }
    };
}

sequence_taker!(A, B);
sequence_taker!(A, B, C);
sequence_taker!(A, B, C, D);
sequence_taker!(A, B, C, D, E);
