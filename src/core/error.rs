//! Error types
//!
//! Lenient parsing never fails; `ParseError` is only produced in strict mode.
//! `ConfigError` reports grammar options that cannot be turned into a grammar.

use std::fmt;
use thiserror::Error;

/// Markup construct that ran to end of input without its terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    StartTag,
    EndTag,
    Comment,
    CDataSection,
    Doctype,
    ProcessingInstruction,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Construct::StartTag => "start tag",
            Construct::EndTag => "end tag",
            Construct::Comment => "comment",
            Construct::CDataSection => "CDATA section",
            Construct::Doctype => "doctype",
            Construct::ProcessingInstruction => "processing instruction",
        })
    }
}

/// What went wrong in a strict parse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("end tag </{name}> has no matching start tag")]
    UnmatchedEndTag { name: String },

    #[error("end tag </{found}> does not close <{expected}>")]
    MismatchedEndTag { expected: String, found: String },

    #[error("<{name}> is never closed")]
    UnclosedTag { name: String },

    #[error("unterminated {0}")]
    Unterminated(Construct),

    #[error("attribute `{name}` has no value")]
    AttributeWithoutValue { name: String },

    #[error("value of attribute `{name}` is not quoted")]
    UnquotedAttributeValue { name: String },

    #[error("duplicate attribute `{name}`")]
    DuplicateAttribute { name: String },

    #[error("`<` does not start a tag or markup declaration")]
    MalformedMarkup,

    #[error("unexpected `{0}` in tag")]
    UnexpectedCharacter(char),
}

/// Strict-mode failure with the byte offset of the offending construct
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        ParseError { kind, offset }
    }
}

/// Grammar options that cannot be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("empty tag name in grammar options")]
    EmptyName,

    #[error("tag names `{first}` and `{second}` share hash {hash:#010x}")]
    NameCollision {
        first: String,
        second: String,
        hash: u32,
    },
}
