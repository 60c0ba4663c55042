//! RustyMarkup - configurable markup tokenizer for HTML-like and XML-like text
//!
//! One tokenizer, driven by a grammar compiled from `ParserOptions`:
//! - Core: takers, name hashing, grammar contexts and the pull tokenizer
//! - SAX: events forwarded to a `SaxHandler` (parse_events style)
//! - DOM: trees built through `TreeSink`, with document and fragment modes
//! - Strategy: parallel batch parsing over a shared grammar
//!
//! ```
//! use rustymarkup::{DomParser, ParserOptions, Serializer};
//!
//! let parser = DomParser::new(&ParserOptions::html())?;
//! let doc = parser.parse_document("<ul><li>one<li>two</ul>")?;
//! let html = Serializer::new(parser.grammar()).serialize(&doc, doc.root());
//! assert_eq!(html, "<ul><li>one</li><li>two</li></ul>");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod dom;
pub mod sax;
pub mod strategy;

pub use crate::core::entities::{TextTarget, TextTransform};
pub use crate::core::error::{ConfigError, Construct, ParseError, ParseErrorKind};
pub use crate::core::events::{Doctype, Event};
pub use crate::core::grammar::{Grammar, GrammarId};
pub use crate::core::hash::{NameCase, NameHash};
pub use crate::core::options::{GrammarOptions, ParserOptions};
pub use crate::core::tokenizer::Tokenizer;
pub use dom::{Document, DomParser, NodeId, NodeKind, Serializer, TreeSink};
pub use sax::{SaxCollector, SaxHandler, SaxParser};
