//! Parallel batch parsing
//!
//! Uses Rayon to parse many independent inputs with one parser. The compiled
//! grammar is immutable and shared by reference; each input gets its own
//! tokenizer and tree.

use rayon::prelude::*;
use crate::core::error::ParseError;
use crate::dom::{Document, DomParser};
use crate::sax::SaxParser;
use crate::core::events::Event;

/// Parse whole documents in parallel, results in input order
pub fn parse_documents(parser: &DomParser, inputs: &[&str]) -> Vec<Result<Document, ParseError>> {
    inputs
        .par_iter()
        .map(|&input| parser.parse_document(input))
        .collect()
}

/// Parse fragments in parallel, results in input order
pub fn parse_fragments(parser: &DomParser, inputs: &[&str]) -> Vec<Result<Document, ParseError>> {
    inputs
        .par_iter()
        .map(|&input| parser.parse_fragment(input))
        .collect()
}

/// Collect the event streams of many inputs in parallel
pub fn collect_events<'a>(
    parser: &SaxParser,
    inputs: &[&'a str],
) -> Vec<Result<Vec<Event<'a>>, ParseError>> {
    inputs
        .par_iter()
        .map(|&input| parser.collect(input))
        .collect()
}

/// Parse documents and map each tree; any parse error fails the batch
pub fn map_documents<F, T>(parser: &DomParser, inputs: &[&str], mapper: F) -> Result<Vec<T>, ParseError>
where
    F: Fn(&Document) -> T + Sync + Send,
    T: Send,
{
    inputs
        .par_iter()
        .map(|&input| parser.parse_document(input).map(|doc| mapper(&doc)))
        .collect()
}
