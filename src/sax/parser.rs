//! SAX parser: drives the tokenizer into a handler

use super::handler::{dispatch, SaxCollector, SaxHandler};
use crate::core::error::{ConfigError, ParseError};
use crate::core::events::Event;
use crate::core::grammar::Grammar;
use crate::core::options::ParserOptions;
use crate::core::tokenizer::Tokenizer;
use std::sync::Arc;

/// Streaming parser bound to one compiled grammar
///
/// Holds no per-parse state; every call starts a fresh tokenizer.
#[derive(Debug, Clone)]
pub struct SaxParser {
    grammar: Arc<Grammar>,
}

impl SaxParser {
    pub fn new(options: &ParserOptions) -> Result<Self, ConfigError> {
        Ok(Self::with_grammar(Arc::new(Grammar::new(options)?)))
    }

    /// Share an already compiled grammar
    pub fn with_grammar(grammar: Arc<Grammar>) -> Self {
        SaxParser { grammar }
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    /// Pull-style access to the event stream
    pub fn tokenize<'a>(&self, input: &'a str) -> Tokenizer<'a, '_> {
        Tokenizer::new(input, &self.grammar)
    }

    /// Feed every event of `input` to `handler` in document order
    ///
    /// In strict mode the events before the first violation are delivered,
    /// then the violation is returned.
    pub fn parse<'a, H>(&self, input: &'a str, handler: &mut H) -> Result<(), ParseError>
    where
        H: SaxHandler<'a> + ?Sized,
    {
        for event in self.tokenize(input) {
            dispatch(handler, event?);
        }
        Ok(())
    }

    /// Collect all events of `input`
    pub fn collect<'a>(&self, input: &'a str) -> Result<Vec<Event<'a>>, ParseError> {
        let mut collector = SaxCollector::with_capacity(input.len() / 8);
        self.parse(input, &mut collector)?;
        Ok(collector.into_events())
    }
}
