//! DOM builder
//!
//! Forwards tokenizer events into a `TreeSink`. Start tags create an element
//! at the insertion point and descend into it; end tags (explicit or
//! synthetic) climb back to the parent; everything else becomes a leaf at the
//! insertion point. Text and attribute values pass through the decode hook,
//! except verbatim raw-text content.

use super::document::Document;
use super::sink::TreeSink;
use crate::core::entities::{self, TextTarget, TextTransform};
use crate::core::error::{ConfigError, ParseError};
use crate::core::events::Event;
use crate::core::grammar::Grammar;
use crate::core::options::ParserOptions;
use crate::core::tokenizer::Tokenizer;
use log::debug;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

const TARGET: &str = "rustymarkup::dom";

/// Entry mode of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildMode {
    Document,
    /// Doctypes are dropped; the container has no implied root element
    Fragment,
}

/// Tree-building parser bound to one compiled grammar
#[derive(Clone)]
pub struct DomParser {
    grammar: Arc<Grammar>,
    decoder: TextTransform,
}

impl DomParser {
    pub fn new(options: &ParserOptions) -> Result<Self, ConfigError> {
        Ok(Self::with_grammar(Arc::new(Grammar::new(options)?)))
    }

    /// Share an already compiled grammar; text is stored undecoded
    pub fn with_grammar(grammar: Arc<Grammar>) -> Self {
        DomParser {
            grammar,
            decoder: Arc::new(entities::identity),
        }
    }

    /// Replace the decode hook
    pub fn with_decoder(mut self, decoder: TextTransform) -> Self {
        self.decoder = decoder;
        self
    }

    /// Decode the basic named and numeric references
    pub fn with_entity_decoding(self) -> Self {
        self.with_decoder(entities::decoder())
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    /// Parse a complete document into a new `Document`
    pub fn parse_document(&self, input: &str) -> Result<Document, ParseError> {
        let mut document = Document::new();
        let root = document.root();
        self.build_document(input, &mut document, root)?;
        Ok(document)
    }

    /// Parse a fragment into a new `Document` whose root is a fragment container
    pub fn parse_fragment(&self, input: &str) -> Result<Document, ParseError> {
        let mut fragment = Document::new_fragment();
        let root = fragment.root();
        self.build_fragment(input, &mut fragment, root)?;
        Ok(fragment)
    }

    /// Build a document below `root` of an external tree
    pub fn build_document<S: TreeSink>(
        &self,
        input: &str,
        sink: &mut S,
        root: S::Handle,
    ) -> Result<(), ParseError> {
        self.build(input, sink, root, BuildMode::Document)
    }

    /// Build fragment nodes as children of `container`
    pub fn build_fragment<S: TreeSink>(
        &self,
        input: &str,
        sink: &mut S,
        container: S::Handle,
    ) -> Result<(), ParseError> {
        self.build(input, sink, container, BuildMode::Fragment)
    }

    fn build<S: TreeSink>(
        &self,
        input: &str,
        sink: &mut S,
        root: S::Handle,
        mode: BuildMode,
    ) -> Result<(), ParseError> {
        let mut current = root;
        let mut elements = 0usize;

        for event in Tokenizer::new(input, &self.grammar) {
            match event? {
                Event::StartTagOpen { name, .. } => {
                    let element = sink.create_element(name);
                    sink.append_child(current, element);
                    current = element;
                    elements += 1;
                }
                Event::Attribute { name, value } => {
                    let value = (self.decoder)(value, TextTarget::Attribute);
                    sink.set_attribute(current, name, &value);
                }
                Event::StartTagClose { .. } => {}
                Event::EndTag { .. } => {
                    // Every end tag pairs with an element opened above, so
                    // `current` is never the root here
                    debug_assert!(sink.parent(current).is_some(), "end tag without open element");
                    current = sink.parent(current).unwrap_or(root);
                }
                Event::Text { text, verbatim } => {
                    let text = if verbatim {
                        Cow::Borrowed(text)
                    } else {
                        (self.decoder)(text, TextTarget::Text)
                    };
                    let node = sink.create_text(&text);
                    sink.append_child(current, node);
                }
                Event::Comment(data) => {
                    let node = sink.create_comment(data);
                    sink.append_child(current, node);
                }
                Event::CData(data) => {
                    let node = sink.create_cdata(data);
                    sink.append_child(current, node);
                }
                Event::Doctype(doctype) => match mode {
                    BuildMode::Document => {
                        let node = sink.create_doctype(&doctype);
                        sink.append_child(current, node);
                    }
                    BuildMode::Fragment => {
                        debug!(target: TARGET, "ignoring doctype in fragment");
                    }
                },
                Event::ProcessingInstruction { target, data } => {
                    let node = sink.create_processing_instruction(target, data);
                    sink.append_child(current, node);
                }
            }
        }

        debug!(
            target: TARGET,
            "built {mode:?} from {} bytes, {elements} element(s)",
            input.len()
        );
        Ok(())
    }
}

impl fmt::Debug for DomParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomParser")
            .field("grammar", &self.grammar)
            .finish_non_exhaustive()
    }
}
