//! Markup serializer
//!
//! Walks a `Document` subtree and writes it back as text under the same
//! grammar it was parsed with. The grammar context is tracked per element
//! the way the tokenizer tracks it, so void, self-closing and raw-text rules
//! apply in the context that governs each element.

use super::document::Document;
use super::node::{Attribute, NodeData, NodeId};
use crate::core::entities::{self, TextTarget, TextTransform};
use crate::core::grammar::{Grammar, GrammarId};
use std::fmt;
use std::sync::Arc;

/// Tree-to-markup writer
#[derive(Clone)]
pub struct Serializer<'g> {
    grammar: &'g Grammar,
    encoder: TextTransform,
}

impl<'g> Serializer<'g> {
    /// Writes text and attribute values unchanged
    pub fn new(grammar: &'g Grammar) -> Self {
        Serializer {
            grammar,
            encoder: Arc::new(entities::identity),
        }
    }

    /// Replace the encode hook
    pub fn with_encoder(mut self, encoder: TextTransform) -> Self {
        self.encoder = encoder;
        self
    }

    /// Escape `& < > " '` in text and attribute values
    pub fn with_entity_encoding(self) -> Self {
        self.with_encoder(entities::encoder())
    }

    /// Markup for `node` and its subtree; a document or fragment root
    /// writes only its children
    pub fn serialize(&self, doc: &Document, node: NodeId) -> String {
        let mut out = String::new();
        self.write(doc, node, &mut out);
        out
    }

    /// Append markup for `node` to `out`
    pub fn write(&self, doc: &Document, node: NodeId, out: &mut String) {
        let (context, raw) = self.context_of(doc, node);
        let mut stack = Vec::new();
        self.write_node(doc, node, context, raw, out, &mut stack);

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Children {
                    next: Some(child),
                    context,
                    raw,
                } => {
                    stack.push(Frame::Children {
                        next: doc.get_node(child).and_then(|n| n.next_sibling),
                        context,
                        raw,
                    });
                    self.write_node(doc, child, context, raw, out, &mut stack);
                }
                Frame::Children { next: None, .. } => {}
                Frame::Close(name) => {
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            }
        }
    }

    /// Context governing `node` and whether it sits in raw-text content,
    /// found by replaying the element ancestry from the top
    fn context_of(&self, doc: &Document, node: NodeId) -> (GrammarId, bool) {
        let mut ancestors = Vec::new();
        let mut current = doc.get_node(node).and_then(|n| n.parent);
        while let Some(id) = current {
            if let Some(name) = doc.get_node(id).filter(|n| n.is_element()).and_then(|n| n.name()) {
                ancestors.push(name);
            }
            current = doc.get_node(id).and_then(|n| n.parent);
        }

        let mut context = self.grammar.root();
        let mut raw = false;
        for name in ancestors.into_iter().rev() {
            let hash = self.grammar.interner().hash_name(name);
            raw = self.grammar.is_raw_text(context, hash, name);
            context = self
                .grammar
                .foreign_context(context, hash, name)
                .unwrap_or(context);
        }
        (context, raw)
    }

    /// Write the opening part of `id`; its content and end tag go on `stack`
    fn write_node<'d>(
        &self,
        doc: &'d Document,
        id: NodeId,
        context: GrammarId,
        raw: bool,
        out: &mut String,
        stack: &mut Vec<Frame<'d>>,
    ) {
        let Some(node) = doc.get_node(id) else {
            return;
        };

        match &node.data {
            NodeData::Document | NodeData::Fragment => {
                stack.push(Frame::Children {
                    next: node.first_child,
                    context,
                    raw: false,
                });
            }
            NodeData::Element { name, attributes } => {
                self.write_element(node.first_child, name, attributes, context, out, stack);
            }
            NodeData::Text(text) => {
                if raw {
                    out.push_str(text);
                } else {
                    out.push_str(&(self.encoder)(text, TextTarget::Text));
                }
            }
            NodeData::CData(data) => {
                out.push_str("<![CDATA[");
                out.push_str(data);
                out.push_str("]]>");
            }
            NodeData::Comment(data) => {
                out.push_str("<!--");
                out.push_str(data);
                out.push_str("-->");
            }
            NodeData::Doctype {
                name,
                public_id,
                system_id,
            } => {
                out.push_str("<!DOCTYPE");
                if let Some(name) = name {
                    out.push(' ');
                    out.push_str(name);
                }
                match (public_id, system_id) {
                    (Some(public), system) => {
                        out.push_str(" PUBLIC ");
                        push_quoted(out, public);
                        if let Some(system) = system {
                            out.push(' ');
                            push_quoted(out, system);
                        }
                    }
                    (None, Some(system)) => {
                        out.push_str(" SYSTEM ");
                        push_quoted(out, system);
                    }
                    (None, None) => {}
                }
                out.push('>');
            }
            NodeData::ProcessingInstruction { target, data } => {
                out.push_str("<?");
                out.push_str(target);
                if !data.is_empty() {
                    out.push(' ');
                    out.push_str(data);
                }
                out.push_str("?>");
            }
        }
    }

    fn write_element<'d>(
        &self,
        first_child: Option<NodeId>,
        name: &'d str,
        attributes: &[Attribute],
        context: GrammarId,
        out: &mut String,
        stack: &mut Vec<Frame<'d>>,
    ) {
        let grammar = self.grammar;
        let hash = grammar.interner().hash_name(name);
        let self_closing = grammar.node(context).self_closing_tags();

        out.push('<');
        out.push_str(name);
        for attr in attributes {
            out.push(' ');
            out.push_str(&attr.name);
            out.push('=');
            push_quoted(out, &(self.encoder)(&attr.value, TextTarget::Attribute));
        }

        if grammar.is_void(context, hash, name) {
            out.push_str(if self_closing { "/>" } else { ">" });
            return;
        }
        if first_child.is_none() && self_closing {
            out.push_str("/>");
            return;
        }

        out.push('>');
        stack.push(Frame::Close(name));
        stack.push(Frame::Children {
            next: first_child,
            context: grammar.foreign_context(context, hash, name).unwrap_or(context),
            raw: grammar.is_raw_text(context, hash, name),
        });
    }
}

/// Pending work of the serializer walk
enum Frame<'d> {
    /// Remaining children of an element, from `next` on
    Children {
        next: Option<NodeId>,
        context: GrammarId,
        raw: bool,
    },
    /// End tag still owed
    Close(&'d str),
}

impl fmt::Debug for Serializer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("grammar", &self.grammar)
            .finish_non_exhaustive()
    }
}

/// Double quotes unless the value holds `"` and no `'`; with both, `"` is escaped
fn push_quoted(out: &mut String, value: &str) {
    match (value.contains('"'), value.contains('\'')) {
        (true, false) => {
            out.push('\'');
            out.push_str(value);
            out.push('\'');
        }
        (true, true) => {
            out.push('"');
            out.push_str(&value.replace('"', "&quot;"));
            out.push('"');
        }
        _ => {
            out.push('"');
            out.push_str(value);
            out.push('"');
        }
    }
}
