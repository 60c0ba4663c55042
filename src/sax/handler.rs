//! SAX handler trait and the event collector

use crate::core::events::{Doctype, Event};
use crate::core::hash::NameHash;

/// Callbacks for each event kind
///
/// Every method has an empty default, so a handler only implements the
/// events it cares about.
pub trait SaxHandler<'a> {
    fn start_tag_open(&mut self, _name: &'a str, _hash: NameHash) {}

    fn attribute(&mut self, _name: &'a str, _value: &'a str) {}

    fn start_tag_close(&mut self, _self_closing: bool) {}

    fn end_tag(&mut self, _name: &'a str, _hash: NameHash, _implicit: bool) {}

    fn text(&mut self, _text: &'a str, _verbatim: bool) {}

    fn comment(&mut self, _data: &'a str) {}

    fn cdata(&mut self, _data: &'a str) {}

    fn doctype(&mut self, _doctype: Doctype<'a>) {}

    fn processing_instruction(&mut self, _target: &'a str, _data: &'a str) {}
}

/// Route one event to its callback
#[inline]
pub fn dispatch<'a, H: SaxHandler<'a> + ?Sized>(handler: &mut H, event: Event<'a>) {
    match event {
        Event::StartTagOpen { name, hash } => handler.start_tag_open(name, hash),
        Event::Attribute { name, value } => handler.attribute(name, value),
        Event::StartTagClose { self_closing } => handler.start_tag_close(self_closing),
        Event::EndTag {
            name,
            hash,
            implicit,
        } => handler.end_tag(name, hash, implicit),
        Event::Text { text, verbatim } => handler.text(text, verbatim),
        Event::Comment(data) => handler.comment(data),
        Event::CData(data) => handler.cdata(data),
        Event::Doctype(doctype) => handler.doctype(doctype),
        Event::ProcessingInstruction { target, data } => handler.processing_instruction(target, data),
    }
}

/// Handler that gathers every event in order
#[derive(Debug, Default)]
pub struct SaxCollector<'a> {
    events: Vec<Event<'a>>,
}

impl<'a> SaxCollector<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with estimated capacity
    pub fn with_capacity(events: usize) -> Self {
        SaxCollector {
            events: Vec::with_capacity(events),
        }
    }

    pub fn events(&self) -> &[Event<'a>] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event<'a>> {
        self.events
    }
}

impl<'a> SaxHandler<'a> for SaxCollector<'a> {
    fn start_tag_open(&mut self, name: &'a str, hash: NameHash) {
        self.events.push(Event::StartTagOpen { name, hash });
    }

    fn attribute(&mut self, name: &'a str, value: &'a str) {
        self.events.push(Event::Attribute { name, value });
    }

    fn start_tag_close(&mut self, self_closing: bool) {
        self.events.push(Event::StartTagClose { self_closing });
    }

    fn end_tag(&mut self, name: &'a str, hash: NameHash, implicit: bool) {
        self.events.push(Event::EndTag {
            name,
            hash,
            implicit,
        });
    }

    fn text(&mut self, text: &'a str, verbatim: bool) {
        self.events.push(Event::Text { text, verbatim });
    }

    fn comment(&mut self, data: &'a str) {
        self.events.push(Event::Comment(data));
    }

    fn cdata(&mut self, data: &'a str) {
        self.events.push(Event::CData(data));
    }

    fn doctype(&mut self, doctype: Doctype<'a>) {
        self.events.push(Event::Doctype(doctype));
    }

    fn processing_instruction(&mut self, target: &'a str, data: &'a str) {
        self.events
            .push(Event::ProcessingInstruction { target, data });
    }
}
