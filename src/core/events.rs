//! Structural events
//!
//! Events borrow their slices from the input text and are plain `Copy`
//! values, so a consumer can keep them for as long as the input lives.

use super::hash::NameHash;

/// Parsed `<!DOCTYPE ...>` declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Doctype<'a> {
    /// Root element name, e.g. `html`
    pub name: Option<&'a str>,
    /// Quoted id after `PUBLIC`
    pub public_id: Option<&'a str>,
    /// Quoted id after `SYSTEM`, or the second id after `PUBLIC`
    pub system_id: Option<&'a str>,
}

/// A markup event in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// `<name` has been scanned; attributes follow
    StartTagOpen { name: &'a str, hash: NameHash },

    /// One attribute of the open start tag; value is raw (not decoded)
    Attribute { name: &'a str, value: &'a str },

    /// The start tag is complete
    ///
    /// `self_closing` is only set when the active context recognises `<x/>`.
    StartTagClose { self_closing: bool },

    /// An element ends
    ///
    /// `implicit` marks synthetic ends: void and self-closed elements,
    /// implicit-end rules, and elements still open at end of input.
    EndTag {
        name: &'a str,
        hash: NameHash,
        implicit: bool,
    },

    /// Character data; `verbatim` when it is the content of a raw-text element
    Text { text: &'a str, verbatim: bool },

    Comment(&'a str),

    CData(&'a str),

    Doctype(Doctype<'a>),

    ProcessingInstruction { target: &'a str, data: &'a str },
}

impl<'a> Event<'a> {
    #[inline]
    pub fn is_start_tag(&self) -> bool {
        matches!(self, Event::StartTagOpen { .. })
    }

    #[inline]
    pub fn is_end_tag(&self) -> bool {
        matches!(self, Event::EndTag { .. })
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Event::Text { .. })
    }

    /// Tag name of a start or end tag event
    pub fn tag_name(&self) -> Option<&'a str> {
        match *self {
            Event::StartTagOpen { name, .. } | Event::EndTag { name, .. } => Some(name),
            _ => None,
        }
    }
}
