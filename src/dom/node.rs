//! DOM node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of DOM node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Detached container for a parsed fragment
    Fragment,
    Element,
    Text,
    CData,
    Comment,
    Doctype,
    ProcessingInstruction,
}

/// Element attribute, value already decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Payload of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Document,
    Fragment,
    Element {
        name: String,
        attributes: Vec<Attribute>,
    },
    Text(String),
    CData(String),
    Comment(String),
    Doctype {
        name: Option<String>,
        public_id: Option<String>,
        system_id: Option<String>,
    },
    ProcessingInstruction {
        target: String,
        data: String,
    },
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Document => NodeKind::Document,
            NodeData::Fragment => NodeKind::Fragment,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::CData(_) => NodeKind::CData,
            NodeData::Comment(_) => NodeKind::Comment,
            NodeData::Doctype { .. } => NodeKind::Doctype,
            NodeData::ProcessingInstruction { .. } => NodeKind::ProcessingInstruction,
        }
    }
}

/// A node in the arena
#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    /// Parent node (None for roots and detached nodes)
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

impl Node {
    pub fn new(data: NodeData) -> Self {
        Node {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element { .. })
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Element tag name, PI target or doctype name
    pub fn name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { name, .. } => Some(name.as_str()),
            NodeData::ProcessingInstruction { target, .. } => Some(target.as_str()),
            NodeData::Doctype { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}
