//! Arena-based document tree
//!
//! Nodes live in one `Vec` and refer to each other by `NodeId`. Node 0 is
//! the root container: a `Document` for whole documents, a `Fragment` for
//! fragments. Newly created nodes are detached until appended.

use super::node::{Attribute, Node, NodeData, NodeId, NodeKind};
use super::sink::TreeSink;
use crate::core::events::Doctype;

/// Root container id
pub const ROOT: NodeId = 0;

/// Owned markup tree
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Empty document
    pub fn new() -> Self {
        Self::with_root(NodeData::Document)
    }

    /// Empty fragment container
    pub fn new_fragment() -> Self {
        Self::with_root(NodeData::Fragment)
    }

    fn with_root(data: NodeData) -> Self {
        let mut nodes = Vec::with_capacity(64);
        nodes.push(Node::new(data));
        Document { nodes }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Whether node 0 is a fragment container
    pub fn is_fragment(&self) -> bool {
        self.nodes[ROOT as usize].kind() == NodeKind::Fragment
    }

    /// Get the root element (first element child of the root container)
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(ROOT)
            .find(|&id| self.get_node(id).is_some_and(Node::is_element))
    }

    /// Get a node by ID
    #[inline]
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Get a mutable node by ID
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id as usize)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get_node(id).map(Node::kind)
    }

    /// Get node name as string
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.get_node(id)?.name()
    }

    /// Data of a text, CDATA or comment node
    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        match &self.get_node(id)?.data {
            NodeData::Text(text) | NodeData::CData(text) | NodeData::Comment(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Concatenated text and CDATA below a node
    pub fn inner_text(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|child| match &self.get_node(child)?.data {
                NodeData::Text(text) | NodeData::CData(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Get attributes for an element
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match self.get_node(id).map(|node| &node.data) {
            Some(NodeData::Element { attributes, .. }) => attributes.as_slice(),
            _ => &[],
        }
    }

    /// Get attribute value by name
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Iterate over children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next: first }
    }

    /// Iterate over all descendants of a node
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        let mut iter = DescendantIter {
            doc: self,
            stack: Vec::new(),
        };
        iter.push_children(id);
        iter
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node::new(data));
        id
    }

    /// Link `child` as the last child of `parent`
    fn link_child(&mut self, parent: NodeId, child: NodeId) {
        let prev = self.nodes[parent as usize].last_child;
        {
            let node = &mut self.nodes[child as usize];
            node.parent = Some(parent);
            node.prev_sibling = prev;
            node.next_sibling = None;
        }
        match prev {
            Some(prev) => self.nodes[prev as usize].next_sibling = Some(child),
            None => self.nodes[parent as usize].first_child = Some(child),
        }
        self.nodes[parent as usize].last_child = Some(child);
    }

    /// Unlink a node from its parent and siblings
    fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id as usize];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        match prev {
            Some(prev) => self.nodes[prev as usize].next_sibling = next,
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent as usize].first_child = next;
                }
            }
        }
        match next {
            Some(next) => self.nodes[next as usize].prev_sibling = prev,
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent as usize].last_child = prev;
                }
            }
        }
        let node = &mut self.nodes[id as usize];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    fn contains(&self, id: NodeId) -> bool {
        (id as usize) < self.nodes.len()
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get_node(id).and_then(|n| n.parent);
        }
        false
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeSink for Document {
    type Handle = NodeId;

    fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeData::Element {
            name: name.to_string(),
            attributes: Vec::new(),
        })
    }

    fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) {
        if let Some(NodeData::Element { attributes, .. }) =
            self.get_node_mut(element).map(|node| &mut node.data)
        {
            attributes.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    fn create_comment(&mut self, data: &str) -> NodeId {
        self.push(NodeData::Comment(data.to_string()))
    }

    fn create_cdata(&mut self, data: &str) -> NodeId {
        self.push(NodeData::CData(data.to_string()))
    }

    fn create_doctype(&mut self, doctype: &Doctype<'_>) -> NodeId {
        self.push(NodeData::Doctype {
            name: doctype.name.map(str::to_string),
            public_id: doctype.public_id.map(str::to_string),
            system_id: doctype.system_id.map(str::to_string),
        })
    }

    fn create_processing_instruction(&mut self, target: &str, data: &str) -> NodeId {
        self.push(NodeData::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        })
    }

    /// Moves `child` if it is already attached; ignores unknown ids and cycles
    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) || child == parent {
            return;
        }
        // A detached childless node is nobody's ancestor
        let node = &self.nodes[child as usize];
        let detached_leaf = node.parent.is_none() && node.first_child.is_none();
        if !detached_leaf && self.is_ancestor_or_self(child, parent) {
            return;
        }
        self.detach(child);
        self.link_child(parent, child);
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get_node(node)?.parent
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.get_node(node)?.next_sibling
    }
}

/// Iterator over child nodes
pub struct ChildIter<'d> {
    doc: &'d Document,
    next: Option<NodeId>,
}

impl Iterator for ChildIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.next_sibling(current);
        Some(current)
    }
}

/// Iterator over descendant nodes (depth-first, document order)
pub struct DescendantIter<'d> {
    doc: &'d Document,
    stack: Vec<NodeId>,
}

impl DescendantIter<'_> {
    /// Push children in reverse order so the first child pops first
    fn push_children(&mut self, id: NodeId) {
        let mut child = self.doc.get_node(id).and_then(|n| n.last_child);
        while let Some(cid) = child {
            self.stack.push(cid);
            child = self.doc.get_node(cid).and_then(|n| n.prev_sibling);
        }
    }
}

impl Iterator for DescendantIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.push_children(current);
        Some(current)
    }
}
