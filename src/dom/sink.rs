//! Tree model interface used by the DOM builder
//!
//! The builder only creates nodes, appends them, and walks up through
//! `parent`; any tree representation implementing `TreeSink` can be built.

use crate::core::events::Doctype;

pub trait TreeSink {
    /// Node reference
    type Handle: Copy + Eq;

    /// New detached element with no attributes
    fn create_element(&mut self, name: &str) -> Self::Handle;

    /// Add an attribute to an element, keeping insertion order
    fn set_attribute(&mut self, element: Self::Handle, name: &str, value: &str);

    fn create_text(&mut self, text: &str) -> Self::Handle;

    fn create_comment(&mut self, data: &str) -> Self::Handle;

    fn create_cdata(&mut self, data: &str) -> Self::Handle;

    fn create_doctype(&mut self, doctype: &Doctype<'_>) -> Self::Handle;

    fn create_processing_instruction(&mut self, target: &str, data: &str) -> Self::Handle;

    /// Append `child` as the last child of `parent`
    fn append_child(&mut self, parent: Self::Handle, child: Self::Handle);

    fn parent(&self, node: Self::Handle) -> Option<Self::Handle>;

    fn next_sibling(&self, node: Self::Handle) -> Option<Self::Handle>;
}
