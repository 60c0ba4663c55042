//! DOM Module - Arena-based markup tree
//!
//! Builds trees from the tokenizer's event stream:
//! - `TreeSink` for any tree model, `Document` as the built-in arena
//! - NodeId (u32) indices for cache-friendly traversal
//! - Document and fragment entry modes with a text decode hook
//! - `Serializer` for writing a tree back as markup

pub mod builder;
pub mod document;
pub mod node;
pub mod serialize;
pub mod sink;

pub use builder::DomParser;
pub use document::{ChildIter, DescendantIter, Document, ROOT};
pub use node::{Attribute, Node, NodeData, NodeId, NodeKind};
pub use serialize::Serializer;
pub use sink::TreeSink;
