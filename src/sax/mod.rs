//! SAX (Simple API for XML) Module
//!
//! Event-based parsing: the tokenizer's events are forwarded, in document
//! order, to a caller-supplied `SaxHandler`.
//!
//! ## Architecture
//!
//! ```text
//! &str ---> Tokenizer ---> Event ---> dispatch ---> SaxHandler callbacks
//!               ^
//!               |
//!        Arc<Grammar> (shared, read-only)
//! ```
//!
//! ## Memory Efficiency
//!
//! Events borrow names, values and text from the input, so no string is
//! allocated while scanning. `SaxCollector` gathers events into a `Vec`.

pub mod handler;
pub mod parser;

pub use handler::{dispatch, SaxCollector, SaxHandler};
pub use parser::SaxParser;
