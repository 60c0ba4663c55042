//! Parsing Strategy Module
//!
//! Parsers hold only an immutable compiled grammar, so one instance can serve
//! any number of threads. The parallel strategy parses batches of inputs with
//! Rayon on top of that.

pub mod parallel;

pub use parallel::{collect_events, map_documents, parse_documents, parse_fragments};
