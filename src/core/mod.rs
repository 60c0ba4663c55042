//! Core markup parsing primitives
//!
//! This module contains the building blocks shared by the SAX and DOM layers:
//! - Takers: composable scanning primitives
//! - Scanner: byte cursor with memchr-accelerated searches
//! - Hash: name interning by polynomial hashing
//! - Options / Presets: configuration surface and HTML/XML defaults
//! - Grammar: compiled, immutable grammar context tree
//! - Tokenizer: state machine producing `Event`s
//! - Entities: default decode/encode text transforms (Cow, zero-copy when possible)

pub mod entities;
pub mod error;
pub mod events;
pub mod grammar;
pub mod hash;
pub mod options;
pub mod presets;
pub mod scanner;
pub mod takers;
pub mod tokenizer;
