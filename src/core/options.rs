//! Parser configuration surface
//!
//! `GrammarOptions` describes one grammar context and nests for foreign
//! content; `ParserOptions` adds the settings chosen once per parser
//! instance. Both deserialize with every field optional, so a grammar can be
//! kept in a JSON or TOML file.

use super::hash::NameCase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rules for one grammar context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarOptions {
    /// Tags that never have children or an end tag
    pub void_tags: Vec<String>,
    /// Tags whose content is taken verbatim up to the matching end tag
    pub raw_text_tags: Vec<String>,
    /// Tags synthesised when their end tag shows up without a start tag
    pub implicit_start_tags: Vec<String>,
    /// Open tag name -> start tags that implicitly close it
    pub implicit_end_tags: BTreeMap<String, Vec<String>>,
    /// Tag name -> grammar applied to its descendants
    pub foreign_tags: BTreeMap<String, GrammarOptions>,
    /// Whether `<x/>` closes the element immediately
    pub self_closing_tags: bool,
    /// Whether `<![CDATA[...]]>` is recognised
    pub cdata_sections: bool,
    /// Whether `<?target data?>` is recognised; otherwise it becomes a comment
    pub processing_instructions: bool,
}

impl GrammarOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_void_tags<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.void_tags.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_raw_text_tags<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.raw_text_tags.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_implicit_start_tags<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.implicit_start_tags
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// `open` is implicitly closed by any start tag in `closers`
    pub fn with_implicit_end<I, S>(mut self, open: impl Into<String>, closers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.implicit_end_tags
            .entry(open.into())
            .or_default()
            .extend(closers.into_iter().map(Into::into));
        self
    }

    pub fn with_foreign(mut self, name: impl Into<String>, grammar: GrammarOptions) -> Self {
        self.foreign_tags.insert(name.into(), grammar);
        self
    }

    pub fn with_self_closing_tags(mut self, enabled: bool) -> Self {
        self.self_closing_tags = enabled;
        self
    }

    pub fn with_cdata_sections(mut self, enabled: bool) -> Self {
        self.cdata_sections = enabled;
        self
    }

    pub fn with_processing_instructions(mut self, enabled: bool) -> Self {
        self.processing_instructions = enabled;
        self
    }
}

/// Options fixed for the lifetime of a parser instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Top-level grammar context
    #[serde(flatten)]
    pub grammar: GrammarOptions,
    /// Match tag names ignoring ASCII case
    pub case_insensitive_tags: bool,
    /// Reject malformed input instead of recovering
    pub strict: bool,
    /// Confirm hash hits by comparing name text
    pub verify_names: bool,
}

impl ParserOptions {
    pub fn new(grammar: GrammarOptions) -> Self {
        ParserOptions {
            grammar,
            ..Self::default()
        }
    }

    pub fn with_case_insensitive_tags(mut self, enabled: bool) -> Self {
        self.case_insensitive_tags = enabled;
        self
    }

    pub fn with_strict(mut self, enabled: bool) -> Self {
        self.strict = enabled;
        self
    }

    pub fn with_verify_names(mut self, enabled: bool) -> Self {
        self.verify_names = enabled;
        self
    }

    pub fn name_case(&self) -> NameCase {
        if self.case_insensitive_tags {
            NameCase::Insensitive
        } else {
            NameCase::Sensitive
        }
    }
}
