//! Grammar configuration tree
//!
//! Options are compiled once into an arena of `GrammarNode`s addressed by
//! `GrammarId`. Node 0 is the top-level document grammar; each foreign
//! content entry becomes a child node whose `root` is the hash of the tag
//! that activates it and whose `parent` points back at the enclosing node.
//! Relations are indices, so the tree has no ownership cycles and the whole
//! `Grammar` is immutable plain data, safe to share between threads.
//!
//! A name listed as void is removed from the raw-text set and the foreign
//! map of the same node.

use super::error::ConfigError;
use super::hash::{Interner, NameHash};
use super::options::{GrammarOptions, ParserOptions};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Index of a node in a `Grammar`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GrammarId(u32);

impl GrammarId {
    /// The top-level grammar
    pub const ROOT: GrammarId = GrammarId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One parsing context
#[derive(Debug, Clone, Default)]
pub struct GrammarNode {
    root: Option<NameHash>,
    parent: Option<GrammarId>,
    void_tags: HashSet<NameHash>,
    raw_text_tags: HashSet<NameHash>,
    implicit_start_tags: HashSet<NameHash>,
    implicit_end_tags: HashMap<NameHash, HashSet<NameHash>>,
    foreign_tags: HashMap<NameHash, GrammarId>,
    self_closing_tags: bool,
    cdata_sections: bool,
    processing_instructions: bool,
}

impl GrammarNode {
    /// Hash of the tag that switches into this context; `None` at top level
    pub fn root(&self) -> Option<NameHash> {
        self.root
    }

    /// Enclosing context; `None` at top level
    pub fn parent(&self) -> Option<GrammarId> {
        self.parent
    }

    pub fn self_closing_tags(&self) -> bool {
        self.self_closing_tags
    }

    pub fn cdata_sections(&self) -> bool {
        self.cdata_sections
    }

    pub fn processing_instructions(&self) -> bool {
        self.processing_instructions
    }
}

/// Compiled grammar shared by every parse of one parser instance
#[derive(Debug, Clone)]
pub struct Grammar {
    nodes: Vec<GrammarNode>,
    interner: Interner,
    /// Configured names by hash, kept only when names are verified
    names: HashMap<NameHash, Box<str>>,
    strict: bool,
}

impl Grammar {
    /// Compile parser options
    pub fn new(options: &ParserOptions) -> Result<Self, ConfigError> {
        let mut grammar = Grammar {
            nodes: Vec::new(),
            interner: Interner::new(options.name_case(), options.verify_names),
            names: HashMap::new(),
            strict: options.strict,
        };
        grammar.build_node(&options.grammar, None, None)?;

        debug!(
            target: "rustymarkup::grammar",
            "built grammar: {} context(s), case {:?}, strict {}, verified {}",
            grammar.nodes.len(),
            grammar.interner.case(),
            grammar.strict,
            grammar.interner.verifies()
        );
        Ok(grammar)
    }

    fn build_node(
        &mut self,
        options: &GrammarOptions,
        root: Option<NameHash>,
        parent: Option<GrammarId>,
    ) -> Result<GrammarId, ConfigError> {
        let id = GrammarId(self.nodes.len() as u32);
        self.nodes.push(GrammarNode::default());

        let mut node = GrammarNode {
            root,
            parent,
            void_tags: self.intern_all(&options.void_tags)?,
            raw_text_tags: self.intern_all(&options.raw_text_tags)?,
            implicit_start_tags: self.intern_all(&options.implicit_start_tags)?,
            implicit_end_tags: HashMap::new(),
            foreign_tags: HashMap::new(),
            self_closing_tags: options.self_closing_tags,
            cdata_sections: options.cdata_sections,
            processing_instructions: options.processing_instructions,
        };

        for (open, closers) in &options.implicit_end_tags {
            let open = self.intern(open)?;
            let closers = self.intern_all(closers)?;
            node.implicit_end_tags.entry(open).or_default().extend(closers);
        }

        for (name, nested) in &options.foreign_tags {
            let hash = self.intern(name)?;
            if node.void_tags.contains(&hash) {
                debug!(
                    target: "rustymarkup::grammar",
                    "<{name}> is void, ignoring its foreign content rules"
                );
                continue;
            }
            let child = self.build_node(nested, Some(hash), Some(id))?;
            node.foreign_tags.insert(hash, child);
        }

        let void_tags = &node.void_tags;
        node.raw_text_tags.retain(|hash| !void_tags.contains(hash));

        self.nodes[id.index()] = node;
        Ok(id)
    }

    fn intern_all(&mut self, names: &[String]) -> Result<HashSet<NameHash>, ConfigError> {
        names.iter().map(|name| self.intern(name)).collect()
    }

    fn intern(&mut self, name: &str) -> Result<NameHash, ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        let hash = self.interner.hash_name(name);
        if self.interner.verifies() {
            match self.names.get(&hash) {
                Some(known) if !self.interner.same_name(known, name) => {
                    return Err(ConfigError::NameCollision {
                        first: known.to_string(),
                        second: name.to_string(),
                        hash: hash.0,
                    });
                }
                Some(_) => {}
                None => {
                    self.names.insert(hash, name.into());
                }
            }
        }
        Ok(hash)
    }

    /// The top-level context
    pub fn root(&self) -> GrammarId {
        GrammarId::ROOT
    }

    pub fn node(&self, id: GrammarId) -> &GrammarNode {
        &self.nodes[id.index()]
    }

    /// Number of contexts, including the top level
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Confirm a hash hit against the configured name, when verifying
    #[inline]
    fn confirmed(&self, hash: NameHash, name: &str) -> bool {
        if !self.interner.verifies() {
            return true;
        }
        self.names
            .get(&hash)
            .is_some_and(|known| self.interner.same_name(known, name))
    }

    pub fn is_void(&self, id: GrammarId, hash: NameHash, name: &str) -> bool {
        self.node(id).void_tags.contains(&hash) && self.confirmed(hash, name)
    }

    pub fn is_raw_text(&self, id: GrammarId, hash: NameHash, name: &str) -> bool {
        self.node(id).raw_text_tags.contains(&hash) && self.confirmed(hash, name)
    }

    pub fn is_implicit_start(&self, id: GrammarId, hash: NameHash, name: &str) -> bool {
        self.node(id).implicit_start_tags.contains(&hash) && self.confirmed(hash, name)
    }

    /// Whether starting `new` implicitly closes an open `open` element
    pub fn closes_implicitly(
        &self,
        id: GrammarId,
        open: (NameHash, &str),
        new: (NameHash, &str),
    ) -> bool {
        self.node(id)
            .implicit_end_tags
            .get(&open.0)
            .is_some_and(|closers| closers.contains(&new.0))
            && self.confirmed(open.0, open.1)
            && self.confirmed(new.0, new.1)
    }

    /// Context entered when `name` opens inside `id`
    pub fn foreign_context(&self, id: GrammarId, hash: NameHash, name: &str) -> Option<GrammarId> {
        let child = *self.node(id).foreign_tags.get(&hash)?;
        self.confirmed(hash, name).then_some(child)
    }
}
