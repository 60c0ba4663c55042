//! Markup tokenizer - state machine producing structural events
//!
//! Implements a pull tokenizer over a complete input text under a compiled
//! `Grammar`. It keeps an open-tag stack and the active grammar context:
//! - void and self-closed elements get a synthetic end tag and are never pushed
//! - raw-text elements switch to verbatim scanning until their own end tag
//! - foreign roots switch the active context, restored from the stack entry
//!   when the element closes
//! - implicit-end rules are applied in a loop before a start tag is opened
//!
//! Lenient mode recovers from everything. Strict mode stops at the first
//! violation and yields a single `ParseError` after the events that preceded it.

use super::error::{Construct, ParseError, ParseErrorKind};
use super::events::{Doctype, Event};
use super::grammar::{Grammar, GrammarId};
use super::hash::NameHash;
use super::scanner::{self, Scanner};
use super::takers::{CharRun, Literal, Taker, Until};
use log::{debug, trace};
use std::collections::VecDeque;
use std::iter::FusedIterator;

const TARGET: &str = "rustymarkup::tokenizer";

const COMMENT_OPEN: Literal<'static> = Literal::new(b"<!--");
const CDATA_OPEN: Literal<'static> = Literal::new(b"<![CDATA[");
const DOCTYPE_OPEN: Literal<'static> = Literal::ignore_case(b"<!DOCTYPE");

const COMMENT_CLOSE: Until<'static> = Until::literal(b"-->");
const CDATA_CLOSE: Until<'static> = Until::literal(b"]]>");
const PI_CLOSE: Until<'static> = Until::literal(b"?>");
const TAG_CLOSE: Until<'static> = Until::byte(b'>');

const TAG_NAME: CharRun = CharRun(scanner::is_tag_name_char);
const ATTRIBUTE_NAME: CharRun = CharRun(scanner::is_attribute_name_char);
const UNQUOTED_VALUE: CharRun = CharRun(scanner::is_unquoted_value_char);
const PI_TARGET: CharRun = CharRun(scanner::is_pi_target_char);
const DOCTYPE_WORD: CharRun = CharRun(scanner::is_doctype_word_char);

/// Byte range in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
}

impl Span {
    #[inline]
    fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    #[inline]
    fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// A fully scanned start tag; its attributes are in `Tokenizer::attrs`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TagScan {
    name: Span,
    hash: NameHash,
    end: usize,
    self_closing: bool,
}

#[derive(Debug, Clone, Copy)]
struct AttrSpan {
    name: Span,
    value: Span,
    hash: NameHash,
}

/// Open element on the stack
#[derive(Debug, Clone, Copy)]
struct OpenTag<'a> {
    name: &'a str,
    hash: NameHash,
    /// Context governing the element's content
    context: GrammarId,
    /// Context that was active when the element opened
    parent: GrammarId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Text, comments, doctype and PIs between tags
    OutsideTag,
    /// A start tag has been scanned and is about to be emitted
    InStartTag(TagScan),
    /// Verbatim content of the raw-text element on top of the stack
    InRawText,
    /// Content of a CDATA section opened at the given offset
    InCDataSection { opened_at: usize },
    Done,
}

/// Construct recognised at a `<`
#[derive(Debug, Clone, Copy)]
enum Markup {
    StartTag(TagScan),
    EndTag { name: Span, end: usize },
    Comment { body: usize },
    CData { body: usize },
    Doctype { body: usize },
    ProcessingInstruction,
    BogusComment,
}

/// Pull tokenizer over one input text
pub struct Tokenizer<'a, 'g> {
    input: &'a str,
    scanner: Scanner<'a>,
    grammar: &'g Grammar,
    state: ParseState,
    context: GrammarId,
    stack: Vec<OpenTag<'a>>,
    attrs: Vec<AttrSpan>,
    pending: VecDeque<Event<'a>>,
    error: Option<ParseError>,
    /// Offset of the last `>`; tags opened after it never close
    last_gt: Option<usize>,
}

impl<'a, 'g> Tokenizer<'a, 'g> {
    pub fn new(input: &'a str, grammar: &'g Grammar) -> Self {
        let scanner = Scanner::new(input.as_bytes());
        Tokenizer {
            input,
            last_gt: scanner.rfind_byte(b'>'),
            scanner,
            grammar,
            state: ParseState::OutsideTag,
            context: grammar.root(),
            stack: Vec::new(),
            attrs: Vec::new(),
            pending: VecDeque::new(),
            error: None,
        }
    }

    /// Current scan offset
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Active grammar context
    pub fn context(&self) -> GrammarId {
        self.context
    }

    /// Number of currently open elements
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    fn slice(&self, span: Span) -> &'a str {
        self.input.get(span.start..span.end).unwrap_or_default()
    }

    #[inline]
    fn char_at(&self, at: usize) -> char {
        self.input
            .get(at..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    #[inline]
    fn emit(&mut self, event: Event<'a>) {
        self.pending.push_back(event);
    }

    fn emit_text(&mut self, start: usize, end: usize, verbatim: bool) {
        if end > start {
            let text = self.slice(Span::new(start, end));
            self.emit(Event::Text { text, verbatim });
        }
    }

    /// Lenient only: a start or end tag at `lt` cannot reach a `>`
    #[inline]
    fn never_closes(&self, lt: usize) -> bool {
        !self.grammar.is_strict() && self.last_gt.is_none_or(|gt| gt < lt)
    }

    fn fail<T>(&self, kind: ParseErrorKind, offset: usize) -> Result<T, ParseError> {
        Err(ParseError::new(kind, offset))
    }

    /// Recovery for a construct with no terminator: strict fails, lenient runs to EOF
    fn unterminated(&self, construct: Construct, opened_at: usize) -> Result<(usize, usize), ParseError> {
        if self.grammar.is_strict() {
            return self.fail(ParseErrorKind::Unterminated(construct), opened_at);
        }
        debug!(target: TARGET, "unterminated {construct} at {opened_at} runs to end of input");
        let end = self.scanner.len();
        Ok((end, end))
    }

    fn step(&mut self) -> Result<(), ParseError> {
        match self.state {
            ParseState::OutsideTag => self.step_outside(),
            ParseState::InStartTag(tag) => {
                self.emit_start_tag(tag);
                Ok(())
            }
            ParseState::InRawText => self.step_raw_text(),
            ParseState::InCDataSection { opened_at } => self.step_cdata(opened_at),
            ParseState::Done => Ok(()),
        }
    }

    /// Scan a text run up to the next construct, then handle the construct
    fn step_outside(&mut self) -> Result<(), ParseError> {
        let start = self.scanner.position();
        let mut search = start;

        while let Some(lt) = self.scanner.find_byte_from(b'<', search) {
            let markup = match self.classify(lt) {
                Ok(Some(markup)) => markup,
                Ok(None) if self.grammar.is_strict() => {
                    self.emit_text(start, lt, false);
                    return self.fail(ParseErrorKind::MalformedMarkup, lt);
                }
                // Not markup: the `<` stays in the text run
                Ok(None) => {
                    search = lt + 1;
                    continue;
                }
                Err(err) => {
                    self.emit_text(start, lt, false);
                    return Err(err);
                }
            };
            self.emit_text(start, lt, false);
            return self.handle_markup(lt, markup);
        }

        let end = self.scanner.len();
        self.emit_text(start, end, false);
        self.scanner.set_position(end);
        self.finish()
    }

    fn classify(&mut self, lt: usize) -> Result<Option<Markup>, ParseError> {
        let grammar = self.grammar;
        let node = grammar.node(self.context);

        let markup = match self.scanner.byte_at(lt + 1) {
            Some(b'!') => {
                if let Some(body) = self.scanner.take_at(&COMMENT_OPEN, lt) {
                    Some(Markup::Comment { body })
                } else if let Some(body) = self
                    .scanner
                    .take_at(&CDATA_OPEN, lt)
                    .filter(|_| node.cdata_sections())
                {
                    Some(Markup::CData { body })
                } else {
                    self.scanner
                        .take_at(&DOCTYPE_OPEN, lt)
                        .map(|body| Markup::Doctype { body })
                }
            }
            Some(b'?') if node.processing_instructions() => Some(Markup::ProcessingInstruction),
            Some(b'?') => Some(Markup::BogusComment),
            Some(b'/') => self.scan_end_tag(lt)?,
            Some(b) if scanner::is_tag_name_start(b) => self.scan_start_tag(lt)?.map(Markup::StartTag),
            _ => None,
        };
        Ok(markup)
    }

    fn scan_end_tag(&self, lt: usize) -> Result<Option<Markup>, ParseError> {
        let name_start = lt + 2;
        match self.scanner.byte_at(name_start) {
            Some(b) if scanner::is_tag_name_start(b) => {}
            _ => return Ok(None),
        }
        if self.never_closes(lt) {
            return Ok(None);
        }
        let name_end = self.scanner.take_at(&TAG_NAME, name_start).unwrap_or(name_start);

        let Some((gt, _)) = TAG_CLOSE.find(self.scanner.bytes(), name_end) else {
            if self.grammar.is_strict() {
                return self.fail(ParseErrorKind::Unterminated(Construct::EndTag), lt);
            }
            return Ok(None);
        };

        if self.grammar.is_strict() {
            let after = self.scanner.skip_whitespace_at(name_end);
            if after != gt {
                return self.fail(ParseErrorKind::UnexpectedCharacter(self.char_at(after)), after);
            }
        }

        Ok(Some(Markup::EndTag {
            name: Span::new(name_start, name_end),
            end: gt + 1,
        }))
    }

    /// Scan a whole start tag ahead of emitting it
    ///
    /// `Ok(None)` means the tag never closes and the `<` is text.
    fn scan_start_tag(&mut self, lt: usize) -> Result<Option<TagScan>, ParseError> {
        if self.never_closes(lt) {
            return Ok(None);
        }
        let strict = self.grammar.is_strict();
        let name_start = lt + 1;
        let name_end = self.scanner.take_at(&TAG_NAME, name_start).unwrap_or(name_start);
        let name = Span::new(name_start, name_end);
        let hash = self
            .grammar
            .interner()
            .hash(self.scanner.bytes(), name.start, name.len());

        self.attrs.clear();
        let mut pos = name_end;
        loop {
            pos = self.scanner.skip_whitespace_at(pos);
            match self.scanner.byte_at(pos) {
                None => return self.unterminated_start_tag(lt),
                Some(b'>') => {
                    return Ok(Some(TagScan {
                        name,
                        hash,
                        end: pos + 1,
                        self_closing: false,
                    }))
                }
                Some(b'/') if self.scanner.byte_at(pos + 1) == Some(b'>') => {
                    return Ok(Some(TagScan {
                        name,
                        hash,
                        end: pos + 2,
                        self_closing: true,
                    }))
                }
                Some(b'/') if strict => {
                    return self.fail(ParseErrorKind::UnexpectedCharacter('/'), pos);
                }
                Some(b'/') => pos += 1,
                Some(_) => match self.scan_attribute(pos)? {
                    Some(next) => pos = next,
                    None => return self.unterminated_start_tag(lt),
                },
            }
        }
    }

    fn unterminated_start_tag(&self, lt: usize) -> Result<Option<TagScan>, ParseError> {
        if self.grammar.is_strict() {
            return self.fail(ParseErrorKind::Unterminated(Construct::StartTag), lt);
        }
        Ok(None)
    }

    /// Scan one attribute, returning the offset after it
    ///
    /// `Ok(None)` when a quoted value is never closed.
    fn scan_attribute(&mut self, pos: usize) -> Result<Option<usize>, ParseError> {
        let strict = self.grammar.is_strict();
        let interner = *self.grammar.interner();

        let mut name_end = self.scanner.take_at(&ATTRIBUTE_NAME, pos).unwrap_or(pos);
        if name_end == pos {
            // A stray `=` starts the name
            if strict {
                return self.fail(ParseErrorKind::UnexpectedCharacter('='), pos);
            }
            name_end = self.scanner.take_at(&ATTRIBUTE_NAME, pos + 1).unwrap_or(pos + 1);
        }
        let name = Span::new(pos, name_end);
        let name_text = self.slice(name);

        let after_name = self.scanner.skip_whitespace_at(name_end);
        let (value, next) = if self.scanner.byte_at(after_name) == Some(b'=') {
            let value_start = self.scanner.skip_whitespace_at(after_name + 1);
            match self.scanner.byte_at(value_start) {
                None => return Ok(None),
                Some(quote @ (b'"' | b'\'')) => {
                    let Some(close) = self.scanner.find_byte_from(quote, value_start + 1) else {
                        return Ok(None);
                    };
                    (Span::new(value_start + 1, close), close + 1)
                }
                Some(b'>') => {
                    if strict {
                        return self.fail(
                            ParseErrorKind::AttributeWithoutValue { name: name_text.to_string() },
                            pos,
                        );
                    }
                    (Span::new(value_start, value_start), value_start)
                }
                Some(_) => {
                    if strict {
                        return self.fail(
                            ParseErrorKind::UnquotedAttributeValue { name: name_text.to_string() },
                            value_start,
                        );
                    }
                    let end = self.scanner.take_at(&UNQUOTED_VALUE, value_start).unwrap_or(value_start);
                    (Span::new(value_start, end), end)
                }
            }
        } else {
            if strict {
                return self.fail(
                    ParseErrorKind::AttributeWithoutValue { name: name_text.to_string() },
                    pos,
                );
            }
            (Span::new(name_end, name_end), name_end)
        };

        let hash = interner.hash(self.scanner.bytes(), name.start, name.len());
        if strict
            && self
                .attrs
                .iter()
                .any(|attr| attr.hash == hash && interner.confirm(self.slice(attr.name), name_text))
        {
            return self.fail(
                ParseErrorKind::DuplicateAttribute { name: name_text.to_string() },
                pos,
            );
        }

        self.attrs.push(AttrSpan { name, value, hash });
        Ok(Some(next))
    }

    fn handle_markup(&mut self, lt: usize, markup: Markup) -> Result<(), ParseError> {
        match markup {
            Markup::StartTag(tag) => {
                self.state = ParseState::InStartTag(tag);
                Ok(())
            }
            Markup::EndTag { name, end } => self.end_tag(lt, name, end),
            Markup::Comment { body } => self.comment(lt, body),
            Markup::CData { body } => {
                self.scanner.set_position(body);
                self.state = ParseState::InCDataSection { opened_at: lt };
                Ok(())
            }
            Markup::Doctype { body } => self.doctype(lt, body),
            Markup::ProcessingInstruction => self.processing_instruction(lt),
            Markup::BogusComment => {
                self.bogus_comment(lt);
                Ok(())
            }
        }
    }

    fn emit_start_tag(&mut self, tag: TagScan) {
        let grammar = self.grammar;
        let name = self.slice(tag.name);
        let hash = tag.hash;

        self.close_implicitly(name, hash);
        let context = self.context;

        self.emit(Event::StartTagOpen { name, hash });
        let attrs = std::mem::take(&mut self.attrs);
        for attr in &attrs {
            let (name, value) = (self.slice(attr.name), self.slice(attr.value));
            self.emit(Event::Attribute { name, value });
        }
        self.attrs = attrs;

        let self_closing = tag.self_closing && grammar.node(context).self_closing_tags();
        self.emit(Event::StartTagClose { self_closing });
        self.scanner.set_position(tag.end);
        self.state = ParseState::OutsideTag;

        if self_closing || grammar.is_void(context, hash, name) {
            self.emit(Event::EndTag {
                name,
                hash,
                implicit: true,
            });
            return;
        }

        let content = match grammar.foreign_context(context, hash, name) {
            Some(foreign) => {
                trace!(target: TARGET, "<{name}> enters foreign context {foreign:?}");
                foreign
            }
            None => context,
        };
        self.stack.push(OpenTag {
            name,
            hash,
            context: content,
            parent: context,
        });
        self.context = content;

        if grammar.is_raw_text(context, hash, name) {
            self.state = ParseState::InRawText;
        }
    }

    /// Pop every open element that the new start tag implicitly ends
    fn close_implicitly(&mut self, name: &'a str, hash: NameHash) {
        while let Some(&top) = self.stack.last() {
            if !self
                .grammar
                .closes_implicitly(self.context, (top.hash, top.name), (hash, name))
            {
                break;
            }
            trace!(target: TARGET, "<{name}> implicitly closes <{}>", top.name);
            self.stack.pop();
            self.close(top, true);
        }
    }

    fn close(&mut self, open: OpenTag<'a>, implicit: bool) {
        self.emit(Event::EndTag {
            name: open.name,
            hash: open.hash,
            implicit,
        });
        if open.context != open.parent {
            trace!(target: TARGET, "</{}> restores context {:?}", open.name, open.parent);
        }
        self.context = open.parent;
    }

    fn end_tag(&mut self, lt: usize, span: Span, end: usize) -> Result<(), ParseError> {
        let grammar = self.grammar;
        let interner = grammar.interner();
        self.scanner.set_position(end);

        let name = self.slice(span);
        let hash = interner.hash(self.scanner.bytes(), span.start, span.len());
        let found = self
            .stack
            .iter()
            .rposition(|open| open.hash == hash && interner.confirm(open.name, name));

        match found {
            Some(index) => {
                if grammar.is_strict() && index + 1 != self.stack.len() {
                    let expected = self.stack.last().map_or("", |top| top.name);
                    return self.fail(
                        ParseErrorKind::MismatchedEndTag {
                            expected: expected.to_string(),
                            found: name.to_string(),
                        },
                        lt,
                    );
                }
                while self.stack.len() > index + 1 {
                    if let Some(open) = self.stack.pop() {
                        trace!(target: TARGET, "</{name}> implicitly closes <{}>", open.name);
                        self.close(open, true);
                    }
                }
                if let Some(open) = self.stack.pop() {
                    self.close(open, false);
                }
            }
            None if grammar.is_implicit_start(self.context, hash, name) => {
                debug!(target: TARGET, "</{name}> at {lt} without start tag, synthesising <{name}>");
                self.emit(Event::StartTagOpen { name, hash });
                self.emit(Event::StartTagClose { self_closing: false });
                self.emit(Event::EndTag {
                    name,
                    hash,
                    implicit: true,
                });
            }
            None if grammar.is_strict() => {
                return self.fail(
                    ParseErrorKind::UnmatchedEndTag { name: name.to_string() },
                    lt,
                );
            }
            None => debug!(target: TARGET, "ignoring unmatched end tag </{name}> at {lt}"),
        }
        Ok(())
    }

    fn step_raw_text(&mut self) -> Result<(), ParseError> {
        let Some(top) = self.stack.last().copied() else {
            self.state = ParseState::OutsideTag;
            return Ok(());
        };
        let interner = *self.grammar.interner();
        let start = self.scanner.position();
        let mut search = start;

        while let Some(lt) = self.scanner.find_from(b"</", search) {
            let name_start = lt + 2;
            let name_end = self.scanner.take_at(&TAG_NAME, name_start).unwrap_or(name_start);
            let name = Span::new(name_start, name_end);

            if name.len() > 0
                && interner.hash(self.scanner.bytes(), name.start, name.len()) == top.hash
                && interner.confirm(top.name, self.slice(name))
            {
                let end = match TAG_CLOSE.find(self.scanner.bytes(), name_end) {
                    Some((gt, _)) => gt + 1,
                    None => self.unterminated(Construct::EndTag, lt)?.1,
                };
                self.emit_text(start, lt, true);
                self.stack.pop();
                self.close(top, false);
                self.scanner.set_position(end);
                self.state = ParseState::OutsideTag;
                return Ok(());
            }
            search = name_start;
        }

        // No end tag: the rest of the input is raw text
        let end = self.scanner.len();
        self.emit_text(start, end, true);
        self.scanner.set_position(end);
        self.state = ParseState::OutsideTag;
        Ok(())
    }

    fn step_cdata(&mut self, opened_at: usize) -> Result<(), ParseError> {
        let body = self.scanner.position();
        let (end, next) = match CDATA_CLOSE.find(self.scanner.bytes(), body) {
            Some((at, len)) => (at, at + len),
            None => self.unterminated(Construct::CDataSection, opened_at)?,
        };
        let content = self.slice(Span::new(body, end));
        self.emit(Event::CData(content));
        self.scanner.set_position(next);
        self.state = ParseState::OutsideTag;
        Ok(())
    }

    fn comment(&mut self, lt: usize, body: usize) -> Result<(), ParseError> {
        let (end, next) = match COMMENT_CLOSE.find(self.scanner.bytes(), body) {
            Some((at, len)) => (at, at + len),
            None => self.unterminated(Construct::Comment, lt)?,
        };
        let content = self.slice(Span::new(body, end));
        self.emit(Event::Comment(content));
        self.scanner.set_position(next);
        Ok(())
    }

    /// `<?...>` without PI recognition: everything between `<` and `>`
    fn bogus_comment(&mut self, lt: usize) {
        let body = lt + 1;
        let (end, next) = match TAG_CLOSE.find(self.scanner.bytes(), body) {
            Some((gt, _)) => (gt, gt + 1),
            None => (self.scanner.len(), self.scanner.len()),
        };
        debug!(target: TARGET, "bogus comment at {lt}");
        let content = self.slice(Span::new(body, end));
        self.emit(Event::Comment(content));
        self.scanner.set_position(next);
    }

    fn processing_instruction(&mut self, lt: usize) -> Result<(), ParseError> {
        let target_start = lt + 2;
        let target_end = self.scanner.take_at(&PI_TARGET, target_start).unwrap_or(target_start);
        if target_end == target_start && self.grammar.is_strict() {
            return self.fail(ParseErrorKind::MalformedMarkup, lt);
        }

        let (data_end, next) = match PI_CLOSE.find(self.scanner.bytes(), target_end) {
            Some((at, len)) => (at, at + len),
            None => self.unterminated(Construct::ProcessingInstruction, lt)?,
        };
        let data_start = self.scanner.skip_whitespace_at(target_end).min(data_end);

        let target = self.slice(Span::new(target_start, target_end));
        let data = self.slice(Span::new(data_start, data_end)).trim_end();
        self.emit(Event::ProcessingInstruction { target, data });
        self.scanner.set_position(next);
        Ok(())
    }

    fn doctype(&mut self, lt: usize, body: usize) -> Result<(), ParseError> {
        let (end, next) = match TAG_CLOSE.find(self.scanner.bytes(), body) {
            Some((gt, _)) => (gt, gt + 1),
            None => self.unterminated(Construct::Doctype, lt)?,
        };
        let doctype = parse_doctype(self.slice(Span::new(body, end)));
        self.emit(Event::Doctype(doctype));
        self.scanner.set_position(next);
        Ok(())
    }

    /// End of input: close whatever is still open
    fn finish(&mut self) -> Result<(), ParseError> {
        self.state = ParseState::Done;
        if let Some(top) = self.stack.last() {
            if self.grammar.is_strict() {
                return self.fail(
                    ParseErrorKind::UnclosedTag { name: top.name.to_string() },
                    self.scanner.len(),
                );
            }
            debug!(target: TARGET, "closing {} element(s) open at end of input", self.stack.len());
        }
        while let Some(open) = self.stack.pop() {
            self.close(open, true);
        }
        Ok(())
    }
}

impl<'a> Iterator for Tokenizer<'a, '_> {
    type Item = Result<Event<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            if let Some(err) = self.error.take() {
                return Some(Err(err));
            }
            if self.state == ParseState::Done {
                return None;
            }
            if let Err(err) = self.step() {
                self.state = ParseState::Done;
                self.stack.clear();
                self.error = Some(err);
            }
        }
    }
}

impl FusedIterator for Tokenizer<'_, '_> {}

/// Split the body of `<!DOCTYPE ...>` into name and identifiers
fn parse_doctype(content: &str) -> Doctype<'_> {
    let bytes = content.as_bytes();
    let scanner = Scanner::new(bytes);
    let word = |at: usize| {
        let start = scanner.skip_whitespace_at(at);
        let end = scanner.take_at(&DOCTYPE_WORD, start).unwrap_or(start);
        (start, end)
    };

    let (name_start, name_end) = word(0);
    let mut doctype = Doctype {
        name: content.get(name_start..name_end).filter(|name| !name.is_empty()),
        ..Doctype::default()
    };

    let (keyword_start, keyword_end) = word(name_end);
    let keyword = bytes.get(keyword_start..keyword_end).unwrap_or_default();
    if keyword.eq_ignore_ascii_case(b"PUBLIC") {
        if let Some((public_id, next)) = quoted_at(content, keyword_end) {
            doctype.public_id = Some(public_id);
            doctype.system_id = quoted_at(content, next).map(|(id, _)| id);
        }
    } else if keyword.eq_ignore_ascii_case(b"SYSTEM") {
        doctype.system_id = quoted_at(content, keyword_end).map(|(id, _)| id);
    }
    doctype
}

/// Quoted literal after optional whitespace, with the offset past its closing quote
fn quoted_at(content: &str, at: usize) -> Option<(&str, usize)> {
    let bytes = content.as_bytes();
    let start = Scanner::new(bytes).skip_whitespace_at(at);
    let quote = *bytes.get(start)?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let end = Until::byte(quote).closed().take(bytes, start + 1)?;
    Some((content.get(start + 1..end)?, end + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{GrammarOptions, ParserOptions};

    fn tokenize<'a>(options: &ParserOptions, input: &'a str) -> Vec<Event<'a>> {
        let grammar = Grammar::new(options).unwrap();
        Tokenizer::new(input, &grammar)
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    fn strict_error(options: &ParserOptions, input: &str) -> ParseError {
        let grammar = Grammar::new(options).unwrap();
        Tokenizer::new(input, &grammar)
            .find_map(Result::err)
            .unwrap()
    }

    /// Compact rendering: `(/x)` is an implicit end tag, `[...]` verbatim text
    fn sketch(events: &[Event]) -> String {
        events
            .iter()
            .map(|event| match *event {
                Event::StartTagOpen { name, .. } => format!("<{name}"),
                Event::Attribute { name, value } => format!(" {name}={value}"),
                Event::StartTagClose { self_closing: true } => "/>".to_string(),
                Event::StartTagClose { self_closing: false } => ">".to_string(),
                Event::EndTag { name, implicit: false, .. } => format!("</{name}>"),
                Event::EndTag { name, implicit: true, .. } => format!("(/{name})"),
                Event::Text { text, verbatim: false } => text.to_string(),
                Event::Text { text, verbatim: true } => format!("[{text}]"),
                Event::Comment(data) => format!("<!--{data}-->"),
                Event::CData(data) => format!("<![CDATA[{data}]]>"),
                Event::Doctype(_) => "<!DOCTYPE>".to_string(),
                Event::ProcessingInstruction { target, data } => format!("<?{target} {data}?>"),
            })
            .collect()
    }

    fn lenient(grammar: GrammarOptions) -> ParserOptions {
        ParserOptions::new(grammar)
    }

    #[test]
    fn test_simple_element() {
        let events = tokenize(&ParserOptions::default(), "<aaa>bbb</aaa>");
        assert_eq!(events.len(), 4);
        assert!(events[0].is_start_tag());
        assert_eq!(events[0].tag_name(), Some("aaa"));
        assert_eq!(events[2], Event::Text { text: "bbb", verbatim: false });
        assert!(events[3].is_end_tag());
    }

    #[test]
    fn test_attributes_in_order() {
        let events = tokenize(&ParserOptions::default(), r#"<a x="1" y='2' z=3 w>t</a>"#);
        assert_eq!(sketch(&events), "<a x=1 y=2 z=3 w=>t</a>");
    }

    #[test]
    fn test_quoted_value_may_contain_gt() {
        let events = tokenize(&ParserOptions::default(), r#"<a title="x > y">t</a>"#);
        assert_eq!(sketch(&events), "<a title=x > y>t</a>");
    }

    #[test]
    fn test_self_closing_flag() {
        let enabled = lenient(GrammarOptions::new().with_self_closing_tags(true));
        assert_eq!(
            sketch(&tokenize(&enabled, "<aaa><bbb/></aaa>")),
            "<aaa><bbb/>(/bbb)</aaa>"
        );

        let disabled = ParserOptions::default();
        assert_eq!(
            sketch(&tokenize(&disabled, "<aaa><bbb/></aaa>")),
            "<aaa><bbb>(/bbb)</aaa>"
        );
    }

    #[test]
    fn test_void_never_takes_end_tag() {
        let options = lenient(GrammarOptions::new().with_void_tags(["br"]));
        assert_eq!(sketch(&tokenize(&options, "<br></br>x")), "<br>(/br)x");

        let options = lenient(
            GrammarOptions::new()
                .with_void_tags(["br"])
                .with_implicit_start_tags(["br"]),
        );
        assert_eq!(sketch(&tokenize(&options, "<br></br>x")), "<br>(/br)<br>(/br)x");
    }

    #[test]
    fn test_implicit_end_is_iterative() {
        let options = lenient(
            GrammarOptions::new()
                .with_implicit_end("p", ["p", "div"])
                .with_implicit_end("li", ["div"]),
        );
        assert_eq!(sketch(&tokenize(&options, "<p>a<p>b")), "<p>a(/p)<p>b(/p)");
        assert_eq!(
            sketch(&tokenize(&options, "<p><li>x<div>y</div>")),
            "<p><li>x(/li)(/p)<div>y</div>"
        );
    }

    #[test]
    fn test_mismatched_end_closes_intermediate() {
        let events = tokenize(&ParserOptions::default(), "<a><b>x</a>y");
        assert_eq!(sketch(&events), "<a><b>x(/b)</a>y");
    }

    #[test]
    fn test_unmatched_end_ignored() {
        let events = tokenize(&ParserOptions::default(), "a</b>c");
        assert_eq!(events.len(), 2);
        assert_eq!(sketch(&events), "ac");
    }

    #[test]
    fn test_implicit_start() {
        let events = tokenize(&ParserOptions::html(), "</p>x");
        assert_eq!(sketch(&events), "<p>(/p)x");
    }

    #[test]
    fn test_raw_text() {
        let options = lenient(GrammarOptions::new().with_raw_text_tags(["script"]));
        assert_eq!(
            sketch(&tokenize(&options, "<script>if (a<b) {}</p></script>x")),
            "<script>[if (a<b) {}</p>]</script>x"
        );
        assert_eq!(
            sketch(&tokenize(&options, "<script></scriptx></script >")),
            "<script>[</scriptx>]</script>"
        );
        assert_eq!(sketch(&tokenize(&options, "<script>abc")), "<script>[abc](/script)");
    }

    #[test]
    fn test_raw_text_case_rule() {
        let grammar = GrammarOptions::new().with_raw_text_tags(["script"]);

        let insensitive = lenient(grammar.clone()).with_case_insensitive_tags(true);
        assert_eq!(
            sketch(&tokenize(&insensitive, "<SCRIPT>x</script>")),
            "<SCRIPT>[x]</SCRIPT>"
        );

        let sensitive = lenient(grammar);
        assert_eq!(
            sketch(&tokenize(&sensitive, "<script>x</SCRIPT>")),
            "<script>[x</SCRIPT>](/script)"
        );
    }

    #[test]
    fn test_tag_case_rule() {
        let insensitive = ParserOptions::default().with_case_insensitive_tags(true);
        assert_eq!(sketch(&tokenize(&insensitive, "<DIV>x</div>")), "<DIV>x</DIV>");

        let sensitive = ParserOptions::default();
        assert_eq!(sketch(&tokenize(&sensitive, "<DIV>x</div>")), "<DIV>x(/DIV)");
    }

    #[test]
    fn test_foreign_context_switch() {
        let options = lenient(
            GrammarOptions::new().with_foreign(
                "svg",
                GrammarOptions::new()
                    .with_void_tags(["path"])
                    .with_self_closing_tags(true),
            ),
        );
        assert_eq!(
            sketch(&tokenize(&options, "<svg><path></svg><path>x</path>")),
            "<svg><path>(/path)</svg><path>x</path>"
        );
        assert_eq!(
            sketch(&tokenize(&options, "<svg><g/></svg><g/>")),
            "<svg><g/>(/g)</svg><g>(/g)"
        );
    }

    #[test]
    fn test_context_restored_by_implicit_close() {
        let options = lenient(
            GrammarOptions::new()
                .with_void_tags(["img"])
                .with_foreign("svg", GrammarOptions::new()),
        );
        let grammar = Grammar::new(&options).unwrap();
        let mut tokenizer = Tokenizer::new("<div><svg><g></div><img>", &grammar);
        let events: Vec<_> = tokenizer.by_ref().map(Result::unwrap).collect();

        assert_eq!(sketch(&events), "<div><svg><g>(/g)(/svg)</div><img>(/img)");
        assert_eq!(tokenizer.context(), grammar.root());
        assert_eq!(tokenizer.depth(), 0);
    }

    #[test]
    fn test_bogus_comment_keeps_order() {
        let events = tokenize(&ParserOptions::default(), "<!DOCTYPE html>a<?xxx yyy?>b");
        assert_eq!(sketch(&events), "<!DOCTYPE>a<!--?xxx yyy?-->b");
    }

    #[test]
    fn test_processing_instruction() {
        let options = lenient(GrammarOptions::new().with_processing_instructions(true));
        let events = tokenize(&options, r#"<?xml version="1.0" ?><?go?>"#);
        assert_eq!(
            events,
            vec![
                Event::ProcessingInstruction { target: "xml", data: r#"version="1.0""# },
                Event::ProcessingInstruction { target: "go", data: "" },
            ]
        );
    }

    #[test]
    fn test_cdata_only_when_enabled() {
        let enabled = lenient(GrammarOptions::new().with_cdata_sections(true));
        assert_eq!(tokenize(&enabled, "<![CDATA[a<b]]>"), vec![Event::CData("a<b")]);
        assert_eq!(tokenize(&enabled, "<![CDATA[open"), vec![Event::CData("open")]);

        let disabled = ParserOptions::default();
        assert_eq!(
            tokenize(&disabled, "<![CDATA[x]]>"),
            vec![Event::Text { text: "<![CDATA[x]]>", verbatim: false }]
        );
    }

    #[test]
    fn test_comments() {
        let options = ParserOptions::default();
        assert_eq!(tokenize(&options, "<!--xxx-->"), vec![Event::Comment("xxx")]);
        assert_eq!(tokenize(&options, "<!--a--b-->"), vec![Event::Comment("a--b")]);
        assert_eq!(tokenize(&options, "<!--open"), vec![Event::Comment("open")]);
    }

    #[test]
    fn test_malformed_lt_merges_into_text() {
        let options = ParserOptions::default();
        assert_eq!(
            tokenize(&options, "a < b <3 c</> d"),
            vec![Event::Text { text: "a < b <3 c</> d", verbatim: false }]
        );
        assert_eq!(
            tokenize(&options, "x<y z"),
            vec![Event::Text { text: "x<y z", verbatim: false }]
        );
        assert_eq!(
            tokenize(&options, "<a title=\"open>x"),
            vec![Event::Text { text: "<a title=\"open>x", verbatim: false }]
        );
    }

    #[test]
    fn test_unclosed_tags_stay_linear() {
        let options = ParserOptions::html();
        for unit in ["<a ", "</a ", "<a x='1' "] {
            let input = unit.repeat(100_000);
            assert_eq!(
                tokenize(&options, &input),
                vec![Event::Text { text: input.as_str(), verbatim: false }],
                "{unit}"
            );
        }

        let input = format!("<b>{}", "<a ".repeat(50_000));
        let events = tokenize(&options, &input);
        assert_eq!(events.len(), 4);
        assert_eq!(events[2], Event::Text { text: &input[3..], verbatim: false });
    }

    #[test]
    fn test_doctype_ids() {
        let events = tokenize(
            &ParserOptions::default(),
            r#"<!doctype html PUBLIC "-//W3C//DTD XHTML 1.0//EN" 'http://x.test/dtd'>"#,
        );
        assert_eq!(
            events,
            vec![Event::Doctype(Doctype {
                name: Some("html"),
                public_id: Some("-//W3C//DTD XHTML 1.0//EN"),
                system_id: Some("http://x.test/dtd"),
            })]
        );

        let events = tokenize(&ParserOptions::default(), "<!DOCTYPE note SYSTEM \"note.dtd\">");
        assert_eq!(
            events,
            vec![Event::Doctype(Doctype {
                name: Some("note"),
                public_id: None,
                system_id: Some("note.dtd"),
            })]
        );
    }

    #[test]
    fn test_non_ascii_names_and_text() {
        let events = tokenize(&ParserOptions::default(), "<ü a=\"é\">ß</ü>");
        assert_eq!(sketch(&events), "<ü a=é>ß</ü>");
    }

    #[test]
    fn test_strict_accepts_well_formed() {
        let events = tokenize(
            &ParserOptions::xml(),
            r#"<?xml version="1.0"?><r a="1"><c/><![CDATA[x]]></r>"#,
        );
        assert_eq!(
            sketch(&events),
            r#"<?xml version="1.0"?><r a=1><c/>(/c)<![CDATA[x]]></r>"#
        );
    }

    #[test]
    fn test_strict_errors() {
        let xml = ParserOptions::xml();
        let cases: &[(&str, ParseErrorKind, usize)] = &[
            ("<a></b>", ParseErrorKind::UnmatchedEndTag { name: "b".into() }, 3),
            (
                "<a><b></a>",
                ParseErrorKind::MismatchedEndTag { expected: "b".into(), found: "a".into() },
                6,
            ),
            ("<a>", ParseErrorKind::UnclosedTag { name: "a".into() }, 3),
            ("<a x=1/>", ParseErrorKind::UnquotedAttributeValue { name: "x".into() }, 5),
            ("<a x y=\"1\">", ParseErrorKind::AttributeWithoutValue { name: "x".into() }, 3),
            ("<a x=\"1\" x=\"2\"/>", ParseErrorKind::DuplicateAttribute { name: "x".into() }, 9),
            ("<!--x", ParseErrorKind::Unterminated(Construct::Comment), 0),
            ("<a", ParseErrorKind::Unterminated(Construct::StartTag), 0),
            ("<a / >", ParseErrorKind::UnexpectedCharacter('/'), 3),
            ("</a x>", ParseErrorKind::UnexpectedCharacter('x'), 4),
            ("<!x>", ParseErrorKind::MalformedMarkup, 0),
        ];
        for (input, kind, offset) in cases {
            let err = strict_error(&xml, input);
            assert_eq!(&err.kind, kind, "{input}");
            assert_eq!(err.offset, *offset, "{input}");
        }
    }

    #[test]
    fn test_strict_error_after_preceding_events() {
        let grammar = Grammar::new(&ParserOptions::xml()).unwrap();
        let mut tokenizer = Tokenizer::new("<r>a < b</r>", &grammar);

        assert!(tokenizer.next().unwrap().unwrap().is_start_tag());
        assert_eq!(
            tokenizer.next().unwrap().unwrap(),
            Event::StartTagClose { self_closing: false }
        );
        assert_eq!(
            tokenizer.next().unwrap().unwrap(),
            Event::Text { text: "a ", verbatim: false }
        );
        let err = tokenizer.next().unwrap().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MalformedMarkup);
        assert_eq!(err.offset, 5);
        assert!(tokenizer.next().is_none());
    }

    #[test]
    fn test_verified_names() {
        let grammar = GrammarOptions::new().with_void_tags(["Aa"]);

        let unverified = lenient(grammar.clone());
        assert_eq!(sketch(&tokenize(&unverified, "<BB>x</BB>")), "<BB>(/BB)x");

        let verified = lenient(grammar).with_verify_names(true);
        assert_eq!(sketch(&tokenize(&verified, "<BB>x</BB>")), "<BB>x</BB>");
    }
}
