//! Ready-made option sets for HTML and XML

use super::options::{GrammarOptions, ParserOptions};

const HTML_VOID: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

const HTML_RAW_TEXT: &[&str] = &[
    "script", "style", "textarea", "title", "xmp", "iframe", "noembed", "noframes",
];

/// Start tags that close an open `<p>`
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hgroup", "hr", "main", "menu", "nav", "ol", "p", "pre", "section", "table", "ul",
];

impl GrammarOptions {
    /// SVG foreign content: XML-like tags inside an HTML document
    pub fn svg() -> Self {
        GrammarOptions::new()
            .with_self_closing_tags(true)
            .with_cdata_sections(true)
    }

    /// MathML foreign content
    pub fn mathml() -> Self {
        GrammarOptions::new()
            .with_self_closing_tags(true)
            .with_cdata_sections(true)
    }
}

impl ParserOptions {
    /// Lenient, case-insensitive HTML
    pub fn html() -> Self {
        let grammar = GrammarOptions::new()
            .with_void_tags(HTML_VOID.iter().copied())
            .with_raw_text_tags(HTML_RAW_TEXT.iter().copied())
            .with_implicit_start_tags(["p", "br"])
            .with_implicit_end("p", CLOSES_P.iter().copied())
            .with_implicit_end("li", ["li"])
            .with_implicit_end("dt", ["dt", "dd"])
            .with_implicit_end("dd", ["dt", "dd"])
            .with_implicit_end("option", ["option", "optgroup"])
            .with_implicit_end("optgroup", ["optgroup"])
            .with_implicit_end("tr", ["tr"])
            .with_implicit_end("td", ["td", "th", "tr"])
            .with_implicit_end("th", ["td", "th", "tr"])
            .with_implicit_end("thead", ["tbody", "tfoot"])
            .with_implicit_end("tbody", ["tbody", "tfoot"])
            .with_foreign("svg", GrammarOptions::svg())
            .with_foreign("math", GrammarOptions::mathml());

        ParserOptions::new(grammar).with_case_insensitive_tags(true)
    }

    /// Strict, case-sensitive XML
    pub fn xml() -> Self {
        let grammar = GrammarOptions::new()
            .with_self_closing_tags(true)
            .with_cdata_sections(true)
            .with_processing_instructions(true);

        ParserOptions::new(grammar).with_strict(true)
    }
}
