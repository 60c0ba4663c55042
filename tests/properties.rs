//! End-to-end behavior of the SAX and DOM front ends over the public API

use rustymarkup::dom::NodeData;
use rustymarkup::{
    Document, DomParser, Event, GrammarOptions, NodeId, NodeKind, ParseErrorKind, ParserOptions,
    SaxParser, Serializer,
};

/// Compact rendering of a subtree: `name(child,child)`, text as `"..."`
fn sketch(doc: &Document, id: NodeId) -> String {
    let children: Vec<String> = doc.children(id).map(|child| sketch(doc, child)).collect();
    let node = doc.get_node(id).unwrap();
    let label = match &node.data {
        NodeData::Document | NodeData::Fragment => return children.join(","),
        NodeData::Element { name, .. } => name.clone(),
        NodeData::Text(text) => format!("{text:?}"),
        NodeData::CData(data) => format!("[[{data}]]"),
        NodeData::Comment(data) => format!("<!--{data}-->"),
        NodeData::Doctype { name, .. } => format!("!{}", name.as_deref().unwrap_or_default()),
        NodeData::ProcessingInstruction { target, .. } => format!("?{target}"),
    };
    if children.is_empty() {
        label
    } else {
        format!("{label}({})", children.join(","))
    }
}

fn parse(options: &ParserOptions, input: &str) -> String {
    let doc = DomParser::new(options).unwrap().parse_document(input).unwrap();
    sketch(&doc, doc.root())
}

#[test]
fn test_round_trip_reproduces_nesting() {
    let parser = DomParser::new(&ParserOptions::default())
        .unwrap()
        .with_entity_decoding();
    let serializer = Serializer::new(parser.grammar()).with_entity_encoding();

    let inputs = [
        "<aaa>bbb</aaa>",
        r#"<a href="x &amp; y"><b>1 &lt; 2</b><c></c>tail</a>"#,
        "<root><!-- note --><x><y><z>deep</z></y></x><x>again</x></root>",
        "<!DOCTYPE root><root>a<i>b</i>c</root>",
        "before<p>one</p>between<p>two</p>after",
    ];
    for input in inputs {
        let doc = parser.parse_document(input).unwrap();
        let written = serializer.serialize(&doc, doc.root());
        assert_eq!(written, input);

        let reparsed = parser.parse_document(&written).unwrap();
        assert_eq!(sketch(&reparsed, reparsed.root()), sketch(&doc, doc.root()));
    }
}

#[test]
fn test_round_trip_normalizes_recovered_input() {
    let parser = DomParser::new(&ParserOptions::default()).unwrap();
    let serializer = Serializer::new(parser.grammar());

    for input in ["<a><b>x</a>y", "<a x=1 y>t", "<a>1 < 2</a>", "<ul><li>a</ul></ul>"] {
        let doc = parser.parse_document(input).unwrap();
        let reparsed = parser
            .parse_document(&serializer.serialize(&doc, doc.root()))
            .unwrap();
        assert_eq!(sketch(&reparsed, reparsed.root()), sketch(&doc, doc.root()), "{input}");
    }
}

#[test]
fn test_tag_case_rules() {
    let input = "<A><b></a>c</A>";
    let sensitive = ParserOptions::default();
    let insensitive = ParserOptions::default().with_case_insensitive_tags(true);

    assert_eq!(parse(&sensitive, input), r#"A(b("c"))"#);
    assert_eq!(parse(&insensitive, input), r#"A(b),"c""#);

    assert_eq!(parse(&insensitive, "<DiV>x</dIv>y"), r#"DiV("x"),"y""#);
    assert_eq!(parse(&sensitive, "<DiV>x</dIv>y"), r#"DiV("x","y")"#);
}

#[test]
fn test_single_element_with_text() {
    let doc = DomParser::new(&ParserOptions::default())
        .unwrap()
        .parse_document("<aaa>bbb</aaa>")
        .unwrap();
    let children: Vec<_> = doc.children(doc.root()).collect();

    assert_eq!(children.len(), 1);
    assert_eq!(doc.node_name(children[0]), Some("aaa"));
    let text: Vec<_> = doc.children(children[0]).collect();
    assert_eq!(text.len(), 1);
    assert_eq!(doc.kind(text[0]), Some(NodeKind::Text));
    assert_eq!(doc.text_content(text[0]), Some("bbb"));
}

#[test]
fn test_attributes_in_source_order() {
    let doc = DomParser::new(&ParserOptions::default())
        .unwrap()
        .parse_document(r#"<aaa xxx="yyy" zzz="vvv">bbb</aaa>"#)
        .unwrap();
    let aaa = doc.root_element().unwrap();
    let attributes: Vec<_> = doc
        .attributes(aaa)
        .iter()
        .map(|attr| (attr.name.as_str(), attr.value.as_str()))
        .collect();

    assert_eq!(attributes, vec![("xxx", "yyy"), ("zzz", "vvv")]);
}

#[test]
fn test_self_closing_recognition() {
    let enabled = ParserOptions::new(GrammarOptions::new().with_self_closing_tags(true));
    let disabled = ParserOptions::default();

    assert_eq!(parse(&enabled, "<aaa><bbb/></aaa>"), "aaa(bbb)");
    assert_eq!(parse(&enabled, "<aaa><bbb/>x</aaa>"), r#"aaa(bbb,"x")"#);
    assert_eq!(parse(&disabled, "<aaa><bbb/>x</aaa>"), r#"aaa(bbb("x"))"#);
}

#[test]
fn test_comment() {
    assert_eq!(parse(&ParserOptions::default(), "<!--xxx-->"), "<!--xxx-->");
}

#[test]
fn test_bogus_comment_keeps_order() {
    let input = "<!DOCTYPE html>text<?xxx yyy?>more";
    assert_eq!(
        parse(&ParserOptions::default(), input),
        r#"!html,"text",<!--?xxx yyy?-->,"more""#
    );

    let with_pi = ParserOptions::new(GrammarOptions::new().with_processing_instructions(true));
    assert_eq!(parse(&with_pi, input), r#"!html,"text",?xxx,"more""#);
}

#[test]
fn test_implicit_end_makes_siblings() {
    let options = ParserOptions::new(GrammarOptions::new().with_implicit_end("p", ["p"]));
    assert_eq!(parse(&options, "<p>a<p>b"), r#"p("a"),p("b")"#);
    assert_eq!(parse(&ParserOptions::default(), "<p>a<p>b"), r#"p("a",p("b"))"#);
}

#[test]
fn test_void_tag_ignores_literal_end_tag() {
    let options = ParserOptions::new(GrammarOptions::new().with_void_tags(["br"]));
    assert_eq!(parse(&options, "<a><br></br>x</a>"), r#"a(br,"x")"#);

    let events = SaxParser::new(&options).unwrap().collect("<br></br>").unwrap();
    let ends: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::EndTag { name, implicit, .. } => Some((*name, *implicit)),
            _ => None,
        })
        .collect();
    assert_eq!(ends, vec![("br", true)]);
}

#[test]
fn test_foreign_context_switch_and_restore() {
    let options = ParserOptions::new(
        GrammarOptions::new()
            .with_void_tags(["br"])
            .with_foreign("svg", GrammarOptions::new().with_self_closing_tags(true)),
    );
    let input = "<div><svg><br>in</br><g/></svg><br>after<g/>x</div>";

    assert_eq!(
        parse(&options, input),
        r#"div(svg(br("in"),g),br,"after",g("x"))"#
    );
}

#[test]
fn test_html_preset() {
    let input = "<!DOCTYPE html><TABLE><tr><td>1<td>2<tr><td>3</table>\
                 <script>if (a < b) {}</script><P>x</br>";
    assert_eq!(
        parse(&ParserOptions::html(), input),
        r#"!html,TABLE(tr(td("1"),td("2")),tr(td("3"))),script("if (a < b) {}"),P("x",br)"#
    );
}

#[test]
fn test_strict_mode_reports_first_violation() {
    let parser = SaxParser::new(&ParserOptions::xml()).unwrap();

    let err = parser.collect("<a><b></a>").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::MismatchedEndTag {
            expected: "b".into(),
            found: "a".into(),
        }
    );
    assert_eq!(err.offset, 6);

    let err = parser.collect("<a>").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::UnclosedTag { .. }));
    assert_eq!(err.offset, 3);

    let dom = DomParser::new(&ParserOptions::xml()).unwrap();
    assert!(dom.parse_document("<?xml version=\"1.0\"?><a><![CDATA[x]]><b/></a>").is_ok());
}

#[test]
fn test_every_input_completes_in_lenient_mode() {
    let parser = DomParser::new(&ParserOptions::html()).unwrap();
    let inputs = [
        "", "<", "</", "<!", "<!-", "<!--", "<?", "<a", "<a b='", "</x>", "<![CDATA[",
        "<script>", "<svg><![CDATA[x", "&", "<a><<b>>", "<!DOCTYPE",
    ];
    for input in inputs {
        assert!(parser.parse_document(input).is_ok(), "{input:?}");
        assert!(parser.parse_fragment(input).is_ok(), "{input:?}");
    }
}

#[test]
fn test_options_from_json() {
    let options: ParserOptions = serde_json::from_str(
        r#"{
            "void_tags": ["br"],
            "implicit_end_tags": { "li": ["li"] },
            "foreign_tags": { "svg": { "self_closing_tags": true } }
        }"#,
    )
    .unwrap();

    assert_eq!(
        parse(&options, "<ul><li>a<br>b<li><svg><c/></svg></ul>"),
        r#"ul(li("a",br,"b"),li(svg(c)))"#
    );
}
