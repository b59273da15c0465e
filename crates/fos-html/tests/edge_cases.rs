//! Edge case tests for fos-html
//!
//! Malformed markup and the structure the accessibility layer relies on.

use fos_dom::DomAccess;
use fos_html::{Document, HtmlParser};

fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html).expect("in-memory input cannot fail")
}

// ============================================================================
// EMPTY AND MINIMAL INPUT
// ============================================================================

#[test]
fn test_parse_empty() {
    let doc = parse("");
    assert!(doc.body().is_valid(), "html5ever always synthesizes a body");
}

#[test]
fn test_parse_only_whitespace() {
    let doc = parse("   \t\n\r\n   ");
    assert!(doc.tree().len() >= 1);
    assert!(doc.text_content(doc.body()).trim().is_empty());
}

// ============================================================================
// MALFORMED HTML
// ============================================================================

#[test]
fn test_parse_unclosed_tags() {
    let doc = parse("<div><p><span>text");
    assert_eq!(doc.text_content(doc.body()), "text");
}

#[test]
fn test_parse_mismatched_tags() {
    let doc = parse("<div><p></div></p>");
    assert!(doc.tree().len() > 1);
}

// ============================================================================
// STRUCTURE
// ============================================================================

#[test]
fn test_body_children_in_order() {
    let doc = parse("<nav>Nav Text</nav><section><h1>H</h1><p>T</p></section><footer>F</footer>");
    let tags: Vec<_> = doc
        .children(doc.body())
        .into_iter()
        .filter_map(|n| doc.tag_name(n).map(str::to_string))
        .collect();
    assert_eq!(tags, vec!["nav", "section", "footer"]);
}

#[test]
fn test_id_references_resolve_document_wide() {
    let doc = parse(r#"<span id="a">A</span><div><span id="b">B</span></div>"#);
    let refs = doc.resolve_id_refs("b nope a");
    assert_eq!(refs.len(), 2);
    assert_eq!(doc.text_content(refs[0]), "B");
    assert_eq!(doc.text_content(refs[1]), "A");
}

#[test]
fn test_head_content_not_rendered() {
    let doc = parse("<title>T</title><script>var x;</script><p>visible</p>");
    let script = doc
        .tree()
        .descendants(doc.document_element())
        .into_iter()
        .find(|&n| doc.tag_name(n) == Some("script"))
        .expect("script element");
    assert!(!DomAccess::is_rendered(&doc, script));
}
