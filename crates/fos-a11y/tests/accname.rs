//! Accessible name and description tests
//!
//! Parsed markup checked against the accname computation.

use fos_a11y::{compute_description, compute_name, describe, NameSource};
use fos_a11y::name::DescriptionSource;
use fos_dom::NodeId;
use fos_html::{Document, HtmlParser};

fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html).expect("in-memory input cannot fail")
}

fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.get_element_by_id(id).unwrap_or_else(|| panic!("no element #{id}"))
}

fn name(html: &str, id: &str) -> String {
    let doc = parse(html);
    compute_name(&doc, by_id(&doc, id)).text
}

// ============================================================================
// LABELLEDBY
// ============================================================================

#[test]
fn test_labelledby_joins_references_in_order() {
    let html = r#"
        <span id="a">Billing</span><span id="b">Address</span>
        <input id="field" aria-labelledby="b missing a">
    "#;
    assert_eq!(name(html, "field"), "Address Billing");
}

#[test]
fn test_labelledby_reaches_hidden_targets() {
    let html = r#"<span id="l" hidden>Secret label</span><button id="b" aria-labelledby="l">X</button>"#;
    assert_eq!(name(html, "b"), "Secret label");
}

#[test]
fn test_labelledby_not_followed_twice() {
    let html = r#"
        <span id="outer" aria-labelledby="inner">Outer</span>
        <span id="inner">Inner</span>
        <button id="b" aria-labelledby="outer">Go</button>
    "#;
    assert_eq!(name(html, "b"), "Outer");
}

#[test]
fn test_mutual_labelledby_cycle_terminates() {
    let html = r#"
        <div id="x" role="button" aria-labelledby="y">X text</div>
        <div id="y" role="button" aria-labelledby="x">Y text</div>
    "#;
    assert_eq!(name(html, "x"), "Y text");
}

// ============================================================================
// NATIVE LABELLING
// ============================================================================

#[test]
fn test_label_for_and_wrapping_label() {
    let html = r#"
        <label for="email">Email</label><input id="email" type="email">
        <label>Remember me <input id="remember" type="checkbox"></label>
    "#;
    assert_eq!(name(html, "email"), "Email");
    assert_eq!(name(html, "remember"), "Remember me");
}

#[test]
fn test_button_like_inputs() {
    let html = r#"
        <input id="s" type="submit">
        <input id="r" type="reset" value="Clear">
        <input id="i" type="image" alt="Search">
    "#;
    assert_eq!(name(html, "s"), "Submit");
    assert_eq!(name(html, "r"), "Clear");
    assert_eq!(name(html, "i"), "Search");
}

#[test]
fn test_caption_legend_figcaption() {
    let html = r#"
        <table id="t"><caption>Prices</caption><tr><td>1</td></tr></table>
        <fieldset id="f"><legend>Shipping</legend></fieldset>
        <figure id="g"><img alt="chart"><figcaption>Sales by month</figcaption></figure>
    "#;
    assert_eq!(name(html, "t"), "Prices");
    assert_eq!(name(html, "f"), "Shipping");
    assert_eq!(name(html, "g"), "Sales by month");
}

#[test]
fn test_embedded_select_value() {
    let html = r#"
        <label><input id="c" type="checkbox"> Deliver in
            <select><option>1</option><option selected>3</option></select>
            days
        </label>
    "#;
    assert_eq!(name(html, "c"), "Deliver in 3 days");
}

// ============================================================================
// CONTENT
// ============================================================================

#[test]
fn test_content_skips_hidden_and_presentation_subtrees() {
    let html = r#"
        <a id="l" href="/">Read <span aria-hidden="true">(icon)</span>more<span style="display: none"> hidden</span></a>
    "#;
    assert_eq!(name(html, "l"), "Read more");
}

#[test]
fn test_blocks_are_space_separated() {
    let html = r#"<a id="l" href="/"><div>Title</div><div>Subtitle</div></a>"#;
    assert_eq!(name(html, "l"), "Title Subtitle");
}

#[test]
fn test_region_does_not_take_name_from_content() {
    let html = r#"<section id="s"><p>Body</p></section>"#;
    assert_eq!(name(html, "s"), "");
}

// ============================================================================
// FALLBACKS AND DESCRIPTIONS
// ============================================================================

#[test]
fn test_title_then_placeholder() {
    let html = r#"
        <input id="t" title="Search the site">
        <input id="p" placeholder="Search">
    "#;
    let doc = parse(html);
    let titled = compute_name(&doc, by_id(&doc, "t"));
    assert_eq!(titled.text, "Search the site");
    assert_eq!(titled.source, NameSource::Title);
    assert_eq!(compute_name(&doc, by_id(&doc, "p")).source, NameSource::Placeholder);
}

#[test]
fn test_description_chain() {
    let html = r#"
        <span id="hint">Eight characters minimum</span>
        <div id="more">Full password policy</div>
        <input id="a" aria-label="Password" aria-describedby="hint" title="Tooltip">
        <input id="b" aria-label="Password" aria-description="Inline">
        <input id="c" aria-label="Password" aria-details="more">
        <input id="d" aria-label="Password" title="Tooltip">
        <input id="e" title="Only title">
    "#;
    let doc = parse(html);
    let desc = |id: &str| {
        let node = by_id(&doc, id);
        let name = compute_name(&doc, node);
        describe(&doc, node, &name)
    };
    assert_eq!(desc("a").text, "Eight characters minimum");
    assert_eq!(desc("b").text, "Inline");
    assert_eq!(desc("c").source, DescriptionSource::Details);
    assert_eq!(desc("c").text, "Full password policy");
    assert_eq!(desc("d").text, "Tooltip");
    assert_eq!(desc("e").text, "");
}

#[test]
fn test_invalid_description_reference_is_silent() {
    let doc = parse(r#"<button id="b" aria-describedby="nope">Go</button>"#);
    let node = by_id(&doc, "b");
    let name = compute_name(&doc, node);
    assert_eq!(compute_description(&doc, node, &name), "");
}
