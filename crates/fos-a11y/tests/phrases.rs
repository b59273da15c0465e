//! Tree building and phrase rendering tests
//!
//! Whole documents flattened into the phrase sequence a forward walk speaks.

use fos_a11y::{build, flatten, render_phrase, AriaRole, Boundary};
use fos_dom::{DomAccess, NodeId};
use fos_html::{Document, HtmlParser};

fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html).expect("in-memory input cannot fail")
}

fn phrases_of(doc: &Document, container: NodeId) -> Vec<String> {
    build(doc, container)
        .map(|root| flatten(&root).iter().map(render_phrase).collect())
        .unwrap_or_default()
}

fn body_phrases(html: &str) -> Vec<String> {
    let doc = parse(html);
    phrases_of(&doc, doc.body())
}

// ============================================================================
// LANDMARKS AND STRUCTURE
// ============================================================================

#[test]
fn test_landmark_walk() {
    let phrases = body_phrases(
        "<nav>Nav Text</nav><section><h1>H</h1><p>T</p></section><footer>F</footer>",
    );
    assert_eq!(phrases, vec![
        "document",
        "navigation",
        "Nav Text",
        "end of navigation",
        "region",
        "heading, H, level 1",
        "T",
        "end of region",
        "contentinfo",
        "F",
        "end of contentinfo",
        "end of document",
    ]);
}

#[test]
fn test_scoped_footer_is_not_contentinfo() {
    let phrases = body_phrases("<article><footer>Byline</footer></article>");
    assert_eq!(phrases, vec!["document", "article", "Byline", "end of article", "end of document"]);
}

#[test]
fn test_unnamed_form_role_falls_back() {
    let phrases = body_phrases(r#"<div role="form bogus">x</div><div role="region" aria-label="Cart">y</div>"#);
    assert_eq!(phrases, vec!["document", "x", "region, Cart", "y", "end of region, Cart", "end of document"]);
}

#[test]
fn test_abstract_role_skipped_for_next_token() {
    let phrases = body_phrases(r#"<div role="widget button">Go</div>"#);
    assert_eq!(phrases, vec!["document", "button, Go", "end of document"]);
}

#[test]
fn test_list_items_carry_positions() {
    let phrases = body_phrases("<ul aria-label=\"Fruit\"><li>Apple</li><li>Pear</li></ul>");
    assert_eq!(phrases, vec![
        "document",
        "list, Fruit",
        "listitem, position 1, set size 2",
        "Apple",
        "listitem, position 2, set size 2",
        "Pear",
        "end of list, Fruit",
        "end of document",
    ]);
}

// ============================================================================
// EXCLUSION
// ============================================================================

#[test]
fn test_hidden_and_presentational_content() {
    let phrases = body_phrases(r#"
        <div aria-hidden="true">gone</div>
        <table role="presentation"><tr><td>cell text</td></tr></table>
        <img src="x.png" alt="">
        <!-- comment -->
    "#);
    assert_eq!(phrases, vec!["document", "cell text", "end of document"]);
}

#[test]
fn test_excluded_container_builds_nothing() {
    let doc = parse(r#"<div id="c" style="display:none"><button>Hidden</button></div>"#);
    let container = doc.get_element_by_id("c").unwrap();
    assert!(build(&doc, container).is_none());
    assert!(phrases_of(&doc, container).is_empty());
}

#[test]
fn test_container_below_aria_hidden_ancestor_builds_nothing() {
    let doc = parse(concat!(
        r#"<div aria-hidden="true"><section id="c" aria-label="S">"#,
        r#"<button>Go</button>plain</section></div>"#,
    ));
    let container = doc.get_element_by_id("c").unwrap();
    assert!(build(&doc, container).is_none());

    let button = doc.children(container)[0];
    let text = doc.children(container)[1];
    assert!(build(&doc, button).is_none());
    assert!(build(&doc, text).is_none());
}

// ============================================================================
// STATES
// ============================================================================

#[test]
fn test_widget_states_in_phrase() {
    let phrases = body_phrases(r#"
        <button aria-pressed="true" aria-haspopup="menu" disabled>Bold</button>
        <input type="checkbox" aria-label="Agree" required>
        <a href="/" aria-current="page">Home</a>
        <input type="range" aria-label="Volume" value="7">
    "#);
    assert_eq!(phrases, vec![
        "document",
        "button, Bold, pressed, has popup menu, disabled",
        "checkbox, Agree, not checked, required",
        "link, Home, current page",
        "slider, Volume, value 7",
        "end of document",
    ]);
}

#[test]
fn test_range_value_text_beats_value_now() {
    let phrases = body_phrases(r#"
        <div role="progressbar" aria-label="Upload" aria-valuenow="40" aria-valuetext="40 Percent"></div>
        <div role="spinbutton" tabindex="0" aria-label="Quantity" aria-valuenow="2.5"></div>
        <div role="meter" aria-label="Fuel" aria-valuetext="" aria-valuenow="3"></div>
    "#);
    assert_eq!(phrases, vec![
        "document",
        "progressbar, Upload, value 40 Percent",
        "spinbutton, Quantity, value 2.5",
        "meter, Fuel, value 3",
        "end of document",
    ]);
}

#[test]
fn test_reference_states() {
    let phrases = body_phrases(r#"
        <div id="panel">Panel text</div>
        <button aria-controls="panel missing" aria-expanded="false">Toggle</button>
        <input aria-label="Code" aria-invalid="spelling" aria-errormessage="bad">
        <span id="bad">Not a word</span>
    "#);
    assert_eq!(phrases, vec![
        "document",
        "Panel text",
        "button, Toggle, collapsed, controls Panel text",
        "textbox, Code, invalid spelling, error message Not a word",
        "Not a word",
        "end of document",
    ]);
}

#[test]
fn test_boundaries_pair_up() {
    let doc = parse("<main><nav><ul><li>a</li></ul></nav></main>");
    let root = build(&doc, doc.body()).unwrap();
    let entries = flatten(&root);
    let enters = entries.iter().filter(|e| e.boundary == Boundary::Enter).count();
    let exits = entries.iter().filter(|e| e.boundary == Boundary::Exit).count();
    assert_eq!(enters, exits);
    assert_eq!(entries[0].role(), Some(AriaRole::Document));
    assert_eq!(entries[1].role(), Some(AriaRole::Main));
}
