//! Accessible Name and Description Computation
//!
//! Recursive text-alternative computation following the WAI-ARIA accname
//! steps: `aria-labelledby`, `aria-label`, native labelling, embedded control
//! values, name from content, then `title` and `placeholder`.

use std::collections::HashSet;

use fos_dom::{DomAccess, NodeId};

use crate::aria::AriaAttributes;
use crate::role::{resolve_role, AriaRole};

/// Where a computed name came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameSource {
    #[default]
    None,
    LabelledBy,
    AriaLabel,
    Native,
    EmbeddedValue,
    Content,
    Title,
    Placeholder,
}

/// Accessible name together with its source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComputedName {
    pub text: String,
    pub source: NameSource,
}

impl ComputedName {
    fn new(text: String, source: NameSource) -> Self {
        Self { text, source }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn from_content(&self) -> bool {
        self.source == NameSource::Content
    }
}

/// Where a computed description came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptionSource {
    #[default]
    None,
    DescribedBy,
    AriaDescription,
    Details,
    Title,
}

/// Accessible description together with its source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComputedDescription {
    pub text: String,
    pub source: DescriptionSource,
}

/// Traversal state of one name computation.
///
/// Nodes on the current path are tracked so reference cycles terminate.
#[derive(Debug, Clone, Default)]
pub struct NameContext {
    in_progress: HashSet<NodeId>,
    in_labelledby: bool,
    in_content: bool,
    include_hidden: bool,
}

impl NameContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `node` is already being computed on this path
    pub fn is_computing(&self, node: NodeId) -> bool {
        self.in_progress.contains(&node)
    }

    fn referenced(&self, hidden_target: bool) -> Self {
        Self {
            in_progress: self.in_progress.clone(),
            in_labelledby: true,
            in_content: false,
            include_hidden: self.include_hidden || hidden_target,
        }
    }

    fn recursing(&self) -> Self {
        Self {
            in_progress: self.in_progress.clone(),
            in_labelledby: self.in_labelledby,
            in_content: true,
            include_hidden: self.include_hidden,
        }
    }
}

/// Compute the accessible name of a node
pub fn compute_name<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> ComputedName {
    compute_name_with(doc, node, &mut NameContext::new())
}

/// Compute the accessible name inside an existing traversal
pub fn compute_name_with<D: DomAccess + ?Sized>(
    doc: &D,
    node: NodeId,
    ctx: &mut NameContext,
) -> ComputedName {
    if !ctx.in_progress.insert(node) {
        tracing::trace!(?node, "name cycle, contributing nothing");
        return ComputedName::default();
    }
    let mut name = name_of(doc, node, ctx);
    ctx.in_progress.remove(&node);
    name.text = collapse_whitespace(&name.text);
    if name.text.is_empty() {
        name.source = NameSource::None;
    }
    name
}

/// Name of a node pointed at by an id reference; content always counts
/// and a hidden target is still consulted
pub fn compute_referenced_name<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> ComputedName {
    let mut ctx = NameContext::new().referenced(is_hidden(doc, node));
    compute_name_with(doc, node, &mut ctx)
}

/// Compute the accessible description of a node given its computed name
pub fn compute_description<D: DomAccess + ?Sized>(
    doc: &D,
    node: NodeId,
    name: &ComputedName,
) -> String {
    describe(doc, node, name).text
}

/// Description with the attribute it was taken from
pub fn describe<D: DomAccess + ?Sized>(
    doc: &D,
    node: NodeId,
    name: &ComputedName,
) -> ComputedDescription {
    let candidates = [
        (DescriptionSource::DescribedBy, reference_text(doc, node, "aria-describedby")),
        (
            DescriptionSource::AriaDescription,
            doc.attribute(node, "aria-description").map(collapse_whitespace),
        ),
        (DescriptionSource::Details, reference_text(doc, node, "aria-details")),
        (
            DescriptionSource::Title,
            doc.attribute(node, "title")
                .filter(|_| name.source != NameSource::Title)
                .map(collapse_whitespace),
        ),
    ];

    for (source, text) in candidates {
        let Some(text) = text.filter(|t| !t.is_empty()) else { continue };
        if text == name.text {
            tracing::trace!(?node, "description repeats name, dropped");
            return ComputedDescription::default();
        }
        return ComputedDescription { text, source };
    }
    ComputedDescription::default()
}

/// Names of the nodes an id-list attribute points at, space joined
fn reference_text<D: DomAccess + ?Sized>(doc: &D, node: NodeId, attr: &str) -> Option<String> {
    let refs = doc.resolve_id_refs(doc.attribute(node, attr)?);
    if refs.is_empty() {
        return None;
    }
    let mut ctx = NameContext::new();
    ctx.in_progress.insert(node);
    Some(join_references(doc, &refs, &mut ctx))
}

fn join_references<D: DomAccess + ?Sized>(doc: &D, refs: &[NodeId], ctx: &mut NameContext) -> String {
    let parts: Vec<String> = refs
        .iter()
        .map(|&target| {
            let mut inner = ctx.referenced(is_hidden(doc, target));
            compute_name_with(doc, target, &mut inner).text
        })
        .filter(|text| !text.is_empty())
        .collect();
    parts.join(" ")
}

fn name_of<D: DomAccess + ?Sized>(doc: &D, node: NodeId, ctx: &mut NameContext) -> ComputedName {
    if let Some(text) = doc.text(node) {
        return ComputedName::new(text.to_string(), NameSource::Content);
    }
    if !doc.is_element(node) {
        return ComputedName::default();
    }

    // aria-labelledby, not followed again inside a labelledby traversal
    if !ctx.in_labelledby {
        if let Some(value) = doc.attribute(node, "aria-labelledby") {
            let refs = doc.resolve_id_refs(value);
            if !refs.is_empty() {
                let text = join_references(doc, &refs, ctx);
                if !text.trim().is_empty() {
                    return ComputedName::new(text, NameSource::LabelledBy);
                }
            }
        }
    }

    let role = resolve_role(doc, node);

    if let Some(label) = doc.attribute(node, "aria-label").filter(|l| !l.trim().is_empty()) {
        return ComputedName::new(label.to_string(), NameSource::AriaLabel);
    }

    if let Some(text) = native_name(doc, node, ctx).filter(|t| !t.trim().is_empty()) {
        return ComputedName::new(text, NameSource::Native);
    }

    if ctx.in_content {
        if let Some(value) = role.and_then(|r| control_value(doc, node, r)) {
            return ComputedName::new(value, NameSource::EmbeddedValue);
        }
    }

    let from_content = ctx.in_content
        || ctx.in_labelledby
        || role.is_some_and(|r| r.supports_name_from_content());
    if from_content {
        let text = content_text(doc, node, ctx);
        if !text.trim().is_empty() {
            return ComputedName::new(text, NameSource::Content);
        }
    }

    if let Some(title) = doc.attribute(node, "title").filter(|t| !t.trim().is_empty()) {
        return ComputedName::new(title.to_string(), NameSource::Title);
    }

    doc.attribute(node, "placeholder")
        .or_else(|| doc.attribute(node, "aria-placeholder"))
        .filter(|p| !p.trim().is_empty())
        .map(|p| ComputedName::new(p.to_string(), NameSource::Placeholder))
        .unwrap_or_default()
}

/// Host-language labelling
fn native_name<D: DomAccess + ?Sized>(doc: &D, node: NodeId, ctx: &mut NameContext) -> Option<String> {
    let tag = doc.tag_name(node)?;
    match tag {
        "input" => {
            let kind = doc
                .attribute(node, "type")
                .map(|t| t.trim().to_ascii_lowercase())
                .unwrap_or_default();
            match kind.as_str() {
                "button" | "submit" | "reset" => {
                    let default = match kind.as_str() {
                        "submit" => "Submit",
                        "reset" => "Reset",
                        _ => "",
                    };
                    return Some(doc.attribute(node, "value").unwrap_or(default).to_string());
                }
                "image" => {
                    return doc
                        .attribute(node, "alt")
                        .or_else(|| doc.attribute(node, "value"))
                        .map(str::to_string)
                        .or_else(|| Some("Submit".to_string()));
                }
                _ => label_text(doc, node, ctx),
            }
        }
        "select" | "textarea" | "meter" | "progress" | "output" | "button" => label_text(doc, node, ctx),
        "img" | "area" => doc.attribute(node, "alt").map(str::to_string),
        "table" => child_text(doc, node, "caption", ctx),
        "fieldset" => child_text(doc, node, "legend", ctx),
        "figure" => child_text(doc, node, "figcaption", ctx),
        "details" => child_text(doc, node, "summary", ctx),
        "optgroup" => doc.attribute(node, "label").map(str::to_string),
        _ => None,
    }
}

fn label_text<D: DomAccess + ?Sized>(doc: &D, node: NodeId, ctx: &mut NameContext) -> Option<String> {
    let labels = doc.labels_for(node);
    if labels.is_empty() {
        return None;
    }
    let mut inner = ctx.recursing();
    let parts: Vec<String> = labels
        .into_iter()
        .map(|label| compute_name_with(doc, label, &mut inner).text)
        .filter(|t| !t.is_empty())
        .collect();
    Some(parts.join(" "))
}

fn child_text<D: DomAccess + ?Sized>(
    doc: &D,
    node: NodeId,
    tag: &str,
    ctx: &mut NameContext,
) -> Option<String> {
    let child = doc
        .children(node)
        .into_iter()
        .find(|&c| doc.tag_name(c) == Some(tag))?;
    let mut inner = ctx.recursing();
    Some(compute_name_with(doc, child, &mut inner).text)
}

/// Elements whose text flows into the surrounding line
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "dfn", "em", "i", "img",
    "input", "kbd", "label", "mark", "q", "s", "samp", "select", "small", "span",
    "strong", "sub", "sup", "textarea", "time", "u", "var", "button", "del", "ins",
];

fn content_text<D: DomAccess + ?Sized>(doc: &D, node: NodeId, ctx: &mut NameContext) -> String {
    let mut out = String::new();
    let mut inner = ctx.recursing();
    for child in doc.children(node) {
        if !inner.include_hidden && is_hidden(doc, child) {
            continue;
        }
        let Some(tag) = doc.tag_name(child) else {
            // Text keeps its own edge whitespace as separator
            out.push_str(doc.text(child).unwrap_or_default());
            continue;
        };
        if resolve_role(doc, child).is_some_and(|r| r.is_presentational()) {
            continue;
        }
        let text = compute_name_with(doc, child, &mut inner).text;
        if INLINE_TAGS.contains(&tag) {
            out.push_str(&text);
        } else {
            out.push(' ');
            out.push_str(&text);
            out.push(' ');
        }
    }
    out
}

/// Current value of a control, as spoken when embedded or as a state
pub fn control_value<D: DomAccess + ?Sized>(doc: &D, node: NodeId, role: AriaRole) -> Option<String> {
    let tag = doc.tag_name(node)?;
    let value = match role {
        AriaRole::TextBox | AriaRole::SearchBox => match tag {
            "input" => doc.attribute(node, "value").unwrap_or_default().to_string(),
            "textarea" => doc
                .attribute(node, "value")
                .map(str::to_string)
                .unwrap_or_else(|| plain_text(doc, node)),
            _ => plain_text(doc, node),
        },
        AriaRole::Combobox => match tag {
            "select" => selected_options(doc, node).into_iter().next().map(|o| plain_text(doc, o))?,
            "input" => doc.attribute(node, "value").unwrap_or_default().to_string(),
            _ => plain_text(doc, node),
        },
        AriaRole::Listbox => {
            let parts: Vec<String> = selected_options(doc, node)
                .into_iter()
                .map(|o| plain_text(doc, o))
                .collect();
            parts.join(" ")
        }
        AriaRole::Slider | AriaRole::SpinButton | AriaRole::ProgressBar
        | AriaRole::Meter | AriaRole::ScrollBar => {
            let aria = AriaAttributes::from_element(doc, node);
            match (aria.value_text(), aria.value_now()) {
                (Some(text), _) => text.to_string(),
                (None, Some(now)) => now.to_string(),
                (None, None) => doc.attribute(node, "value")?.to_string(),
            }
        }
        _ => return None,
    };
    Some(collapse_whitespace(&value))
}

fn selected_options<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> Vec<NodeId> {
    let mut options = Vec::new();
    collect_options(doc, node, &mut options);
    let selected: Vec<NodeId> = options
        .iter()
        .copied()
        .filter(|&o| {
            doc.has_attribute(o, "selected") || doc.attribute(o, "aria-selected") == Some("true")
        })
        .collect();
    if selected.is_empty() && doc.tag_name(node) == Some("select") {
        return options.into_iter().take(1).collect();
    }
    selected
}

fn collect_options<D: DomAccess + ?Sized>(doc: &D, node: NodeId, out: &mut Vec<NodeId>) {
    for child in doc.children(node) {
        let is_option = doc.tag_name(child) == Some("option")
            || doc.attribute(child, "role") == Some("option");
        if is_option {
            out.push(child);
        } else if doc.is_element(child) {
            collect_options(doc, child, out);
        }
    }
}

/// Rendered text below a node, whitespace collapsed
pub fn plain_text<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> String {
    fn walk<D: DomAccess + ?Sized>(doc: &D, node: NodeId, out: &mut String) {
        for child in doc.children(node) {
            if let Some(text) = doc.text(child) {
                out.push_str(text);
            } else if doc.is_element(child) && !is_hidden(doc, child) {
                walk(doc, child, out);
            }
        }
    }
    let mut out = String::new();
    if let Some(text) = doc.text(node) {
        out.push_str(text);
    } else {
        walk(doc, node, &mut out);
    }
    collapse_whitespace(&out)
}

/// Not rendered, or inside an `aria-hidden="true"` subtree (inclusive)
pub fn is_hidden<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> bool {
    if !doc.is_rendered(node) {
        return true;
    }
    let mut current = Some(node);
    while let Some(n) = current {
        if doc
            .attribute(n, "aria-hidden")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
        {
            return true;
        }
        current = doc.parent(n);
    }
    false
}

/// Collapse runs of whitespace to single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::Document;

    fn doc_with(build: impl FnOnce(&mut Document, NodeId)) -> Document {
        let mut doc = Document::default();
        let body = doc.body();
        build(&mut doc, body);
        doc
    }

    fn el(doc: &mut Document, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let node = doc.create_element(tag);
        for (name, value) in attrs {
            doc.set_attribute(node, name, value).unwrap();
        }
        doc.append_child(parent, node).unwrap();
        node
    }

    fn text(doc: &mut Document, parent: NodeId, data: &str) {
        let node = doc.create_text(data);
        doc.append_child(parent, node).unwrap();
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_aria_label_beats_content() {
        let mut button = NodeId::NONE;
        let doc = doc_with(|doc, body| {
            button = el(doc, body, "button", &[("aria-label", "Close")]);
            text(doc, button, "X");
        });
        let name = compute_name(&doc, button);
        assert_eq!(name.text, "Close");
        assert_eq!(name.source, NameSource::AriaLabel);
    }

    #[test]
    fn test_inline_content_joins_without_spaces() {
        let mut link = NodeId::NONE;
        let doc = doc_with(|doc, body| {
            link = el(doc, body, "a", &[("href", "#")]);
            text(doc, link, "foo");
            let b = el(doc, link, "b", &[]);
            text(doc, b, "bar");
            let div = el(doc, link, "div", &[]);
            text(doc, div, "baz");
        });
        assert_eq!(compute_name(&doc, link).text, "foobar baz");
    }

    #[test]
    fn test_self_reference_terminates() {
        let mut node = NodeId::NONE;
        let doc = doc_with(|doc, body| {
            node = el(doc, body, "button", &[("id", "me"), ("aria-labelledby", "me")]);
            text(doc, node, "Self");
        });
        let name = compute_name(&doc, node);
        assert_eq!(name.text, "Self");
        assert_eq!(name.source, NameSource::Content);
    }

    #[test]
    fn test_description_equal_to_name_is_dropped() {
        let mut node = NodeId::NONE;
        let doc = doc_with(|doc, body| {
            node = el(doc, body, "button", &[("title", "Save")]);
            text(doc, node, "Save");
        });
        let name = compute_name(&doc, node);
        assert_eq!(compute_description(&doc, node, &name), "");
    }

    #[test]
    fn test_embedded_textbox_value_in_label() {
        let mut checkbox = NodeId::NONE;
        let doc = doc_with(|doc, body| {
            let label = el(doc, body, "label", &[]);
            checkbox = el(doc, label, "input", &[("type", "checkbox")]);
            text(doc, label, "Flash ");
            el(doc, label, "input", &[("type", "text"), ("value", "5")]);
            text(doc, label, " times");
        });
        assert_eq!(compute_name(&doc, checkbox).text, "Flash 5 times");
    }
}
