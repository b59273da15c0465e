//! Node Classification
//!
//! Inclusion decisions and the state/property phrases spoken after a
//! node's name.

use fos_dom::{DomAccess, NodeId};

use crate::aria::{AriaAttributes, Invalid, Tristate};
use crate::name::{compute_referenced_name, control_value, is_hidden, ComputedDescription, DescriptionSource};
use crate::role::{resolve_role, AriaRole};

/// How a document node takes part in the accessibility tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// Produces a node
    Included,
    /// Pruned together with its subtree
    Hidden,
    /// No node of its own; children splice into the parent
    Presentational,
    /// Comments, doctypes and whitespace-only text
    Ignored,
}

/// Decide whether and how a node is exposed
pub fn classify<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> Inclusion {
    if let Some(text) = doc.text(node) {
        if text.trim().is_empty() {
            return Inclusion::Ignored;
        }
        return if is_hidden(doc, node) { Inclusion::Hidden } else { Inclusion::Included };
    }
    if !doc.is_element(node) {
        // Only the document node itself has neither tag nor parent
        return if doc.contains(node) && doc.parent(node).is_none() {
            Inclusion::Included
        } else {
            Inclusion::Ignored
        };
    }
    if is_hidden(doc, node) {
        return Inclusion::Hidden;
    }
    if resolve_role(doc, node).is_some_and(|r| r.is_presentational()) {
        return Inclusion::Presentational;
    }
    Inclusion::Included
}

/// Set membership of a node: 1-based position and set size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPosition {
    pub position: u32,
    pub size: u32,
}

/// Element referenced by `aria-activedescendant`, when it exists
pub fn active_descendant<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> Option<NodeId> {
    let id = doc.attribute(node, "aria-activedescendant")?.trim();
    if id.is_empty() {
        return None;
    }
    doc.element_by_id(id)
}

/// Render state and property phrases in speaking order
pub fn state_labels<D: DomAccess + ?Sized>(
    doc: &D,
    node: NodeId,
    role: Option<AriaRole>,
    description: &ComputedDescription,
    set: Option<SetPosition>,
) -> Vec<String> {
    let mut labels = Vec::new();
    let Some(tag) = doc.tag_name(node) else { return labels };
    let aria = AriaAttributes::from_element(doc, node);
    let native = |attr: &str| doc.has_attribute(node, attr);

    if role == Some(AriaRole::Heading) {
        labels.push(format!("level {}", heading_level(doc, node, &aria)));
    }

    if let Some(value) = role.filter(|r| r.has_value()).and_then(|r| control_value(doc, node, r)) {
        if !value.is_empty() {
            labels.push(format!("value {value}"));
        }
    }

    if let Some(checked) = checked_state(doc, node, role, &aria) {
        labels.push(match checked {
            Tristate::True => "checked",
            Tristate::False => "not checked",
            Tristate::Mixed => "partially checked",
        }.to_string());
    }

    if let Some(pressed) = aria.pressed() {
        labels.push(match pressed {
            Tristate::True => "pressed",
            Tristate::False => "not pressed",
            Tristate::Mixed => "partially pressed",
        }.to_string());
    }

    let selected = aria.is_selected().or_else(|| (tag == "option").then(|| native("selected")));
    if let Some(selected) = selected {
        labels.push(if selected { "selected" } else { "not selected" }.to_string());
    }

    if let Some(expanded) = aria.is_expanded().or_else(|| summary_expanded(doc, node, tag)) {
        labels.push(if expanded { "expanded" } else { "collapsed" }.to_string());
    }

    if let Some(kind) = aria.has_popup() {
        labels.push(format!("has popup {kind}"));
    }

    if let Some(kind) = aria.current() {
        labels.push(if kind.is_empty() { "current".to_string() } else { format!("current {kind}") });
    }

    let form_control = matches!(tag, "button" | "input" | "select" | "textarea" | "option" | "fieldset");
    if aria.flag("disabled") || (form_control && native("disabled")) {
        labels.push("disabled".to_string());
    }
    if aria.flag("required") || (form_control && native("required")) {
        labels.push("required".to_string());
    }
    if aria.flag("readonly") || (matches!(tag, "input" | "textarea") && native("readonly")) {
        labels.push("read only".to_string());
    }

    let invalid = aria.invalid();
    if let Some(kind) = invalid {
        labels.push(match kind {
            Invalid::True => "invalid",
            Invalid::Grammar => "invalid grammar",
            Invalid::Spelling => "invalid spelling",
        }.to_string());
    }

    if aria.flag("busy") {
        labels.push("busy".to_string());
    }
    if aria.flag("modal") {
        labels.push("modal".to_string());
    }
    if aria.flag("multiselectable") || (tag == "select" && native("multiple")) {
        labels.push("multi-selectable".to_string());
    }

    if let Some(set) = set {
        labels.push(format!("position {}, set size {}", set.position, set.size));
    }

    if let Some(target) = active_descendant(doc, node) {
        labels.push(reference_label("active descendant", &[target], doc));
    }
    if invalid.is_some() {
        if let Some(refs) = id_refs(doc, node, "aria-errormessage") {
            labels.push(reference_label("error message", &refs, doc));
        }
    }
    if description.source != DescriptionSource::Details {
        if let Some(refs) = id_refs(doc, node, "aria-details") {
            labels.push(reference_label("details", &refs, doc));
        }
    }
    if let Some(refs) = id_refs(doc, node, "aria-owns") {
        labels.push(reference_label("owns", &refs, doc));
    }
    if let Some(refs) = id_refs(doc, node, "aria-controls") {
        labels.push(reference_label("controls", &refs, doc));
    }

    labels
}

/// `aria-level`, else the `hN` rank, else 2
pub fn heading_level<D: DomAccess + ?Sized>(doc: &D, node: NodeId, aria: &AriaAttributes) -> u32 {
    aria.level()
        .or_else(|| {
            let tag = doc.tag_name(node)?;
            let rank = tag.strip_prefix('h')?.parse::<u32>().ok()?;
            (1..=6).contains(&rank).then_some(rank)
        })
        .unwrap_or(2)
}

fn checked_state<D: DomAccess + ?Sized>(
    doc: &D,
    node: NodeId,
    role: Option<AriaRole>,
    aria: &AriaAttributes,
) -> Option<Tristate> {
    let native_checkable = doc.tag_name(node) == Some("input")
        && matches!(
            doc.attribute(node, "type").map(|t| t.trim().to_ascii_lowercase()).as_deref(),
            Some("checkbox" | "radio")
        );
    if native_checkable {
        return Some(if doc.has_attribute(node, "checked") { Tristate::True } else { Tristate::False });
    }
    match role? {
        AriaRole::Checkbox | AriaRole::Radio | AriaRole::Switch
        | AriaRole::MenuItemCheckbox | AriaRole::MenuItemRadio => {
            Some(aria.checked().unwrap_or(Tristate::False))
        }
        _ => aria.checked(),
    }
}

fn summary_expanded<D: DomAccess + ?Sized>(doc: &D, node: NodeId, tag: &str) -> Option<bool> {
    if tag != "summary" {
        return None;
    }
    let details = doc.parent(node).filter(|&p| doc.tag_name(p) == Some("details"))?;
    Some(doc.has_attribute(details, "open"))
}

fn id_refs<D: DomAccess + ?Sized>(doc: &D, node: NodeId, attr: &str) -> Option<Vec<NodeId>> {
    let refs = doc.resolve_id_refs(doc.attribute(node, attr)?);
    (!refs.is_empty()).then_some(refs)
}

/// `label name, name`; the bare label when no target has a name
fn reference_label<D: DomAccess + ?Sized>(label: &str, targets: &[NodeId], doc: &D) -> String {
    let names: Vec<String> = targets
        .iter()
        .map(|&t| compute_referenced_name(doc, t).text)
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        label.to_string()
    } else {
        format!("{label} {}", names.join(", "))
    }
}
