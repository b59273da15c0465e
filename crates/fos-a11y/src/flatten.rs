//! Flattening and Phrase Rendering
//!
//! Pre-order linearisation of the accessibility tree with explicit
//! container boundaries, and the phrases spoken for each entry.

use std::rc::Rc;

use crate::role::AriaRole;
use crate::tree::AccessibilityNode;

/// Position of an entry relative to its node's subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    Enter,
    Exit,
    Leaf,
}

/// One stop of the virtual cursor
#[derive(Debug, Clone)]
pub struct FlattenedEntry {
    pub node: Rc<AccessibilityNode>,
    pub boundary: Boundary,
    /// Position in the sequence; stable until the next rebuild
    pub index: usize,
}

impl FlattenedEntry {
    pub fn role(&self) -> Option<AriaRole> {
        self.node.role
    }

    /// Spoken phrase of this entry
    pub fn phrase(&self) -> String {
        render_phrase(self)
    }

    /// Item text of this entry
    pub fn item_text(&self) -> String {
        render_item_text(self)
    }
}

/// Flatten a tree rooted at `root`.
///
/// The root always yields an enter/exit pair; a root without a role of its
/// own is announced as `document`.
pub fn flatten(root: &Rc<AccessibilityNode>) -> Vec<FlattenedEntry> {
    let root = match root.role {
        Some(_) => Rc::clone(root),
        None => Rc::new(AccessibilityNode { role: Some(AriaRole::Document), ..(**root).clone() }),
    };
    let mut out = Vec::new();
    push(&mut out, &root, Boundary::Enter);
    visit_children(&root, &mut out);
    push(&mut out, &root, Boundary::Exit);
    out
}

fn visit(node: &Rc<AccessibilityNode>, out: &mut Vec<FlattenedEntry>) {
    match node.role {
        None => visit_children(node, out),
        Some(role) if role.is_container() => {
            push(out, node, Boundary::Enter);
            visit_children(node, out);
            push(out, node, Boundary::Exit);
        }
        Some(_) => {
            push(out, node, Boundary::Leaf);
            visit_children(node, out);
        }
    }
}

fn visit_children(node: &Rc<AccessibilityNode>, out: &mut Vec<FlattenedEntry>) {
    for child in &node.children {
        visit(child, out);
    }
}

fn push(out: &mut Vec<FlattenedEntry>, node: &Rc<AccessibilityNode>, boundary: Boundary) {
    let index = out.len();
    out.push(FlattenedEntry { node: Rc::clone(node), boundary, index });
}

/// `role, name, states..., description` on enter and leaf entries,
/// `end of role[, name]` on exit entries; static text is its text alone
pub fn render_phrase(entry: &FlattenedEntry) -> String {
    let node = &entry.node;
    if node.is_static_text() {
        return node.name.clone();
    }
    let role = node.role.map(|r| r.as_str()).unwrap_or_default();

    if entry.boundary == Boundary::Exit {
        return if node.name.is_empty() {
            format!("end of {role}")
        } else {
            format!("end of {role}, {}", node.name)
        };
    }

    let mut parts: Vec<&str> = Vec::with_capacity(node.states.len() + 3);
    parts.push(role);
    parts.push(&node.name);
    parts.extend(node.states.iter().map(String::as_str));
    parts.push(&node.description);
    parts.retain(|p| !p.is_empty());
    parts.join(", ")
}

/// Item text: the node's name
pub fn render_item_text(entry: &FlattenedEntry) -> String {
    entry.node.name.clone()
}
