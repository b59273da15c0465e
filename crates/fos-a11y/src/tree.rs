//! Accessibility Tree
//!
//! Builds the accessibility tree below a container node and caches its
//! flattened form until the next invalidation.

use std::rc::Rc;

use fos_dom::{DomAccess, NodeId};

use crate::aria::AriaAttributes;
use crate::classify::{classify, state_labels, Inclusion, SetPosition};
use crate::flatten::{flatten, FlattenedEntry};
use crate::name::{collapse_whitespace, compute_name, describe, ComputedDescription};
use crate::role::{resolve_role, AriaRole};

/// Accessibility node
#[derive(Debug, Clone, PartialEq)]
pub struct AccessibilityNode {
    /// Originating document node
    pub node: NodeId,
    /// `None` for structural wrappers that are never announced
    pub role: Option<AriaRole>,
    pub name: String,
    pub description: String,
    pub states: Vec<String>,
    pub children: Vec<Rc<AccessibilityNode>>,
}

impl AccessibilityNode {
    pub fn is_static_text(&self) -> bool {
        self.role == Some(AriaRole::StaticText)
    }

    /// Number of nodes in this subtree, including itself
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(|c| c.subtree_len()).sum::<usize>()
    }
}

/// Node whose states wait for its set position
struct Draft {
    node: NodeId,
    role: Option<AriaRole>,
    name: String,
    description: ComputedDescription,
    children: Vec<Rc<AccessibilityNode>>,
}

/// Build the accessibility tree rooted at `container`.
///
/// Returns `None` when the container itself is excluded.
pub fn build<D: DomAccess + ?Sized>(doc: &D, container: NodeId) -> Option<Rc<AccessibilityNode>> {
    let draft = match classify(doc, container) {
        Inclusion::Hidden | Inclusion::Ignored => {
            tracing::debug!(?container, "container excluded from accessibility tree");
            return None;
        }
        Inclusion::Presentational => {
            let children = build_children(doc, container, false);
            Draft {
                node: container,
                role: None,
                name: String::new(),
                description: ComputedDescription::default(),
                children,
            }
        }
        Inclusion::Included => draft_for(doc, container, false)?,
    };
    let set = draft.role.filter(|r| r.is_set_member()).and_then(|_| {
        let aria = AriaAttributes::from_element(doc, container);
        Some(SetPosition { position: aria.pos_in_set()?, size: aria.set_size()? })
    });
    let root = finish(doc, draft, set);
    tracing::debug!(?container, nodes = root.subtree_len(), "built accessibility tree");
    Some(root)
}

/// Drafts contributed by one document node, after splicing
fn build_node<D: DomAccess + ?Sized>(doc: &D, node: NodeId, prune_text: bool) -> Vec<Draft> {
    match classify(doc, node) {
        Inclusion::Hidden | Inclusion::Ignored => Vec::new(),
        Inclusion::Presentational => {
            tracing::trace!(?node, "presentational, splicing children");
            vec_of_children(doc, node, prune_text)
        }
        Inclusion::Included => draft_for(doc, node, prune_text).into_iter().collect(),
    }
}

fn vec_of_children<D: DomAccess + ?Sized>(doc: &D, node: NodeId, prune_text: bool) -> Vec<Draft> {
    doc.children(node)
        .into_iter()
        .flat_map(|child| build_node(doc, child, prune_text))
        .collect()
}

fn draft_for<D: DomAccess + ?Sized>(doc: &D, node: NodeId, prune_text: bool) -> Option<Draft> {
    if let Some(text) = doc.text(node) {
        if prune_text {
            return None;
        }
        return Some(Draft {
            node,
            role: Some(AriaRole::StaticText),
            name: collapse_whitespace(text),
            description: ComputedDescription::default(),
            children: Vec::new(),
        });
    }

    let role = resolve_role(doc, node);
    let name = compute_name(doc, node);
    let description = describe(doc, node, &name);

    // Text already spoken as the name is dropped, through unannounced wrappers
    let prune_below = match role {
        Some(_) => name.from_content(),
        None => prune_text || name.from_content(),
    };
    let children = if role.is_some_and(keeps_no_children) {
        Vec::new()
    } else {
        build_children(doc, node, prune_below)
    };

    Some(Draft { node, role, name: name.text, description, children })
}

fn keeps_no_children(role: AriaRole) -> bool {
    role.has_presentational_children() || matches!(role, AriaRole::TextBox | AriaRole::SearchBox)
}

/// Build and finish the children of a node, numbering set members
fn build_children<D: DomAccess + ?Sized>(
    doc: &D,
    node: NodeId,
    prune_text: bool,
) -> Vec<Rc<AccessibilityNode>> {
    let drafts = vec_of_children(doc, node, prune_text);
    let positions = set_positions(doc, &drafts);
    drafts
        .into_iter()
        .zip(positions)
        .map(|(draft, set)| finish(doc, draft, set))
        .collect()
}

/// Explicit `aria-posinset`/`aria-setsize`, else the rank among same-role siblings
fn set_positions<D: DomAccess + ?Sized>(doc: &D, drafts: &[Draft]) -> Vec<Option<SetPosition>> {
    drafts
        .iter()
        .map(|draft| {
            let role = draft.role.filter(|r| r.is_set_member())?;
            let peers: Vec<NodeId> = drafts
                .iter()
                .filter(|d| d.role == Some(role))
                .map(|d| d.node)
                .collect();
            let rank = peers.iter().position(|&n| n == draft.node)? as u32 + 1;
            let aria = AriaAttributes::from_element(doc, draft.node);
            Some(SetPosition {
                position: aria.pos_in_set().unwrap_or(rank),
                size: aria.set_size().unwrap_or(peers.len() as u32),
            })
        })
        .collect()
}

fn finish<D: DomAccess + ?Sized>(doc: &D, draft: Draft, set: Option<SetPosition>) -> Rc<AccessibilityNode> {
    let states = if draft.role == Some(AriaRole::StaticText) {
        Vec::new()
    } else {
        state_labels(doc, draft.node, draft.role, &draft.description, set)
    };
    Rc::new(AccessibilityNode {
        node: draft.node,
        role: draft.role,
        name: draft.name,
        description: draft.description.text,
        states,
        children: draft.children,
    })
}

/// Built and flattened tree for one container, invalidated wholesale
#[derive(Debug)]
pub struct TreeCache {
    container: NodeId,
    entries: Option<Rc<[FlattenedEntry]>>,
    builds: u64,
}

impl TreeCache {
    pub fn new(container: NodeId) -> Self {
        Self { container, entries: None, builds: 0 }
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Flattened entries, rebuilding after an invalidation
    pub fn entries<D: DomAccess + ?Sized>(&mut self, doc: &D) -> Rc<[FlattenedEntry]> {
        if let Some(entries) = &self.entries {
            return Rc::clone(entries);
        }
        let entries: Rc<[FlattenedEntry]> = match build(doc, self.container) {
            Some(root) => flatten(&root).into(),
            None => Rc::from(Vec::new()),
        };
        self.builds += 1;
        self.entries = Some(Rc::clone(&entries));
        entries
    }

    pub fn invalidate(&mut self) {
        if self.entries.take().is_some() {
            tracing::trace!(container = ?self.container, "accessibility tree invalidated");
        }
    }

    pub fn is_valid(&self) -> bool {
        self.entries.is_some()
    }

    /// How many times the tree has been built
    pub fn builds(&self) -> u64 {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::Document;

    fn el(doc: &mut Document, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let node = doc.create_element(tag);
        for (name, value) in attrs {
            doc.set_attribute(node, name, value).unwrap();
        }
        doc.append_child(parent, node).unwrap();
        node
    }

    fn text(doc: &mut Document, parent: NodeId, data: &str) -> NodeId {
        let node = doc.create_text(data);
        doc.append_child(parent, node).unwrap();
        node
    }

    #[test]
    fn test_link_text_pruned_through_wrappers() {
        let mut doc = Document::default();
        let body = doc.body();
        let link = el(&mut doc, body, "a", &[("href", "/")]);
        let span = el(&mut doc, link, "span", &[]);
        text(&mut doc, span, "Home");

        let root = build(&doc, body).unwrap();
        let link_node = &root.children[0];
        assert_eq!(link_node.role, Some(AriaRole::Link));
        assert_eq!(link_node.name, "Home");
        let wrapper = &link_node.children[0];
        assert_eq!(wrapper.role, None);
        assert!(wrapper.children.is_empty());
    }

    #[test]
    fn test_set_positions() {
        let mut doc = Document::default();
        let body = doc.body();
        let list = el(&mut doc, body, "ul", &[]);
        for label in ["a", "b", "c"] {
            let item = el(&mut doc, list, "li", &[]);
            text(&mut doc, item, label);
        }

        let root = build(&doc, body).unwrap();
        let items = &root.children[0].children;
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].states, vec!["position 2, set size 3"]);
    }

    #[test]
    fn test_presentational_children_dropped() {
        let mut doc = Document::default();
        let body = doc.body();
        let button = el(&mut doc, body, "button", &[]);
        el(&mut doc, button, "img", &[("alt", "icon")]);
        text(&mut doc, button, " Go");

        let root = build(&doc, body).unwrap();
        let button_node = &root.children[0];
        assert_eq!(button_node.name, "icon Go");
        assert!(button_node.children.is_empty());
    }

    #[test]
    fn test_hidden_container_builds_nothing() {
        let mut doc = Document::default();
        let body = doc.body();
        let hidden = el(&mut doc, body, "div", &[("hidden", "")]);
        text(&mut doc, hidden, "secret");
        assert!(build(&doc, hidden).is_none());
    }

    #[test]
    fn test_cache_rebuilds_after_invalidate() {
        let mut doc = Document::default();
        let body = doc.body();
        text(&mut doc, body, "one");

        let mut cache = TreeCache::new(body);
        assert_eq!(cache.entries(&doc).len(), 3);
        assert_eq!(cache.entries(&doc).len(), 3);
        assert_eq!(cache.builds(), 1);

        text(&mut doc, body, "two");
        cache.invalidate();
        assert_eq!(cache.entries(&doc).len(), 4);
        assert_eq!(cache.builds(), 2);
    }
}
