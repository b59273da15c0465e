//! Document - High-level document API
//!
//! Wraps the arena tree with the operations page scripts use. Every
//! structural, attribute or text change goes through here so it can be
//! published on the mutation feed.

use std::rc::Rc;

use smol::channel::Receiver;

use crate::{
    DomError, DomEvent, DomEventType, DomResult, DomTree, EventListeners, MutationFeed,
    MutationRecord, Node, NodeData, NodeId,
};

/// Tags whose elements never produce a box
const NON_RENDERED_TAGS: &[&str] = &[
    "head", "script", "style", "template", "title", "meta", "link", "noscript", "base",
];

/// Elements a `<label>` can label
const LABELABLE_TAGS: &[&str] = &["button", "input", "meter", "output", "progress", "select", "textarea"];

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    mutations: MutationFeed,
    listeners: EventListeners,
    focused: Option<NodeId>,
}

impl Document {
    /// Create a new document with `<html><head></head><body></body></html>`
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let html = doc.tree.create_element("html");
        let head = doc.tree.create_element("head");
        let body = doc.tree.create_element("body");

        // Fresh nodes under a fresh root cannot fail to link.
        let _ = doc.tree.append_child(NodeId::ROOT, html);
        let _ = doc.tree.append_child(html, head);
        let _ = doc.tree.append_child(html, body);

        doc.html_element = html;
        doc.head_element = head;
        doc.body_element = body;
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            mutations: MutationFeed::new(),
            listeners: EventListeners::new(),
            focused: None,
        }
    }

    /// Locate `<html>`, `<head>` and `<body>` after the tree was built directly
    pub fn finalize(&mut self) {
        self.html_element = self
            .tree
            .children(NodeId::ROOT)
            .find(|&id| self.tag_name(id) == Some("html"))
            .unwrap_or(NodeId::NONE);
        self.head_element = self.find_child_tag(self.html_element, "head");
        self.body_element = self.find_child_tag(self.html_element, "body");
    }

    fn find_child_tag(&self, parent: NodeId, tag: &str) -> NodeId {
        self.tree
            .children(parent)
            .find(|&id| self.tag_name(id) == Some(tag))
            .unwrap_or(NodeId::NONE)
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        self.tree
            .children(self.head_element)
            .find(|&id| self.tag_name(id) == Some("title"))
            .map(|id| self.text_content(id).trim().to_string())
            .unwrap_or_default()
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get `<head>` element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get `<body>` element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably; changes made here are not published
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Get a connected element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.tree
            .descendants(NodeId::ROOT)
            .into_iter()
            .find(|&n| self.attribute(n, "id") == Some(id))
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.tree.get(node).is_some_and(Node::is_element)
    }

    /// Lowercased tag name of an element
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.tree
            .get(node)?
            .as_element()
            .map(|e| e.local_name.as_str())
    }

    /// Attribute value of an element
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree.get(node)?.as_element()?.get_attr(name)
    }

    /// Data of a text node
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.tree.get(node)?.as_text()
    }

    /// Lowercased `type` of an `<input>`, defaulting to `text`
    pub fn input_type(&self, node: NodeId) -> Option<String> {
        if self.tag_name(node) != Some("input") {
            return None;
        }
        Some(
            self.attribute(node, "type")
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "text".to_string()),
        )
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, node: NodeId) -> String {
        if let Some(text) = self.text(node) {
            return text.to_string();
        }
        self.tree
            .descendants(node)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// Disabled via `disabled` on a form control or `aria-disabled="true"`
    pub fn is_disabled(&self, node: NodeId) -> bool {
        if self.attribute(node, "aria-disabled") == Some("true") {
            return true;
        }
        matches!(
            self.tag_name(node),
            Some("button" | "input" | "select" | "textarea" | "option" | "fieldset")
        ) && self.attribute(node, "disabled").is_some()
    }

    /// Control labelled by a `<label>` element
    pub fn labeled_control(&self, label: NodeId) -> Option<NodeId> {
        if self.tag_name(label) != Some("label") {
            return None;
        }
        if let Some(for_id) = self.attribute(label, "for") {
            return self
                .get_element_by_id(for_id)
                .filter(|&n| self.is_labelable(n));
        }
        self.tree
            .descendants(label)
            .into_iter()
            .find(|&n| self.is_labelable(n))
    }

    /// `<label>` elements associated with a labelable control
    pub fn labels_for(&self, control: NodeId) -> Vec<NodeId> {
        if !self.is_labelable(control) {
            return Vec::new();
        }
        self.tree
            .descendants(NodeId::ROOT)
            .into_iter()
            .filter(|&n| self.tag_name(n) == Some("label"))
            .filter(|&label| self.labeled_control(label) == Some(control))
            .collect()
    }

    fn is_labelable(&self, node: NodeId) -> bool {
        match self.tag_name(node) {
            Some("input") => self.input_type(node).as_deref() != Some("hidden"),
            Some(tag) => LABELABLE_TAGS.contains(&tag),
            None => false,
        }
    }

    /// Whether the node and all of its ancestors produce a box
    pub fn is_rendered(&self, node: NodeId) -> bool {
        if !self.tree.is_connected(node) {
            return false;
        }
        let mut child = node;
        for current in std::iter::once(node).chain(self.tree.ancestors(node)) {
            if self.element_hides_subtree(current) {
                return false;
            }
            if current != child && self.is_closed_details_content(current, child) {
                return false;
            }
            child = current;
        }
        true
    }

    fn element_hides_subtree(&self, node: NodeId) -> bool {
        let Some(tag) = self.tag_name(node) else { return false };
        if NON_RENDERED_TAGS.contains(&tag) {
            return true;
        }
        if self.attribute(node, "hidden").is_some() {
            return true;
        }
        if self.input_type(node).as_deref() == Some("hidden") {
            return true;
        }
        self.attribute(node, "style").is_some_and(|style| {
            let compact: String = style
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();
            compact
                .split(';')
                .any(|decl| decl == "display:none" || decl == "visibility:hidden")
        })
    }

    /// Content of a closed `<details>` other than its first `<summary>`
    fn is_closed_details_content(&self, details: NodeId, child: NodeId) -> bool {
        if self.tag_name(details) != Some("details") || self.attribute(details, "open").is_some() {
            return false;
        }
        let summary = self.find_child_tag(details, "summary");
        child != summary
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Create a detached element
    pub fn create_element(&mut self, local_name: &str) -> NodeId {
        self.tree.create_element(local_name)
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    /// Append a child, publishing the change
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert a child before `reference`, publishing the change
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        let old_parent = self.tree.parent(child);
        self.tree.insert_before(parent, child, reference)?;
        if let Some(old) = old_parent {
            if old != parent {
                self.mutations
                    .publish(MutationRecord::child_list(old, Vec::new(), vec![child]));
            }
        }
        self.mutations
            .publish(MutationRecord::child_list(parent, vec![child], Vec::new()));
        Ok(child)
    }

    /// Remove a child, publishing the change
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.tree.parent(child) != Some(parent) {
            return Err(DomError::NotAChild);
        }
        self.tree.detach(child);
        if self.focused.is_some_and(|f| self.tree.is_inclusive_ancestor(child, f)) {
            self.focused = None;
        }
        self.mutations
            .publish(MutationRecord::child_list(parent, Vec::new(), vec![child]));
        Ok(child)
    }

    /// Set an attribute, publishing the change
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        let elem = self
            .tree
            .get_mut(node)
            .ok_or(DomError::NotFound)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType)?;
        let old = elem.set_attr(name, value);
        if old.as_deref() != Some(value) {
            self.mutations
                .publish(MutationRecord::attribute(node, name, old));
        }
        Ok(())
    }

    /// Remove an attribute, publishing the change if it existed
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<()> {
        let elem = self
            .tree
            .get_mut(node)
            .ok_or(DomError::NotFound)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType)?;
        if let Some(old) = elem.remove_attr(name) {
            self.mutations
                .publish(MutationRecord::attribute(node, name, Some(old)));
        }
        Ok(())
    }

    /// Replace the data of a text node, publishing the change
    pub fn set_text(&mut self, node: NodeId, content: &str) -> DomResult<()> {
        let data = &mut self.tree.get_mut(node).ok_or(DomError::NotFound)?.data;
        let NodeData::Text(text) = data else {
            return Err(DomError::InvalidNodeType);
        };
        let old = std::mem::replace(text, content.to_string());
        if old != content {
            self.mutations
                .publish(MutationRecord::character_data(node, old));
        }
        Ok(())
    }

    /// `textContent` setter: replace all children with a single text node
    pub fn set_text_content(&mut self, node: NodeId, content: &str) -> DomResult<()> {
        if let Some(text) = self.text(node) {
            if text != content {
                return self.set_text(node, content);
            }
            return Ok(());
        }
        if !self.is_element(node) {
            return Err(DomError::InvalidNodeType);
        }
        let removed: Vec<NodeId> = self.tree.children(node).collect();
        for child in &removed {
            self.tree.detach(*child);
        }
        let mut added = Vec::new();
        if !content.is_empty() {
            let text = self.tree.create_text(content);
            self.tree.append_child(node, text)?;
            added.push(text);
        }
        self.mutations
            .publish(MutationRecord::child_list(node, added, removed));
        Ok(())
    }

    /// Subscribe to the mutation feed
    pub fn subscribe(&mut self) -> Receiver<MutationRecord> {
        self.mutations.subscribe()
    }

    // ------------------------------------------------------------------
    // Events and focus
    // ------------------------------------------------------------------

    /// Register an event listener
    pub fn add_event_listener<F>(&mut self, node: NodeId, event_type: DomEventType, handler: F)
    where
        F: Fn(&mut Document, &mut DomEvent) + 'static,
    {
        self.listeners.add(node, event_type, Rc::new(handler));
    }

    pub fn listeners(&self) -> &EventListeners {
        &self.listeners
    }

    /// Currently focused element
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Whether the element can receive focus
    pub fn is_focusable(&self, node: NodeId) -> bool {
        if !self.is_element(node) || self.is_disabled(node) {
            return false;
        }
        if self
            .attribute(node, "tabindex")
            .is_some_and(|t| t.trim().parse::<i32>().is_ok())
        {
            return true;
        }
        match self.tag_name(node) {
            Some("a" | "area") => self.attribute(node, "href").is_some(),
            Some("button" | "select" | "textarea" | "summary" | "iframe") => true,
            Some("input") => self.input_type(node).as_deref() != Some("hidden"),
            _ => matches!(self.attribute(node, "contenteditable"), Some("" | "true")),
        }
    }

    /// Move focus to a focusable element; returns whether focus moved
    pub fn focus(&mut self, node: NodeId) -> bool {
        if !self.is_focusable(node) || self.focused == Some(node) {
            return false;
        }
        self.focused = Some(node);
        let mut event = DomEvent::new(DomEventType::Focus, node);
        self.dispatch_event(&mut event);
        true
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_body() -> (Document, NodeId) {
        let doc = Document::default();
        let body = doc.body();
        (doc, body)
    }

    #[test]
    fn test_new_document_structure() {
        let doc = Document::new("about:blank");
        assert_eq!(doc.tag_name(doc.document_element()), Some("html"));
        assert_eq!(doc.tag_name(doc.head()), Some("head"));
        assert_eq!(doc.tag_name(doc.body()), Some("body"));
        assert_eq!(doc.url(), "about:blank");
    }

    #[test]
    fn test_get_element_by_id() {
        let (mut doc, body) = doc_with_body();
        let div = doc.create_element("div");
        doc.set_attribute(div, "id", "main").unwrap();
        assert_eq!(doc.get_element_by_id("main"), None);
        doc.append_child(body, div).unwrap();
        assert_eq!(doc.get_element_by_id("main"), Some(div));
        assert_eq!(doc.get_element_by_id(""), None);
    }

    #[test]
    fn test_mutations_published() {
        let (mut doc, body) = doc_with_body();
        let rx = doc.subscribe();
        let p = doc.create_element("p");
        doc.append_child(body, p).unwrap();
        doc.set_attribute(p, "class", "x").unwrap();
        doc.set_attribute(p, "class", "x").unwrap();
        doc.remove_attribute(p, "missing").unwrap();

        let first = rx.try_recv().unwrap();
        assert_eq!(first.target, body);
        assert_eq!(first.added_nodes, vec![p]);
        let second = rx.try_recv().unwrap();
        assert_eq!(second.attribute_name.as_deref(), Some("class"));
        assert!(rx.try_recv().is_err(), "unchanged values must not publish");
    }

    #[test]
    fn test_set_text_content() {
        let (mut doc, body) = doc_with_body();
        let div = doc.create_element("div");
        doc.append_child(body, div).unwrap();
        doc.set_text_content(div, "hello").unwrap();
        assert_eq!(doc.text_content(div), "hello");
        doc.set_text_content(div, "bye").unwrap();
        assert_eq!(doc.text_content(div), "bye");
        assert_eq!(doc.tree().children(div).count(), 1);
    }

    #[test]
    fn test_rendering() {
        let (mut doc, body) = doc_with_body();
        let hidden = doc.create_element("div");
        doc.set_attribute(hidden, "style", "display: none").unwrap();
        let inner = doc.create_element("span");
        doc.append_child(body, hidden).unwrap();
        doc.append_child(hidden, inner).unwrap();
        assert!(!doc.is_rendered(hidden));
        assert!(!doc.is_rendered(inner));
        assert!(doc.is_rendered(body));
        assert!(!doc.is_rendered(doc.head()));
    }

    #[test]
    fn test_closed_details() {
        let (mut doc, body) = doc_with_body();
        let details = doc.create_element("details");
        let summary = doc.create_element("summary");
        let content = doc.create_element("p");
        doc.append_child(body, details).unwrap();
        doc.append_child(details, summary).unwrap();
        doc.append_child(details, content).unwrap();
        assert!(doc.is_rendered(summary));
        assert!(!doc.is_rendered(content));
        doc.set_attribute(details, "open", "").unwrap();
        assert!(doc.is_rendered(content));
    }

    #[test]
    fn test_labels() {
        let (mut doc, body) = doc_with_body();
        let label = doc.create_element("label");
        doc.set_attribute(label, "for", "name").unwrap();
        let input = doc.create_element("input");
        doc.set_attribute(input, "id", "name").unwrap();
        doc.append_child(body, label).unwrap();
        doc.append_child(body, input).unwrap();
        assert_eq!(doc.labeled_control(label), Some(input));
        assert_eq!(doc.labels_for(input), vec![label]);
    }

    #[test]
    fn test_focus() {
        let (mut doc, body) = doc_with_body();
        let button = doc.create_element("button");
        let div = doc.create_element("div");
        doc.append_child(body, button).unwrap();
        doc.append_child(body, div).unwrap();
        assert!(doc.focus(button));
        assert!(!doc.focus(div));
        assert_eq!(doc.focused(), Some(button));
    }
}
