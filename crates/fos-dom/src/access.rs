//! Read-only document access
//!
//! The capability accessibility code needs from a document: structure,
//! attributes, text, visibility and id resolution. Nothing here mutates.

use crate::{Document, NodeId};

/// Read-only view of a document tree
pub trait DomAccess {
    /// Parent of a node
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children in document order
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Lowercased tag name; `None` for non-elements
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    /// Data of a text node
    fn text(&self, node: NodeId) -> Option<&str>;

    /// Attribute value of an element
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Whether the node produces a rendered box
    fn is_rendered(&self, node: NodeId) -> bool;

    /// Resolve an id reference anywhere in the document
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Whether the id names a node of this document
    fn contains(&self, node: NodeId) -> bool;

    /// Whether the element can receive focus
    fn is_focusable(&self, node: NodeId) -> bool;

    /// `<label>` elements associated with a control
    fn labels_for(&self, node: NodeId) -> Vec<NodeId>;

    fn is_element(&self, node: NodeId) -> bool {
        self.tag_name(node).is_some()
    }

    fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Resolve a whitespace-separated id list, silently dropping invalid ids
    fn resolve_id_refs(&self, value: &str) -> Vec<NodeId> {
        value
            .split_whitespace()
            .filter_map(|id| self.element_by_id(id))
            .collect()
    }
}

impl DomAccess for Document {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree().parent(node)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree().children(node).collect()
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        Document::tag_name(self, node)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        Document::text(self, node)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        Document::attribute(self, node, name)
    }

    fn is_rendered(&self, node: NodeId) -> bool {
        Document::is_rendered(self, node)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.get_element_by_id(id)
    }

    fn contains(&self, node: NodeId) -> bool {
        self.tree().get(node).is_some()
    }

    fn is_focusable(&self, node: NodeId) -> bool {
        Document::is_focusable(self, node)
    }

    fn labels_for(&self, node: NodeId) -> Vec<NodeId> {
        Document::labels_for(self, node)
    }
}
