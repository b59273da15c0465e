//! fOS DOM - Document Object Model
//!
//! Arena DOM used as the live document behind the virtual screen reader:
//! read access for the accessibility tree, a mutation feed for
//! re-validation and synthetic input dispatch.

mod access;
mod document;
mod dom_events;
mod input;
mod mutation;
mod node;
mod operations;
mod tree;

pub use access::DomAccess;
pub use document::Document;
pub use dom_events::{DomEvent, DomEventType, EventHandler, EventListeners};
pub use input::{InputDispatch, KeySpec, Modifiers, printable_char};
pub use mutation::{MutationFeed, MutationRecord, MutationType};
pub use node::{Attribute, ElementData, Node, NodeData};
pub use operations::{DomError, DomResult};
pub use tree::{Children, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
