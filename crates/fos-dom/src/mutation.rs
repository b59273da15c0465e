//! Mutation Feed
//!
//! MutationObserver-style change records pushed to every subscriber over an
//! unbounded channel. Delivery is asynchronous: the mutating call only
//! enqueues, receivers drain on their next poll.

use smol::channel::{Receiver, Sender};

use crate::NodeId;

/// Mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    /// Root of the affected subtree
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    CharacterData,
    ChildList,
}

impl MutationRecord {
    pub fn child_list(target: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes: added,
            removed_nodes: removed,
            attribute_name: None,
            old_value: None,
        }
    }

    pub fn attribute(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: Some(name.to_string()),
            old_value,
        }
    }

    pub fn character_data(target: NodeId, old_value: String) -> Self {
        Self {
            mutation_type: MutationType::CharacterData,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: None,
            old_value: Some(old_value),
        }
    }
}

/// Fan-out of mutation records to subscribers
#[derive(Debug, Default)]
pub struct MutationFeed {
    subscribers: Vec<Sender<MutationRecord>>,
}

impl MutationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&mut self) -> Receiver<MutationRecord> {
        let (tx, rx) = smol::channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Push a record to every live subscriber, dropping closed ones
    pub fn publish(&mut self, record: MutationRecord) {
        self.subscribers
            .retain(|tx| tx.try_send(record.clone()).is_ok());
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.iter().filter(|tx| !tx.is_closed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_out() {
        let mut feed = MutationFeed::new();
        let a = feed.subscribe();
        let b = feed.subscribe();

        feed.publish(MutationRecord::attribute(NodeId(3), "hidden", None));

        assert_eq!(a.try_recv().unwrap().target, NodeId(3));
        assert_eq!(b.try_recv().unwrap().attribute_name.as_deref(), Some("hidden"));
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn test_closed_subscribers_dropped() {
        let mut feed = MutationFeed::new();
        let a = feed.subscribe();
        drop(feed.subscribe());

        feed.publish(MutationRecord::child_list(NodeId(1), vec![NodeId(2)], vec![]));
        assert_eq!(feed.subscriber_count(), 1);
        assert_eq!(a.try_recv().unwrap().added_nodes, vec![NodeId(2)]);
    }
}
