//! Mutation Watcher
//!
//! Drains a document's mutation channel, decides whether the cached tree of
//! a container is stale and captures live region announcements.

use fos_a11y::{LiveRegionChange, LiveRegionTracker};
use fos_dom::{Document, DomAccess, MutationRecord, NodeId};
use smol::channel::Receiver;

/// Result of draining pending mutation records
#[derive(Debug, Default)]
pub struct WatchOutcome {
    /// A record touched the container's subtree
    pub invalidate: bool,
    /// Live region changes, assertive first
    pub announcements: Vec<LiveRegionChange>,
}

/// Per-reader subscription to a document's mutations
#[derive(Debug)]
pub struct MutationWatcher {
    receiver: Receiver<MutationRecord>,
    container: NodeId,
    live_regions: Option<LiveRegionTracker>,
}

impl MutationWatcher {
    /// Subscribe to `doc`; announcements are only captured when `announce` is set
    pub fn new(doc: &mut Document, container: NodeId, announce: bool) -> Self {
        Self {
            receiver: doc.subscribe(),
            container,
            live_regions: announce.then(LiveRegionTracker::new),
        }
    }

    /// Let `cycles` notification cycles pass
    pub async fn settle(&self, cycles: usize) {
        for _ in 0..cycles.max(1) {
            smol::future::yield_now().await;
        }
    }

    /// Consume every record delivered so far
    pub fn drain(&mut self, doc: &Document) -> WatchOutcome {
        let mut outcome = WatchOutcome::default();
        let mut records = 0usize;
        while let Ok(record) = self.receiver.try_recv() {
            records += 1;
            if !self.touches_container(doc, &record) {
                continue;
            }
            outcome.invalidate = true;
            if let Some(tracker) = &mut self.live_regions {
                tracker.observe(doc, &record);
            }
        }
        if let Some(tracker) = &mut self.live_regions {
            outcome.announcements = tracker.drain();
        }
        if records > 0 {
            tracing::debug!(
                records,
                invalidate = outcome.invalidate,
                announcements = outcome.announcements.len(),
                "drained mutations"
            );
        }
        outcome
    }

    /// Target is an inclusive ancestor or descendant of the container
    fn touches_container(&self, doc: &Document, record: &MutationRecord) -> bool {
        doc.is_inclusive_ancestor(self.container, record.target)
            || doc.is_inclusive_ancestor(record.target, self.container)
    }
}
