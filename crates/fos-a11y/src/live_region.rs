//! Live Region Support
//!
//! ARIA live regions: turns mutation records below a live region into
//! queued announcements.

use std::collections::VecDeque;

use fos_dom::{DomAccess, MutationRecord, MutationType, NodeId};

use crate::aria::{AriaAttributes, LiveRegionMode, LiveRelevant};
use crate::name::{collapse_whitespace, is_hidden, plain_text};
use crate::role::resolve_role;

/// Live region configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveRegionConfig {
    /// Politeness level: off, polite, assertive
    pub politeness: LiveRegionMode,
    /// Whether to announce entire region or just changes
    pub atomic: bool,
    /// What types of changes to announce
    pub relevant: RelevantFlags,
    /// Whether content is being updated
    pub busy: bool,
}

impl LiveRegionConfig {
    /// Set atomic mode
    pub fn with_atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Configuration declared on an element, `None` when it is no live region.
    ///
    /// `aria-live` wins over the implicit politeness of live roles.
    pub fn from_element<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> Option<Self> {
        let aria = AriaAttributes::from_element(doc, node);
        let implicit = resolve_role(doc, node).and_then(|r| r.implicit_live_region());
        let politeness = aria.live().or(implicit)?;
        let alert_like = implicit == Some(LiveRegionMode::Assertive);
        Some(Self {
            politeness,
            atomic: aria.flag("atomic") || (alert_like && aria.get("atomic").is_none()),
            // ARIA default for aria-relevant is "additions text"
            relevant: aria
                .relevant()
                .map(RelevantFlags::from_aria)
                .unwrap_or_else(RelevantFlags::additions_text),
            busy: aria.flag("busy"),
        })
    }
}

/// Relevant change flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelevantFlags {
    pub additions: bool,
    pub removals: bool,
    pub text: bool,
}

impl RelevantFlags {
    pub fn all() -> Self {
        Self { additions: true, removals: true, text: true }
    }

    pub fn additions_text() -> Self {
        Self { additions: true, removals: false, text: true }
    }

    pub fn from_aria(relevant: &[LiveRelevant]) -> Self {
        let mut flags = Self::default();
        for r in relevant {
            match r {
                LiveRelevant::Additions => flags.additions = true,
                LiveRelevant::Removals => flags.removals = true,
                LiveRelevant::Text => flags.text = true,
                LiveRelevant::All => return Self::all(),
            }
        }
        if !flags.additions && !flags.removals && !flags.text {
            Self::additions_text()
        } else {
            flags
        }
    }
}

/// Nearest live region containing `node` (inclusive).
///
/// An explicit `aria-live="off"` closer to the node silences outer regions.
/// Regions excluded from the accessibility tree never speak.
pub fn live_region_for<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> Option<(NodeId, LiveRegionConfig)> {
    let mut current = Some(node);
    while let Some(n) = current {
        if doc.is_element(n) {
            if let Some(config) = LiveRegionConfig::from_element(doc, n) {
                let speaks = config.politeness != LiveRegionMode::Off && !is_hidden(doc, n);
                return speaks.then_some((n, config));
            }
        }
        current = doc.parent(n);
    }
    None
}

/// Type of change detected in live region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    /// Node added
    Addition,
    /// Node removed
    Removal,
    /// Text content changed
    TextChange,
}

/// A detected change in a live region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveRegionChange {
    /// Live region element
    pub region: NodeId,
    pub change_type: ChangeType,
    /// Text to announce
    pub text: String,
    pub politeness: LiveRegionMode,
}

/// Collects live region changes from mutation records
#[derive(Debug, Default)]
pub struct LiveRegionTracker {
    pending: VecDeque<LiveRegionChange>,
}

impl LiveRegionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect one mutation record against the current document
    pub fn observe<D: DomAccess + ?Sized>(&mut self, doc: &D, record: &MutationRecord) {
        match record.mutation_type {
            MutationType::ChildList => {
                let Some((region, config)) = live_region_for(doc, record.target) else { return };
                if config.busy {
                    tracing::trace!(?region, "live region busy, change suppressed");
                    return;
                }
                if config.relevant.additions {
                    for &added in &record.added_nodes {
                        if !doc.contains(added) || is_hidden(doc, added) {
                            continue;
                        }
                        self.queue(doc, region, config, ChangeType::Addition, plain_text(doc, added));
                    }
                }
                if config.relevant.removals {
                    for &removed in &record.removed_nodes {
                        self.queue(doc, region, config, ChangeType::Removal, detached_text(doc, removed));
                    }
                }
            }
            MutationType::CharacterData => {
                let Some(parent) = doc.parent(record.target) else { return };
                let Some((region, config)) = live_region_for(doc, parent) else { return };
                if config.busy || !config.relevant.text || is_hidden(doc, record.target) {
                    return;
                }
                let text = doc.text(record.target).map(collapse_whitespace).unwrap_or_default();
                self.queue(doc, region, config, ChangeType::TextChange, text);
            }
            MutationType::Attributes => {
                // Leaving the busy state announces the settled region
                if record.attribute_name.as_deref() != Some("aria-busy")
                    || record.old_value.as_deref() != Some("true")
                {
                    return;
                }
                let Some((region, config)) = live_region_for(doc, record.target) else { return };
                if region == record.target && !config.busy {
                    let text = plain_text(doc, region);
                    self.queue(doc, region, config.with_atomic(true), ChangeType::TextChange, text);
                }
            }
        }
    }

    fn queue<D: DomAccess + ?Sized>(
        &mut self,
        doc: &D,
        region: NodeId,
        config: LiveRegionConfig,
        change_type: ChangeType,
        text: String,
    ) {
        let text = if config.atomic { plain_text(doc, region) } else { text };
        if text.is_empty() {
            return;
        }
        if config.atomic {
            // One announcement per atomic region, carrying its latest text
            self.pending.retain(|c| c.region != region);
        }
        tracing::debug!(?region, ?change_type, %text, "live region change");
        self.pending.push_back(LiveRegionChange {
            region,
            change_type,
            text,
            politeness: config.politeness,
        });
    }

    /// Take every pending change, assertive ones first
    pub fn drain(&mut self) -> Vec<LiveRegionChange> {
        let (mut assertive, polite): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|c| c.politeness == LiveRegionMode::Assertive);
        assertive.extend(polite);
        assertive
    }

    /// Check if there are pending announcements
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Get number of pending announcements
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// Text of a subtree regardless of rendering, for removed nodes
fn detached_text<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> String {
    fn walk<D: DomAccess + ?Sized>(doc: &D, node: NodeId, out: &mut String) {
        if let Some(text) = doc.text(node) {
            out.push_str(text);
            return;
        }
        for child in doc.children(node) {
            walk(doc, child, out);
        }
    }
    let mut out = String::new();
    walk(doc, node, &mut out);
    collapse_whitespace(&out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::Document;

    fn region(doc: &mut Document, attrs: &[(&str, &str)]) -> NodeId {
        let body = doc.body();
        let node = doc.create_element("div");
        for (name, value) in attrs {
            doc.set_attribute(node, name, value).unwrap();
        }
        doc.append_child(body, node).unwrap();
        node
    }

    fn add_text(doc: &mut Document, parent: NodeId, data: &str) -> MutationRecord {
        let text = doc.create_text(data);
        doc.append_child(parent, text).unwrap();
        MutationRecord::child_list(parent, vec![text], Vec::new())
    }

    #[test]
    fn test_relevant_flags() {
        let flags = RelevantFlags::from_aria(&[LiveRelevant::Removals]);
        assert!(flags.removals && !flags.additions);
        assert_eq!(RelevantFlags::from_aria(&[]), RelevantFlags::additions_text());
        assert_eq!(RelevantFlags::from_aria(&[LiveRelevant::All]), RelevantFlags::all());
    }

    #[test]
    fn test_config_from_roles() {
        let mut doc = Document::default();
        let alert = region(&mut doc, &[("role", "alert")]);
        let status = region(&mut doc, &[("role", "status"), ("aria-live", "assertive")]);
        let timer = region(&mut doc, &[("role", "timer")]);
        let plain = region(&mut doc, &[]);

        let config = LiveRegionConfig::from_element(&doc, alert).unwrap();
        assert_eq!(config.politeness, LiveRegionMode::Assertive);
        assert!(config.atomic);
        assert_eq!(
            LiveRegionConfig::from_element(&doc, status).unwrap().politeness,
            LiveRegionMode::Assertive
        );
        assert_eq!(live_region_for(&doc, timer), None);
        assert_eq!(LiveRegionConfig::from_element(&doc, plain), None);
    }

    #[test]
    fn test_additions_announced_assertive_first() {
        let mut doc = Document::default();
        let polite = region(&mut doc, &[("aria-live", "polite")]);
        let urgent = region(&mut doc, &[("aria-live", "assertive")]);

        let mut tracker = LiveRegionTracker::new();
        let first = add_text(&mut doc, polite, "Saved");
        let second = add_text(&mut doc, urgent, "Connection lost");
        tracker.observe(&doc, &first);
        tracker.observe(&doc, &second);

        let texts: Vec<String> = tracker.drain().into_iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["Connection lost", "Saved"]);
        assert!(!tracker.has_pending());
    }

    #[test]
    fn test_busy_region_suppressed() {
        let mut doc = Document::default();
        let busy = region(&mut doc, &[("aria-live", "polite"), ("aria-busy", "true")]);
        let mut tracker = LiveRegionTracker::new();
        let record = add_text(&mut doc, busy, "Loading");
        tracker.observe(&doc, &record);
        assert_eq!(tracker.pending_count(), 0);

        doc.set_attribute(busy, "aria-busy", "false").unwrap();
        let record = MutationRecord::attribute(busy, "aria-busy", Some("true".into()));
        tracker.observe(&doc, &record);
        assert_eq!(tracker.drain()[0].text, "Loading");
    }

    #[test]
    fn test_atomic_region_announces_whole_text() {
        let mut doc = Document::default();
        let clock = region(&mut doc, &[("aria-live", "polite"), ("aria-atomic", "true")]);
        let mut tracker = LiveRegionTracker::new();
        let hours = add_text(&mut doc, clock, "10:");
        let minutes = add_text(&mut doc, clock, "30");
        tracker.observe(&doc, &hours);
        tracker.observe(&doc, &minutes);

        let changes = tracker.drain();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].text, "10:30");
    }

    #[test]
    fn test_region_inside_aria_hidden_subtree_is_silent() {
        let mut doc = Document::default();
        let hidden = region(&mut doc, &[("aria-hidden", "true")]);
        let status = doc.create_element("div");
        doc.set_attribute(status, "role", "status").unwrap();
        doc.append_child(hidden, status).unwrap();

        assert_eq!(live_region_for(&doc, status), None);
        let mut tracker = LiveRegionTracker::new();
        let record = add_text(&mut doc, status, "Saved");
        tracker.observe(&doc, &record);
        assert!(!tracker.has_pending());
    }
}
