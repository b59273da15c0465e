//! Virtual Screen Reader
//!
//! Cursor state machine over the flattened accessibility tree of one
//! container, with item-text and spoken-phrase logs.

use std::cell::RefCell;
use std::rc::Rc;

use fos_a11y::{active_descendant, render_item_text, render_phrase, FlattenedEntry, TreeCache};
use fos_dom::{Document, DomAccess, InputDispatch, KeySpec, NodeData, NodeId};

use crate::command::{Jump, Reference};
use crate::config::ReaderConfig;
use crate::error::{ReaderError, Result};
use crate::watcher::{MutationWatcher, WatchOutcome};

/// Item-text and spoken-phrase logs
#[derive(Debug, Default)]
struct SpeechLog {
    items: Vec<String>,
    phrases: Vec<String>,
}

impl SpeechLog {
    fn speak(&mut self, entry: &FlattenedEntry) {
        let phrase = render_phrase(entry);
        tracing::debug!(index = entry.index, %phrase, "speak");
        self.items.push(render_item_text(entry));
        self.phrases.push(phrase);
    }

    fn announce(&mut self, outcome: WatchOutcome) {
        for change in outcome.announcements {
            tracing::debug!(region = ?change.region, text = %change.text, "announce");
            self.phrases.push(change.text);
        }
    }

    fn clear(&mut self) {
        self.items.clear();
        self.phrases.clear();
    }
}

/// State of a started reader
#[derive(Debug)]
struct Session {
    config: ReaderConfig,
    cache: TreeCache,
    entries: Rc<[FlattenedEntry]>,
    index: usize,
    watcher: MutationWatcher,
}

impl Session {
    fn current(&self) -> Option<&FlattenedEntry> {
        self.entries.get(self.index)
    }

    /// Drain mutations and rebuild when the container changed
    fn refresh(&mut self, doc: &Document) -> WatchOutcome {
        let mut outcome = self.watcher.drain(doc);
        if outcome.invalidate {
            self.rebuild(doc);
        }
        // An excluded container speaks nothing, announcements included
        if self.entries.is_empty() {
            outcome.announcements.clear();
        }
        outcome
    }

    /// Rebuild, keeping the cursor on the same node and boundary when possible
    fn rebuild(&mut self, doc: &Document) {
        let anchor = self.current().map(|e| (e.node.node, e.boundary));
        self.cache.invalidate();
        self.entries = self.cache.entries(doc);
        let relocated = anchor.and_then(|(node, boundary)| {
            self.entries
                .iter()
                .position(|e| e.node.node == node && e.boundary == boundary)
        });
        self.index = relocated.unwrap_or_else(|| self.index.min(self.entries.len().saturating_sub(1)));
        tracing::debug!(entries = self.entries.len(), index = self.index, "tree rebuilt");
    }

    fn current_phrase(&self) -> Option<String> {
        self.current().map(render_phrase)
    }
}

/// A virtual screen reader bound to one document.
///
/// Instances are independent: each owns its cursor, cache, logs and
/// mutation subscription.
pub struct VirtualScreenReader {
    document: Rc<RefCell<Document>>,
    session: Option<Session>,
    log: SpeechLog,
}

impl VirtualScreenReader {
    pub fn new(document: Rc<RefCell<Document>>) -> Self {
        Self { document, session: None, log: SpeechLog::default() }
    }

    pub fn document(&self) -> &Rc<RefCell<Document>> {
        &self.document
    }

    /// Build the tree below the configured container and speak its root
    pub async fn start(&mut self, config: ReaderConfig) -> Result<()> {
        let container = config.container.ok_or(ReaderError::MissingContainer)?;
        let session = {
            let mut doc = self.document.borrow_mut();
            let valid = doc
                .tree()
                .get(container)
                .is_some_and(|n| n.is_element() || matches!(n.data, NodeData::Document));
            if !valid {
                return Err(ReaderError::MissingContainer);
            }
            let watcher = MutationWatcher::new(&mut doc, container, config.announce_live_regions);
            let mut cache = TreeCache::new(container);
            let entries = cache.entries(&*doc);
            Session { config, cache, entries, index: 0, watcher }
        };

        tracing::debug!(?container, entries = session.entries.len(), "reader started");
        self.log.clear();
        if let Some(root) = session.current() {
            self.log.speak(root);
        }
        self.session = Some(session);
        Ok(())
    }

    /// Drop the cursor, cache, subscription and logs
    pub async fn stop(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("reader stopped");
        }
        self.log.clear();
    }

    /// Move to the next entry, staying on the last one at the end
    pub async fn next(&mut self) -> Result<()> {
        self.step(|index, len| (index + 1).min(len - 1))
    }

    /// Move to the previous entry, staying on the first one at the start
    pub async fn previous(&mut self) -> Result<()> {
        self.step(|index, _| index.saturating_sub(1))
    }

    fn step(&mut self, advance: impl Fn(usize, usize) -> usize) -> Result<()> {
        let session = self.session.as_mut().ok_or(ReaderError::NotStarted)?;
        let outcome = session.refresh(&self.document.borrow());
        self.log.announce(outcome);
        if session.entries.is_empty() {
            return Ok(());
        }
        session.index = advance(session.index, session.entries.len());
        self.log.speak(&session.entries[session.index]);
        Ok(())
    }

    /// Jump forward to the next matching entry, wrapping around
    pub async fn next_matching(&mut self, jump: Jump) -> Result<()> {
        self.search(&jump, true)
    }

    /// Jump backward to the previous matching entry, wrapping around
    pub async fn previous_matching(&mut self, jump: Jump) -> Result<()> {
        self.search(&jump, false)
    }

    fn search(&mut self, jump: &Jump, forward: bool) -> Result<()> {
        let session = self.session.as_mut().ok_or(ReaderError::NotStarted)?;
        let outcome = session.refresh(&self.document.borrow());
        self.log.announce(outcome);

        let len = session.entries.len();
        let found = (1..len)
            .map(|offset| {
                if forward {
                    (session.index + offset) % len
                } else {
                    (session.index + len - offset) % len
                }
            })
            .find(|&i| jump.matches(&session.entries[i]));

        match found {
            Some(index) => {
                session.index = index;
                self.log.speak(&session.entries[index]);
            }
            None => tracing::debug!(?jump, "no matching entry"),
        }
        Ok(())
    }

    /// Follow an id reference of the current node to the first entry of
    /// the referenced subtree
    pub async fn jump_to(&mut self, reference: Reference) -> Result<()> {
        let session = self.session.as_mut().ok_or(ReaderError::NotStarted)?;
        let doc = self.document.borrow();
        let outcome = session.refresh(&doc);
        self.log.announce(outcome);

        let Some(source) = session.current().map(|e| e.node.node) else { return Ok(()) };
        let targets = doc
            .attribute(source, reference.attribute())
            .map(|value| doc.resolve_id_refs(value))
            .unwrap_or_default();

        let found = targets.iter().find_map(|&target| {
            session
                .entries
                .iter()
                .position(|e| doc.is_inclusive_ancestor(target, e.node.node))
        });
        match found {
            Some(index) => {
                session.index = index;
                self.log.speak(&session.entries[index]);
            }
            None => tracing::debug!(?reference, ?source, "reference target not in tree"),
        }
        Ok(())
    }

    /// Activate the current node, or its active descendant
    pub async fn act(&mut self) -> Result<()> {
        let session = self.session.as_mut().ok_or(ReaderError::NotStarted)?;
        let before = {
            let doc = self.document.borrow();
            let outcome = session.refresh(&doc);
            self.log.announce(outcome);
            let Some(node) = session.current().map(|e| e.node.node) else { return Ok(()) };
            let target = active_descendant(&*doc, node).unwrap_or(node);
            (target, session.current_phrase())
        };

        let (target, phrase) = before;
        let handled = self.document.borrow_mut().dispatch_activation(target);
        tracing::debug!(?target, handled, "activation dispatched");
        Self::settle_and_speak(session, &self.document, &mut self.log, phrase).await;
        Ok(())
    }

    /// Dispatch a `+`-joined key spec such as `"Shift+a+b"` to the current element
    pub async fn press(&mut self, keys: &str) -> Result<()> {
        let session = self.session.as_mut().ok_or(ReaderError::NotStarted)?;
        let spec = KeySpec::parse(keys);
        let (target, phrase) = {
            let doc = self.document.borrow();
            let outcome = session.refresh(&doc);
            self.log.announce(outcome);
            let Some(node) = session.current().map(|e| e.node.node) else { return Ok(()) };
            let target = if doc.is_element(node) {
                node
            } else {
                doc.focused().unwrap_or_else(|| doc.body())
            };
            (target, session.current_phrase())
        };

        let handled = self.document.borrow_mut().dispatch_keys(target, &spec);
        tracing::debug!(?target, keys, handled, "keys dispatched");
        Self::settle_and_speak(session, &self.document, &mut self.log, phrase).await;
        Ok(())
    }

    /// Wait for mutations, then speak the current entry if it now reads differently
    async fn settle_and_speak(
        session: &mut Session,
        document: &RefCell<Document>,
        log: &mut SpeechLog,
        before: Option<String>,
    ) {
        session.watcher.settle(session.config.settle_cycles).await;
        let outcome = session.refresh(&document.borrow());
        if session.current_phrase() != before {
            if let Some(entry) = session.current() {
                log.speak(entry);
            }
        }
        log.announce(outcome);
    }

    /// Item text of the last spoken entry; empty before anything was spoken
    pub fn item_text(&self) -> String {
        self.log.items.last().cloned().unwrap_or_default()
    }

    /// Last spoken phrase; empty before anything was spoken
    pub fn last_spoken_phrase(&self) -> String {
        self.log.phrases.last().cloned().unwrap_or_default()
    }

    pub fn item_text_log(&self) -> &[String] {
        &self.log.items
    }

    pub fn spoken_phrase_log(&self) -> &[String] {
        &self.log.phrases
    }

    /// Document node commands act on: the `aria-activedescendant` target of
    /// the entry under the cursor when it exists, else the entry's own node
    pub fn active_node(&self) -> Option<NodeId> {
        let node = self.session.as_ref()?.current()?.node.node;
        let doc = self.document.borrow();
        Some(active_descendant(&*doc, node).unwrap_or(node))
    }

    /// Index of the cursor in the flattened sequence
    pub fn position(&self) -> Option<usize> {
        let session = self.session.as_ref()?;
        session.current().map(|_| session.index)
    }

    pub fn is_started(&self) -> bool {
        self.session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader_with_text() -> (VirtualScreenReader, NodeId) {
        let mut doc = Document::default();
        let body = doc.body();
        let text = doc.create_text("Hello");
        doc.append_child(body, text).unwrap();
        (VirtualScreenReader::new(Rc::new(RefCell::new(doc))), body)
    }

    #[test]
    fn test_operations_before_start_fail() {
        let (mut reader, _) = reader_with_text();
        smol::block_on(async {
            assert_eq!(reader.next().await, Err(ReaderError::NotStarted));
            assert_eq!(reader.act().await, Err(ReaderError::NotStarted));
            assert_eq!(reader.press("a").await, Err(ReaderError::NotStarted));
            assert_eq!(reader.jump_to(Reference::Owns).await, Err(ReaderError::NotStarted));
        });
        assert_eq!(reader.last_spoken_phrase(), "");
        assert_eq!(reader.active_node(), None);
    }

    #[test]
    fn test_start_requires_container() {
        let (mut reader, _) = reader_with_text();
        smol::block_on(async {
            assert_eq!(reader.start(ReaderConfig::default()).await, Err(ReaderError::MissingContainer));
            let bogus = ReaderConfig::new(NodeId(9999));
            assert_eq!(reader.start(bogus).await, Err(ReaderError::MissingContainer));
        });
        assert!(!reader.is_started());
    }

    #[test]
    fn test_stop_clears_state() {
        let (mut reader, body) = reader_with_text();
        smol::block_on(async {
            reader.start(ReaderConfig::new(body)).await.unwrap();
            reader.next().await.unwrap();
            assert_eq!(reader.spoken_phrase_log(), ["document", "Hello"]);
            reader.stop().await;
            assert!(reader.spoken_phrase_log().is_empty());
            assert_eq!(reader.next().await, Err(ReaderError::NotStarted));
        });
    }
}
