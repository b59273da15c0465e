//! DOM Events
//!
//! UI events (click, keydown, input, focus) and listener registration.
//! Listeners receive the document mutably so they can react the way page
//! scripts would.

use std::fmt;
use std::rc::Rc;

use crate::{Document, Modifiers, NodeId};

/// UI event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEventType {
    Click,
    KeyDown,
    Input,
    Focus,
}

/// UI event
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub event_type: DomEventType,
    pub target: NodeId,
    pub current_target: NodeId,
    /// Key name for keyboard events
    pub key: Option<String>,
    pub modifiers: Modifiers,
    pub bubbles: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl DomEvent {
    pub fn new(event_type: DomEventType, target: NodeId) -> Self {
        Self {
            event_type,
            target,
            current_target: target,
            key: None,
            modifiers: Modifiers::default(),
            bubbles: event_type != DomEventType::Focus,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create a keydown event
    pub fn key_down(target: NodeId, key: &str, modifiers: Modifiers) -> Self {
        Self {
            key: Some(key.to_string()),
            modifiers,
            ..Self::new(DomEventType::KeyDown, target)
        }
    }

    /// Cancel the default action
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop bubbling to further ancestors
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Event handler callback
pub type EventHandler = Rc<dyn Fn(&mut Document, &mut DomEvent)>;

struct Listener {
    node: NodeId,
    event_type: DomEventType,
    handler: EventHandler,
}

/// Registered listeners, in registration order
#[derive(Default, Clone)]
pub struct EventListeners {
    listeners: Vec<Rc<Listener>>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: NodeId, event_type: DomEventType, handler: EventHandler) {
        self.listeners.push(Rc::new(Listener { node, event_type, handler }));
    }

    /// Handlers registered for a node and event type
    pub fn handlers_for(&self, node: NodeId, event_type: DomEventType) -> Vec<EventHandler> {
        self.listeners
            .iter()
            .filter(|l| l.node == node && l.event_type == event_type)
            .map(|l| Rc::clone(&l.handler))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}
