//! Synthetic Input
//!
//! Key specs (`"Shift+a+b+c"`), activation and key dispatch with the default
//! actions a browser would run after listeners had their turn.

use crate::{DomEvent, DomEventType, Document, NodeId};

/// Modifier keys held during a key sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Parse a modifier token, returning `false` if it is not one
    fn apply(&mut self, token: &str) -> bool {
        match token.to_ascii_lowercase().as_str() {
            "shift" => self.shift = true,
            "control" | "ctrl" => self.control = true,
            "alt" | "option" => self.alt = true,
            "meta" | "cmd" | "command" => self.meta = true,
            _ => return false,
        }
        true
    }

    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }
}

/// Parsed `+`-joined key sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySpec {
    pub modifiers: Modifiers,
    pub keys: Vec<String>,
}

impl KeySpec {
    /// Parse `"Control+Shift+a+b"` style specs; modifiers apply to every key
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        if spec == "+" {
            return Self { modifiers: Modifiers::default(), keys: vec!["+".to_string()] };
        }
        let mut out = Self::default();
        for token in spec.split('+').map(str::trim).filter(|t| !t.is_empty()) {
            if !out.modifiers.apply(token) {
                out.keys.push(token.to_string());
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Character a key inserts into an editable field, if any
pub fn printable_char(key: &str, modifiers: Modifiers) -> Option<char> {
    if modifiers.control || modifiers.meta || modifiers.alt {
        return None;
    }
    if key.eq_ignore_ascii_case("space") {
        return Some(' ');
    }
    let mut chars = key.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(if modifiers.shift { c.to_uppercase().next().unwrap_or(c) } else { c })
}

/// Input-dispatch capability
pub trait InputDispatch {
    /// Run an activation (click) on `target`; returns whether it was dispatched
    fn dispatch_activation(&mut self, target: NodeId) -> bool;

    /// Press every key of `keys` on `target`; returns whether it was dispatched
    fn dispatch_keys(&mut self, target: NodeId, keys: &KeySpec) -> bool;
}

impl InputDispatch for Document {
    fn dispatch_activation(&mut self, target: NodeId) -> bool {
        if !self.is_element(target) || !self.tree().is_connected(target) {
            tracing::debug!(?target, "activation target is not a connected element");
            return false;
        }
        if self.is_disabled(target) {
            tracing::debug!(?target, "activation target is disabled");
            return false;
        }
        self.focus(target);

        let mut event = DomEvent::new(DomEventType::Click, target);
        self.dispatch_event(&mut event);
        if !event.is_default_prevented() {
            self.run_activation_behavior(target);
        }
        true
    }

    fn dispatch_keys(&mut self, target: NodeId, keys: &KeySpec) -> bool {
        if !self.is_element(target) || !self.tree().is_connected(target) {
            tracing::debug!(?target, "key target is not a connected element");
            return false;
        }
        self.focus(target);

        for key in &keys.keys {
            let mut event = DomEvent::key_down(target, key, keys.modifiers);
            self.dispatch_event(&mut event);
            if !event.is_default_prevented() {
                self.run_key_behavior(target, key, keys.modifiers);
            }
        }
        true
    }
}

impl Document {
    /// Dispatch an event along the target's ancestor chain
    pub fn dispatch_event(&mut self, event: &mut DomEvent) {
        let mut path = vec![event.target];
        if event.bubbles {
            path.extend(self.tree().ancestors(event.target));
        }
        for node in path {
            event.current_target = node;
            let handlers = self.listeners().handlers_for(node, event.event_type);
            for handler in handlers {
                handler(self, event);
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
    }

    fn run_activation_behavior(&mut self, target: NodeId) {
        let tag = self.tag_name(target).unwrap_or_default().to_string();
        let input_type = self.input_type(target);
        match (tag.as_str(), input_type.as_deref()) {
            ("input", Some("checkbox")) => self.toggle_attribute(target, "checked"),
            ("input", Some("radio")) => self.check_radio(target),
            ("summary", _) => {
                let Some(details) = self.tree().parent(target) else { return };
                if self.tag_name(details) != Some("details") {
                    return;
                }
                self.toggle_attribute(details, "open");
            }
            ("label", _) => {
                if let Some(control) = self.labeled_control(target) {
                    if control != target {
                        self.dispatch_activation(control);
                    }
                }
            }
            _ => {}
        }
    }

    fn check_radio(&mut self, target: NodeId) {
        if let Some(group) = self.attribute(target, "name").map(str::to_string) {
            let others: Vec<NodeId> = self
                .tree()
                .descendants(NodeId::ROOT)
                .into_iter()
                .filter(|&n| {
                    n != target
                        && self.input_type(n).as_deref() == Some("radio")
                        && self.attribute(n, "name") == Some(group.as_str())
                        && self.attribute(n, "checked").is_some()
                })
                .collect();
            for other in others {
                if let Err(err) = self.remove_attribute(other, "checked") {
                    tracing::debug!(node = ?other, %err, "could not uncheck radio");
                }
            }
        }
        if self.attribute(target, "checked").is_none() {
            if let Err(err) = self.set_attribute(target, "checked", "") {
                tracing::debug!(node = ?target, %err, "could not check radio");
            }
        }
    }

    /// Flip a boolean attribute
    fn toggle_attribute(&mut self, node: NodeId, name: &str) {
        let result = if self.attribute(node, name).is_some() {
            self.remove_attribute(node, name)
        } else {
            self.set_attribute(node, name, "")
        };
        if let Err(err) = result {
            tracing::debug!(?node, name, %err, "could not toggle attribute");
        }
    }

    fn run_key_behavior(&mut self, target: NodeId, key: &str, modifiers: Modifiers) {
        if self.is_text_editable(target) {
            if key.eq_ignore_ascii_case("backspace") {
                let mut value = self.editable_value(target);
                if value.pop().is_some() {
                    self.set_editable_value(target, &value);
                }
            } else if let Some(c) = printable_char(key, modifiers) {
                let mut value = self.editable_value(target);
                value.push(c);
                self.set_editable_value(target, &value);
            }
            return;
        }

        let activates = key.eq_ignore_ascii_case("enter")
            || key.eq_ignore_ascii_case("space")
            || key == " ";
        if activates && self.is_activatable(target) {
            self.dispatch_activation(target);
        }
    }

    fn is_activatable(&self, node: NodeId) -> bool {
        match self.tag_name(node) {
            Some("button" | "summary") => true,
            Some("a") => self.attribute(node, "href").is_some(),
            Some("input") => matches!(
                self.input_type(node).as_deref(),
                Some("checkbox" | "radio" | "button" | "submit" | "reset" | "image")
            ),
            _ => matches!(
                self.attribute(node, "role"),
                Some("button" | "link" | "checkbox" | "menuitem" | "tab" | "option" | "switch")
            ),
        }
    }

    /// Whether typing inserts text into the node
    pub fn is_text_editable(&self, node: NodeId) -> bool {
        if self.is_disabled(node) || self.attribute(node, "readonly").is_some() {
            return false;
        }
        match self.tag_name(node) {
            Some("textarea") => true,
            Some("input") => matches!(
                self.input_type(node).as_deref(),
                Some("text" | "search" | "email" | "url" | "tel" | "password" | "number")
            ),
            Some(_) => matches!(self.attribute(node, "contenteditable"), Some("" | "true")),
            None => false,
        }
    }

    /// Current value of an editable field
    pub fn editable_value(&self, node: NodeId) -> String {
        match self.tag_name(node) {
            Some("input") => self.attribute(node, "value").unwrap_or_default().to_string(),
            Some("textarea") => self
                .attribute(node, "value")
                .map(str::to_string)
                .unwrap_or_else(|| self.text_content(node)),
            _ => self.text_content(node),
        }
    }

    fn set_editable_value(&mut self, node: NodeId, value: &str) {
        let result = match self.tag_name(node) {
            Some("input" | "textarea") => self.set_attribute(node, "value", value),
            _ => self.set_text_content(node, value),
        };
        if let Err(err) = result {
            tracing::debug!(?node, %err, "could not update editable value");
            return;
        }
        let mut event = DomEvent::new(DomEventType::Input, node);
        self.dispatch_event(&mut event);
    }
}
