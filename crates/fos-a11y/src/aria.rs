//! ARIA States and Properties
//!
//! Typed view over the `aria-*` attributes of one element.

use std::collections::HashMap;

use fos_dom::{DomAccess, NodeId};

/// Tri-state value for `aria-checked` / `aria-pressed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tristate {
    True,
    False,
    Mixed,
}

/// Kinds of `aria-invalid`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalid {
    True,
    Grammar,
    Spelling,
}

/// ARIA state or property value
#[derive(Debug, Clone, PartialEq)]
pub enum AriaState {
    Checked(Tristate),
    Pressed(Tristate),
    Disabled(bool),
    Expanded(bool),
    Hidden(bool),
    Invalid(Invalid),
    Selected(bool),
    ReadOnly(bool),
    Required(bool),
    Busy(bool),
    Modal(bool),
    MultiSelectable(bool),
    HasPopup(String),
    /// `aria-current`; empty kind for plain `true`
    Current(String),

    ValueText(String),
    ValueNow(f64),
    Level(u32),
    PosInSet(u32),
    SetSize(u32),

    Live(LiveRegionMode),
    Atomic(bool),
    Relevant(Vec<LiveRelevant>),
}

/// Live region mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LiveRegionMode {
    Off,
    Polite,
    Assertive,
}

/// Live region relevant values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveRelevant {
    Additions,
    Removals,
    Text,
    All,
}

/// Attributes consulted when building an [`AriaAttributes`]
const STATE_NAMES: &[&str] = &[
    "checked", "pressed", "disabled", "expanded", "hidden", "invalid", "selected",
    "readonly", "required", "busy", "modal", "multiselectable", "haspopup", "current",
    "valuetext", "valuenow", "level",
    "posinset", "setsize", "live", "atomic", "relevant",
];

/// ARIA attributes on an element
#[derive(Debug, Clone, Default)]
pub struct AriaAttributes {
    pub states: HashMap<&'static str, AriaState>,
}

impl AriaAttributes {
    pub fn new() -> Self { Self::default() }

    /// Read every supported `aria-*` attribute of an element
    pub fn from_element<D: DomAccess + ?Sized>(doc: &D, node: NodeId) -> Self {
        let mut aria = Self::new();
        for &name in STATE_NAMES {
            let attr = format!("aria-{name}");
            if let Some(value) = doc.attribute(node, &attr) {
                if let Some(state) = Self::parse_state(name, value.trim()) {
                    aria.states.insert(name, state);
                }
            }
        }
        aria
    }

    fn parse_state(name: &str, value: &str) -> Option<AriaState> {
        // Value text keeps its original case
        if name == "valuetext" {
            return (!value.is_empty()).then(|| AriaState::ValueText(value.to_string()));
        }

        let value = value.to_ascii_lowercase();
        let value = value.as_str();
        Some(match name {
            "checked" => AriaState::Checked(parse_tristate(value)?),
            "pressed" => AriaState::Pressed(parse_tristate(value)?),
            "disabled" => AriaState::Disabled(value == "true"),
            "expanded" => AriaState::Expanded(parse_bool(value)?),
            "hidden" => AriaState::Hidden(value == "true"),
            "invalid" => AriaState::Invalid(match value {
                "" | "false" => return None,
                "grammar" => Invalid::Grammar,
                "spelling" => Invalid::Spelling,
                _ => Invalid::True,
            }),
            "selected" => AriaState::Selected(parse_bool(value)?),
            "readonly" => AriaState::ReadOnly(value == "true"),
            "required" => AriaState::Required(value == "true"),
            "busy" => AriaState::Busy(value == "true"),
            "modal" => AriaState::Modal(value == "true"),
            "multiselectable" => AriaState::MultiSelectable(value == "true"),
            "haspopup" => AriaState::HasPopup(match value {
                "" | "false" => return None,
                "true" => "menu".to_string(),
                "menu" | "listbox" | "tree" | "grid" | "dialog" => value.to_string(),
                _ => return None,
            }),
            "current" => AriaState::Current(match value {
                "" | "false" => return None,
                "true" => String::new(),
                "page" | "step" | "location" | "date" | "time" => value.to_string(),
                _ => String::new(),
            }),

            "valuenow" => AriaState::ValueNow(value.parse().ok()?),
            "level" => AriaState::Level(value.parse().ok().filter(|&l| l > 0)?),
            "posinset" => AriaState::PosInSet(value.parse().ok().filter(|&p| p > 0)?),
            "setsize" => AriaState::SetSize(value.parse().ok()?),

            "live" => AriaState::Live(match value {
                "polite" => LiveRegionMode::Polite,
                "assertive" => LiveRegionMode::Assertive,
                _ => LiveRegionMode::Off,
            }),
            "atomic" => AriaState::Atomic(value == "true"),
            "relevant" => AriaState::Relevant(
                value.split_whitespace()
                    .filter_map(|s| match s {
                        "additions" => Some(LiveRelevant::Additions),
                        "removals" => Some(LiveRelevant::Removals),
                        "text" => Some(LiveRelevant::Text),
                        "all" => Some(LiveRelevant::All),
                        _ => None,
                    })
                    .collect()
            ),

            _ => return None,
        })
    }

    pub fn get(&self, name: &str) -> Option<&AriaState> {
        self.states.get(name)
    }

    pub fn checked(&self) -> Option<Tristate> {
        match self.get("checked") { Some(AriaState::Checked(t)) => Some(*t), _ => None }
    }

    pub fn pressed(&self) -> Option<Tristate> {
        match self.get("pressed") { Some(AriaState::Pressed(t)) => Some(*t), _ => None }
    }

    pub fn is_expanded(&self) -> Option<bool> {
        match self.get("expanded") { Some(AriaState::Expanded(e)) => Some(*e), _ => None }
    }

    pub fn is_selected(&self) -> Option<bool> {
        match self.get("selected") { Some(AriaState::Selected(s)) => Some(*s), _ => None }
    }

    pub fn invalid(&self) -> Option<Invalid> {
        match self.get("invalid") { Some(AriaState::Invalid(i)) => Some(*i), _ => None }
    }

    pub fn has_popup(&self) -> Option<&str> {
        match self.get("haspopup") { Some(AriaState::HasPopup(k)) => Some(k), _ => None }
    }

    pub fn current(&self) -> Option<&str> {
        match self.get("current") { Some(AriaState::Current(k)) => Some(k), _ => None }
    }

    pub fn level(&self) -> Option<u32> {
        match self.get("level") { Some(AriaState::Level(l)) => Some(*l), _ => None }
    }

    pub fn pos_in_set(&self) -> Option<u32> {
        match self.get("posinset") { Some(AriaState::PosInSet(p)) => Some(*p), _ => None }
    }

    pub fn set_size(&self) -> Option<u32> {
        match self.get("setsize") { Some(AriaState::SetSize(s)) => Some(*s), _ => None }
    }

    pub fn value_text(&self) -> Option<&str> {
        match self.get("valuetext") { Some(AriaState::ValueText(v)) => Some(v), _ => None }
    }

    pub fn value_now(&self) -> Option<f64> {
        match self.get("valuenow") { Some(AriaState::ValueNow(v)) => Some(*v), _ => None }
    }

    pub fn live(&self) -> Option<LiveRegionMode> {
        match self.get("live") { Some(AriaState::Live(m)) => Some(*m), _ => None }
    }

    pub fn relevant(&self) -> Option<&[LiveRelevant]> {
        match self.get("relevant") { Some(AriaState::Relevant(r)) => Some(r), _ => None }
    }

    /// Boolean flag states (`disabled`, `hidden`, `busy`, ...)
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name),
            Some(AriaState::Disabled(true) | AriaState::Hidden(true) |
                AriaState::ReadOnly(true) | AriaState::Required(true) |
                AriaState::Busy(true) | AriaState::Modal(true) |
                AriaState::MultiSelectable(true) | AriaState::Atomic(true))
        )
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_tristate(value: &str) -> Option<Tristate> {
    match value {
        "true" => Some(Tristate::True),
        "false" => Some(Tristate::False),
        "mixed" => Some(Tristate::Mixed),
        _ => None,
    }
}
