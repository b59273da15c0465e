//! Cursor commands
//!
//! Rotor-style jump targets and id-reference jumps.

use std::fmt;
use std::rc::Rc;

use fos_a11y::{AriaRole, Boundary, FlattenedEntry};

/// Predicate used by custom jumps
pub type EntryPredicate = Rc<dyn Fn(&FlattenedEntry) -> bool>;

/// Kind of entry a predicate jump stops on
#[derive(Clone)]
pub enum Jump {
    /// Any heading, or only headings of the given level
    Heading(Option<u32>),
    Landmark,
    Link,
    FormControl,
    Button,
    List,
    ListItem,
    Table,
    Graphic,
    Custom(EntryPredicate),
}

impl Jump {
    /// Custom jump from a closure
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&FlattenedEntry) -> bool + 'static,
    {
        Self::Custom(Rc::new(predicate))
    }

    /// Whether the cursor may stop on `entry`; exit boundaries never match
    pub fn matches(&self, entry: &FlattenedEntry) -> bool {
        if entry.boundary == Boundary::Exit {
            return false;
        }
        let Some(role) = entry.role() else { return false };
        match self {
            Self::Heading(None) => role == AriaRole::Heading,
            Self::Heading(Some(level)) => {
                let label = format!("level {level}");
                role == AriaRole::Heading && entry.node.states.iter().any(|s| *s == label)
            }
            Self::Landmark => role.is_landmark(),
            Self::Link => role == AriaRole::Link,
            Self::FormControl => role.is_form_control(),
            Self::Button => role == AriaRole::Button,
            Self::List => matches!(role, AriaRole::List | AriaRole::Listbox | AriaRole::Directory),
            Self::ListItem => role == AriaRole::ListItem,
            Self::Table => matches!(role, AriaRole::Table | AriaRole::Grid | AriaRole::TreeGrid),
            Self::Graphic => matches!(role, AriaRole::Img | AriaRole::Figure),
            Self::Custom(predicate) => predicate(entry),
        }
    }
}

impl fmt::Debug for Jump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heading(level) => f.debug_tuple("Heading").field(level).finish(),
            Self::Landmark => f.write_str("Landmark"),
            Self::Link => f.write_str("Link"),
            Self::FormControl => f.write_str("FormControl"),
            Self::Button => f.write_str("Button"),
            Self::List => f.write_str("List"),
            Self::ListItem => f.write_str("ListItem"),
            Self::Table => f.write_str("Table"),
            Self::Graphic => f.write_str("Graphic"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Id-reference attribute followed by [`jump_to`](crate::VirtualScreenReader::jump_to)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Details,
    ActiveDescendant,
    ErrorMessage,
    Controls,
    Owns,
    FlowTo,
}

impl Reference {
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Details => "aria-details",
            Self::ActiveDescendant => "aria-activedescendant",
            Self::ErrorMessage => "aria-errormessage",
            Self::Controls => "aria-controls",
            Self::Owns => "aria-owns",
            Self::FlowTo => "aria-flowto",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_a11y::AccessibilityNode;
    use fos_dom::NodeId;

    fn entry(role: AriaRole, states: &[&str], boundary: Boundary) -> FlattenedEntry {
        let node = Rc::new(AccessibilityNode {
            node: NodeId(1),
            role: Some(role),
            name: String::new(),
            description: String::new(),
            states: states.iter().map(|s| s.to_string()).collect(),
            children: Vec::new(),
        });
        FlattenedEntry { node, boundary, index: 0 }
    }

    #[test]
    fn test_heading_level_match() {
        let h2 = entry(AriaRole::Heading, &["level 2"], Boundary::Leaf);
        assert!(Jump::Heading(None).matches(&h2));
        assert!(Jump::Heading(Some(2)).matches(&h2));
        assert!(!Jump::Heading(Some(3)).matches(&h2));
    }

    #[test]
    fn test_exit_never_matches() {
        let nav_exit = entry(AriaRole::Navigation, &[], Boundary::Exit);
        assert!(!Jump::Landmark.matches(&nav_exit));
        assert!(!Jump::custom(|_| true).matches(&nav_exit));
        assert!(Jump::Landmark.matches(&entry(AriaRole::Navigation, &[], Boundary::Enter)));
    }

    #[test]
    fn test_reference_attributes() {
        assert_eq!(Reference::FlowTo.attribute(), "aria-flowto");
        assert_eq!(Reference::ActiveDescendant.attribute(), "aria-activedescendant");
    }
}
