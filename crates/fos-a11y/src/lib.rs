//! fOS Accessibility
//!
//! Accessibility tree construction for the fOS virtual screen reader.
//!
//! Features:
//! - ARIA roles, states, properties
//! - Accessible name and description computation
//! - Accessibility tree and its flattened, phrase-rendered form
//! - Live region change tracking

pub mod aria;
pub mod classify;
pub mod flatten;
pub mod live_region;
pub mod name;
pub mod role;
pub mod tree;

pub use aria::{AriaAttributes, AriaState, LiveRegionMode, LiveRelevant, Tristate};
pub use classify::{active_descendant, classify, state_labels, Inclusion, SetPosition};
pub use flatten::{flatten, render_item_text, render_phrase, Boundary, FlattenedEntry};
pub use live_region::{live_region_for, LiveRegionChange, LiveRegionConfig, LiveRegionTracker, RelevantFlags};
pub use name::{compute_description, compute_name, compute_referenced_name, describe, ComputedDescription, ComputedName, NameContext, NameSource};
pub use role::{resolve_role, AriaRole};
pub use tree::{build, AccessibilityNode, TreeCache};
