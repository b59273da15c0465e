//! fOS Reader
//!
//! A virtual screen reader over a live fOS document: builds the
//! accessibility tree of a container, walks it with a cursor, dispatches
//! activation and key input and follows document mutations.

mod command;
mod config;
mod error;
mod reader;
mod watcher;

pub use command::{EntryPredicate, Jump, Reference};
pub use config::ReaderConfig;
pub use error::{ReaderError, Result};
pub use reader::VirtualScreenReader;
pub use watcher::{MutationWatcher, WatchOutcome};
