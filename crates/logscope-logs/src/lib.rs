//! Log traversal for logscope
//!
//! This crate walks the paginated log service APIs: it resolves or lists log
//! groups, visits a group's streams freshest first, pages through each
//! stream's events and filters them into time-ordered records.

mod error;
mod events;
mod filter;
mod groups;
mod streams;
mod traversal;
mod window;

#[cfg(test)]
mod testing;

pub use error::TraversalError;
pub use events::{EventPageWalker, EventWalkOptions, cursor_repeated};
pub use filter::{EventFilter, GroupNameFilter, NOISE_PREFIXES};
pub use groups::{GroupLister, GroupResolver};
pub use streams::StreamWalker;
pub use traversal::{DEFAULT_LIMIT, Traversal, TraversalConfig, TraversalOutcome};
pub use window::RecordWindow;

// Re-export types used in our public API
pub use logscope_types::{
    Direction, ForwardPolicy, Group, GroupListing, LogRecord, Stream, WalkResult,
};
