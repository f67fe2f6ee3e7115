//! CloudWatch Logs client for logscope
//!
//! This crate provides the paginated remote calls the traversal engine walks:
//! log group listing, log stream listing and log event listing, one page per
//! call.

mod client;
mod service;

pub use client::CloudWatchClient;
pub use service::{EventQuery, LogService, MAX_EVENTS_PER_PAGE};

// Re-export types that are used in our public API
pub use logscope_types::{
    EventCursor, EventPage, Group, GroupCursor, GroupPage, RawEvent, Stream, StreamCursor,
    StreamPage,
};
