//! Shared types for logscope
//!
//! This crate contains data structures used across multiple logscope crates.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

// ============================================================================
// Pagination
// ============================================================================

/// Marker for the log group listing cursor space
#[derive(Clone, Copy, Debug)]
pub enum GroupSpace {}

/// Marker for the log stream listing cursor space
#[derive(Clone, Copy, Debug)]
pub enum StreamSpace {}

/// Marker for the event listing cursor space (one stream)
#[derive(Clone, Copy, Debug)]
pub enum EventSpace {}

/// Opaque continuation token returned by the log service.
///
/// The type parameter pins a cursor to the pagination space that produced it,
/// so a stream cursor can never be handed to the event API or compared with a
/// group cursor.
pub struct Cursor<S> {
    token: String,
    space: PhantomData<S>,
}

impl<S> Cursor<S> {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            space: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }
}

impl<S> Clone for Cursor<S> {
    fn clone(&self) -> Self {
        Self::new(self.token.clone())
    }
}

impl<S> PartialEq for Cursor<S> {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl<S> Eq for Cursor<S> {}

impl<S> fmt::Debug for Cursor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.token).finish()
    }
}

pub type GroupCursor = Cursor<GroupSpace>;
pub type StreamCursor = Cursor<StreamSpace>;
pub type EventCursor = Cursor<EventSpace>;

/// One page of the log group listing
#[derive(Clone, Debug, Default)]
pub struct GroupPage {
    pub groups: Vec<Group>,
    pub next: Option<GroupCursor>,
}

/// One page of the log stream listing for a group
#[derive(Clone, Debug, Default)]
pub struct StreamPage {
    pub streams: Vec<Stream>,
    pub next: Option<StreamCursor>,
}

/// One page of raw events from a single stream
#[derive(Clone, Debug, Default)]
pub struct EventPage {
    /// `None` when the response carried no events field at all
    pub events: Option<Vec<RawEvent>>,
    pub next_forward: Option<EventCursor>,
    pub next_backward: Option<EventCursor>,
}

// ============================================================================
// Remote Metadata
// ============================================================================

/// Log group information
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Group {
    pub name: String,
    /// Creation time (Unix milliseconds)
    pub creation_time: i64,
    /// Retention in days, `None` means never expire
    pub retention_days: Option<i32>,
    pub stored_bytes: i64,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            creation_time: 0,
            retention_days: None,
            stored_bytes: 0,
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.creation_time).single()
    }

    /// Format retention as "30d" or "unlimited"
    pub fn retention_label(&self) -> String {
        match self.retention_days {
            Some(days) => format!("{}d", days),
            None => "unlimited".to_string(),
        }
    }
}

/// Log stream information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stream {
    pub name: String,
    pub group: String,
    /// Unix milliseconds of the newest event, if the stream has any
    pub last_event_time: Option<i64>,
    pub first_event_time: Option<i64>,
    pub creation_time: Option<i64>,
}

impl Stream {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            last_event_time: None,
            first_event_time: None,
            creation_time: None,
        }
    }
}

// ============================================================================
// Log Types
// ============================================================================

/// An event exactly as the service returned it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEvent {
    /// Unix milliseconds
    pub timestamp_millis: i64,
    pub message: String,
}

impl RawEvent {
    pub fn new(timestamp_millis: i64, message: impl Into<String>) -> Self {
        Self {
            timestamp_millis,
            message: message.into(),
        }
    }
}

/// A log line kept by the traversal engine
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    /// Message content, possibly spanning several lines
    pub message: String,
}

impl LogRecord {
    pub fn new(timestamp: i64, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }

    /// Build a record from a raw event, truncating milliseconds to seconds
    pub fn from_raw(event: RawEvent) -> Self {
        Self {
            timestamp: event.timestamp_millis / 1000,
            message: event.message,
        }
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.timestamp, 0).single()
    }
}

/// Order in which a stream's history is visited
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    /// Oldest first, from the head of the stream
    #[default]
    Forward,
    /// Newest first, from the tail of the stream
    Reverse,
}

impl Direction {
    /// Whether the service should be read from the head of the stream
    pub fn from_head(&self) -> bool {
        matches!(self, Self::Forward)
    }
}

/// How a forward walk handles the event limit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ForwardPolicy {
    /// Read every page, then keep the most recent `limit` records
    #[default]
    ReadToEnd,
    /// Stop once `limit` records are kept; yields the oldest records
    StopAtLimit,
}

/// Records produced by one walk, with the number of page requests it made
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WalkResult {
    pub records: Vec<LogRecord>,
    pub query_count: usize,
}

impl WalkResult {
    pub fn new(records: Vec<LogRecord>, query_count: usize) -> Self {
        Self {
            records,
            query_count,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Groups matched in list mode
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GroupListing {
    pub groups: Vec<Group>,
    pub query_count: usize,
}
