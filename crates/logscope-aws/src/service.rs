use anyhow::Result;
use async_trait::async_trait;

use logscope_types::{EventCursor, EventPage, GroupCursor, GroupPage, StreamCursor, StreamPage};

/// Largest page the event listing API will return
pub const MAX_EVENTS_PER_PAGE: usize = 10_000;

/// Parameters for a single event page request
#[derive(Clone, Copy, Debug)]
pub struct EventQuery<'a> {
    pub group: &'a str,
    pub stream: &'a str,
    /// Read from the oldest event (`true`) or the newest (`false`)
    pub from_head: bool,
    pub cursor: Option<&'a EventCursor>,
    /// Number of events requested for this page
    pub limit: usize,
}

/// Paginated, read-only access to a log service.
///
/// Every method issues exactly one remote request and returns one page.
/// Transport and authentication failures are returned as errors; a response
/// missing a field is returned as a page with that field empty.
#[async_trait]
pub trait LogService: Send + Sync {
    /// List log groups whose name starts with `prefix`
    async fn list_groups(
        &self,
        prefix: Option<&str>,
        cursor: Option<&GroupCursor>,
    ) -> Result<GroupPage>;

    /// List streams in a group, newest event first when `by_recency` is set
    async fn list_streams(
        &self,
        group: &str,
        by_recency: bool,
        cursor: Option<&StreamCursor>,
    ) -> Result<StreamPage>;

    /// Fetch one page of events from a stream
    async fn list_events(&self, query: EventQuery<'_>) -> Result<EventPage>;
}
