//! In-memory log service used by the traversal tests.
//!
//! Event tokens follow CloudWatch: `f/N` and `b/N` mark positions in a
//! stream, and the forward token handed back at the end of a stream is the
//! one that was passed in.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

use logscope_aws::{EventQuery, LogService};
use logscope_types::{
    Cursor, EventPage, Group, GroupCursor, GroupPage, RawEvent, Stream, StreamCursor, StreamPage,
};

/// A remote call observed by the fake
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Groups(Option<String>),
    Streams(String),
    Events { stream: String, from_head: bool },
}

/// How a fake stream answers event requests
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamBehavior {
    Normal,
    /// Always returns a full page and the same token
    StuckCursor,
    /// Response has no events field
    MissingEvents,
    /// Pages after the first `n` have no events field
    MissingEventsAfter(usize),
    /// Request fails at the transport level
    Failing,
}

struct FakeStream {
    stream: Stream,
    events: Vec<RawEvent>,
    behavior: StreamBehavior,
}

#[derive(Default)]
pub struct FakeLogService {
    groups: Vec<Group>,
    streams: HashMap<String, Vec<FakeStream>>,
    group_page_size: Option<usize>,
    stream_page_size: Option<usize>,
    calls: Mutex<Vec<Call>>,
}

impl FakeLogService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, name: &str) -> Self {
        self.groups.push(Group::new(name));
        self
    }

    /// Add a stream whose events are `(seconds, message)` pairs, oldest first
    pub fn with_stream(mut self, group: &str, name: &str, events: &[(i64, &str)]) -> Self {
        let events: Vec<RawEvent> = events
            .iter()
            .map(|(secs, msg)| RawEvent::new(secs * 1000, *msg))
            .collect();

        let mut stream = Stream::new(name, group);
        stream.first_event_time = events.first().map(|e| e.timestamp_millis);
        stream.last_event_time = events.last().map(|e| e.timestamp_millis);

        self.streams
            .entry(group.to_string())
            .or_default()
            .push(FakeStream {
                stream,
                events,
                behavior: StreamBehavior::Normal,
            });
        self
    }

    pub fn with_behavior(mut self, group: &str, name: &str, behavior: StreamBehavior) -> Self {
        if let Some(stream) = self
            .streams
            .get_mut(group)
            .and_then(|streams| streams.iter_mut().find(|s| s.stream.name == name))
        {
            stream.behavior = behavior;
        }
        self
    }

    pub fn with_group_page_size(mut self, size: usize) -> Self {
        self.group_page_size = Some(size);
        self
    }

    pub fn with_stream_page_size(mut self, size: usize) -> Self {
        self.stream_page_size = Some(size);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of event pages requested from one stream
    pub fn event_calls_for(&self, name: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, Call::Events { stream, .. } if stream == name))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn offset(token: Option<&str>, tag: char) -> Option<usize> {
        token?.strip_prefix(tag)?.strip_prefix('/')?.parse().ok()
    }

    /// Slice `items` into a page starting at `offset`; returns the page and the next offset
    fn page_of<T: Clone>(items: &[T], offset: usize, size: Option<usize>) -> (Vec<T>, Option<usize>) {
        let size = size.unwrap_or(items.len().max(1));
        let end = (offset + size).min(items.len());
        let page = items.get(offset..end).unwrap_or_default().to_vec();
        let next = (end < items.len()).then_some(end);
        (page, next)
    }
}

#[async_trait]
impl LogService for FakeLogService {
    async fn list_groups(
        &self,
        prefix: Option<&str>,
        cursor: Option<&GroupCursor>,
    ) -> Result<GroupPage> {
        self.record(Call::Groups(prefix.map(str::to_string)));

        let matching: Vec<Group> = self
            .groups
            .iter()
            .filter(|g| prefix.is_none_or(|p| g.name.starts_with(p)))
            .cloned()
            .collect();

        let offset = Self::offset(cursor.map(|c| c.as_str()), 'g').unwrap_or(0);
        let (groups, next) = Self::page_of(&matching, offset, self.group_page_size);

        Ok(GroupPage {
            groups,
            next: next.map(|n| Cursor::new(format!("g/{}", n))),
        })
    }

    async fn list_streams(
        &self,
        group: &str,
        by_recency: bool,
        cursor: Option<&StreamCursor>,
    ) -> Result<StreamPage> {
        self.record(Call::Streams(group.to_string()));

        let mut streams: Vec<Stream> = self
            .streams
            .get(group)
            .map(|s| s.iter().map(|f| f.stream.clone()).collect())
            .unwrap_or_default();

        if by_recency {
            streams.sort_by(|a, b| b.last_event_time.cmp(&a.last_event_time));
        }

        let offset = Self::offset(cursor.map(|c| c.as_str()), 's').unwrap_or(0);
        let (streams, next) = Self::page_of(&streams, offset, self.stream_page_size);

        Ok(StreamPage {
            streams,
            next: next.map(|n| Cursor::new(format!("s/{}", n))),
        })
    }

    async fn list_events(&self, query: EventQuery<'_>) -> Result<EventPage> {
        self.record(Call::Events {
            stream: query.stream.to_string(),
            from_head: query.from_head,
        });

        let Some(fake) = self
            .streams
            .get(query.group)
            .and_then(|streams| streams.iter().find(|s| s.stream.name == query.stream))
        else {
            anyhow::bail!("ResourceNotFoundException: stream {} does not exist", query.stream);
        };

        let events = &fake.events;
        let cursor = query.cursor.map(|c| c.as_str());

        match fake.behavior {
            StreamBehavior::Failing => anyhow::bail!("connection reset by peer"),
            StreamBehavior::MissingEvents => Ok(EventPage::default()),
            StreamBehavior::MissingEventsAfter(n) if self.event_calls_for(query.stream) > n => {
                Ok(EventPage::default())
            }
            StreamBehavior::StuckCursor => {
                Ok(EventPage {
                    events: Some(events.iter().cycle().take(query.limit).cloned().collect()),
                    next_forward: Some(Cursor::new("stuck")),
                    next_backward: Some(Cursor::new("stuck")),
                })
            }
            StreamBehavior::Normal | StreamBehavior::MissingEventsAfter(_) => {
                let (start, end) = if query.from_head {
                    let start = Self::offset(cursor, 'f').unwrap_or(0).min(events.len());
                    (start, (start + query.limit).min(events.len()))
                } else {
                    let end = Self::offset(cursor, 'b')
                        .unwrap_or(events.len())
                        .min(events.len());
                    (end.saturating_sub(query.limit), end)
                };

                Ok(EventPage {
                    events: Some(events[start..end].to_vec()),
                    next_forward: Some(Cursor::new(format!("f/{}", end))),
                    next_backward: Some(Cursor::new(format!("b/{}", start))),
                })
            }
        }
    }
}
