use logscope_aws::{EventQuery, LogService, MAX_EVENTS_PER_PAGE};
use logscope_types::{Direction, EventCursor, ForwardPolicy, LogRecord, WalkResult};

use crate::error::TraversalError;
use crate::filter::EventFilter;
use crate::window::RecordWindow;

/// How a stream's pages are visited
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventWalkOptions {
    pub direction: Direction,
    pub forward_policy: ForwardPolicy,
}

impl EventWalkOptions {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            forward_policy: ForwardPolicy::default(),
        }
    }

    pub fn with_forward_policy(mut self, policy: ForwardPolicy) -> Self {
        self.forward_policy = policy;
        self
    }

    /// Whether the walk may stop as soon as `limit` records are kept
    fn stops_at_limit(&self) -> bool {
        match self.direction {
            Direction::Reverse => true,
            Direction::Forward => self.forward_policy == ForwardPolicy::StopAtLimit,
        }
    }
}

/// Check whether the service handed back the cursor it was just given.
///
/// CloudWatch signals the end of a stream by repeating the last token
/// forever instead of omitting it.
pub fn cursor_repeated(previous: Option<&EventCursor>, next: &EventCursor) -> bool {
    previous == Some(next)
}

/// Pages through the events of a single stream
pub struct EventPageWalker<'a, S: ?Sized> {
    service: &'a S,
    filter: &'a EventFilter,
    options: EventWalkOptions,
}

impl<'a, S: LogService + ?Sized> EventPageWalker<'a, S> {
    pub fn new(service: &'a S, filter: &'a EventFilter, options: EventWalkOptions) -> Self {
        Self {
            service,
            filter,
            options,
        }
    }

    /// Walk one stream and return at most `limit` kept records, oldest first.
    ///
    /// A page without an events field ends the walk with whatever was
    /// collected. Transport failures are returned as errors.
    pub async fn walk(
        &self,
        group: &str,
        stream: &str,
        limit: usize,
    ) -> Result<WalkResult, TraversalError> {
        if limit == 0 {
            return Ok(WalkResult::default());
        }

        let mut window = RecordWindow::new(limit);
        let mut query_count = 0;
        let reverse = self.options.direction == Direction::Reverse;
        let stops_at_limit = self.options.stops_at_limit();
        // A read-to-end walk keeps paging past the limit, so ask for full pages
        let page_size = if stops_at_limit {
            limit.min(MAX_EVENTS_PER_PAGE)
        } else {
            MAX_EVENTS_PER_PAGE
        };
        let mut cursor: Option<EventCursor> = None;

        loop {
            let page = self
                .service
                .list_events(EventQuery {
                    group,
                    stream,
                    from_head: self.options.direction.from_head(),
                    cursor: cursor.as_ref(),
                    limit: page_size,
                })
                .await?;
            query_count += 1;

            let Some(mut events) = page.events else {
                tracing::warn!(group, stream, "Event page has no events field, stopping");
                break;
            };

            let returned = events.len();
            if reverse {
                events.reverse();
            }

            let mut reached_limit = false;
            for event in events {
                if !self.filter.keep(&event.message) {
                    tracing::trace!(stream, timestamp = event.timestamp_millis, "Filtered event");
                    continue;
                }

                window.push(LogRecord::from_raw(event));
                if stops_at_limit && window.is_full() {
                    reached_limit = true;
                    break;
                }
            }

            if reached_limit {
                break;
            }

            let next = if reverse {
                page.next_backward
            } else {
                page.next_forward
            };

            let Some(next) = next else {
                break;
            };

            if cursor_repeated(cursor.as_ref(), &next) {
                tracing::debug!(stream, cursor = next.as_str(), "Cursor repeated, end of stream");
                break;
            }

            // A short page usually means there is nothing left
            if returned < page_size {
                break;
            }

            cursor = Some(next);
        }

        if window.evicted() > 0 {
            tracing::debug!(stream, dropped = window.evicted(), "Truncated to most recent records");
        }

        let mut records = window.into_vec();
        if reverse {
            records.reverse();
        }

        tracing::debug!(stream, records = records.len(), query_count, "Walked stream");

        Ok(WalkResult::new(records, query_count))
    }
}
