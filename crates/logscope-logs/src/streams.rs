use logscope_aws::LogService;
use logscope_types::{LogRecord, StreamCursor, WalkResult};

use crate::error::TraversalError;
use crate::events::{EventPageWalker, EventWalkOptions};
use crate::filter::EventFilter;

/// Visits the streams of one group, freshest first, until the limit is spent
pub struct StreamWalker<'a, S: ?Sized> {
    service: &'a S,
    events: EventPageWalker<'a, S>,
}

impl<'a, S: LogService + ?Sized> StreamWalker<'a, S> {
    pub fn new(service: &'a S, filter: &'a EventFilter, options: EventWalkOptions) -> Self {
        Self {
            service,
            events: EventPageWalker::new(service, filter, options),
        }
    }

    /// Collect up to `limit` records across the group's streams.
    ///
    /// Each stream gets the budget left over by the streams before it. The
    /// merged records are sorted by timestamp; records sharing a timestamp
    /// keep the order they were visited in.
    pub async fn walk(&self, group: &str, limit: usize) -> Result<WalkResult, TraversalError> {
        let mut records: Vec<LogRecord> = Vec::new();
        let mut query_count = 0;
        let mut cursor: Option<StreamCursor> = None;

        'pages: while records.len() < limit {
            let page = self
                .service
                .list_streams(group, true, cursor.as_ref())
                .await?;
            query_count += 1;

            for stream in page.streams {
                let remaining = limit.saturating_sub(records.len());
                if remaining == 0 {
                    break 'pages;
                }

                let result = self.events.walk(group, &stream.name, remaining).await?;
                query_count += result.query_count;
                records.extend(result.records);
            }

            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        records.sort_by_key(|r| r.timestamp);

        tracing::info!(group, records = records.len(), query_count, "Walked log group");

        Ok(WalkResult::new(records, query_count))
    }
}
