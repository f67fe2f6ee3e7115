//! CloudWatch Logs client for logscope

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudwatchlogs as cloudwatchlogs;
use aws_sdk_cloudwatchlogs::types::{LogGroup, LogStream, OrderBy, OutputLogEvent};
use aws_types::region::Region;

use crate::service::{EventQuery, LogService, MAX_EVENTS_PER_PAGE};
use logscope_types::{
    Cursor, EventPage, Group, GroupCursor, GroupPage, RawEvent, Stream, StreamCursor, StreamPage,
};

/// CloudWatch Logs client wrapper
#[derive(Clone, Debug)]
pub struct CloudWatchClient {
    client: cloudwatchlogs::Client,
}

impl CloudWatchClient {
    /// Create a client from the shared AWS configuration chain.
    ///
    /// `profile` and `region` override the environment when given.
    pub async fn new(profile: Option<&str>, region: Option<&str>) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }

        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }

        let config = loader.load().await;

        if config.region().is_none() {
            anyhow::bail!("No AWS region configured. Pass --region or set AWS_REGION");
        }

        tracing::debug!(
            profile = profile.unwrap_or("default"),
            region = ?config.region(),
            "Created CloudWatch Logs client"
        );

        Ok(Self::from_client(cloudwatchlogs::Client::new(&config)))
    }

    /// Wrap an already configured SDK client
    pub fn from_client(client: cloudwatchlogs::Client) -> Self {
        Self { client }
    }

    /// Convert an SDK log group, skipping groups without a name
    fn group_from_sdk(group: LogGroup) -> Option<Group> {
        let mut info = Group::new(group.log_group_name?);
        info.creation_time = group.creation_time.unwrap_or(0);
        info.retention_days = group.retention_in_days;
        info.stored_bytes = group.stored_bytes.unwrap_or(0);
        Some(info)
    }

    fn stream_from_sdk(stream: LogStream, group: &str) -> Option<Stream> {
        let mut info = Stream::new(stream.log_stream_name?, group);
        info.last_event_time = stream.last_event_timestamp;
        info.first_event_time = stream.first_event_timestamp;
        info.creation_time = stream.creation_time;
        Some(info)
    }

    fn event_from_sdk(event: OutputLogEvent) -> RawEvent {
        RawEvent::new(
            event.timestamp.unwrap_or(0),
            event.message.unwrap_or_default(),
        )
    }
}

#[async_trait]
impl LogService for CloudWatchClient {
    async fn list_groups(
        &self,
        prefix: Option<&str>,
        cursor: Option<&GroupCursor>,
    ) -> Result<GroupPage> {
        tracing::debug!(?prefix, has_cursor = cursor.is_some(), "DescribeLogGroups");

        let response = self
            .client
            .describe_log_groups()
            .set_log_group_name_prefix(prefix.map(str::to_string))
            .set_next_token(cursor.map(|c| c.as_str().to_string()))
            .send()
            .await
            .context("Failed to list log groups")?;

        Ok(GroupPage {
            groups: response
                .log_groups
                .unwrap_or_default()
                .into_iter()
                .filter_map(Self::group_from_sdk)
                .collect(),
            next: response.next_token.map(Cursor::new),
        })
    }

    async fn list_streams(
        &self,
        group: &str,
        by_recency: bool,
        cursor: Option<&StreamCursor>,
    ) -> Result<StreamPage> {
        tracing::debug!(group, has_cursor = cursor.is_some(), "DescribeLogStreams");

        let mut request = self
            .client
            .describe_log_streams()
            .log_group_name(group)
            .set_next_token(cursor.map(|c| c.as_str().to_string()));

        if by_recency {
            request = request.order_by(OrderBy::LastEventTime).descending(true);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to list log streams for log group: {}", group))?;

        Ok(StreamPage {
            streams: response
                .log_streams
                .unwrap_or_default()
                .into_iter()
                .filter_map(|s| Self::stream_from_sdk(s, group))
                .collect(),
            next: response.next_token.map(Cursor::new),
        })
    }

    async fn list_events(&self, query: EventQuery<'_>) -> Result<EventPage> {
        let limit = query.limit.clamp(1, MAX_EVENTS_PER_PAGE) as i32;

        tracing::debug!(
            group = query.group,
            stream = query.stream,
            from_head = query.from_head,
            has_cursor = query.cursor.is_some(),
            limit,
            "GetLogEvents"
        );

        let response = self
            .client
            .get_log_events()
            .log_group_name(query.group)
            .log_stream_name(query.stream)
            .start_from_head(query.from_head)
            .limit(limit)
            .set_next_token(query.cursor.map(|c| c.as_str().to_string()))
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to get log events from stream {} in log group {}",
                    query.stream, query.group
                )
            })?;

        Ok(EventPage {
            events: response
                .events
                .map(|events| events.into_iter().map(Self::event_from_sdk).collect()),
            next_forward: response.next_forward_token.map(Cursor::new),
            next_backward: response.next_backward_token.map(Cursor::new),
        })
    }
}
