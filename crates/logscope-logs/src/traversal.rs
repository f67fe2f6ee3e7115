use logscope_aws::LogService;
use logscope_types::{Direction, ForwardPolicy, GroupListing, WalkResult};

use crate::error::TraversalError;
use crate::events::EventWalkOptions;
use crate::filter::{EventFilter, GroupNameFilter};
use crate::groups::{GroupLister, GroupResolver};
use crate::streams::StreamWalker;

/// Default number of events fetched per log group
pub const DEFAULT_LIMIT: usize = 100;

/// Settings for one traversal
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraversalConfig {
    /// Log group to tail; `None` lists groups instead
    pub target_group: Option<String>,
    /// List mode was requested explicitly
    pub list_mode: bool,
    /// Maximum number of events returned for the group
    pub limit: usize,
    pub direction: Direction,
    pub forward_policy: ForwardPolicy,
    pub suppress_noise: bool,
    /// Keep only messages matching this pattern at their start
    pub grep_pattern: Option<String>,
    /// Group name filter, list mode only
    pub group_pattern: Option<String>,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            target_group: None,
            list_mode: false,
            limit: DEFAULT_LIMIT,
            direction: Direction::default(),
            forward_policy: ForwardPolicy::default(),
            suppress_noise: false,
            grep_pattern: None,
            group_pattern: None,
        }
    }
}

impl TraversalConfig {
    /// Tail the given log group
    pub fn tail(group: impl Into<String>) -> Self {
        Self {
            target_group: Some(group.into()),
            ..Self::default()
        }
    }

    /// List log groups
    pub fn list() -> Self {
        Self {
            list_mode: true,
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_forward_policy(mut self, policy: ForwardPolicy) -> Self {
        self.forward_policy = policy;
        self
    }

    pub fn with_noise_suppressed(mut self, suppress: bool) -> Self {
        self.suppress_noise = suppress;
        self
    }

    pub fn with_grep(mut self, pattern: impl Into<String>) -> Self {
        self.grep_pattern = Some(pattern.into());
        self
    }

    pub fn with_group_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.group_pattern = Some(pattern.into());
        self
    }

    fn event_filter(&self) -> Result<EventFilter, TraversalError> {
        let filter = EventFilter::new().with_noise_suppressed(self.suppress_noise);
        match &self.grep_pattern {
            Some(pattern) => filter.with_grep(pattern),
            None => Ok(filter),
        }
    }

    fn walk_options(&self) -> EventWalkOptions {
        EventWalkOptions::new(self.direction).with_forward_policy(self.forward_policy)
    }

    /// Check the settings without contacting the service
    pub fn validate(&self) -> Result<(), TraversalError> {
        self.plan().map(|_| ())
    }

    /// Reject contradictory settings before anything is requested
    fn plan(&self) -> Result<Plan<'_>, TraversalError> {
        match (&self.target_group, self.list_mode) {
            (Some(group), true) => Err(TraversalError::ConfigurationConflict(group.clone())),
            (Some(group), false) => {
                if self.limit == 0 {
                    return Err(TraversalError::InvalidLimit);
                }
                Ok(Plan::Tail {
                    group,
                    filter: self.event_filter()?,
                })
            }
            (None, _) => Ok(Plan::List {
                filter: GroupNameFilter::new(self.group_pattern.as_deref())?,
            }),
        }
    }
}

enum Plan<'a> {
    Tail { group: &'a str, filter: EventFilter },
    List { filter: GroupNameFilter },
}

/// What a traversal produced, ready for rendering
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraversalOutcome {
    Groups(GroupListing),
    Records(WalkResult),
    GroupNotFound { name: String, query_count: usize },
}

impl TraversalOutcome {
    /// Total page requests made by the traversal
    pub fn query_count(&self) -> usize {
        match self {
            Self::Groups(listing) => listing.query_count,
            Self::Records(result) => result.query_count,
            Self::GroupNotFound { query_count, .. } => *query_count,
        }
    }
}

/// Entry point: lists groups or tails one, depending on the configuration
pub struct Traversal<'a, S: ?Sized> {
    service: &'a S,
}

impl<'a, S: LogService + ?Sized> Traversal<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    pub async fn run(&self, config: &TraversalConfig) -> Result<TraversalOutcome, TraversalError> {
        match config.plan()? {
            Plan::List { filter } => {
                let listing = GroupLister::new(self.service).list(&filter).await?;
                Ok(TraversalOutcome::Groups(listing))
            }
            Plan::Tail { group, filter } => {
                let (found, lookups) = GroupResolver::new(self.service).resolve(group).await?;

                let Some(found) = found else {
                    return Ok(TraversalOutcome::GroupNotFound {
                        name: group.to_string(),
                        query_count: lookups,
                    });
                };

                let mut result = StreamWalker::new(self.service, &filter, config.walk_options())
                    .walk(&found.name, config.limit)
                    .await?;
                result.query_count += lookups;

                tracing::info!(
                    group,
                    records = result.records.len(),
                    query_count = result.query_count,
                    "Traversal complete"
                );

                Ok(TraversalOutcome::Records(result))
            }
        }
    }
}
