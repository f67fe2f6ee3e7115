use thiserror::Error;

/// Errors produced by a traversal
#[derive(Debug, Error)]
pub enum TraversalError {
    /// Listing groups and tailing a group were both requested
    #[error("cannot list log groups and tail log group '{0}' at the same time")]
    ConfigurationConflict(String),

    #[error("event limit must be greater than zero")]
    InvalidLimit,

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Failure reported by the log service, passed through unchanged
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}
