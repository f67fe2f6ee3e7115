use regex::Regex;

use crate::error::TraversalError;

/// Lifecycle lines injected by the Lambda runtime rather than the function
pub const NOISE_PREFIXES: [&str; 4] = [
    "INIT_START ",
    "START RequestId: ",
    "END RequestId: ",
    "REPORT RequestId: ",
];

/// Compiled filter for raw event messages
#[derive(Clone, Default)]
pub struct EventFilter {
    /// Pattern anchored at the start of the message (if any)
    regex: Option<Regex>,

    /// Original pattern string
    pattern: Option<String>,

    /// Drop runtime lifecycle lines
    suppress_noise: bool,
}

impl EventFilter {
    /// Create a filter that keeps every message
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only messages matching `pattern` at their start
    pub fn with_grep(mut self, pattern: &str) -> Result<Self, TraversalError> {
        let regex = Regex::new(&format!("^(?:{})", pattern)).map_err(|source| {
            TraversalError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        self.regex = Some(regex);
        self.pattern = Some(pattern.to_string());
        Ok(self)
    }

    /// Drop lifecycle noise lines
    pub fn with_noise_suppressed(mut self, suppress: bool) -> Self {
        self.suppress_noise = suppress;
        self
    }

    /// Check if a message passes every configured filter
    pub fn keep(&self, message: &str) -> bool {
        if self.suppress_noise && Self::is_noise(message) {
            return false;
        }

        match &self.regex {
            Some(re) => re.is_match(message),
            None => true,
        }
    }

    /// Check if a message is a runtime lifecycle line
    pub fn is_noise(message: &str) -> bool {
        NOISE_PREFIXES
            .iter()
            .any(|prefix| message.starts_with(prefix))
    }

    /// Check if filter is empty (keeps everything)
    pub fn is_empty(&self) -> bool {
        self.regex.is_none() && !self.suppress_noise
    }
}

impl std::fmt::Debug for EventFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventFilter")
            .field("pattern", &self.pattern)
            .field("suppress_noise", &self.suppress_noise)
            .finish()
    }
}

/// Client-side filter over log group names, used in list mode
#[derive(Clone, Debug, Default)]
pub struct GroupNameFilter {
    regex: Option<Regex>,
}

impl GroupNameFilter {
    /// Compile a name pattern; `None` matches every group
    pub fn new(pattern: Option<&str>) -> Result<Self, TraversalError> {
        let regex = pattern
            .map(|p| {
                Regex::new(p).map_err(|source| TraversalError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .transpose()?;

        Ok(Self { regex })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.regex.as_ref().is_none_or(|re| re.is_match(name))
    }
}
