use std::collections::VecDeque;

use logscope_aws::MAX_EVENTS_PER_PAGE;
use logscope_types::LogRecord;

/// Bounded accumulator that keeps the most recently pushed records
#[derive(Clone, Debug)]
pub struct RecordWindow {
    /// Internal storage
    entries: VecDeque<LogRecord>,

    /// Maximum capacity
    capacity: usize,

    /// Records pushed out by newer ones
    evicted: usize,
}

impl RecordWindow {
    /// Create a new window with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(MAX_EVENTS_PER_PAGE)),
            capacity,
            evicted: 0,
        }
    }

    /// Push a new record, evicting the oldest if at capacity
    pub fn push(&mut self, record: LogRecord) {
        if self.capacity == 0 {
            self.evicted += 1;
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
            self.evicted += 1;
        }
        self.entries.push_back(record);
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Check if window is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of records dropped to respect the capacity
    pub fn evicted(&self) -> usize {
        self.evicted
    }

    /// Consume the window, oldest pushed record first
    pub fn into_vec(self) -> Vec<LogRecord> {
        self.entries.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: i64) -> LogRecord {
        LogRecord::new(ts, format!("line {}", ts))
    }

    #[test]
    fn test_keeps_most_recent() {
        let mut window = RecordWindow::new(2);
        for ts in 1..=5 {
            window.push(record(ts));
        }

        assert!(window.is_full());
        assert_eq!(window.evicted(), 3);
        let kept: Vec<i64> = window.into_vec().iter().map(|r| r.timestamp).collect();
        assert_eq!(kept, vec![4, 5]);
    }

    #[test]
    fn test_huge_capacity_allocates_lazily() {
        let mut window = RecordWindow::new(usize::MAX);
        window.push(record(1));
        assert!(!window.is_full());
        assert_eq!(window.into_vec(), vec![record(1)]);
    }

    #[test]
    fn test_zero_capacity() {
        let mut window = RecordWindow::new(0);
        window.push(record(1));
        assert!(window.is_empty());
        assert!(window.is_full());
    }
}
