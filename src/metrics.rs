//! Counters for observing resolver activity.
//!
//! All counters are relaxed atomics; they are diagnostic only and never feed
//! back into ownership decisions.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter.
#[derive(Debug)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Create a new counter.
    pub const fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    /// Increment the counter by 1.
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current value.
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

/// Activity counters for a single resolver.
#[derive(Debug)]
pub struct ResolverMetrics {
    /// Ownership queries answered.
    pub queries: Counter,
    /// Queries that answered "owned by this task".
    pub owned: Counter,
    /// Descriptors that did not match the expected format.
    pub unparsable: Counter,
    /// Successful reconfigurations.
    pub reconfigurations: Counter,
    /// Reconfigurations rejected as invalid.
    pub rejected_reconfigurations: Counter,
}

impl ResolverMetrics {
    /// Create a zeroed set of counters.
    pub const fn new() -> Self {
        Self {
            queries: Counter::new(),
            owned: Counter::new(),
            unparsable: Counter::new(),
            reconfigurations: Counter::new(),
            rejected_reconfigurations: Counter::new(),
        }
    }

    /// Take a point-in-time copy of all counters.
    pub fn snapshot(&self) -> ResolverMetricsSnapshot {
        ResolverMetricsSnapshot {
            queries: self.queries.get(),
            owned: self.owned.get(),
            unparsable: self.unparsable.get(),
            reconfigurations: self.reconfigurations.get(),
            rejected_reconfigurations: self.rejected_reconfigurations.get(),
        }
    }
}

impl Default for ResolverMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain copy of [`ResolverMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverMetricsSnapshot {
    /// Ownership queries answered.
    pub queries: u64,
    /// Queries that answered "owned by this task".
    pub owned: u64,
    /// Descriptors that did not match the expected format.
    pub unparsable: u64,
    /// Successful reconfigurations.
    pub reconfigurations: u64,
    /// Reconfigurations rejected as invalid.
    pub rejected_reconfigurations: u64,
}

impl ResolverMetricsSnapshot {
    /// Fraction of answered queries this task owned.
    pub fn owned_ratio(&self) -> f64 {
        if self.queries == 0 {
            0.0
        } else {
            self.owned as f64 / self.queries as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter() {
        let counter = Counter::new();
        assert_eq!(counter.get(), 0);

        counter.inc();
        counter.inc();
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_snapshot() {
        let metrics = ResolverMetrics::new();
        metrics.queries.inc();
        metrics.queries.inc();
        metrics.queries.inc();
        metrics.queries.inc();
        metrics.owned.inc();
        metrics.rejected_reconfigurations.inc();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.queries, 4);
        assert_eq!(snapshot.owned, 1);
        assert_eq!(snapshot.unparsable, 0);
        assert_eq!(snapshot.rejected_reconfigurations, 1);
        assert!((snapshot.owned_ratio() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_ratio() {
        assert_eq!(ResolverMetricsSnapshot::default().owned_ratio(), 0.0);
    }
}
