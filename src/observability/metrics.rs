//! Metrics registry
//!
//! Counters only, monotonic, reset on process start. Relaxed atomics: the
//! counters are independent and exactness across them is not required.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct MetricsRegistry {
    queries_executed: AtomicU64,
    queries_rejected: AtomicU64,
    queries_too_large: AtomicU64,
    datasets_added: AtomicU64,
    datasets_removed: AtomicU64,
    datasets_rejected: AtomicU64,
    rows_returned: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a successful query and the rows it returned
    pub fn record_query_executed(&self, rows: usize) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
        self.rows_returned.fetch_add(rows as u64, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_too_large(&self) {
        self.queries_too_large.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_datasets_added(&self) {
        self.datasets_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_datasets_removed(&self) {
        self.datasets_removed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_datasets_rejected(&self) {
        self.datasets_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            queries_too_large: self.queries_too_large.load(Ordering::Relaxed),
            datasets_added: self.datasets_added.load(Ordering::Relaxed),
            datasets_removed: self.datasets_removed.load(Ordering::Relaxed),
            datasets_rejected: self.datasets_rejected.load(Ordering::Relaxed),
            rows_returned: self.rows_returned.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of every counter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub queries_executed: u64,
    pub queries_rejected: u64,
    pub queries_too_large: u64,
    pub datasets_added: u64,
    pub datasets_removed: u64,
    pub datasets_rejected: u64,
    pub rows_returned: u64,
}
