//! Query Metrics
//!
//! Per-command counters and latency tracking for a query session.

use hashbrown::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// Metrics collector shared by every query a session runs
#[derive(Debug)]
pub struct QueryMetrics {
    /// Total queries count
    total_queries: AtomicU64,

    /// Queries that ended in an error response
    failed_queries: AtomicU64,

    /// Queries per command name
    by_command: RwLock<HashMap<String, u64>>,

    latency_sum_us: AtomicU64,
    latency_min_us: AtomicU64,
    latency_max_us: AtomicU64,
}

impl Default for QueryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryMetrics {
    pub fn new() -> Self {
        Self {
            total_queries: AtomicU64::new(0),
            failed_queries: AtomicU64::new(0),
            by_command: RwLock::new(HashMap::new()),
            latency_sum_us: AtomicU64::new(0),
            latency_min_us: AtomicU64::new(u64::MAX),
            latency_max_us: AtomicU64::new(0),
        }
    }

    /// Record one executed query
    pub fn record(&self, command: &str, latency: Duration, failed: bool) {
        self.total_queries.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.failed_queries.fetch_add(1, Ordering::Relaxed);
        }

        // a poisoned lock only loses the per-command breakdown
        if let Ok(mut by_command) = self.by_command.write() {
            *by_command.entry(command.to_string()).or_insert(0) += 1;
        }

        let latency_us = latency.as_micros() as u64;
        self.latency_sum_us.fetch_add(latency_us, Ordering::Relaxed);
        self.latency_min_us.fetch_min(latency_us, Ordering::Relaxed);
        self.latency_max_us.fetch_max(latency_us, Ordering::Relaxed);
    }

    pub fn total_queries(&self) -> u64 {
        self.total_queries.load(Ordering::Relaxed)
    }

    pub fn failed_queries(&self) -> u64 {
        self.failed_queries.load(Ordering::Relaxed)
    }

    /// Queries per command name
    pub fn by_command(&self) -> HashMap<String, u64> {
        self.by_command
            .read()
            .map(|by_command| by_command.clone())
            .unwrap_or_default()
    }

    /// Average latency in microseconds
    pub fn avg_latency_us(&self) -> f64 {
        let count = self.total_queries();
        if count == 0 {
            return 0.0;
        }
        self.latency_sum_us.load(Ordering::Relaxed) as f64 / count as f64
    }

    pub fn min_latency_us(&self) -> u64 {
        let min = self.latency_min_us.load(Ordering::Relaxed);
        if min == u64::MAX {
            0
        } else {
            min
        }
    }

    pub fn max_latency_us(&self) -> u64 {
        self.latency_max_us.load(Ordering::Relaxed)
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "Queries: {} ({} failed) | Latency (µs): avg={:.1}, min={}, max={}",
            self.total_queries(),
            self.failed_queries(),
            self.avg_latency_us(),
            self.min_latency_us(),
            self.max_latency_us()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = QueryMetrics::new();

        metrics.record("GET", Duration::from_micros(100), false);
        metrics.record("GET", Duration::from_micros(200), true);
        metrics.record("KCLOSEST", Duration::from_micros(150), false);

        assert_eq!(metrics.total_queries(), 3);
        assert_eq!(metrics.failed_queries(), 1);
        assert_eq!(metrics.min_latency_us(), 100);
        assert_eq!(metrics.max_latency_us(), 200);
        assert!((metrics.avg_latency_us() - 150.0).abs() < 0.1);

        let by_command = metrics.by_command();
        assert_eq!(by_command.get("GET"), Some(&2));
        assert_eq!(by_command.get("KCLOSEST"), Some(&1));
    }

    #[test]
    fn test_empty_summary() {
        let metrics = QueryMetrics::default();
        assert_eq!(metrics.min_latency_us(), 0);
        assert!(metrics.summary().starts_with("Queries: 0 (0 failed)"));
    }
}
