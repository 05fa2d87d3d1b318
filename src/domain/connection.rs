// Connectivity and refresh-performance state
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate connectivity as derived from the last refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityState {
    Connected,
    #[default]
    Disconnected,
}

/// Running refresh-cycle counters. The average is maintained with the
/// incremental-mean update so no latency samples are retained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PerformanceMetrics {
    pub refresh_cycles: u64,
    pub avg_latency_ms: f64,
    pub last_update: Option<DateTime<Utc>>,
}

impl PerformanceMetrics {
    /// Record one completed cycle's wall-clock latency.
    pub fn record(&mut self, latency_ms: f64, completed_at: DateTime<Utc>) {
        self.refresh_cycles += 1;
        let n = self.refresh_cycles as f64;
        self.avg_latency_ms = (self.avg_latency_ms * (n - 1.0) + latency_ms) / n;
        self.last_update = Some(completed_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incremental_mean_matches_closed_form() {
        let mut metrics = PerformanceMetrics::default();
        let samples = [100.0, 200.0, 150.0, 50.0];
        for sample in samples {
            metrics.record(sample, Utc::now());
        }

        let expected = samples.iter().sum::<f64>() / samples.len() as f64;
        assert_eq!(metrics.refresh_cycles, 4);
        assert!((metrics.avg_latency_ms - expected).abs() < 1e-9);
    }

    #[test]
    fn test_first_sample_becomes_average() {
        let mut metrics = PerformanceMetrics::default();
        metrics.record(42.0, Utc::now());
        assert_eq!(metrics.refresh_cycles, 1);
        assert!((metrics.avg_latency_ms - 42.0).abs() < 1e-9);
        assert!(metrics.last_update.is_some());
    }
}
