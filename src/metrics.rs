//! Rate feed health metrics collection and reporting
//!
//! Tracks latency histograms and success rates for the fiat rate feed.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Maximum number of samples to keep for metrics calculation
const MAX_SAMPLES: usize = 100;

/// Metrics for a single rate feed
#[derive(Debug, Clone)]
pub struct FeedMetrics {
    /// Name of the feed
    pub feed_name: String,
    /// 50th percentile latency in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0)
    pub success_rate: f64,
    /// Total number of requests tracked
    pub total_requests: u64,
    /// Number of failed requests
    pub failed_requests: u64,
}

impl FeedMetrics {
    /// Creates metrics with no data
    pub fn empty(feed_name: &str) -> Self {
        Self {
            feed_name: feed_name.to_string(),
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            success_rate: 1.0,
            total_requests: 0,
            failed_requests: 0,
        }
    }
}

/// Internal sample for latency tracking
#[derive(Debug, Clone)]
struct LatencySample {
    duration_ms: f64,
    success: bool,
}

/// Collects and computes metrics for the rate feed
pub struct MetricsCollector {
    /// Feed name
    feed_name: String,
    /// Rolling window of latency samples
    samples: Arc<RwLock<VecDeque<LatencySample>>>,
    /// Total requests (lifetime)
    total_requests: Arc<RwLock<u64>>,
    /// Failed requests (lifetime)
    failed_requests: Arc<RwLock<u64>>,
}

impl MetricsCollector {
    /// Creates a new metrics collector for a feed
    pub fn new(feed_name: &str) -> Self {
        Self {
            feed_name: feed_name.to_string(),
            samples: Arc::new(RwLock::new(VecDeque::with_capacity(MAX_SAMPLES))),
            total_requests: Arc::new(RwLock::new(0)),
            failed_requests: Arc::new(RwLock::new(0)),
        }
    }

    /// Records a request with its duration and success status
    pub async fn record_request(&self, duration: Duration, success: bool) {
        let duration_ms = duration.as_secs_f64() * 1000.0;

        // Update totals
        {
            let mut total = self.total_requests.write().await;
            *total += 1;
        }

        if !success {
            let mut failed = self.failed_requests.write().await;
            *failed += 1;
        }

        // Add sample to rolling window
        {
            let mut samples = self.samples.write().await;
            if samples.len() >= MAX_SAMPLES {
                samples.pop_front();
            }
            samples.push_back(LatencySample {
                duration_ms,
                success,
            });
        }
    }

    /// Computes current metrics from collected samples
    pub async fn get_metrics(&self) -> FeedMetrics {
        let samples = self.samples.read().await;
        let total = *self.total_requests.read().await;
        let failed = *self.failed_requests.read().await;

        if samples.is_empty() {
            return FeedMetrics::empty(&self.feed_name);
        }

        // Extract successful latencies for percentile calculation
        let mut latencies: Vec<f64> = samples
            .iter()
            .filter(|s| s.success)
            .map(|s| s.duration_ms)
            .collect();

        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let p50 = percentile(&latencies, 50.0);
        let p99 = percentile(&latencies, 99.0);

        let success_rate = if total > 0 {
            (total - failed) as f64 / total as f64
        } else {
            1.0
        };

        FeedMetrics {
            feed_name: self.feed_name.clone(),
            latency_p50_ms: p50,
            latency_p99_ms: p99,
            success_rate,
            total_requests: total,
            failed_requests: failed,
        }
    }
}

/// Calculate percentile from sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}
