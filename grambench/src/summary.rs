//! Aggregation of per-call results into summary statistics.

use statistical::{mean, median};
use std::time::Duration;

/// How many successful samples are needed before tail percentiles are
/// reported. Below this the estimate is too noisy to be worth printing.
pub const PERCENTILE_MIN_SAMPLES: usize = 20;

/// Aggregate outcome of one benchmark run.
///
/// Built once by the collector after every worker has finished and never
/// mutated afterwards. Holds `successful + failed == total`,
/// `times.len() == successful`.
#[derive(Debug, Clone)]
pub struct BenchmarkSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Wall-clock span of the whole run, first submit to last collect.
    /// Always at least the largest individual latency; typically far below
    /// the sum of latencies when the pool is wider than one.
    pub total_wall: Duration,
    /// Latencies of successful calls, in completion order.
    pub times: Vec<Duration>,
    /// Diagnostics of failed calls, in completion order. Unbounded here;
    /// display truncates.
    pub errors: Vec<String>,
}

impl BenchmarkSummary {
    /// Derived latency statistics, or `None` when no query succeeded.
    pub fn latency(&self) -> Option<LatencyStats> {
        if self.times.is_empty() {
            return None;
        }

        let times_ms: Vec<f64> = self
            .times
            .iter()
            .map(|d| d.as_secs_f64() * 1_000.0)
            .collect();
        let mut sorted = times_ms.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let (p95, p99) = if sorted.len() >= PERCENTILE_MIN_SAMPLES {
            (
                Some(percentile(&sorted, 0.95)),
                Some(percentile(&sorted, 0.99)),
            )
        } else {
            (None, None)
        };

        Some(LatencyStats {
            avg: mean(&times_ms),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            p50: median(&times_ms),
            p95,
            p99,
        })
    }
}

/// Summary statistics over successful-call latencies, in milliseconds.
///
/// `p95`/`p99` are `Some` iff the run had at least
/// [`PERCENTILE_MIN_SAMPLES`] successes.
#[derive(Debug, Clone, Copy)]
pub struct LatencyStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub p50: f64,
    pub p95: Option<f64>,
    pub p99: Option<f64>,
}

/// 0-based floor-index percentile over an ascending-sorted slice.
fn percentile(sorted: &[f64], quantile: f64) -> f64 {
    sorted[(sorted.len() as f64 * quantile) as usize]
}
