//! Formats run configuration and summaries for display.

use crate::query::QueryKind;
use crate::summary::BenchmarkSummary;
use std::time::Duration;

/// How many failure diagnostics are printed; the rest are only counted.
pub const DISPLAYED_ERRORS: usize = 3;

/// The run parameters echoed at the top of every invocation.
#[derive(Debug, Clone)]
pub struct Workload<'a> {
    pub table: &'a str,
    pub words: &'a [String],
    pub kind: QueryKind,
    pub limit: u32,
    pub offset: u32,
    pub concurrency: usize,
    pub iterations: usize,
    pub timeout: Duration,
}

pub fn print_banner(workload: &Workload<'_>) {
    println!("=== Benchmark Configuration ===");
    println!("Table: {}", workload.table);
    println!("Words: {:?}", workload.words);
    println!("Query Type: {}", workload.kind);
    println!("Limit: {}, Offset: {}", workload.limit, workload.offset);
    println!("Concurrency: {}", workload.concurrency);
    println!("Iterations: {}", workload.iterations);
    println!("Timeout: {}", humantime::format_duration(workload.timeout));
    println!();
}

/// Queries per second over the whole run. Derived here, not by the runner:
/// the summary only exposes the success count and the wall-clock span.
pub fn qps(summary: &BenchmarkSummary) -> f64 {
    let wall_secs = summary.total_wall.as_secs_f64();
    if wall_secs > 0.0 {
        summary.successful as f64 / wall_secs
    } else {
        0.0
    }
}

pub fn print_summary(summary: &BenchmarkSummary) {
    println!("Total queries: {}", summary.total);
    println!("Successful: {}", summary.successful);
    println!("Failed: {}", summary.failed);
    println!(
        "Total time: {:.1}ms",
        summary.total_wall.as_secs_f64() * 1_000.0
    );

    if let Some(stats) = summary.latency() {
        println!("Avg: {:.2}ms", stats.avg);
        println!("Min: {:.2}ms", stats.min);
        println!("Max: {:.2}ms", stats.max);
        println!("P50: {:.2}ms", stats.p50);
        if let (Some(p95), Some(p99)) = (stats.p95, stats.p99) {
            println!("P95: {p95:.2}ms");
            println!("P99: {p99:.2}ms");
        }
        println!("QPS: {:.1}", qps(summary));
    }

    if !summary.errors.is_empty() {
        let shown: Vec<&String> = summary.errors.iter().take(DISPLAYED_ERRORS).collect();
        println!("Errors ({} total): {:?}", summary.errors.len(), shown);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qps_is_successes_over_wall_seconds() {
        let summary = BenchmarkSummary {
            total: 10,
            successful: 10,
            failed: 0,
            total_wall: Duration::from_secs(2),
            times: vec![Duration::from_millis(1); 10],
            errors: vec![],
        };
        assert!((qps(&summary) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn qps_handles_a_zero_span() {
        let summary = BenchmarkSummary {
            total: 0,
            successful: 0,
            failed: 0,
            total_wall: Duration::ZERO,
            times: vec![],
            errors: vec![],
        };
        assert_eq!(qps(&summary), 0.0);
    }
}
