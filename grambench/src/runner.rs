//! The concurrent benchmark runner: a fixed-size worker pool over a shared
//! work queue, fanning results into a single collector.

use crate::client::{BenchmarkClient, QueryResult};
use crate::summary::BenchmarkSummary;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

/// Fixed per-call timeout applied by the workers unless overridden.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(60);

/// One query string awaiting dispatch to exactly one worker.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub command: String,
    /// Which repetition block of the expanded workload this item came from.
    pub repetition: usize,
}

/// Drives a workload against one backend client with bounded concurrency.
///
/// The pool is the only concurrency limit: every expanded work item is
/// submitted up front, `concurrency` workers pull from the shared queue, and
/// the run waits for every item to complete or fail. Per-query failures are
/// recorded once and never retried; nothing aborts the run.
#[derive(Debug, Clone)]
pub struct BenchmarkRunner {
    concurrency: usize,
    iterations: usize,
    timeout: Duration,
}

impl BenchmarkRunner {
    pub fn new(concurrency: usize, iterations: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            iterations,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Override the fixed per-call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the workload and reduce the per-call results into a summary.
    pub async fn run(
        &self,
        client: Arc<dyn BenchmarkClient>,
        queries: &[String],
    ) -> BenchmarkSummary {
        let items = expand(queries, self.iterations);
        let total = items.len();

        let (work_tx, work_rx) = async_channel::unbounded::<WorkItem>();
        let (result_tx, mut result_rx) = tokio::sync::mpsc::unbounded_channel::<QueryResult>();

        // Wall clock spans first submit to last collect. The queue is
        // unbounded, so submission itself never blocks.
        let start = Instant::now();
        for item in items {
            let _ = work_tx.send(item).await;
        }
        work_tx.close();

        let mut workers = Vec::with_capacity(self.concurrency);
        for worker in 0..self.concurrency {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            let client = Arc::clone(&client);
            let timeout = self.timeout;
            workers.push(tokio::spawn(async move {
                while let Ok(item) = work_rx.recv().await {
                    trace!(worker, repetition = item.repetition, "claimed {}", item.command);
                    let result = client.query(&item.command, timeout).await;
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            }));
        }
        drop(result_tx);

        // The fan-in channel is the single synchronization point: counts and
        // the ordered times/errors sequences are only touched here.
        let mut successful = 0;
        let mut failed = 0;
        let mut times = Vec::new();
        let mut errors = Vec::new();
        while let Some(result) = result_rx.recv().await {
            if result.success {
                successful += 1;
                times.push(result.elapsed);
            } else {
                failed += 1;
                debug!("query failed: {}", result.response);
                errors.push(result.response);
            }
        }
        let total_wall = start.elapsed();

        // The channel only closes once every worker has dropped its sender;
        // reaping the handles here surfaces a panicked worker instead of
        // losing it.
        for handle in workers {
            let _ = handle.await;
        }

        info!(total, successful, failed, "run complete in {total_wall:?}");

        BenchmarkSummary {
            total,
            successful,
            failed,
            total_wall,
            times,
            errors,
        }
    }
}

/// Expand the workload by literal repetition: the input list concatenated
/// with itself `iterations` times, order preserved within each block.
fn expand(queries: &[String], iterations: usize) -> Vec<WorkItem> {
    let mut items = Vec::with_capacity(queries.len() * iterations);
    for repetition in 0..iterations {
        for query in queries {
            items.push(WorkItem {
                command: query.clone(),
                repetition,
            });
        }
    }
    items
}
