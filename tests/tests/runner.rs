//! End-to-end runner tests against a mock MygramDB server over real TCP.

mod utils;
#[allow(unused)]
use utils::*;

use grambench::client::mygramdb::MygramClient;
use grambench::config::MygramConfig;
use grambench::query::{self, QueryKind};
use grambench::runner::BenchmarkRunner;
use grambench::BenchmarkClient;
use mock_gramdb::Behavior;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

fn client_for(addr: SocketAddr) -> MygramClient {
    MygramClient::new(MygramConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
    })
}

#[tokio::test]
async fn counts_add_up_over_real_tcp() -> anyhow::Result<()> {
    init();
    let addr = spawn_mock(Behavior::default()).await?;

    let queries = query::mygramdb_queries(
        "articles",
        &words(&["hello", "world"]),
        QueryKind::Search,
        100,
        0,
    );
    let summary = BenchmarkRunner::new(4, 3)
        .run(Arc::new(client_for(addr)), &queries)
        .await;

    assert_eq!(summary.total, queries.len() * 3);
    assert_eq!(summary.successful + summary.failed, summary.total);
    assert_eq!(summary.successful, 6);
    assert_eq!(summary.times.len(), summary.successful);
    assert!(summary.errors.is_empty());
    Ok(())
}

#[tokio::test]
async fn count_reply_matches_the_success_predicate() -> anyhow::Result<()> {
    init();
    let addr = spawn_mock(Behavior::default()).await?;

    let result = client_for(addr)
        .query("COUNT articles hello", Duration::from_secs(60))
        .await;

    assert!(result.success);
    assert!(result.response.starts_with("OK COUNT"));
    assert!(result.elapsed > Duration::ZERO);
    Ok(())
}

#[tokio::test]
async fn connection_refused_still_completes_the_run() -> anyhow::Result<()> {
    init();
    // Bind then drop the listener so the port is known-dead.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let queries = query::mygramdb_queries(
        "articles",
        &words(&["hello", "world"]),
        QueryKind::Search,
        100,
        0,
    );
    let summary = BenchmarkRunner::new(4, 2)
        .run(Arc::new(client_for(addr)), &queries)
        .await;

    assert_eq!(summary.failed, summary.total);
    assert_eq!(summary.successful, 0);
    assert!(summary.times.is_empty());
    assert_eq!(summary.errors.len(), summary.total);
    assert!(summary.errors.iter().all(|e| !e.is_empty()));
    Ok(())
}

#[tokio::test]
async fn tail_percentiles_appear_at_twenty_successes() -> anyhow::Result<()> {
    init();
    let addr = spawn_mock(Behavior::default()).await?;
    let queries = query::mygramdb_queries("articles", &words(&["hello"]), QueryKind::Count, 100, 0);

    let small = BenchmarkRunner::new(4, 5)
        .run(Arc::new(client_for(addr)), &queries)
        .await;
    let stats = small.latency().expect("5 successes");
    assert!(stats.p95.is_none());
    assert!(stats.p99.is_none());

    let large = BenchmarkRunner::new(4, 25)
        .run(Arc::new(client_for(addr)), &queries)
        .await;
    assert_eq!(large.successful, 25);
    let stats = large.latency().expect("25 successes");
    assert!(stats.p95.is_some());
    assert!(stats.p99.is_some());
    Ok(())
}

#[tokio::test]
async fn concurrency_does_not_change_counts() -> anyhow::Result<()> {
    init();
    let addr = spawn_mock(Behavior::delayed(Duration::from_millis(2))).await?;
    let queries =
        query::mygramdb_queries("articles", &words(&["a", "b", "c"]), QueryKind::Count, 100, 0);

    let sequential = BenchmarkRunner::new(1, 4)
        .run(Arc::new(client_for(addr)), &queries)
        .await;
    let pooled = BenchmarkRunner::new(8, 4)
        .run(Arc::new(client_for(addr)), &queries)
        .await;

    assert_eq!(sequential.total, pooled.total);
    assert_eq!(sequential.successful, pooled.successful);
    assert_eq!(sequential.failed, pooled.failed);
    Ok(())
}

#[tokio::test]
async fn injected_failures_are_tracked_beyond_the_display_cut() -> anyhow::Result<()> {
    init();
    let addr = spawn_mock(Behavior::failing()).await?;
    let queries = query::mygramdb_queries("articles", &words(&["hello"]), QueryKind::Count, 100, 0);

    let summary = BenchmarkRunner::new(4, 10)
        .run(Arc::new(client_for(addr)), &queries)
        .await;

    assert_eq!(summary.failed, summary.total);
    // All 10 diagnostics are tracked even though only 3 are ever displayed.
    assert_eq!(summary.errors.len(), 10);
    assert!(summary.errors.iter().all(|e| e.starts_with("ERROR")));
    Ok(())
}

#[tokio::test]
async fn per_call_timeout_marks_slow_queries_failed() -> anyhow::Result<()> {
    init();
    let addr = spawn_mock(Behavior::delayed(Duration::from_millis(200))).await?;
    let queries = query::mygramdb_queries("articles", &words(&["hello"]), QueryKind::Count, 100, 0);

    let summary = BenchmarkRunner::new(2, 3)
        .timeout(Duration::from_millis(50))
        .run(Arc::new(client_for(addr)), &queries)
        .await;

    assert_eq!(summary.failed, summary.total);
    assert!(summary.errors.iter().all(|e| e.contains("timed out")));
    Ok(())
}

#[tokio::test]
async fn wall_clock_covers_the_longest_call() -> anyhow::Result<()> {
    init();
    let addr = spawn_mock(Behavior::delayed(Duration::from_millis(10))).await?;
    let queries =
        query::mygramdb_queries("articles", &words(&["a", "b"]), QueryKind::Search, 100, 0);

    let summary = BenchmarkRunner::new(4, 2)
        .run(Arc::new(client_for(addr)), &queries)
        .await;

    assert_eq!(summary.successful, summary.total);
    let max = summary.times.iter().max().copied().unwrap();
    assert!(summary.total_wall >= max);
    Ok(())
}
