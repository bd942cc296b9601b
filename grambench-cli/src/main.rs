//! Command-line frontend for grambench.
//!
//! Connection flags fall back to environment variables and then to the
//! hardcoded defaults, so `MYSQL_HOST=db1 grambench --table articles ...`
//! and `grambench --mysql-host db1 ...` are equivalent, with the flag
//! winning when both are set.

use clap::{Parser, ValueEnum};
use grambench::client::mygramdb::MygramClient;
use grambench::config::{
    MySqlConfig, MygramConfig, DEFAULT_HOST, DEFAULT_MYGRAMDB_PORT, DEFAULT_MYSQL_DATABASE,
    DEFAULT_MYSQL_PORT, DEFAULT_MYSQL_USER,
};
use grambench::query::{self, QueryKind};
use grambench::report::{self, Workload};
use grambench::runner::{BenchmarkRunner, DEFAULT_QUERY_TIMEOUT};
use std::sync::Arc;
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    Mygramdb,
    Mysql,
    Both,
}

#[derive(Parser, Debug)]
#[command(name = "grambench", about = "MygramDB vs MySQL FULLTEXT benchmark")]
struct Args {
    /// Target to benchmark
    #[arg(long, value_enum, default_value = "both")]
    target: Target,

    /// Table name
    #[arg(long)]
    table: String,

    /// FULLTEXT column (MySQL only)
    #[arg(long, default_value = "name")]
    column: String,

    /// Comma-separated search words
    #[arg(long, required = true, value_delimiter = ',')]
    words: Vec<String>,

    /// Query type
    #[arg(long, default_value = "search")]
    query_type: QueryKind,

    /// LIMIT for search queries
    #[arg(long, default_value_t = 100)]
    limit: u32,

    /// OFFSET for search queries (pagination)
    #[arg(long, default_value_t = 0)]
    offset: u32,

    /// Number of concurrent workers
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Iterations per query
    #[arg(long, default_value_t = 5)]
    iterations: usize,

    /// MySQL host
    #[arg(long, env = "MYSQL_HOST", default_value = DEFAULT_HOST)]
    mysql_host: String,

    /// MySQL port
    #[arg(long, env = "MYSQL_PORT", default_value_t = DEFAULT_MYSQL_PORT)]
    mysql_port: u16,

    /// MySQL user
    #[arg(long, env = "MYSQL_USER", default_value = DEFAULT_MYSQL_USER)]
    mysql_user: String,

    /// MySQL password
    #[arg(long, env = "MYSQL_PASSWORD", default_value = "")]
    mysql_password: String,

    /// MySQL database
    #[arg(long, env = "MYSQL_DATABASE", default_value = DEFAULT_MYSQL_DATABASE)]
    mysql_database: String,

    /// MygramDB host
    #[arg(long, env = "MYGRAMDB_HOST", default_value = DEFAULT_HOST)]
    mygramdb_host: String,

    /// MygramDB port
    #[arg(long, env = "MYGRAMDB_PORT", default_value_t = DEFAULT_MYGRAMDB_PORT)]
    mygramdb_port: u16,
}

#[tokio::main]
async fn main() {
    FmtSubscriber::builder()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "grambench=info".to_string()),
        )
        .init();

    let args = Args::parse();

    let words: Vec<String> = args
        .words
        .iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect();

    let mygram_config = MygramConfig {
        host: args.mygramdb_host.clone(),
        port: args.mygramdb_port,
    };
    let mysql_config = MySqlConfig {
        host: args.mysql_host.clone(),
        port: args.mysql_port,
        user: args.mysql_user.clone(),
        password: args.mysql_password.clone(),
        database: args.mysql_database.clone(),
    };

    report::print_banner(&Workload {
        table: &args.table,
        words: &words,
        kind: args.query_type,
        limit: args.limit,
        offset: args.offset,
        concurrency: args.concurrency,
        iterations: args.iterations,
        timeout: DEFAULT_QUERY_TIMEOUT,
    });

    let runner = BenchmarkRunner::new(args.concurrency, args.iterations);

    // Query failures only affect the reported counts; the process exits
    // zero either way.
    if matches!(args.target, Target::Mygramdb | Target::Both) {
        println!("=== MygramDB Benchmark ===");
        println!("Host: {mygram_config}");

        let client = MygramClient::new(mygram_config);
        let queries = query::mygramdb_queries(
            &args.table,
            &words,
            args.query_type,
            args.limit,
            args.offset,
        );
        let summary = runner.run(Arc::new(client), &queries).await;
        report::print_summary(&summary);
    }

    if matches!(args.target, Target::Mysql | Target::Both) {
        println!("=== MySQL Benchmark ===");
        run_mysql(&runner, &mysql_config, &args, &words).await;
    }
}

#[cfg(feature = "mysql")]
async fn run_mysql(
    runner: &BenchmarkRunner,
    config: &MySqlConfig,
    args: &Args,
    words: &[String],
) {
    use grambench::client::mysql::MySqlClient;

    println!("Host: {config}");

    let client = MySqlClient::new(config);
    let queries = query::mysql_queries(
        &args.table,
        &args.column,
        words,
        args.query_type,
        args.limit,
        args.offset,
    );
    let summary = runner.run(Arc::new(client), &queries).await;
    report::print_summary(&summary);
}

/// Backend-unavailable short circuit: without the `mysql` feature the whole
/// target is skipped with a single diagnostic, before any query is attempted.
#[cfg(not(feature = "mysql"))]
async fn run_mysql(
    _runner: &BenchmarkRunner,
    _config: &MySqlConfig,
    _args: &Args,
    _words: &[String],
) {
    println!("ERROR: MySQL support not compiled into this binary");
    println!("Rebuild with: cargo build -p grambench-cli --features mysql");
    println!();
}
