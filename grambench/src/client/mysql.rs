//! MySQL client.

use crate::client::{BenchmarkClient, ClientError, QueryResult};
use crate::config::MySqlConfig;
use async_trait::async_trait;
use mysql_async::prelude::*;
use std::time::Duration;
use tokio::time::Instant;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

/// Client for the MySQL server under comparison.
///
/// One connection is opened and closed per query (no pooling), so each call
/// pays the same per-connection cost as the text-search client. The timed
/// interval covers connection setup and the query round trip, under the same
/// uniform rule as [`MygramClient`](crate::client::mygramdb::MygramClient).
///
/// A query is successful when it executes without error, regardless of how
/// many rows it returns.
#[derive(Debug, Clone)]
pub struct MySqlClient {
    opts: mysql_async::Opts,
}

impl MySqlClient {
    pub fn new(config: &MySqlConfig) -> Self {
        let opts = mysql_async::OptsBuilder::default()
            .ip_or_hostname(config.host.clone())
            .tcp_port(config.port)
            .user(Some(config.user.clone()))
            .pass(Some(config.password.clone()))
            .db_name(Some(config.database.clone()))
            // Charset is fixed to utf8mb4 for every connection.
            .setup(vec!["SET NAMES utf8mb4".to_string()])
            .into();
        Self { opts }
    }

    async fn exchange(&self, sql: &str) -> Result<usize, ClientError> {
        let mut conn = mysql_async::Conn::new(self.opts.clone()).await?;
        let rows: Vec<mysql_async::Row> = conn.query(sql).await?;
        conn.disconnect().await?;
        Ok(rows.len())
    }
}

#[async_trait]
impl BenchmarkClient for MySqlClient {
    async fn query(&self, command: &str, timeout: Duration) -> QueryResult {
        let start = Instant::now();
        match tokio::time::timeout(timeout, self.exchange(command)).await {
            Ok(Ok(rows)) => QueryResult {
                success: true,
                elapsed: start.elapsed(),
                response: format!("{rows} rows"),
            },
            Ok(Err(err)) => QueryResult::failure(err.to_string()),
            Err(_) => QueryResult::failure(ClientError::Timeout(timeout).to_string()),
        }
    }
}
