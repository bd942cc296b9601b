//! The backend capability contract and per-call result type.

pub mod mygramdb;
#[cfg(feature = "mysql")]
pub mod mysql;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// A query backend under measurement.
///
/// Implementations are stateless with respect to the runner: each call is
/// independent and may open and close its own transport resource. `query`
/// never fails at the type level; any backend failure mode is captured
/// internally and returned as a failed [`QueryResult`].
#[async_trait]
pub trait BenchmarkClient: Send + Sync {
    /// Execute one backend-specific command with a fixed per-call timeout.
    async fn query(&self, command: &str, timeout: Duration) -> QueryResult;
}

/// Outcome of a single dispatched query.
///
/// Produced exactly once per work item and immutable afterwards. On failure
/// `elapsed` is zero and `response` carries the diagnostic text.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub success: bool,
    pub elapsed: Duration,
    pub response: String,
}

impl QueryResult {
    pub(crate) fn failure(diagnostic: impl Into<String>) -> Self {
        Self {
            success: false,
            elapsed: Duration::ZERO,
            response: diagnostic.into(),
        }
    }
}

/// Failure modes a client can hit before the `query` boundary folds them
/// into diagnostic text.
#[derive(Debug, Error)]
pub(crate) enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    #[cfg(feature = "mysql")]
    #[error("mysql error: {0}")]
    Mysql(#[from] mysql_async::Error),
}
