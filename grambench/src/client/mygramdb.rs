//! MygramDB TCP client.

use crate::client::{BenchmarkClient, ClientError, QueryResult};
use crate::config::MygramConfig;
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::Instant;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

/// Requests and responses are both terminated by this sequence. A response
/// may span multiple reads; it is complete only once the accumulated buffer
/// ends with the terminator (or the peer closes the connection).
const TERMINATOR: &[u8] = b"\r\n";

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Positive-acknowledgement prefixes of the MygramDB reply grammar
/// (`OK RESULTS …`, `OK COUNT …`, `(integer) …`). Anything else, including
/// `ERROR …`, counts as a failed query.
const OK_PREFIX: &str = "OK ";
const INTEGER_PREFIX: &str = "(integer)";

/// Client for the MygramDB text-search server.
///
/// A fresh connection is opened per query. The timed interval covers
/// connection setup, the request write, and the full response read loop; the
/// per-call timeout spans that whole exchange, not individual reads.
#[derive(Debug, Clone)]
pub struct MygramClient {
    config: MygramConfig,
}

impl MygramClient {
    pub fn new(config: MygramConfig) -> Self {
        Self { config }
    }

    async fn exchange(&self, command: &str) -> Result<String, ClientError> {
        let mut stream =
            TcpStream::connect((self.config.host.as_str(), self.config.port)).await?;

        stream.write_all(command.as_bytes()).await?;
        stream.write_all(TERMINATOR).await?;

        let mut response = Vec::new();
        let mut chunk = vec![0u8; READ_CHUNK_SIZE];
        loop {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            response.extend_from_slice(&chunk[..n]);
            if response.ends_with(TERMINATOR) {
                break;
            }
        }

        Ok(String::from_utf8_lossy(&response).into_owned())
    }
}

#[async_trait]
impl BenchmarkClient for MygramClient {
    async fn query(&self, command: &str, timeout: Duration) -> QueryResult {
        let start = Instant::now();
        match tokio::time::timeout(timeout, self.exchange(command)).await {
            Ok(Ok(response)) => {
                let elapsed = start.elapsed();
                let success =
                    response.starts_with(OK_PREFIX) || response.starts_with(INTEGER_PREFIX);
                if !success {
                    trace!("negative reply: {}", response.trim_end());
                }
                QueryResult {
                    success,
                    elapsed,
                    response,
                }
            }
            Ok(Err(err)) => QueryResult::failure(err.to_string()),
            Err(_) => QueryResult::failure(ClientError::Timeout(timeout).to_string()),
        }
    }
}
