//! Mock MygramDB server.
//!
//! Speaks the line-framed TCP protocol the benchmark client expects: one
//! `\r\n`-terminated command per request, one `\r\n`-terminated reply in the
//! real server's grammar (`OK RESULTS …`, `OK COUNT …`, `(integer) …`,
//! `ERROR …`). Behavior is parameterized so tests can inject service delay
//! and failures.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

const TERMINATOR: &[u8] = b"\r\n";

/// How a mock instance responds to queries.
#[derive(Debug, Clone, Default)]
pub struct Behavior {
    /// Artificial service time added before every reply.
    pub delay: Duration,
    /// Reply `ERROR …` to every command instead of a positive reply.
    pub fail: bool,
}

impl Behavior {
    pub fn delayed(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

/// Serve connections on an already-bound listener until the task is dropped.
pub async fn run(listener: TcpListener, behavior: Behavior) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                trace!("accepted {peer}");
                let behavior = behavior.clone();
                tokio::spawn(async move {
                    if let Err(err) = handle_connection(stream, behavior).await {
                        debug!("connection ended: {err}");
                    }
                });
            }
            Err(err) => warn!("accept failed: {err}"),
        }
    }
}

async fn handle_connection(mut stream: TcpStream, behavior: Behavior) -> std::io::Result<()> {
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);

        while let Some(pos) = buf.windows(TERMINATOR.len()).position(|w| w == TERMINATOR) {
            let line: Vec<u8> = buf.drain(..pos + TERMINATOR.len()).collect();
            let command = String::from_utf8_lossy(&line[..pos]).into_owned();
            trace!("command: {command}");
            QPS_MEASURE.fetch_add(1, Ordering::Relaxed);

            if !behavior.delay.is_zero() {
                tokio::time::sleep(behavior.delay).await;
            }

            let reply = if behavior.fail {
                "ERROR injected failure".to_string()
            } else {
                respond(&command)
            };
            stream.write_all(reply.as_bytes()).await?;
            stream.write_all(TERMINATOR).await?;
        }
    }
}

/// Canned replies in the real server's grammar; the benchmark client only
/// inspects the prefix.
fn respond(command: &str) -> String {
    match command.split_whitespace().next() {
        Some("SEARCH") => "OK RESULTS 3 1 2 3".to_string(),
        Some("COUNT") => "OK COUNT 42".to_string(),
        Some("DBSIZE") => "(integer) 1024".to_string(),
        Some(other) => format!("ERROR unknown command {other}"),
        None => "ERROR empty command".to_string(),
    }
}

/** QPS Printer **/

static QPS_MEASURE: AtomicU64 = AtomicU64::new(0);

/// Prints served queries per second, once per second.
pub async fn qps_measure_task() {
    loop {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let queries = QPS_MEASURE.fetch_min(0, Ordering::Relaxed);
        println!("{queries} QPS");
    }
}
