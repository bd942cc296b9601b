use mock_gramdb::Behavior;
use std::net::SocketAddr;
use std::sync::OnceLock;
use tracing_subscriber::FmtSubscriber;

#[allow(unused)]
pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let _ = FmtSubscriber::builder()
            .with_env_filter("grambench=debug,mock_gramdb=debug")
            .try_init();
    });
}

/// Spawn a mock MygramDB server on an ephemeral port and return its address.
#[allow(unused)]
pub async fn spawn_mock(behavior: Behavior) -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { mock_gramdb::run(listener, behavior).await });
    Ok(addr)
}

#[allow(unused)]
pub fn words(w: &[&str]) -> Vec<String> {
    w.iter().map(|s| s.to_string()).collect()
}
