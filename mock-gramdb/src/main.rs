use mock_gramdb::{qps_measure_task, run, Behavior};
use tokio::net::TcpListener;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    FmtSubscriber::builder()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "mock_gramdb=debug".to_string()),
        )
        .init();

    tokio::task::spawn(async { qps_measure_task().await });

    let listener = TcpListener::bind("0.0.0.0:11016").await.unwrap();
    run(listener, Behavior::default()).await;
}
