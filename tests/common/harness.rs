//! Test server harness.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use jobmatch::clock::ManualClock;
use jobmatch::embedding::MockEmbedder;
use jobmatch::fixtures::fixed_now;
use jobmatch::gateway::{HandlerState, create_router_with_state};
use jobmatch::ingest::Deduplicator;
use jobmatch::lifecycle::ShutdownSignal;
use jobmatch::pipeline::MatchingConfig;
use jobmatch::service::RecommendationService;
use jobmatch::store::MemoryStore;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;
const RETENTION_DAYS: u32 = 30;

/// Embedder whose vectors make a backend engineer profile and a backend posting 60%
/// similar; everything else is orthogonal to the profile.
pub fn backend_embedder() -> MockEmbedder {
    MockEmbedder::new()
        .with_rule("target roles", vec![1.0, 0.0])
        .with_rule("backend", vec![0.6, 0.8])
        .with_default(vec![0.0, 1.0])
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub embedder: Arc<MockEmbedder>,
    pub service: Arc<RecommendationService>,
    pub shutdown: ShutdownSignal,
    server_handle: Option<JoinHandle<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn dedup(&self) -> Deduplicator {
        Deduplicator::new(self.store.clone(), self.clock.clone())
    }

    /// Triggers shutdown and waits for the server task to exit.
    pub async fn shutdown(mut self) {
        self.shutdown.trigger();
        if let Some(handle) = self.server_handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

/// Spawns the HTTP gateway over an in-memory store, a manual clock pinned to
/// [`fixed_now`] and the given mock embedder. No scheduler runs; tests drive generation
/// and sweeps through the admin endpoints.
pub async fn spawn_test_server(embedder: MockEmbedder) -> Result<TestServer, ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;

    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let embedder = Arc::new(embedder);
    let shutdown = ShutdownSignal::new();

    let service = Arc::new(RecommendationService::with_store(
        store.clone(),
        embedder.clone(),
        clock.clone(),
        &MatchingConfig::default(),
        1_000,
        RETENTION_DAYS,
        shutdown.clone(),
    ));

    let app = create_router_with_state(HandlerState::new(service.clone(), shutdown.clone(), true));

    let server_shutdown = shutdown.clone();
    let server_handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_shutdown.wait().await })
            .await;
    });

    wait_for_server_ready(
        addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr,
        store,
        clock,
        embedder,
        service,
        shutdown,
        server_handle: Some(server_handle),
    })
}
