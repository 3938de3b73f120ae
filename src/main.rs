//! Job matching HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use jobmatch::clock::{Clock, SystemClock};
use jobmatch::config::Config;
use jobmatch::embedding::ProviderChain;
use jobmatch::gateway::{HandlerState, create_router_with_state};
use jobmatch::ingest::Deduplicator;
use jobmatch::lifecycle::{Scheduler, ShutdownSignal};
use jobmatch::service::RecommendationService;
use jobmatch::store::{MemoryStore, SeedData};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.server.bind_addr,
        port = config.server.port,
        "Jobmatch starting"
    );

    let store = Arc::new(MemoryStore::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    if let Some(path) = &config.seed_path {
        let seed = SeedData::load(path)?;
        let dedup = Deduplicator::new(store.clone(), clock.clone());
        seed.apply(&store, &dedup)
            .await
            .with_context(|| format!("failed to apply seed data from {}", path.display()))?;
    } else {
        tracing::warn!("No JOBMATCH_SEED_PATH configured, starting with an empty store");
    }

    let stub_embedder = config.embedding.is_stub();
    let provider = Arc::new(ProviderChain::from_config(&config.embedding)?);

    let shutdown = ShutdownSignal::new();
    let service = Arc::new(RecommendationService::with_store(
        store,
        provider,
        clock,
        &config.matching,
        config.embedding.cache_capacity,
        config.schedule.posting_retention_days,
        shutdown.clone(),
    ));

    let scheduler = Scheduler::new(service.clone(), config.schedule.clone(), shutdown.clone());
    let scheduler_handle = scheduler.start();

    let state = HandlerState::new(service, shutdown.clone(), stub_embedder);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Waiting for in-flight runs to finish...");
    if let Err(e) = scheduler_handle.await {
        tracing::error!("Scheduler task failed: {}", e);
    }

    tracing::info!("Jobmatch shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("JOBMATCH_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal(shutdown: ShutdownSignal) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = shutdown.wait() => {}
    }

    shutdown.trigger();
}
