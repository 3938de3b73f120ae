use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use super::config::ScheduleConfig;
use super::shutdown::ShutdownSignal;
use crate::service::RecommendationService;

/// Drives snapshot generation and sweeping on independent cadences.
///
/// Both loops tick immediately on start, skip missed ticks and exit when the shutdown
/// signal fires. A job that is already running is allowed to finish.
pub struct Scheduler {
    service: Arc<RecommendationService>,
    config: ScheduleConfig,
    shutdown: ShutdownSignal,
    running: Arc<AtomicBool>,
}

impl Scheduler {
    pub fn new(
        service: Arc<RecommendationService>,
        config: ScheduleConfig,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            service,
            config,
            shutdown,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Starts the background loops (no-op if already running).
    pub fn start(&self) -> tokio::task::JoinHandle<()> {
        if self.running.swap(true, Ordering::AcqRel) {
            return tokio::spawn(async {});
        }

        let generation = {
            let service = Arc::clone(&self.service);
            run_every(
                "generation",
                self.config.generation_interval,
                self.shutdown.clone(),
                move || {
                    let service = Arc::clone(&service);
                    async move {
                        if let Err(e) = service.run_generation().await {
                            error!(error = %e, "Scheduled generation run failed");
                        }
                    }
                },
            )
        };

        let sweep = {
            let service = Arc::clone(&self.service);
            run_every(
                "sweep",
                self.config.sweep_interval,
                self.shutdown.clone(),
                move || {
                    let service = Arc::clone(&service);
                    async move {
                        if let Err(e) = service.run_sweep().await {
                            error!(error = %e, "Scheduled sweep failed");
                        }
                    }
                },
            )
        };

        info!(
            generation_every = ?self.config.generation_interval,
            sweep_every = ?self.config.sweep_interval,
            "Scheduler started"
        );

        let running = Arc::clone(&self.running);
        tokio::spawn(async move {
            tokio::join!(generation, sweep);
            running.store(false, Ordering::Release);
            info!("Scheduler stopped");
        })
    }
}

async fn run_every<F, Fut>(
    job: &'static str,
    period: Duration,
    shutdown: ShutdownSignal,
    mut run: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            _ = interval.tick() => {}
        }
        if shutdown.is_triggered() {
            break;
        }
        debug!(job, "Scheduled job starting");
        run().await;
    }
    debug!(job, "Scheduled loop exited");
}
