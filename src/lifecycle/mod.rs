//! Background upkeep: expiry sweeps, the periodic job scheduler and the shutdown flag
//! they share.

pub mod config;
pub mod error;
pub mod scheduler;
mod shutdown;
pub mod sweeper;

#[cfg(test)]
mod tests;

pub use config::{
    DEFAULT_GENERATION_INTERVAL_SECS, DEFAULT_POSTING_RETENTION_DAYS, DEFAULT_SWEEP_INTERVAL_SECS,
    ScheduleConfig,
};
pub use error::{SweepError, SweepResult};
pub use scheduler::Scheduler;
pub use shutdown::ShutdownSignal;
pub use sweeper::{ExpirySweeper, SweepReport};
