use std::env;
use std::time::Duration;

use crate::config::ConfigError;

/// Default time between snapshot generation runs.
pub const DEFAULT_GENERATION_INTERVAL_SECS: u64 = 2 * 24 * 60 * 60;
/// Default time between expiry sweeps.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 24 * 60 * 60;
/// Default age after which unreferenced scraped postings are deleted.
pub const DEFAULT_POSTING_RETENTION_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Cadences of the background jobs.
pub struct ScheduleConfig {
    pub generation_interval: Duration,
    pub sweep_interval: Duration,
    pub posting_retention_days: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            generation_interval: Duration::from_secs(DEFAULT_GENERATION_INTERVAL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            posting_retention_days: DEFAULT_POSTING_RETENTION_DAYS,
        }
    }
}

impl ScheduleConfig {
    const ENV_GENERATION_INTERVAL_SECS: &'static str = "JOBMATCH_GENERATION_INTERVAL_SECS";
    const ENV_SWEEP_INTERVAL_SECS: &'static str = "JOBMATCH_SWEEP_INTERVAL_SECS";
    const ENV_POSTING_RETENTION_DAYS: &'static str = "JOBMATCH_POSTING_RETENTION_DAYS";

    /// Loads config from environment variables (with defaults).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let generation_interval = env::var(Self::ENV_GENERATION_INTERVAL_SECS)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.generation_interval);
        let sweep_interval = env::var(Self::ENV_SWEEP_INTERVAL_SECS)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.sweep_interval);
        let posting_retention_days = env::var(Self::ENV_POSTING_RETENTION_DAYS)
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(defaults.posting_retention_days);

        Self {
            generation_interval,
            sweep_interval,
            posting_retention_days,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation_interval.is_zero() {
            return Err(ConfigError::ZeroValue {
                name: "generation_interval",
            });
        }
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::ZeroValue {
                name: "sweep_interval",
            });
        }
        if self.posting_retention_days == 0 {
            return Err(ConfigError::ZeroValue {
                name: "posting_retention_days",
            });
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn for_testing(interval: Duration) -> Self {
        Self {
            generation_interval: interval,
            sweep_interval: interval,
            posting_retention_days: DEFAULT_POSTING_RETENTION_DAYS,
        }
    }
}
