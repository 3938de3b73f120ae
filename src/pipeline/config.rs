use std::env;
use std::time::Duration;

use crate::config::ConfigError;

pub const DEFAULT_SCORE_TTL_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_SNAPSHOT_HORIZON_SECS: u64 = 3 * 24 * 60 * 60;
pub const DEFAULT_SNAPSHOT_TOP_N: usize = 50;
pub const DEFAULT_CANDIDATE_WINDOW_DAYS: u64 = 7;
pub const DEFAULT_CANDIDATE_LIMIT: usize = 200;
pub const DEFAULT_MIN_SCORE_SNAPSHOT: f64 = 50.0;
pub const DEFAULT_MIN_SCORE_ON_DEMAND: f64 = 40.0;
pub const DEFAULT_GENERATION_WORKERS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
/// Thresholds, windows and sizes of the matching pipeline.
pub struct MatchingConfig {
    /// Cached scores older than this are misses.
    pub score_ttl: Duration,
    /// Lifetime of a generated recommendation set.
    pub snapshot_horizon: Duration,
    pub snapshot_top_n: usize,
    /// Only postings newer than this are candidates.
    pub candidate_window: Duration,
    pub candidate_limit: usize,
    /// Minimum final score for snapshot rows.
    pub min_score_snapshot: f64,
    /// Minimum final score for on-demand matches.
    pub min_score_on_demand: f64,
    /// Users generated concurrently.
    pub generation_workers: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            score_ttl: Duration::from_secs(DEFAULT_SCORE_TTL_SECS),
            snapshot_horizon: Duration::from_secs(DEFAULT_SNAPSHOT_HORIZON_SECS),
            snapshot_top_n: DEFAULT_SNAPSHOT_TOP_N,
            candidate_window: Duration::from_secs(DEFAULT_CANDIDATE_WINDOW_DAYS * 24 * 60 * 60),
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            min_score_snapshot: DEFAULT_MIN_SCORE_SNAPSHOT,
            min_score_on_demand: DEFAULT_MIN_SCORE_ON_DEMAND,
            generation_workers: DEFAULT_GENERATION_WORKERS,
        }
    }
}

impl MatchingConfig {
    const ENV_SCORE_TTL_SECS: &'static str = "JOBMATCH_SCORE_TTL_SECS";
    const ENV_SNAPSHOT_HORIZON_SECS: &'static str = "JOBMATCH_SNAPSHOT_HORIZON_SECS";
    const ENV_SNAPSHOT_TOP_N: &'static str = "JOBMATCH_SNAPSHOT_TOP_N";
    const ENV_CANDIDATE_WINDOW_DAYS: &'static str = "JOBMATCH_CANDIDATE_WINDOW_DAYS";
    const ENV_CANDIDATE_LIMIT: &'static str = "JOBMATCH_CANDIDATE_LIMIT";
    const ENV_MIN_SCORE_SNAPSHOT: &'static str = "JOBMATCH_MIN_SCORE_SNAPSHOT";
    const ENV_MIN_SCORE_ON_DEMAND: &'static str = "JOBMATCH_MIN_SCORE_ON_DEMAND";
    const ENV_GENERATION_WORKERS: &'static str = "JOBMATCH_GENERATION_WORKERS";

    /// Loads config from environment variables; unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            score_ttl: parse_var(Self::ENV_SCORE_TTL_SECS)
                .map(Duration::from_secs)
                .unwrap_or(defaults.score_ttl),
            snapshot_horizon: parse_var(Self::ENV_SNAPSHOT_HORIZON_SECS)
                .map(Duration::from_secs)
                .unwrap_or(defaults.snapshot_horizon),
            snapshot_top_n: parse_var(Self::ENV_SNAPSHOT_TOP_N).unwrap_or(defaults.snapshot_top_n),
            candidate_window: parse_var::<u64>(Self::ENV_CANDIDATE_WINDOW_DAYS)
                .map(|days| Duration::from_secs(days * 24 * 60 * 60))
                .unwrap_or(defaults.candidate_window),
            candidate_limit: parse_var(Self::ENV_CANDIDATE_LIMIT)
                .unwrap_or(defaults.candidate_limit),
            min_score_snapshot: parse_var(Self::ENV_MIN_SCORE_SNAPSHOT)
                .unwrap_or(defaults.min_score_snapshot),
            min_score_on_demand: parse_var(Self::ENV_MIN_SCORE_ON_DEMAND)
                .unwrap_or(defaults.min_score_on_demand),
            generation_workers: parse_var(Self::ENV_GENERATION_WORKERS)
                .unwrap_or(defaults.generation_workers),
        }
    }

    /// Candidate window as a chrono duration.
    pub fn candidate_window_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.candidate_window).unwrap_or(chrono::Duration::MAX)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("min_score_snapshot", self.min_score_snapshot),
            ("min_score_on_demand", self.min_score_on_demand),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        for (name, zero) in [
            ("score_ttl", self.score_ttl.is_zero()),
            ("snapshot_horizon", self.snapshot_horizon.is_zero()),
            ("candidate_window", self.candidate_window.is_zero()),
            ("snapshot_top_n", self.snapshot_top_n == 0),
            ("candidate_limit", self.candidate_limit == 0),
            ("generation_workers", self.generation_workers == 0),
        ] {
            if zero {
                return Err(ConfigError::ZeroValue { name });
            }
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
