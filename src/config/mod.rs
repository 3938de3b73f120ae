//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `JOBMATCH_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::embedding::EmbeddingConfig;
use crate::lifecycle::ScheduleConfig;
use crate::pipeline::MatchingConfig;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `JOBMATCH_*` overrides on top of defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,

    /// JSON file of postings, profiles and interest records loaded at startup.
    pub seed_path: Option<PathBuf>,

    pub embedding: EmbeddingConfig,

    pub matching: MatchingConfig,

    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "JOBMATCH_PORT";
    const ENV_BIND_ADDR: &'static str = "JOBMATCH_BIND_ADDR";
    const ENV_SEED_PATH: &'static str = "JOBMATCH_SEED_PATH";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Only the listener settings are strict; numeric tuning knobs that fail to parse
    /// keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let seed_path = Self::parse_optional_path_from_env(Self::ENV_SEED_PATH);

        Ok(Self {
            server: ServerConfig { port, bind_addr },
            seed_path,
            embedding: EmbeddingConfig::from_env(),
            matching: MatchingConfig::from_env(),
            schedule: ScheduleConfig::from_env(),
        })
    }

    /// Validates paths and every sub-config (does not read the seed file).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.seed_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        self.embedding.validate()?;
        self.matching.validate()?;
        self.schedule.validate()?;
        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.server.bind_addr, self.server.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}
