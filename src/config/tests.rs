use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_jobmatch_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("JOBMATCH_PORT");
        env::remove_var("JOBMATCH_BIND_ADDR");
        env::remove_var("JOBMATCH_SEED_PATH");
        env::remove_var("JOBMATCH_EMBEDDING_URL");
        env::remove_var("JOBMATCH_SCORE_TTL_SECS");
        env::remove_var("JOBMATCH_MIN_SCORE_SNAPSHOT");
        env::remove_var("JOBMATCH_GENERATION_INTERVAL_SECS");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.server.port, 8080);
    assert_eq!(
        config.server.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert!(config.seed_path.is_none());
    assert!(config.embedding.is_stub());
    assert_eq!(config.matching.min_score_snapshot, 50.0);
    assert_eq!(config.matching.min_score_on_demand, 40.0);
    assert_eq!(config.schedule.posting_retention_days, 30);
    assert!(config.validate().is_ok());
}

#[test]
fn test_socket_addr() {
    let mut config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");

    config.server = ServerConfig {
        port: 3000,
        bind_addr: "0.0.0.0".parse().unwrap(),
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_jobmatch_env();

    let config = Config::from_env().unwrap();

    assert_eq!(config.server, ServerConfig::default());
    assert!(config.seed_path.is_none());
    assert_eq!(config.matching, MatchingConfig::default());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_jobmatch_env();

    let config = with_env_vars(
        &[
            ("JOBMATCH_PORT", "9090"),
            ("JOBMATCH_BIND_ADDR", "0.0.0.0"),
            ("JOBMATCH_SEED_PATH", "  /tmp/seed.json  "),
            ("JOBMATCH_EMBEDDING_URL", "http://localhost:11434/v1"),
            ("JOBMATCH_SCORE_TTL_SECS", "3600"),
            ("JOBMATCH_MIN_SCORE_SNAPSHOT", "65"),
            ("JOBMATCH_GENERATION_INTERVAL_SECS", "600"),
        ],
        Config::from_env,
    )
    .unwrap();

    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0");
    assert_eq!(config.seed_path, Some(PathBuf::from("/tmp/seed.json")));
    assert!(!config.embedding.is_stub());
    assert_eq!(config.matching.score_ttl, Duration::from_secs(3600));
    assert_eq!(config.matching.min_score_snapshot, 65.0);
    assert_eq!(config.schedule.generation_interval, Duration::from_secs(600));
}

#[test]
#[serial]
fn test_from_env_unparseable_tuning_keeps_default() {
    clear_jobmatch_env();

    let config = with_env_vars(&[("JOBMATCH_SCORE_TTL_SECS", "soon")], Config::from_env).unwrap();

    assert_eq!(config.matching.score_ttl, MatchingConfig::default().score_ttl);
}

#[test]
#[serial]
fn test_from_env_blank_seed_path_is_none() {
    clear_jobmatch_env();

    let config = with_env_vars(&[("JOBMATCH_SEED_PATH", "   ")], Config::from_env).unwrap();

    assert!(config.seed_path.is_none());
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_jobmatch_env();

    let result = with_env_vars(&[("JOBMATCH_PORT", "0")], Config::from_env);

    assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));
}

#[test]
#[serial]
fn test_invalid_port_not_a_number() {
    clear_jobmatch_env();

    let result = with_env_vars(&[("JOBMATCH_PORT", "eighty")], Config::from_env);

    assert!(matches!(result, Err(ConfigError::PortParseError { .. })));
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_jobmatch_env();

    let result = with_env_vars(&[("JOBMATCH_BIND_ADDR", "localhost:80")], Config::from_env);

    assert!(matches!(result, Err(ConfigError::InvalidBindAddr { .. })));
}

#[test]
fn test_validate_seed_path() {
    let dir = tempfile::TempDir::new().unwrap();

    let missing = Config {
        seed_path: Some(dir.path().join("missing.json")),
        ..Config::default()
    };
    assert!(matches!(
        missing.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));

    let directory = Config {
        seed_path: Some(dir.path().to_path_buf()),
        ..Config::default()
    };
    assert!(matches!(directory.validate(), Err(ConfigError::NotAFile { .. })));

    let file = dir.path().join("seed.json");
    std::fs::write(&file, "{}").unwrap();
    let present = Config {
        seed_path: Some(file),
        ..Config::default()
    };
    assert!(present.validate().is_ok());
}

#[test]
fn test_validate_delegates_to_sub_configs() {
    let mut config = Config::default();
    config.matching.min_score_on_demand = 140.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidThreshold {
            name: "min_score_on_demand",
            ..
        })
    ));

    let mut config = Config::default();
    config.matching.generation_workers = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroValue {
            name: "generation_workers"
        })
    ));

    let mut config = Config::default();
    config.schedule.sweep_interval = Duration::ZERO;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroValue {
            name: "sweep_interval"
        })
    ));

    let mut config = Config::default();
    config.embedding.url = Some("ftp://example.com".to_string());
    assert!(matches!(config.validate(), Err(ConfigError::Embedding(_))));
}
