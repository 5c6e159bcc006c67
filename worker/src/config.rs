//! Environment-driven configuration, one-for-one with the original
//! `WorkerConfig` settings object. The teacher carries no settings-framework
//! dependency, so this parses `std::env` directly rather than pulling one in.

use std::env;
use std::time::Duration;

use crate::errors::WorkerError;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub worker_id: String,
    pub chain_id: u64,
    pub poll_interval_probe: Duration,
    pub poll_interval_scanner: Duration,
    pub poll_interval_rollup: Duration,
    pub poll_interval_alerts: Duration,
    pub max_concurrent_probes: usize,
    pub block_batch_size: u64,
    pub trace_queue_size: usize,
    pub max_traces_per_minute: usize,
    pub rpc_timeout_default: Duration,
    pub rpc_timeout_trace: Duration,
    pub max_retries: u32,
    pub backoff_base: u32,
    pub log_level: String,
}

impl Config {
    /// Fatal on a missing `DATABASE_URL`; every other field has a default
    /// matching the original settings object. Unknown env entries are ignored.
    pub fn from_env() -> Result<Self, WorkerError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| WorkerError::Config("DATABASE_URL".to_string()))?;

        Ok(Self {
            database_url,
            worker_id: env_or("WORKER_ID", "worker-1"),
            chain_id: env_parse_or("CHAIN_ID", 5000),
            poll_interval_probe: Duration::from_secs(env_parse_or("POLL_INTERVAL_PROBE", 30)),
            poll_interval_scanner: Duration::from_secs(env_parse_or("POLL_INTERVAL_SCANNER", 2)),
            poll_interval_rollup: Duration::from_secs(env_parse_or("POLL_INTERVAL_ROLLUP", 60)),
            poll_interval_alerts: Duration::from_secs(env_parse_or("POLL_INTERVAL_ALERTS", 30)),
            max_concurrent_probes: env_parse_or("MAX_CONCURRENT_PROBES", 3),
            block_batch_size: env_parse_or("BLOCK_BATCH_SIZE", 10),
            trace_queue_size: env_parse_or("TRACE_QUEUE_SIZE", 100),
            max_traces_per_minute: env_parse_or("MAX_TRACES_PER_MINUTE", 10),
            rpc_timeout_default: Duration::from_secs(env_parse_or("RPC_TIMEOUT_DEFAULT", 5)),
            rpc_timeout_trace: Duration::from_secs(env_parse_or("RPC_TIMEOUT_TRACE", 10)),
            max_retries: env_parse_or("MAX_RETRIES", 3),
            backoff_base: env_parse_or("BACKOFF_BASE", 2),
            log_level: env_or("LOG_LEVEL", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_database_url_is_fatal() {
        env::remove_var("DATABASE_URL");
        assert!(matches!(Config::from_env(), Err(WorkerError::Config(_))));
    }

    #[test]
    fn defaults_match_spec() {
        env::set_var("DATABASE_URL", "postgres://localhost/worker");
        let config = Config::from_env().unwrap();
        assert_eq!(config.worker_id, "worker-1");
        assert_eq!(config.chain_id, 5000);
        assert_eq!(config.poll_interval_probe, Duration::from_secs(30));
        assert_eq!(config.poll_interval_scanner, Duration::from_secs(2));
        assert_eq!(config.poll_interval_rollup, Duration::from_secs(60));
        assert_eq!(config.poll_interval_alerts, Duration::from_secs(30));
        assert_eq!(config.max_concurrent_probes, 3);
        assert_eq!(config.block_batch_size, 10);
        assert_eq!(config.rpc_timeout_default, Duration::from_secs(5));
        assert_eq!(config.rpc_timeout_trace, Duration::from_secs(10));
        env::remove_var("DATABASE_URL");
    }
}
