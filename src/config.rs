//! Service configuration.

use std::time::Duration;

use crate::engine::EngineConfig;

/// Configuration for the queue core and HTTP server
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port to listen on
    pub port: u16,

    /// Time-to-live for completed, uncollected results
    pub result_ttl: Duration,

    /// Maximum time the worker sleeps between cycles when the queue is
    /// empty; also bounds how stale the TTL sweep can get
    pub idle_interval: Duration,

    /// Maximum number of pending jobs; `None` disables admission control
    /// (the original unbounded behavior)
    pub max_queue: Option<usize>,

    /// Generation engine settings
    pub engine: EngineConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            result_ttl: Duration::from_secs(600), // 10 minutes
            idle_interval: Duration::from_millis(500),
            max_queue: None,
            engine: EngineConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("VACGEN_PORT") {
            if let Ok(n) = val.parse() {
                config.port = n;
            }
        }

        if let Ok(val) = std::env::var("VACGEN_RESULT_TTL_SECS") {
            if let Ok(n) = val.parse() {
                config.result_ttl = Duration::from_secs(n);
            }
        }

        if let Ok(val) = std::env::var("VACGEN_IDLE_INTERVAL_MS") {
            if let Ok(n) = val.parse() {
                config.idle_interval = Duration::from_millis(n);
            }
        }

        if let Ok(val) = std::env::var("VACGEN_MAX_QUEUE") {
            if let Ok(n) = val.parse::<usize>() {
                // 0 keeps the queue unbounded.
                config.max_queue = (n > 0).then_some(n);
            }
        }

        config.engine = EngineConfig::from_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.result_ttl, Duration::from_secs(600));
        assert!(config.max_queue.is_none());
    }
}
