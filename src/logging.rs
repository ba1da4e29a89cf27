//! Structured logging setup

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured default level. Fails when a
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.format == "json" {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_initialization_fails() {
        // First call may succeed or fail if another test already set the
        // global subscriber; either outcome is acceptable.
        let config = LoggingConfig::default();
        let _ = init_tracing(&config);

        assert!(init_tracing(&config).is_err());
    }
}
