use cfenv_core::config::LogConfig;
use tracing_subscriber::EnvFilter;

/// Filter for the subscriber: `RUST_LOG` when set and valid, the configured
/// level otherwise.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global fmt subscriber.
///
/// Fails if a global subscriber is already set, so callers embedding the
/// library in a process that configured tracing itself can ignore the error.
pub fn init(config: &LogConfig) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(config))
        .with_target(false);

    if config.json {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))?;
    } else {
        builder
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))?;
    }

    tracing::debug!(level = %config.level, json = config.json, "logging initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_filter_uses_configured_level() {
        let config = LogConfig {
            level: "cfenv_core=debug".into(),
            json: false,
        };
        // RUST_LOG may be set by the harness; either way a filter is produced.
        let filter = build_filter(&config);
        if std::env::var("RUST_LOG").is_err() {
            assert_eq!(filter.to_string(), "cfenv_core=debug");
        }
    }

    #[test]
    fn second_init_returns_error_instead_of_panicking() {
        let config = LogConfig::default();
        // Another test may have installed the subscriber first.
        let _ = init(&config);
        assert!(init(&config).is_err());
    }

    #[test]
    fn json_init_after_install_returns_error() {
        let _ = init(&LogConfig::default());
        let config = LogConfig {
            level: "info".into(),
            json: true,
        };
        let err = init(&config).unwrap_err();
        assert!(err.to_string().starts_with("failed to install subscriber"));
    }
}
