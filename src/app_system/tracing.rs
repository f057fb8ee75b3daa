use tracing::warn;

use super::AppConfig;

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn setup_tracing(config: &AppConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();

    for warning in &config.warnings {
        warn!("{warning}");
    }
}
