use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::types::{CoreConfig, LogFormat, LoggingConfig};

/// Initialize logging from the core config, `RUST_LOG` wins over the configured level.
pub fn run(core_config: &CoreConfig) {
    let logging_config = std::env::var("RUST_LOG")
        .ok()
        .filter(|level| !level.trim().is_empty())
        .map(|level| LoggingConfig::new(level, core_config.logging.format))
        .unwrap_or_else(|| core_config.logging.clone());

    init_logging(&logging_config);
}

/// Install a global subscriber for `cfg`.
///
/// Returns `false` when the host already installed one; it is left in place.
/// Unparsable directives in `cfg.level` are skipped, anything unmatched logs at `info`.
pub fn init_logging(cfg: &LoggingConfig) -> bool {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(&cfg.level);

    let installed = match cfg.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_timer(UtcTime::rfc_3339())
                    .with_current_span(true)
                    .with_span_list(false)
                    .flatten_event(true)
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_timer(UtcTime::rfc_3339())
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    }
    .is_ok();

    if installed {
        tracing::debug!(level = %cfg.level, format = ?cfg.format, "logging initialized");
    }
    installed
}
