use std::sync::Arc;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use tokio::sync::OnceCell;
use tracing::{error, info};

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Option<Arc<Metrics>>> = OnceCell::const_new();

/// Lazily initializes the shared registry. `None` when registration failed,
/// in which case callers skip recording.
pub async fn get_metrics() -> Option<&'static Arc<Metrics>> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
                .map(Arc::new)
                .inspect_err(|e| error!("metrics registration failed: {}", e))
                .ok()
        })
        .await
        .as_ref()
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token resource
    pub token_cache_hits: IntCounter,
    pub token_cache_misses: IntCounter,
    pub token_fetch_failures: IntCounterVec,
    pub token_fetch_duration: HistogramVec,
    pub credential_checks: IntCounterVec,

    // Settings projector
    pub settings_reads: IntCounterVec,
    pub settings_writes: IntCounterVec,
}

impl Metrics {
    fn new() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some("paypal".into()), None)?;

        let metrics = Self {
            token_cache_hits: IntCounter::new("token_cache_hits_total", "Tokens served from cache")?,
            token_cache_misses: IntCounter::new("token_cache_misses_total", "Token lookups that required a fetch")?,
            token_fetch_failures: IntCounterVec::new(Opts::new("token_fetch_failures_total", "Token fetch failures by reason"), &["reason"])?,
            token_fetch_duration: HistogramVec::new(HistogramOpts::new("token_fetch_duration_seconds", "Token fetch duration seconds").buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]), &["endpoint"])?,
            credential_checks: IntCounterVec::new(Opts::new("credential_checks_total", "Credential checks by result"), &["result"])?,

            settings_reads: IntCounterVec::new(Opts::new("settings_reads_total", "Settings projections by outcome"), &["outcome"])?,
            settings_writes: IntCounterVec::new(Opts::new("settings_writes_total", "Settings fields written"), &["field"])?,

            registry,
        };

        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_cache_hits.clone()))?;
        reg.register(Box::new(metrics.token_cache_misses.clone()))?;
        reg.register(Box::new(metrics.token_fetch_failures.clone()))?;
        reg.register(Box::new(metrics.token_fetch_duration.clone()))?;
        reg.register(Box::new(metrics.credential_checks.clone()))?;
        reg.register(Box::new(metrics.settings_reads.clone()))?;
        reg.register(Box::new(metrics.settings_writes.clone()))?;

        Ok(metrics)
    }

    /// Prometheus text exposition of every registered metric.
    pub fn encode_text(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
