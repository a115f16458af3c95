use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

const COUNTERS: [&str; 5] = [
    "upstream_requests_total",
    "upstream_errors_total",
    "neo_degenerate_total",
    "screen_stale_completions_total",
    "notifications_suppressed_total",
];

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(describe_all);
}

/// Describe every series and register counters and the gauge at zero.
fn describe_all() {
    describe_counter!("upstream_requests_total", "Requests sent to upstream APIs.");
    describe_counter!("upstream_errors_total", "Upstream fetch/decode failures.");
    describe_histogram!("upstream_fetch_ms", "Upstream fetch time in milliseconds.");
    describe_counter!(
        "neo_degenerate_total",
        "Near-earth objects whose threat score could not be computed."
    );
    describe_counter!(
        "screen_stale_completions_total",
        "Load results dropped because their screen was dismissed or reloaded."
    );
    describe_counter!(
        "notifications_suppressed_total",
        "Failure notifications held back by the cooldown."
    );
    describe_gauge!("iss_last_refresh_ts", "Unix ts of the last successful ISS refresh.");
    for name in COUNTERS {
        counter!(name).increment(0);
    }
    gauge!("iss_last_refresh_ts").increment(0.0);
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder once per process; later calls share it.
    pub fn init() -> anyhow::Result<Self> {
        static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();
        let handle = HANDLE
            .get_or_try_init(|| PrometheusBuilder::new().install_recorder())
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?
            .clone();
        // Anything described before the recorder existed went to the no-op one.
        describe_all();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
