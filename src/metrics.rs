// Prometheus metrics definitions for the relay service.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ── Counters ─────────────────────────────────────────────────────

    /// Commands handled, by command name and outcome category.
    pub static ref COMMANDS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("sheet_relay_commands_total", "Commands handled"),
        &["command", "outcome"],
    )
    .unwrap();

    /// Commands turned away by the pre-check gate.
    pub static ref COMMANDS_REJECTED_TOTAL: IntCounter = IntCounter::new(
        "sheet_relay_commands_rejected_total",
        "Commands rejected before running",
    )
    .unwrap();

    /// Worksheet fetches, by worksheet and status (ok/error).
    pub static ref SHEET_FETCHES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("sheet_relay_sheet_fetches_total", "Worksheet fetches"),
        &["sheet", "status"],
    )
    .unwrap();

    /// Single-cell writes, by status.
    pub static ref SHEET_WRITES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("sheet_relay_sheet_writes_total", "Single-cell writes"),
        &["status"],
    )
    .unwrap();

    /// Keep-alive traffic: pings served on `/` and self-pings sent.
    pub static ref KEEPALIVE_PINGS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("sheet_relay_keepalive_pings_total", "Keep-alive pings"),
        &["direction", "status"],
    )
    .unwrap();

    // ── Histograms ───────────────────────────────────────────────────

    /// Worksheet fetch latency in seconds.
    pub static ref SHEET_FETCH_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "sheet_relay_sheet_fetch_duration_seconds",
            "Worksheet fetch latency in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["sheet"],
    )
    .unwrap();

    /// API request duration in seconds, by endpoint.
    pub static ref API_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "sheet_relay_api_request_duration_seconds",
            "API request duration in seconds",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0]),
        &["endpoint"],
    )
    .unwrap();
}

/// Register all metrics with the custom registry. Safe to call more than once.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(COMMANDS_TOTAL.clone()),
        Box::new(COMMANDS_REJECTED_TOTAL.clone()),
        Box::new(SHEET_FETCHES_TOTAL.clone()),
        Box::new(SHEET_WRITES_TOTAL.clone()),
        Box::new(KEEPALIVE_PINGS_TOTAL.clone()),
        Box::new(SHEET_FETCH_DURATION_SECONDS.clone()),
        Box::new(API_REQUEST_DURATION_SECONDS.clone()),
    ];

    for c in collectors {
        match REGISTRY.register(c) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => tracing::warn!("failed to register metric: {e}"),
        }
    }
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("failed to encode metrics: {e}");
    }
    String::from_utf8(buffer).unwrap_or_default()
}
