//! Metrics collection for observability

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec,
    HistogramVec, Opts, Registry,
};
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Service façade metrics
    pub service_requests: CounterVec,
    pub service_request_duration: HistogramVec,

    // Page state metrics
    pub superseded_responses: CounterVec,
    pub board_edits: CounterVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let service_requests = register_counter_vec_with_registry!(
            Opts::new("service_requests_total", "Total service façade calls"),
            &["resource", "operation", "status"],
            registry
        )?;

        let service_request_duration = register_histogram_vec_with_registry!(
            "service_request_duration_seconds",
            "Service façade call duration in seconds",
            &["resource", "operation"],
            registry
        )?;

        let superseded_responses = register_counter_vec_with_registry!(
            Opts::new(
                "superseded_responses_total",
                "Responses discarded because a newer request was issued"
            ),
            &["page"],
            registry
        )?;

        let board_edits = register_counter_vec_with_registry!(
            Opts::new("board_edits_total", "Token map view-state edits"),
            &["kind"],
            registry
        )?;

        Ok(Self {
            registry,
            service_requests,
            service_request_duration,
            superseded_responses,
            board_edits,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record a completed service call
    pub fn record_service_call(&self, resource: &str, operation: &str, success: bool, secs: f64) {
        let status = if success { "success" } else { "error" };
        self.service_requests
            .with_label_values(&[resource, operation, status])
            .inc();
        self.service_request_duration
            .with_label_values(&[resource, operation])
            .observe(secs);
    }

    /// Record a response dropped by the latest-request-wins rule
    pub fn record_superseded(&self, page: &str) {
        self.superseded_responses.with_label_values(&[page]).inc();
    }

    /// Record a view-state edit
    pub fn record_board_edit(&self, kind: &str) {
        self.board_edits.with_label_values(&[kind]).inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
