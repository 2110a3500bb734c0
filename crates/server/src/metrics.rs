use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static MARKER_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "scootio_marker_operations_total",
        "Marker endpoint operations by outcome",
        &["op", "outcome"]
    )
    .expect("register marker_operations_total")
});

/// Count one endpoint call as `ok` or `error`.
pub fn record<T, E>(op: &str, res: &Result<T, E>) {
    let outcome = if res.is_ok() { "ok" } else { "error" };
    MARKER_OPERATIONS_TOTAL.with_label_values(&[op, outcome]).inc();
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

pub async fn metrics() -> (StatusCode, String) {
    encode_metrics()
}
