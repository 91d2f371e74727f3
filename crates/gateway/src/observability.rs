use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram, IntCounter,
    IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "item_gateway_requests_total",
        "Logical calls made to the item store, retries counted once"
    )
    .expect("register requests_total")
});

pub static UPSTREAM_ATTEMPTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "item_gateway_upstream_attempts_total",
        "Total HTTP attempts sent to the item store"
    )
    .expect("register upstream_attempts_total")
});

pub static TRANSIENT_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "item_gateway_transient_failures_total",
        "Upstream attempts that failed with a connect error or timeout",
        &["kind"]
    )
    .expect("register transient_failures_total")
});

pub static RETRIES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "item_gateway_retries_total",
        "Total retry attempts"
    )
    .expect("register retries_total")
});

pub static RETRIES_EXHAUSTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "item_gateway_retries_exhausted_total",
        "Calls that failed transiently on every attempt"
    )
    .expect("register retries_exhausted_total")
});

pub static REQUEST_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "item_gateway_request_duration_seconds",
        "Request duration in seconds, retries included",
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("register request_duration")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
