use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder, HistogramVec,
    IntCounter, IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "ministry_http_requests_total",
        "Total HTTP requests handled",
        &["method", "status"]
    )
    .expect("register http_requests_total")
});

pub static HTTP_ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "ministry_http_errors_total",
        "Total HTTP responses with status >= 400"
    )
    .expect("register http_errors_total")
});

pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "ministry_http_request_duration_seconds",
        "Request duration in seconds",
        &["method"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("register http_request_duration")
});

pub static RATE_LIMITED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "ministry_rate_limited_total",
        "Total requests rejected by rate limiter"
    )
    .expect("register rate_limited_total")
});

pub static SLOW_REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "ministry_slow_requests_total",
        "Total requests slower than the configured threshold"
    )
    .expect("register slow_requests_total")
});

/// Feed the request counters from a completed request.
pub fn observe_request(method: &str, status: u16, seconds: f64, slow: bool) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION.with_label_values(&[method]).observe(seconds);
    if status >= 400 {
        HTTP_ERRORS_TOTAL.inc();
    }
    if slow {
        SLOW_REQUESTS_TOTAL.inc();
    }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_requests_show_up_in_output() {
        observe_request("GET", 503, 0.02, true);
        RATE_LIMITED_TOTAL.inc();
        let (status, body) = encode_metrics();
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("ministry_http_requests_total"));
        assert!(body.contains("ministry_http_errors_total"));
        assert!(body.contains("ministry_slow_requests_total"));
        assert!(body.contains("ministry_rate_limited_total"));
    }
}
