use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, IntCounterVec, IntGaugeVec, TextEncoder, register_histogram,
    register_int_counter_vec, register_int_gauge_vec,
};

lazy_static! {
    pub static ref SUBMISSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "venue_submissions_total",
        "Form submissions by endpoint and outcome",
        &["endpoint", "outcome"]
    )
    .unwrap();
    pub static ref RATE_LIMIT_RECORDS: IntGaugeVec = register_int_gauge_vec!(
        "venue_rate_limit_records",
        "Live rate limit records per endpoint",
        &["endpoint"]
    )
    .unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "venue_request_latency_seconds",
        "Submission handling latency in seconds"
    )
    .unwrap();
}

// Render the default registry in the prometheus text format
pub fn render() -> Result<String, String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| format!("encode failed: {}", e))?;
    String::from_utf8(buffer).map_err(|e| format!("metrics not utf-8: {}", e))
}
