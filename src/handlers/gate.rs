//! Stages shared by both submission endpoints.
//!
//! A submission goes rate limit → body parse → schema → (endpoint rules) and
//! stops at the first stage that rejects it.

use axum::{
    Json,
    body::Bytes,
    extract::rejection::BytesRejection,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error};

use crate::client_id::client_identifier;
use crate::error::GateError;
use crate::metrics::{RATE_LIMIT_RECORDS, REQUEST_LATENCY, SUBMISSIONS_TOTAL};
use crate::models::{Accepted, Endpoint};
use crate::state::AppState;
use crate::validation::{Submission, ValidationResult, validate};

pub fn admit(state: &AppState, endpoint: Endpoint, headers: &HeaderMap) -> Result<(), GateError> {
    let client_id = client_identifier(headers);
    let limiter = state.limiters.get(endpoint);
    let admitted = limiter.admit(&client_id);

    RATE_LIMIT_RECORDS
        .with_label_values(&[endpoint.as_str()])
        .set(limiter.len() as i64);

    if admitted {
        Ok(())
    } else {
        Err(GateError::AdmissionDenied { endpoint })
    }
}

// An unreadable or non-JSON body is a fault, not a validation failure
pub fn parse_body(endpoint: Endpoint, body: Result<Bytes, BytesRejection>) -> Result<Value, GateError> {
    let bytes = body.map_err(|e| GateError::UnexpectedFault {
        endpoint,
        detail: format!("failed to read body: {}", e),
    })?;

    serde_json::from_slice(&bytes).map_err(|e| GateError::UnexpectedFault {
        endpoint,
        detail: format!("body is not JSON: {}", e),
    })
}

pub fn check<T: Submission>(endpoint: Endpoint, raw: &Value) -> Result<T, GateError> {
    match validate::<T>(raw) {
        ValidationResult::Valid(submission) => Ok(submission),
        ValidationResult::Invalid(details) => Err(GateError::ValidationFailed { endpoint, details }),
    }
}

// Count, time and log the outcome of one submission
pub fn finish(
    endpoint: Endpoint,
    started: Instant,
    result: Result<Accepted, GateError>,
) -> Result<Json<Accepted>, GateError> {
    REQUEST_LATENCY.observe(started.elapsed().as_secs_f64());

    let outcome = match &result {
        Ok(_) => "accepted",
        Err(e) => e.outcome(),
    };
    SUBMISSIONS_TOTAL
        .with_label_values(&[endpoint.as_str(), outcome])
        .inc();

    match &result {
        Err(e @ GateError::UnexpectedFault { .. }) => error!(%endpoint, error = %e, "submission failed"),
        Err(e) => debug!(%endpoint, reason = %e, "submission rejected"),
        Ok(_) => {}
    }

    result.map(Json)
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(serde_json::json!({ "error": "Method not allowed" })),
    )
}
