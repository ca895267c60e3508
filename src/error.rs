use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::Endpoint;
use crate::validation::FieldError;

// Terminal rejections of a submission. Only UnexpectedFault is an application error.
#[derive(Error, Debug)]
pub enum GateError {
    #[error("rate limit exceeded on {endpoint}")]
    AdmissionDenied { endpoint: Endpoint },

    #[error("{} invalid field(s) on {endpoint}", .details.len())]
    ValidationFailed {
        endpoint: Endpoint,
        details: Vec<FieldError>,
    },

    #[error("booking date {date} is in the past")]
    DomainRuleViolated { date: String },

    #[error("unexpected fault on {endpoint}: {detail}")]
    UnexpectedFault { endpoint: Endpoint, detail: String },
}

impl GateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::AdmissionDenied { .. } => StatusCode::TOO_MANY_REQUESTS,
            GateError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            GateError::DomainRuleViolated { .. } => StatusCode::BAD_REQUEST,
            GateError::UnexpectedFault { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Label for the submissions counter
    pub fn outcome(&self) -> &'static str {
        match self {
            GateError::AdmissionDenied { .. } => "rate_limited",
            GateError::ValidationFailed { .. } => "invalid",
            GateError::DomainRuleViolated { .. } => "past_date",
            GateError::UnexpectedFault { .. } => "fault",
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            GateError::AdmissionDenied { .. } => serde_json::json!({
                "error": "Too many requests. Please try again later."
            }),
            GateError::ValidationFailed { endpoint, details } => {
                let error = match endpoint {
                    Endpoint::Contact => "Invalid form data",
                    Endpoint::Booking => "Invalid booking data",
                };
                serde_json::json!({ "error": error, "details": details })
            }
            GateError::DomainRuleViolated { .. } => serde_json::json!({
                "error": "Booking date cannot be in the past"
            }),
            // detail stays in the server log
            GateError::UnexpectedFault { endpoint, .. } => {
                let error = match endpoint {
                    Endpoint::Contact => {
                        "An error occurred processing your request. Please try again later."
                    }
                    Endpoint::Booking => {
                        "An error occurred processing your booking. Please try again later."
                    }
                };
                serde_json::json!({ "error": error })
            }
        };

        (status, Json(body)).into_response()
    }
}
