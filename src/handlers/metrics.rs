use axum::{http::StatusCode, response::IntoResponse};
use tracing::error;

use crate::metrics::render;

pub async fn metrics_handler() -> impl IntoResponse {
    match render() {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => {
            error!(error = %e, "failed to render metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, String::new())
        }
    }
}
