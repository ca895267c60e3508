//! Form submission gateway for the venue website.
//!
//! Two endpoints, `POST /api/contact` and `POST /api/bookings`, each run a
//! submission through the same gate:
//!
//! 1. per-client fixed-window rate limit (429)
//! 2. declarative field validation with every error reported (400)
//! 3. endpoint rules, currently only "booking date is not in the past" (400)
//!
//! Anything else that goes wrong is logged and answered with a generic 500.
//! Every response carries the site's security headers.

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub mod client_id;
pub mod clock;
pub mod config;
pub mod date_rule;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod sanitize;
pub mod security_headers;
pub mod state;
pub mod validation;

use handlers::{
    bookings_handler, contact_handler, health_handler, method_not_allowed, metrics_handler,
};
use security_headers::with_security_headers;
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route(
            "/api/contact",
            post(contact_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/bookings",
            post(bookings_handler).fallback(method_not_allowed),
        )
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state);

    with_security_headers(router)
}
