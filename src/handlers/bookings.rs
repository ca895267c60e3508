use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::HeaderMap,
};
use std::sync::Arc;
use std::time::Instant;

use super::gate::{admit, check, finish, parse_body};
use crate::date_rule::check_date;
use crate::error::GateError;
use crate::models::{Accepted, BookingSubmission, Endpoint};
use crate::sanitize;
use crate::state::AppState;

pub async fn bookings_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Accepted>, GateError> {
    let started = Instant::now();
    let result = submit(&state, &headers, body).await;
    finish(Endpoint::Booking, started, result)
}

async fn submit(
    state: &AppState,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Accepted, GateError> {
    admit(state, Endpoint::Booking, headers)?;

    let raw = parse_body(Endpoint::Booking, body)?;
    let booking: BookingSubmission = check(Endpoint::Booking, &raw)?;

    if !check_date(&booking.date, state.clock.today()) {
        return Err(GateError::DomainRuleViolated { date: booking.date });
    }

    let booking = sanitize::booking(booking);
    tokio::time::sleep(state.processing_delay).await;
    state.dispatch.booking(&booking);

    Ok(Accepted::for_endpoint(Endpoint::Booking))
}
