use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::HeaderMap,
};
use std::sync::Arc;
use std::time::Instant;

use super::gate::{admit, check, finish, parse_body};
use crate::error::GateError;
use crate::models::{Accepted, ContactSubmission, Endpoint};
use crate::sanitize;
use crate::state::AppState;

pub async fn contact_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Accepted>, GateError> {
    let started = Instant::now();
    let result = submit(&state, &headers, body).await;
    finish(Endpoint::Contact, started, result)
}

async fn submit(
    state: &AppState,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Accepted, GateError> {
    admit(state, Endpoint::Contact, headers)?;

    let raw = parse_body(Endpoint::Contact, body)?;
    let message: ContactSubmission = check(Endpoint::Contact, &raw)?;

    let message = sanitize::contact(message);
    tokio::time::sleep(state.processing_delay).await;
    state.dispatch.contact(&message);

    Ok(Accepted::for_endpoint(Endpoint::Contact))
}
