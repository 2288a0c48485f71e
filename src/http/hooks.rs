//! Hook and command handlers.
//!
//! Each handler takes the store lock once and returns without awaiting while
//! holding it. A failed transform answers with an empty outcome so the host
//! delivers the request untouched.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::driver::{
    HeadersReceivedEvent, HeadersReceivedOutcome, HeadersSendEvent, HeadersSendOutcome,
    InterceptEvent, InterceptOutcome,
};
use crate::http::server::AppState;
use crate::protocol::{handle_message, CommandResponse};

pub async fn intercept(
    State(state): State<AppState>,
    Json(event): Json<InterceptEvent>,
) -> Json<InterceptOutcome> {
    let mut store = state.lock_store();
    Json(state.driver.intercept(&mut store, &event))
}

pub async fn headers_send(
    State(state): State<AppState>,
    Json(event): Json<HeadersSendEvent>,
) -> Json<HeadersSendOutcome> {
    let mut store = state.lock_store();
    Json(state.driver.headers_send(&mut store, event))
}

pub async fn headers_received(
    State(state): State<AppState>,
    Json(event): Json<HeadersReceivedEvent>,
) -> Json<HeadersReceivedOutcome> {
    let mut store = state.lock_store();
    match state.driver.headers_received(&mut store, event) {
        Ok(outcome) => Json(outcome),
        Err(e) => {
            tracing::warn!(error = %e, "Response transform aborted, passing headers through");
            Json(HeadersReceivedOutcome::default())
        }
    }
}

pub async fn command(
    State(state): State<AppState>,
    Json(message): Json<Value>,
) -> Json<CommandResponse> {
    let mut store = state.lock_store();
    Json(handle_message(&mut store, &message))
}
