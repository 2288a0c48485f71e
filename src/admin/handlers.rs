use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::store::StoreSnapshot;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub direct_entries: usize,
    pub patterns: usize,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let store = state.lock_store();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        direct_entries: store.direct_len(),
        patterns: store.pattern_len(),
    })
}

pub async fn get_store(State(state): State<AppState>) -> Json<StoreSnapshot> {
    let snapshot = state.lock_store().snapshot();
    Json(snapshot)
}
