//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::chain::record::Record;
use crate::chain::validator::ValidationResult;

use super::AppState;
use super::types::{ChainQuery, ErrorResponse, StateResponse};

/// Returns scenario config, chain summary, and the latest record.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let latest = state.records.last().cloned();

    Json(StateResponse {
        scenario: state.scenario.clone(),
        chain_length: state.records.len(),
        head_digest: latest.as_ref().map(|r| r.digest.clone()),
        validation: state.validation.clone(),
        latest,
    })
}

/// Returns chain records, optionally filtered by index range.
///
/// `GET /chain` → 200 + `Vec<Record>` JSON
/// `GET /chain?from=N&to=M` → filtered range (inclusive)
/// `GET /chain?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_chain(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChainQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(u64::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<Record> = state
        .records
        .iter()
        .filter(|r| r.index >= from && r.index <= to)
        .cloned()
        .collect();

    Ok(Json(records))
}

/// Returns the audit verdict for the served chain.
///
/// `GET /validate` → 200 + `ValidationResult` JSON
pub async fn get_validate(State(state): State<Arc<AppState>>) -> Json<ValidationResult> {
    Json(state.validation.clone())
}
