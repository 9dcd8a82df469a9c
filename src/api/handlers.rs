// Request handlers for the detection endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use super::error::ApiError;
use super::state::SharedState;
use crate::models::{BatchResponse, LanguageInfo, LanguageTag};
use crate::services::handle_batch;

#[derive(Serialize)]
pub struct HealthResponse {
    ok: bool,
    version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn languages() -> Json<Vec<LanguageInfo>> {
    let list = LanguageTag::RECOGNIZED
        .into_iter()
        .map(|language| LanguageInfo {
            highlight: language.highlight_language().to_string(),
            language,
        })
        .collect();
    Json(list)
}

/// POST /classify
pub async fn classify(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let Json(payload) =
        payload.map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e.body_text())))?;
    let response = handle_batch(state.detector.clone(), &payload, state.max_concurrency).await?;
    Ok(Json(response))
}
