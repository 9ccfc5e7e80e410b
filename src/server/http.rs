//! HTTP handlers

use axum::{
    body::Bytes,
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::server::ServerState;

/// Predict request
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub input: Option<String>,
}

/// Predict response
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub message: String,
}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub model: String,
}

fn no_input() -> axum::response::Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": "No input provided" }))).into_response()
}

/// Answer `{input}` with the generative provider
pub async fn predict_handler(State(state): State<ServerState>, body: Bytes) -> impl IntoResponse {
    let input = match serde_json::from_slice::<PredictRequest>(&body) {
        Ok(PredictRequest { input: Some(input) }) if !input.trim().is_empty() => input,
        _ => return no_input(),
    };

    let message = match state.provider.ask(&input).await {
        Ok(answer) => answer,
        Err(e) => {
            warn!("Answer provider failed: {}", e);
            e.to_string()
        }
    };

    (StatusCode::OK, Json(PredictResponse { message })).into_response()
}

/// Status handler
pub async fn status_handler(State(state): State<ServerState>) -> impl IntoResponse {
    let response = StatusResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.config.provider.model.clone(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
