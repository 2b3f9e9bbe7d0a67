//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::artifacts::{ArtifactFingerprints, InferenceState};
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<ArtifactFingerprints>,
    pub weather: String,
}

/// Health check endpoint handler
///
/// Always 200 while the process is up; artifact problems are reported in the body.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (model, model_error, artifacts) = match state.inference.as_ref() {
        InferenceState::Ready { fingerprints, .. } => {
            ("loaded".to_string(), None, Some(fingerprints.clone()))
        }
        InferenceState::Unavailable { reason } => {
            ("unavailable".to_string(), Some(reason.clone()), None)
        }
    };

    let weather = if state.weather.is_enabled() {
        "configured"
    } else {
        "disabled"
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        model,
        model_error,
        artifacts,
        weather: weather.to_string(),
    })
}
