//! HTTP handlers for prediction endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use shared::{Feature, PredictionResult, RawInput};

use crate::error::AppResult;
use crate::AppState;

/// Estimate rentals for one form submission
///
/// Body rejections go through `AppError` so every failure carries the JSON error envelope.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<RawInput>, JsonRejection>,
) -> AppResult<Json<PredictionResult>> {
    let Json(input) = payload?;
    let service = state.inference.service()?;
    let result = service.predict(&input)?;
    Ok(Json(result))
}

/// One column of the model input
#[derive(Debug, Serialize)]
pub struct FeatureSchemaEntry {
    pub index: usize,
    pub name: &'static str,
    pub column: &'static str,
}

/// Ordered feature schema the artifacts were fit on
pub async fn list_features() -> Json<Vec<FeatureSchemaEntry>> {
    let schema = Feature::ALL
        .into_iter()
        .map(|feature| FeatureSchemaEntry {
            index: feature.index(),
            name: feature.name(),
            column: feature.column(),
        })
        .collect();
    Json(schema)
}
