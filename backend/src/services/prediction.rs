//! Inference runner: scale an encoded row and evaluate the regression model

use std::sync::Arc;

use shared::{encode, validate_raw_input, FeatureVector, PredictionResult, RawInput};
use thiserror::Error;
use uuid::Uuid;

use crate::error::AppResult;

/// Failures while running a prediction
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InferenceError {
    /// Row does not match the layout the scaler was fit on
    #[error("scaling failed: {0}")]
    Scaling(String),

    /// Model could not evaluate the scaled row
    #[error("model evaluation failed: {0}")]
    Model(String),
}

/// Fitted per-column transform applied before the model
pub trait FeatureScaler: Send + Sync {
    fn n_features(&self) -> usize;
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

/// Pre-trained single-output regression model
pub trait Regressor: Send + Sync {
    fn n_features(&self) -> usize;
    fn predict(&self, row: &[f64]) -> Result<f64, InferenceError>;
}

/// Scale `vector` and evaluate `model` on it
pub fn predict(
    vector: &FeatureVector,
    scaler: &dyn FeatureScaler,
    model: &dyn Regressor,
) -> Result<f64, InferenceError> {
    predict_row(vector.as_slice(), scaler, model)
}

/// Same as [`predict`] for a row already laid out in column order
pub(crate) fn predict_row(
    row: &[f64],
    scaler: &dyn FeatureScaler,
    model: &dyn Regressor,
) -> Result<f64, InferenceError> {
    let scaled = scaler.transform(row)?;
    model.predict(&scaled)
}

/// Prediction service holding the process-wide scaler and model
#[derive(Clone)]
pub struct PredictionService {
    scaler: Arc<dyn FeatureScaler>,
    model: Arc<dyn Regressor>,
}

impl PredictionService {
    /// Create a new PredictionService over loaded artifacts
    pub fn new(scaler: Arc<dyn FeatureScaler>, model: Arc<dyn Regressor>) -> Self {
        Self { scaler, model }
    }

    /// Validate, encode and score one form submission
    pub fn predict(&self, raw: &RawInput) -> AppResult<PredictionResult> {
        validate_raw_input(raw)?;

        let vector = encode(raw);
        let prediction_id = Uuid::new_v4();
        tracing::debug!(%prediction_id, features = ?vector.to_named(), "Encoded feature vector");

        let estimate = predict(&vector, self.scaler.as_ref(), self.model.as_ref())?;
        if estimate < 0.0 {
            tracing::warn!(%prediction_id, estimate, "Model returned a negative rental count");
        }
        tracing::info!(%prediction_id, estimate, "Prediction completed");

        Ok(PredictionResult::new(prediction_id, estimate))
    }
}
