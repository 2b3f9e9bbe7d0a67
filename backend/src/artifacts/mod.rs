//! Model and scaler artifacts
//!
//! Both files are read once at startup. A failed load leaves the server
//! running with predictions disabled.

pub mod booster;
pub mod scaler;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};
use shared::FEATURE_COUNT;
use thiserror::Error;

pub use booster::GradientBoostedTrees;
pub use scaler::StandardScaler;

use crate::config::ArtifactsConfig;
use crate::error::{AppError, AppResult};
use crate::services::prediction::{FeatureScaler, PredictionService, Regressor};

/// Why an artifact could not be loaded
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("artifact file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("could not read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not deserialize artifact {}: {reason}", path.display())]
    Deserialization { path: PathBuf, reason: String },
}

/// A parsed artifact and the SHA-256 of the file it came from
#[derive(Debug, Clone)]
pub struct Artifact<T> {
    pub value: T,
    pub sha256: String,
}

/// Read `path` and parse it with `parse`
pub fn load<T>(
    path: &Path,
    parse: impl FnOnce(&[u8]) -> Result<T, String>,
) -> Result<Artifact<T>, ArtifactLoadError> {
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ArtifactLoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ArtifactLoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let sha256 = format!("{:x}", Sha256::digest(&bytes));
    let value = parse(&bytes).map_err(|reason| ArtifactLoadError::Deserialization {
        path: path.to_path_buf(),
        reason,
    })?;

    Ok(Artifact { value, sha256 })
}

/// Fingerprints reported by the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactFingerprints {
    pub model_sha256: String,
    pub scaler_sha256: String,
}

/// Load the scaler and model and check they agree with the feature schema
pub fn load_prediction_service(
    config: &ArtifactsConfig,
) -> Result<(PredictionService, ArtifactFingerprints), ArtifactLoadError> {
    let scaler = load(&config.scaler_path, StandardScaler::from_json)?;
    expect_schema_width(&config.scaler_path, scaler.value.n_features())?;
    tracing::info!(
        path = %config.scaler_path.display(),
        sha256 = %scaler.sha256,
        "Scaler loaded"
    );

    let model = load(&config.model_path, GradientBoostedTrees::from_json)?;
    expect_schema_width(&config.model_path, model.value.n_features())?;
    tracing::info!(
        path = %config.model_path.display(),
        sha256 = %model.sha256,
        trees = model.value.n_trees(),
        "Model loaded"
    );

    let service = PredictionService::new(Arc::new(scaler.value), Arc::new(model.value));
    let fingerprints = ArtifactFingerprints {
        model_sha256: model.sha256,
        scaler_sha256: scaler.sha256,
    };
    Ok((service, fingerprints))
}

fn expect_schema_width(path: &Path, n_features: usize) -> Result<(), ArtifactLoadError> {
    if n_features != FEATURE_COUNT {
        return Err(ArtifactLoadError::Deserialization {
            path: path.to_path_buf(),
            reason: format!(
                "artifact expects {} features but the feature schema has {}",
                n_features, FEATURE_COUNT
            ),
        });
    }
    Ok(())
}

/// Whether predictions can be served for the lifetime of the process
pub enum InferenceState {
    Ready {
        service: PredictionService,
        fingerprints: ArtifactFingerprints,
    },
    Unavailable {
        reason: String,
    },
}

impl InferenceState {
    /// Load artifacts once; failures are logged and kept as the unavailable reason
    pub fn load(config: &ArtifactsConfig) -> Self {
        match load_prediction_service(config) {
            Ok((service, fingerprints)) => InferenceState::Ready {
                service,
                fingerprints,
            },
            Err(err) => {
                tracing::error!(error = %err, "Predictions disabled");
                InferenceState::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn service(&self) -> AppResult<&PredictionService> {
        match self {
            InferenceState::Ready { service, .. } => Ok(service),
            InferenceState::Unavailable { reason } => {
                Err(AppError::PredictionUnavailable(reason.clone()))
            }
        }
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            InferenceState::Ready { .. } => None,
            InferenceState::Unavailable { reason } => Some(reason),
        }
    }
}
