//! Error handling for the bike demand predictor
//!
//! Provides consistent error responses in English and Spanish

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::InputError;
use thiserror::Error;

use crate::services::prediction::InferenceError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] InputError),

    #[error("Invalid value for {}: {reason}", .field.as_deref().unwrap_or("request body"))]
    InvalidField {
        field: Option<String>,
        reason: String,
    },

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    // Inference errors
    #[error("Prediction unavailable: {0}")]
    PredictionUnavailable(String),

    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),

    // Setup errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: err.to_string(),
                    message_es: format!("Datos de entrada no válidos: {}", err),
                    field: Some(err.field().to_string()),
                },
            ),
            AppError::InvalidField { field, reason } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: self.to_string(),
                    message_es: format!(
                        "Valor no válido para {}: {}",
                        field.as_deref().unwrap_or("el cuerpo de la solicitud"),
                        reason
                    ),
                    field: field.clone(),
                },
            ),
            AppError::MalformedBody(reason) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_REQUEST_BODY".to_string(),
                    message_en: self.to_string(),
                    message_es: format!("Cuerpo de la solicitud no válido: {}", reason),
                    field: None,
                },
            ),
            AppError::PredictionUnavailable(reason) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "PREDICTION_UNAVAILABLE".to_string(),
                    message_en: format!("The prediction model could not be loaded: {}", reason),
                    message_es: format!("No se pudo cargar el modelo de predicción: {}", reason),
                    field: None,
                },
            ),
            AppError::Inference(InferenceError::Scaling(msg)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "SCALING_ERROR".to_string(),
                    message_en: format!("An error occurred while scaling the input: {}", msg),
                    message_es: format!("Ocurrió un error al escalar los datos: {}", msg),
                    field: None,
                },
            ),
            AppError::Inference(InferenceError::Model(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "MODEL_ERROR".to_string(),
                    message_en: format!("An error occurred while making the prediction: {}", msg),
                    message_es: format!("Ocurrió un error al realizar la predicción: {}", msg),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: format!("Configuration error: {}", msg),
                    message_es: format!("Error de configuración: {}", msg),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_es: "Error interno del servidor".to_string(),
                    field: None,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

const JSON_DATA_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                let (field, reason) = split_data_error(&err.body_text());
                AppError::InvalidField { field, reason }
            }
            other => AppError::MalformedBody(other.body_text()),
        }
    }
}

/// Split a body deserialization message into the field path and the reason
fn split_data_error(text: &str) -> (Option<String>, String) {
    let detail = text.strip_prefix(JSON_DATA_PREFIX).unwrap_or(text);
    // The accepted-values list repeats every lowercase alias
    let detail = detail.split(", expected one of").next().unwrap_or(detail);

    if let Some((path, reason)) = detail.split_once(": ") {
        let is_path = !path.is_empty()
            && path
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '[' || c == ']');
        if is_path {
            return (Some(path.to_string()), reason.to_string());
        }
    }

    let missing = detail
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
        .map(str::to_string);
    (missing, detail.to_string())
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request_with_field() {
        let (status, detail) =
            AppError::from(InputError::HourOutOfRange(24)).status_and_detail();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail.code, "VALIDATION_ERROR");
        assert_eq!(detail.field.as_deref(), Some("hour"));
    }

    #[test]
    fn test_inference_errors_are_distinguished() {
        let (status, detail) =
            AppError::from(InferenceError::Scaling("expected 19 columns, got 18".into()))
                .status_and_detail();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(detail.code, "SCALING_ERROR");

        let (status, detail) =
            AppError::from(InferenceError::Model("non-finite output".into())).status_and_detail();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(detail.code, "MODEL_ERROR");
    }

    #[test]
    fn test_missing_model_is_service_unavailable() {
        let (status, detail) =
            AppError::PredictionUnavailable("artifact not found".into()).status_and_detail();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(detail.message_en.contains("artifact not found"));
    }

    #[test]
    fn test_data_error_names_the_field() {
        let (field, reason) = split_data_error(
            "Failed to deserialize the JSON body into the target type: month: invalid value: \
             integer `-1`, expected u32 at line 1 column 11",
        );
        assert_eq!(field.as_deref(), Some("month"));
        assert!(reason.starts_with("invalid value: integer `-1`"));
    }

    #[test]
    fn test_unknown_variant_hides_alias_list() {
        let (field, reason) = split_data_error(
            "Failed to deserialize the JSON body into the target type: season: unknown variant \
             `Monsoon`, expected one of `Spring`, `spring`, `Summer`, `summer` at line 1 column 40",
        );
        assert_eq!(field.as_deref(), Some("season"));
        assert_eq!(reason, "unknown variant `Monsoon`");
    }

    #[test]
    fn test_missing_field_is_named() {
        let (field, _) = split_data_error(
            "Failed to deserialize the JSON body into the target type: missing field `hour` at line 1 column 2",
        );
        assert_eq!(field.as_deref(), Some("hour"));
    }

    #[test]
    fn test_invalid_field_maps_to_bad_request() {
        let err = AppError::InvalidField {
            field: Some("month".to_string()),
            reason: "invalid value: integer `-1`, expected u32".to_string(),
        };
        let (status, detail) = err.status_and_detail();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail.code, "VALIDATION_ERROR");
        assert_eq!(detail.field.as_deref(), Some("month"));
    }
}
