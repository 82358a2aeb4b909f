//! Request-level error taxonomy shared by the prediction and options
//! endpoints. Each variant carries the user-facing message; the HTTP status
//! is derived from the variant, and the body is always `{"error": "..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The artifact never loaded; the service is running degraded.
    #[error("Model not loaded properly")]
    ModelNotLoaded,

    /// One or more of the three categorical inputs is absent or empty.
    #[error("Missing input values")]
    MissingInput,

    /// The encoder mapping has no entry for this field key.
    #[error("Missing label encoder for '{0}'")]
    EncoderMissing(String),

    /// The value is not in its encoder's known vocabulary.
    #[error("Invalid input values. Make sure your inputs match the training data.")]
    InvalidValue,

    /// The estimator itself failed; carries the underlying message.
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// Encoders or reference table absent (degraded or estimator-only load).
    #[error("Model data not available")]
    DataUnavailable,

    /// Options lookup hit a field key the encoder mapping does not have.
    #[error("Error retrieving options: missing label encoder for '{0}'")]
    OptionsUnavailable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingInput | ApiError::EncoderMissing(_) | ApiError::InvalidValue => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ModelNotLoaded
            | ApiError::Prediction(_)
            | ApiError::DataUnavailable
            | ApiError::OptionsUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
