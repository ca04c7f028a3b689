use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VectorError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type VectorResult<T> = Result<T, VectorError>;

impl From<reqwest::Error> for VectorError {
    fn from(err: reqwest::Error) -> Self {
        VectorError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for VectorError {
    fn from(err: serde_json::Error) -> Self {
        VectorError::MalformedResponse(format!("JSON error: {}", err))
    }
}

impl From<core_config::ConfigError> for VectorError {
    fn from(err: core_config::ConfigError) -> Self {
        VectorError::Config(err.to_string())
    }
}

/// Convert VectorError to AppError for standardized HTTP error responses
impl From<VectorError> for AppError {
    fn from(err: VectorError) -> Self {
        match err {
            VectorError::Transport(msg) => {
                AppError::ServiceUnavailable(format!("Vearch unreachable: {}", msg))
            }
            VectorError::Validation(msg) => AppError::BadRequest(msg),
            VectorError::MalformedResponse(msg) => {
                AppError::BadGateway(format!("Unexpected Vearch response: {}", msg))
            }
            VectorError::Embedding(msg) => {
                AppError::InternalServerError(format!("Embedding error: {}", msg))
            }
            VectorError::Config(msg) => {
                AppError::InternalServerError(format!("Config error: {}", msg))
            }
        }
    }
}

impl IntoResponse for VectorError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
