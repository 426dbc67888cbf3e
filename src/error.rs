//! Error translation.
//!
//! Every failure that reaches the HTTP layer is one of the [`GatewayError`]
//! kinds. Each kind maps to a stable [`ErrorCode`] and status, and renders as
//! an [`ErrorEnvelope`] wrapped in `{"errors": [...]}`.

use crate::options::ValidationError;
use crate::store::StoreError;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const PROCESSING_ERROR_MESSAGE: &str = "Error processing GraphQL request";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("error processing GraphQL request: {0}")]
    Processing(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid CORS configuration: {0}")]
    Cors(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    ProcessingError,
    InternalServerError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::ProcessingError => "PROCESSING_ERROR",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl GatewayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::Validation(_) | GatewayError::PayloadTooLarge { .. } => {
                ErrorCode::ValidationError
            }
            GatewayError::Processing(_) => ErrorCode::ProcessingError,
            GatewayError::Internal(_) | GatewayError::Store(_) | GatewayError::Cors(_) => {
                ErrorCode::InternalServerError
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        if let GatewayError::PayloadTooLarge { .. } = self {
            return StatusCode::PAYLOAD_TOO_LARGE;
        }
        match self.code() {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::ProcessingError | ErrorCode::InternalServerError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to clients. Processing and internal failures never leak
    /// their cause.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Validation(message) => message.clone(),
            GatewayError::PayloadTooLarge { .. } => self.to_string(),
            GatewayError::Processing(_) => PROCESSING_ERROR_MESSAGE.to_string(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub message: String,
    pub code: ErrorCode,
    pub status_code: u16,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>, code: ErrorCode, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            code,
            status_code: status.as_u16(),
        }
    }

    pub fn processing() -> Self {
        Self::new(
            PROCESSING_ERROR_MESSAGE,
            ErrorCode::ProcessingError,
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    }

    pub fn to_body(&self) -> String {
        #[derive(Serialize)]
        struct Body<'a> {
            errors: [&'a ErrorEnvelope; 1],
        }

        serde_json::to_string(&Body { errors: [self] }).unwrap_or_else(|_| {
            format!(
                r#"{{"errors":[{{"message":"{}","code":"{}","statusCode":{}}}]}}"#,
                INTERNAL_ERROR_MESSAGE,
                ErrorCode::InternalServerError,
                self.status_code
            )
        })
    }
}

impl From<&GatewayError> for ErrorEnvelope {
    fn from(error: &GatewayError) -> Self {
        ErrorEnvelope::new(error.public_message(), error.code(), error.status())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;
