//! Application error type and its HTTP mapping
//!
//! Animal failures render as `{"message", "code"}`. Everything else renders
//! as `{"error": {"message", "type", "status"}}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::{AnimalError, AnimalErrorCode};

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure a request or the bootstrap can surface
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Rejected by the validation rules or an unknown animal
    #[error("Animal rejected: {0}")]
    Animal(AnimalError),

    /// Body is not JSON of the expected shape
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Error::Database(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Error::InvalidRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Animal(err) if err.code() == AnimalErrorCode::Code04 => StatusCode::NOT_FOUND,
            Error::Animal(_) | Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable kind, used in the generic error body
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "configuration_error",
            Error::Database(_) => "database_error",
            Error::Animal(_) => "animal_error",
            Error::InvalidRequest(_) => "invalid_request",
            Error::Internal(_) => "internal_error",
            Error::Timeout(_) => "timeout",
        }
    }

    pub fn as_animal_error(&self) -> Option<&AnimalError> {
        match self {
            Error::Animal(err) => Some(err),
            _ => None,
        }
    }
}

/// Body of every non-animal error response
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    message: String,
    #[serde(rename = "type")]
    kind: &'static str,
    status: u16,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = ?self, kind = self.kind(), "Request failed");
        } else {
            tracing::warn!(error = %self, kind = self.kind(), "Request rejected");
        }

        match self {
            // Animal errors are part of the API contract and keep their own shape
            Error::Animal(err) => (status, Json(err)).into_response(),
            other => {
                let body = ErrorBody {
                    error: ErrorDetail {
                        message: other.to_string(),
                        kind: other.kind(),
                        status: status.as_u16(),
                    },
                };
                (status, Json(body)).into_response()
            },
        }
    }
}

impl From<envconfig::Error> for Error {
    fn from(err: envconfig::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Malformed or mistyped JSON bodies
impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}
