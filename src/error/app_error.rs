use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;
use std::fmt;

use crate::{models::GatewayResponse, store::StoreError};

#[derive(Debug)]
pub enum AppError {
    StoreError(StoreError),
    ConfigError(String),
    InternalError { message: String, detail: String },
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl AppError {
    pub fn internal(message: impl Into<String>, detail: impl fmt::Display) -> Self {
        AppError::InternalError {
            message: message.into(),
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::StoreError(e) => write!(f, "Store error: {}", e),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::InternalError { message, detail } => {
                write!(f, "Internal error: {}: {}", message, detail)
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::StoreError(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal("Failed to encode response", err)
    }
}

impl From<AppError> for GatewayResponse {
    fn from(err: AppError) -> Self {
        let (status, body) = match err {
            AppError::StoreError(ref e) => {
                tracing::error!("Store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Store request failed", "error": e.to_string() }),
                )
            }
            AppError::ConfigError(ref msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Server configuration error" }),
                )
            }
            AppError::InternalError {
                ref message,
                ref detail,
            } => {
                tracing::error!("{}: {}", message, detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": message, "error": detail }),
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, json!({ "message": msg })),
        };

        GatewayResponse::new(status, body.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        GatewayResponse::from(self).into_response()
    }
}
