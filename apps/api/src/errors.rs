use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;
use crate::gateways::GatewayError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Content integrity violation: {0}")]
    ContentIntegrity(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::ContentIntegrity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CONTENT_INTEGRITY",
                msg.clone(),
            ),
            AppError::Gateway(GatewayError::NotConfigured(gateway)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "GATEWAY_NOT_CONFIGURED",
                format!("The {gateway} gateway is not configured"),
            ),
            AppError::Gateway(e) => {
                tracing::warn!("Gateway error: {e}");
                (StatusCode::BAD_GATEWAY, "GATEWAY_ERROR", e.to_string())
            }
            AppError::Export(ExportError::Empty) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                ExportError::Empty.to_string(),
            ),
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_FAILED",
                    e.to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
