//! # REST API Errors
//!
//! Every failure a handler can produce, and how it is rendered.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::header::InvalidHeaderValue;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

use crate::schema::FieldViolation;
use crate::storage::StorageError;

use super::alerts::AlertHeaders;

/// Result type for REST operations
pub type ApiResult<T> = Result<T, ApiError>;

/// REST API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Body failed field validation
    #[error("Method argument not valid")]
    Validation(Vec<FieldViolation>),

    /// Request rejected for an entity-specific reason, e.g. `idexists`
    #[error("{title}")]
    BadRequestAlert {
        title: String,
        entity_name: &'static str,
        error_key: &'static str,
        headers: HeaderMap,
    },

    /// Body or path could not be parsed
    #[error("Bad Request: {0}")]
    Malformed(String),

    /// No record with the requested id
    #[error("Not Found")]
    NotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Persistence failure, never recovered locally
    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Entity-scoped 400 carrying failure alert headers
    pub fn bad_request_alert(
        alerts: &AlertHeaders,
        title: impl Into<String>,
        entity_name: &'static str,
        error_key: &'static str,
    ) -> Self {
        ApiError::BadRequestAlert {
            title: title.into(),
            entity_name,
            error_key,
            headers: alerts.failure(entity_name, error_key),
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequestAlert { .. } => StatusCode::BAD_REQUEST,
            ApiError::Malformed(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        let status = self.status_code().as_u16();
        match self {
            ApiError::Validation(violations) => json!({
                "title": "Method argument not valid",
                "status": status,
                "message": "error.validation",
                "fieldErrors": violations,
            }),
            ApiError::BadRequestAlert {
                title,
                entity_name,
                error_key,
                ..
            } => json!({
                "title": title,
                "status": status,
                "message": format!("error.{}", error_key),
                "entityName": entity_name,
                "errorKey": error_key,
                "params": entity_name,
            }),
            ApiError::Malformed(detail) => json!({
                "title": "Bad Request",
                "status": status,
                "message": "error.http.400",
                "detail": detail,
            }),
            ApiError::NotFound => json!({
                "title": "Not Found",
                "status": status,
                "message": "error.http.404",
            }),
            ApiError::Storage(_) | ApiError::Internal(_) => json!({
                "title": "Internal Server Error",
                "status": status,
                "message": "error.http.500",
            }),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl From<InvalidHeaderValue> for ApiError {
    fn from(err: InvalidHeaderValue) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.body());

        match self {
            ApiError::Storage(err) => {
                tracing::error!(code = err.code().code(), error = %err, "storage failure");
                (status, body).into_response()
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "internal error");
                (status, body).into_response()
            }
            ApiError::BadRequestAlert { headers, .. } => (status, headers, body).into_response(),
            _ => (status, body).into_response(),
        }
    }
}
