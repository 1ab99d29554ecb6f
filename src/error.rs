// HTTP API Error Types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::database::DatabaseError;

/// Failure of a project operation, rendered by the handler boundary
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // 401 Unauthorized
    #[error("{0}")]
    Unauthorized(String),

    // 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    // 404 Not Found, read paths
    #[error("Project information was not found")]
    InformationNotFound,

    // 404 Not Found, mutating paths
    #[error("Project {0} not found.")]
    ProjectNotFound(String),

    // 500 Internal Server Error
    #[error("Project could not be created")]
    CreateFailed,

    #[error("Internal failure: {0}")]
    Internal(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ApiError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        ApiError::InvalidRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn project_not_found(id: impl Into<String>) -> Self {
        ApiError::ProjectNotFound(id.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::InformationNotFound | ApiError::ProjectNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::CreateFailed | ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Client-facing body. Server errors never expose their cause.
    pub fn to_json(&self, resource: &str) -> Value {
        match self {
            ApiError::InformationNotFound => json!({
                "code": 404,
                "message": self.to_string()
            }),
            ApiError::ProjectNotFound(_) => json!({
                "status": 404,
                "message": self.to_string()
            }),
            ApiError::CreateFailed | ApiError::Internal(_) | ApiError::Database(_) => json!({
                "code": "500",
                "message": "Internal Server Error",
                "self": resource
            }),
            ApiError::InvalidRequest(_) | ApiError::Unauthorized(_) | ApiError::Forbidden(_) => json!({
                "code": self.status_code().as_u16().to_string(),
                "message": self.to_string(),
                "self": resource
            }),
        }
    }

    pub fn into_response_for(self, resource: &str) -> Response {
        (self.status_code(), Json(self.to_json(resource))).into_response()
    }
}
