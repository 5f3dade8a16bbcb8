//! API error types and the error envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::contracts::FieldError;
use crate::error_codes::ErrorCode;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// No route matched
    NotFound(String),
    /// Route matched but the named resource does not exist
    ResourceNotFound(String),
    BadRequest(String),
    /// Body failed the derived validation rules
    Validation(Vec<FieldError>),
    Internal(String),
}

/// `{success: false, error: {...}}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::NotFound(_) => ErrorCode::NotFound,
            ApiError::ResourceNotFound(_) => ErrorCode::ResourceNotFound,
            ApiError::BadRequest(_) => ErrorCode::InvalidRequest,
            ApiError::Validation(_) => ErrorCode::ValidationError,
            ApiError::Internal(_) => ErrorCode::ServerError,
        }
    }

    fn into_body(self) -> ErrorResponse {
        let code = self.code();
        let (message, details) = match self {
            ApiError::NotFound(msg)
            | ApiError::ResourceNotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Internal(msg) => (msg, None),
            ApiError::Validation(errors) => {
                // field -> [messages]
                let mut fields = Map::new();
                for error in errors {
                    let entry = fields
                        .entry(error.field.clone())
                        .or_insert_with(|| Value::Array(Vec::new()));
                    if let Value::Array(messages) = entry {
                        messages.push(Value::String(error.message));
                    }
                }
                (
                    "The given data was invalid.".to_string(),
                    Some(Value::Object(fields)),
                )
            }
        };

        ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: code.code().to_string(),
                message,
                details,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code().http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        }
        (status, Json(self.into_body())).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for ApiError {
    fn from(err: serde_yaml::Error) -> Self {
        ApiError::Internal(format!("YAML error: {}", err))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}
