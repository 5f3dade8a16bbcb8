//! Error-code catalog shared by contracts, the OpenAPI projection and the
//! REST error envelope.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Machine-readable error codes returned in the `error.code` field of the
/// error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    InvalidRequest,
    Unauthenticated,
    InvalidCredentials,
    TokenExpired,
    Forbidden,
    InsufficientRole,
    NotFound,
    ResourceNotFound,
    MethodNotAllowed,
    Conflict,
    DuplicateEntry,
    PayloadTooLarge,
    UnsupportedMediaType,
    RateLimited,
    ServerError,
    ServiceUnavailable,
    AiProviderError,
    AiQuotaExceeded,
    UploadFailed,
    EmailDeliveryFailed,
}

impl ErrorCode {
    /// Every code, in catalog order
    pub fn all() -> &'static [ErrorCode] {
        &[
            ErrorCode::ValidationError,
            ErrorCode::InvalidRequest,
            ErrorCode::Unauthenticated,
            ErrorCode::InvalidCredentials,
            ErrorCode::TokenExpired,
            ErrorCode::Forbidden,
            ErrorCode::InsufficientRole,
            ErrorCode::NotFound,
            ErrorCode::ResourceNotFound,
            ErrorCode::MethodNotAllowed,
            ErrorCode::Conflict,
            ErrorCode::DuplicateEntry,
            ErrorCode::PayloadTooLarge,
            ErrorCode::UnsupportedMediaType,
            ErrorCode::RateLimited,
            ErrorCode::ServerError,
            ErrorCode::ServiceUnavailable,
            ErrorCode::AiProviderError,
            ErrorCode::AiQuotaExceeded,
            ErrorCode::UploadFailed,
            ErrorCode::EmailDeliveryFailed,
        ]
    }

    /// Wire representation (e.g. `VALIDATION_ERROR`)
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::Unauthenticated => "UNAUTHENTICATED",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::TokenExpired => "TOKEN_EXPIRED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::InsufficientRole => "INSUFFICIENT_ROLE",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ResourceNotFound => "RESOURCE_NOT_FOUND",
            ErrorCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::DuplicateEntry => "DUPLICATE_ENTRY",
            ErrorCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ErrorCode::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::ServerError => "SERVER_ERROR",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::AiProviderError => "AI_PROVIDER_ERROR",
            ErrorCode::AiQuotaExceeded => "AI_QUOTA_EXCEEDED",
            ErrorCode::UploadFailed => "UPLOAD_FAILED",
            ErrorCode::EmailDeliveryFailed => "EMAIL_DELIVERY_FAILED",
        }
    }

    /// HTTP status the code is returned with
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 422,
            ErrorCode::InvalidRequest => 400,
            ErrorCode::Unauthenticated
            | ErrorCode::InvalidCredentials
            | ErrorCode::TokenExpired => 401,
            ErrorCode::Forbidden | ErrorCode::InsufficientRole => 403,
            ErrorCode::NotFound | ErrorCode::ResourceNotFound => 404,
            ErrorCode::MethodNotAllowed => 405,
            ErrorCode::Conflict | ErrorCode::DuplicateEntry => 409,
            ErrorCode::PayloadTooLarge => 413,
            ErrorCode::UnsupportedMediaType => 415,
            ErrorCode::RateLimited | ErrorCode::AiQuotaExceeded => 429,
            ErrorCode::ServerError => 500,
            ErrorCode::AiProviderError | ErrorCode::EmailDeliveryFailed => 502,
            ErrorCode::ServiceUnavailable => 503,
            ErrorCode::UploadFailed => 422,
        }
    }

    /// Human-readable description used in docs and OpenAPI responses
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "The request payload failed validation",
            ErrorCode::InvalidRequest => "The request is malformed",
            ErrorCode::Unauthenticated => "Authentication is required",
            ErrorCode::InvalidCredentials => "The supplied credentials are invalid",
            ErrorCode::TokenExpired => "The access token has expired",
            ErrorCode::Forbidden => "You do not have access to this resource",
            ErrorCode::InsufficientRole => "Your role does not permit this action",
            ErrorCode::NotFound => "The requested endpoint does not exist",
            ErrorCode::ResourceNotFound => "The requested resource was not found",
            ErrorCode::MethodNotAllowed => "The HTTP method is not allowed for this endpoint",
            ErrorCode::Conflict => "The request conflicts with the current resource state",
            ErrorCode::DuplicateEntry => "A resource with the same unique value already exists",
            ErrorCode::PayloadTooLarge => "The request payload is too large",
            ErrorCode::UnsupportedMediaType => "The uploaded media type is not supported",
            ErrorCode::RateLimited => "Too many requests, slow down",
            ErrorCode::ServerError => "An unexpected server error occurred",
            ErrorCode::ServiceUnavailable => "The service is temporarily unavailable",
            ErrorCode::AiProviderError => "The upstream AI provider returned an error",
            ErrorCode::AiQuotaExceeded => "The AI usage quota has been exhausted",
            ErrorCode::UploadFailed => "The file could not be stored",
            ErrorCode::EmailDeliveryFailed => "The email could not be delivered",
        }
    }

    /// Render the catalog as `{CODE: {status, description}}`
    pub fn catalog() -> Map<String, Value> {
        Self::all()
            .iter()
            .map(|c| {
                (
                    c.code().to_string(),
                    serde_json::json!({
                        "status": c.http_status(),
                        "description": c.description(),
                    }),
                )
            })
            .collect()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
