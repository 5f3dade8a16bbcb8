//! Self-description endpoints backed by the contract registry.
//!
//! Every handler reads the version resolved by
//! [`api_version`](crate::rest::middleware::api_version).

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::contracts::registry::{authentication_description, response_format, ApiSpec};
use crate::contracts::{EndpointContract, GroupedEndpoints};
use crate::error_codes::ErrorCode;
use crate::openapi;
use crate::rest::dto::{
    Envelope, OpenApiQuery, ValidationResult, ValidationRulesResponse, VersionsResponse,
};
use crate::rest::error::ApiError;
use crate::rest::middleware::ResolvedVersion;
use crate::rest::state::ApiState;

/// Full discovery document
pub async fn index(
    State(state): State<ApiState>,
    Extension(ResolvedVersion(version)): Extension<ResolvedVersion>,
) -> Json<Envelope<ApiSpec>> {
    Json(Envelope::ok(
        state.registry.spec(&state.config.app, Some(&version)),
    ))
}

pub async fn endpoints(
    State(state): State<ApiState>,
    Extension(ResolvedVersion(version)): Extension<ResolvedVersion>,
) -> Json<Envelope<GroupedEndpoints>> {
    let grouped = state.registry.grouped(Some(&version));
    let total: usize = grouped.values().map(Vec::len).sum();
    Json(Envelope::ok(grouped).with_meta(json!({
        "version": version,
        "total": total,
    })))
}

pub async fn versions(
    State(state): State<ApiState>,
    Extension(ResolvedVersion(version)): Extension<ResolvedVersion>,
) -> Json<Envelope<VersionsResponse>> {
    let resolver = state.resolver();
    Json(Envelope::ok(VersionsResponse {
        current: version,
        default: resolver.default_version().to_string(),
        latest: resolver.latest(),
        supported: resolver.supported(),
        versioning_enabled: resolver.enabled(),
        header: resolver.header_name().to_string(),
    }))
}

/// Error catalog plus the error envelope shape
pub async fn errors() -> Json<Envelope<Value>> {
    Json(Envelope::ok(json!({
        "codes": ErrorCode::catalog(),
        "format": response_format()["error"],
    })))
}

pub async fn schemas() -> Json<Envelope<Value>> {
    Json(Envelope::ok(common_schemas()))
}

pub async fn auth() -> Json<Envelope<Value>> {
    let mut description = authentication_description();
    if let Value::Object(map) = &mut description {
        map.insert(
            "flow".into(),
            json!([
                "POST credentials to the token endpoint",
                "Send the returned token as 'Authorization: Bearer {token}'",
                "Call the logout endpoint to revoke the token"
            ]),
        );
        map.insert(
            "errors".into(),
            json!({
                "missingToken": ErrorCode::Unauthenticated.code(),
                "expiredToken": ErrorCode::TokenExpired.code(),
                "wrongRole": ErrorCode::InsufficientRole.code(),
            }),
        );
    }
    Json(Envelope::ok(description))
}

/// OpenAPI 3.0.3 document, JSON by default or YAML with `?format=yaml`
pub async fn openapi(
    State(state): State<ApiState>,
    Extension(ResolvedVersion(version)): Extension<ResolvedVersion>,
    Query(query): Query<OpenApiQuery>,
) -> Result<Response, ApiError> {
    let document = openapi::generate(&state.registry, &state.config.app, Some(&version));

    match query.format.as_deref() {
        None | Some("json") => Ok(Json(document).into_response()),
        Some("yaml" | "yml") => {
            let yaml = openapi::to_yaml(&document)?;
            Ok(([(header::CONTENT_TYPE, "application/yaml")], yaml).into_response())
        }
        Some(other) => Err(ApiError::BadRequest(format!(
            "Unsupported format '{}', expected json or yaml",
            other
        ))),
    }
}

/// Rules derived from the request body schema of a registered contract
pub async fn validation_rules(
    State(state): State<ApiState>,
    Path((method, path)): Path<(String, String)>,
) -> Result<Json<Envelope<ValidationRulesResponse>>, ApiError> {
    let contract = lookup(&state, &method, &path)?;
    Ok(Json(Envelope::ok(ValidationRulesResponse {
        method: contract.method().to_string(),
        path: contract.path().to_string(),
        rules: Value::Object(contract.validation_rules().to_map()),
    })))
}

/// Check a JSON body against a contract's derived rules
pub async fn validate(
    State(state): State<ApiState>,
    Path((method, path)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Envelope<ValidationResult>>, ApiError> {
    let contract = lookup(&state, &method, &path)?;
    contract
        .validation_rules()
        .check(&body)
        .map_err(ApiError::Validation)?;
    Ok(Json(Envelope::ok(ValidationResult { valid: true })))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("The requested route does not exist.".to_string())
}

fn lookup<'a>(
    state: &'a ApiState,
    method: &str,
    path: &str,
) -> Result<&'a EndpointContract, ApiError> {
    let path = format!("/{}", path.trim_start_matches('/'));
    let method = method.to_uppercase();
    state
        .registry
        .get(&method, &path)
        .or_else(|| state.registry.match_route(&method, &path))
        .ok_or_else(|| {
            ApiError::ResourceNotFound(format!("No contract registered for {} {}", method, path))
        })
}

/// Shapes shared across the API
fn common_schemas() -> Value {
    let format = response_format();
    json!({
        "envelopes": {
            "success": format["success"],
            "paginated": format["paginated"],
            "error": format["error"],
        },
        "pagination": {
            "query": {
                "page": "integer, default 1",
                "per_page": "integer, default 15, max 100"
            },
            "meta": format["paginated"]["meta"],
            "links": format["paginated"]["links"],
        },
        "primitives": {
            "uuid": { "type": "string", "format": "uuid", "example": "9b2f7c1e-3d4a-4f6b-8e21-5a7c9d0e1f23" },
            "email": { "type": "string", "format": "email", "example": "ada@example.com" },
            "datetime": { "type": "string", "format": "date-time", "example": "2024-05-01T09:30:00Z" },
            "date": { "type": "string", "format": "date", "example": "2024-05-01" },
            "url": { "type": "string", "format": "uri", "example": "https://example.com/image.jpg" }
        }
    })
}
