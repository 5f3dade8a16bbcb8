//! REST meta API.
//!
//! Serves the contract registry as a discovery document, grouped endpoint
//! catalog, error catalog and OpenAPI document, under both `/api/meta/...`
//! and the version-prefixed `/api/{version}/meta/...` forms.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use middleware::ResolvedVersion;
pub use state::ApiState;

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::health::health))
        // Unversioned meta endpoints
        .route("/api/meta", get(routes::meta::index))
        .route("/api/meta/endpoints", get(routes::meta::endpoints))
        .route("/api/meta/versions", get(routes::meta::versions))
        .route("/api/meta/errors", get(routes::meta::errors))
        .route("/api/meta/schemas", get(routes::meta::schemas))
        .route("/api/meta/auth", get(routes::meta::auth))
        .route("/api/meta/openapi", get(routes::meta::openapi))
        .route(
            "/api/meta/validation/:method/*path",
            get(routes::meta::validation_rules).post(routes::meta::validate),
        )
        // Version-prefixed forms; the route parameter wins over headers
        .route("/api/:version/meta", get(routes::meta::index))
        .route("/api/:version/meta/endpoints", get(routes::meta::endpoints))
        .route("/api/:version/meta/versions", get(routes::meta::versions))
        .route("/api/:version/meta/openapi", get(routes::meta::openapi))
        .fallback(routes::meta::not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::api_version,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server and run until Ctrl-C
pub async fn serve(state: ApiState, addr: SocketAddr) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Meta API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Meta API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, VersioningConfig};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn two_version_state() -> ApiState {
        let mut config = Config::default();
        config.api.versioning = VersioningConfig {
            supported_versions: vec!["v1".to_string(), "v2".to_string()],
            ..VersioningConfig::default()
        };
        ApiState::new(config)
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, headers, json)
    }

    #[tokio::test]
    async fn test_health_route() {
        let router = build_router(ApiState::new(Config::default()));
        let (status, headers, json) = get_json(router, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(headers["x-api-version"], "v1");
    }

    #[tokio::test]
    async fn test_meta_uses_path_version() {
        let router = build_router(two_version_state());
        let (status, headers, json) = get_json(router, "/api/v2/meta").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["version"]["current"], "v2");
        assert_eq!(json["data"]["baseUrl"], "http://localhost:8000/api/v2");
        assert_eq!(headers["x-api-version"], "v2");
        assert!(headers.get("x-api-version-warning").is_none());
    }

    #[tokio::test]
    async fn test_header_version_and_warning() {
        let router = build_router(two_version_state());
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/meta/versions")
                    .header("X-API-Version", "1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-api-version"], "v1");
        let warning = response.headers()["x-api-version-warning"].to_str().unwrap();
        assert!(warning.contains("v2"));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["current"], "v1");
        assert_eq!(json["data"]["latest"], "v2");
    }

    #[tokio::test]
    async fn test_unsupported_version_falls_back_to_default() {
        let router = build_router(two_version_state());
        let (status, headers, _) = get_json(router, "/api/meta/versions?version=v9").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["x-api-version"], "v1");
    }

    #[tokio::test]
    async fn test_endpoints_filtered_by_version() {
        let router = build_router(two_version_state());
        let (_, _, v1) = get_json(router.clone(), "/api/v1/meta/endpoints").await;
        let (_, _, v2) = get_json(router, "/api/v2/meta/endpoints").await;

        let has_refresh = |json: &Value| {
            json["data"]["auth"]
                .as_array()
                .unwrap()
                .iter()
                .any(|e| e["path"] == "/api/auth/refresh")
        };
        assert!(!has_refresh(&v1));
        assert!(has_refresh(&v2));
        assert_eq!(v2["meta"]["version"], "v2");
    }

    #[tokio::test]
    async fn test_openapi_json_and_yaml() {
        let router = build_router(ApiState::new(Config::default()));
        let (status, _, json) = get_json(router.clone(), "/api/meta/openapi").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["openapi"], "3.0.3");
        assert!(json["paths"]["/api/v1/posts"]["get"].is_object());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/meta/openapi?format=yaml")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["content-type"], "application/yaml");
    }

    #[tokio::test]
    async fn test_openapi_rejects_unknown_format() {
        let router = build_router(ApiState::new(Config::default()));
        let (status, _, json) = get_json(router, "/api/meta/openapi?format=xml").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_validation_rules_route() {
        let router = build_router(ApiState::new(Config::default()));
        let (status, _, json) =
            get_json(router.clone(), "/api/meta/validation/post/api/contact").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["rules"]["email"], "required|email");
        assert_eq!(json["data"]["rules"]["phone"], "nullable|string");

        let (status, _, json) = get_json(router, "/api/meta/validation/get/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "RESOURCE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_validate_route() {
        let router = build_router(ApiState::new(Config::default()));
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/meta/validation/POST/api/newsletter/subscribe")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"email": "not-an-email"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"]["details"]["email"].is_array());
    }

    #[tokio::test]
    async fn test_unknown_route_uses_error_envelope() {
        let router = build_router(ApiState::new(Config::default()));
        let (status, headers, json) = get_json(router, "/api/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(headers["x-api-version"], "v1");
    }

    #[tokio::test]
    async fn test_deprecation_headers_for_matched_contract() {
        let router = build_router(two_version_state());
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v2/blog/posts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        // Not served here, but the contract is known and deprecated in v2
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let headers = response.headers();
        assert_eq!(headers["deprecation"], "true");
        assert_eq!(
            headers["link"],
            "</api/v2/posts>; rel=\"successor-version\""
        );
        assert!(headers.get("x-api-deprecation-message").is_some());
    }
}
