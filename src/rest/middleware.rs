//! Per-request API version resolution and response version headers.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::contracts::contract::versioned_path;
use crate::rest::state::ApiState;
use crate::version::VersionSources;

pub const VERSION_WARNING_HEADER: &str = "x-api-version-warning";
pub const DEPRECATION_HEADER: &str = "deprecation";
pub const DEPRECATION_MESSAGE_HEADER: &str = "x-api-deprecation-message";

/// Version resolved for the current request, available to handlers as an
/// `Extension`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion(pub String);

/// Resolve the request's API version (route parameter, path segment, header,
/// `version` query, default) and annotate the response:
///
/// - the version header echoing the resolved version
/// - `X-API-Version-Warning` when it is not the latest
/// - `Deprecation`, `X-API-Deprecation-Message` and a `successor-version`
///   link when the matched contract is deprecated in that version
pub async fn api_version(
    State(state): State<ApiState>,
    params: Option<Path<HashMap<String, String>>>,
    query: Option<Query<HashMap<String, String>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let resolver = state.resolver();

    let explicit = params.and_then(|Path(mut p)| p.remove("version"));
    let query_version = query.and_then(|Query(mut q)| q.remove("version"));
    let header_version = request
        .headers()
        .get(resolver.header_name())
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let method = request.method().as_str().to_string();
    let path = request.uri().path().to_string();

    let version = resolver.resolve(VersionSources {
        explicit: explicit.as_deref(),
        path: Some(&path),
        header: header_version.as_deref(),
        query: query_version.as_deref(),
    });

    request
        .extensions_mut()
        .insert(ResolvedVersion(version.clone()));
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    if let Ok(name) = HeaderName::try_from(resolver.header_name()) {
        insert(headers, name, &version);
    }
    if let Some(warning) = resolver.warning(&version) {
        insert(headers, HeaderName::from_static(VERSION_WARNING_HEADER), &warning);
    }

    if let Some(contract) = state.registry.match_route(&method, &path) {
        if contract.is_deprecated_in(&version) {
            let lifecycle = contract.versioning();
            headers.insert(
                HeaderName::from_static(DEPRECATION_HEADER),
                HeaderValue::from_static("true"),
            );
            if let Some(message) = &lifecycle.deprecation_message {
                insert(
                    headers,
                    HeaderName::from_static(DEPRECATION_MESSAGE_HEADER),
                    message,
                );
            }
            if let Some(replacement) = &lifecycle.replaced_by {
                let link = format!(
                    "<{}>; rel=\"successor-version\"",
                    versioned_path(replacement, &version)
                );
                insert(headers, axum::http::header::LINK, &link);
            }
        }
    }

    response
}

/// Values that are not valid header text are dropped
fn insert(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}
