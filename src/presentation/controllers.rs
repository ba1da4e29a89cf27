//! Audit API controllers

use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, Method};
use axum::response::Json;
use chrono::Utc;
use url::form_urlencoded;

use crate::application::response::ResponseEnvelope;
use crate::application::{AuditOrchestrator, AuditRequest};
use crate::presentation::models::{ErrorBody, HealthResponse};

/// Application state for the audit pipeline
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AuditOrchestrator>,
}

/// Flatten the transport request into the pipeline's view of it. Repeated
/// query parameters collapse first-value-wins; header names arrive
/// lowercased from the HTTP layer.
fn audit_request(method: Method, query: Option<&str>, headers: &HeaderMap) -> AuditRequest {
    let mut request = AuditRequest::new(method);
    if let Some(query) = query {
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            request
                .params
                .entry(name.into_owned())
                .or_insert_with(|| value.into_owned());
        }
    }
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            request
                .headers
                .insert(name.as_str().to_string(), value.to_string());
        }
    }
    request
}

/// GET /audit - Run an audit against a URL and return the filtered report
#[utoipa::path(
    get,
    path = "/audit",
    params(
        ("url" = Option<String>, Query, description = "Target page URL, percent-encoded"),
        ("strategy" = Option<String>, Query, description = "Form factor: `mobile` (default) or `desktop`"),
        ("audits" = Option<String>, Query, description = "Comma-separated audit ids to keep, or `all`"),
        ("categories" = Option<String>, Query, description = "Comma-separated category ids to keep, or `all`"),
        ("timing" = Option<String>, Query, description = "Set to `true` to keep engine timing data")
    ),
    responses(
        (status = 200, description = "Filtered audit report under the `lighthouseResult` key"),
        (status = 400, description = "Invalid request; see the `x-error` header"),
        (status = 401, description = "Authorization cookie rejected by the target", body = ErrorBody),
        (status = 502, description = "The engine ran but produced no usable report", body = ErrorBody),
        (status = 504, description = "Audit exceeded its time budget")
    ),
    tag = "audit"
)]
pub async fn run_audit(
    State(state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> ResponseEnvelope {
    let request = audit_request(method, query.as_deref(), &headers);
    state.orchestrator.handle(&request).await
}

/// GET /health - Service liveness
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}
