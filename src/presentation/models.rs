//! API response models

use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::response::ResponseEnvelope;

/// Body attached to error responses that carry a caller-visible message.
/// Most errors are header-only; see the `x-error` response header.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable detail for this failure
    #[schema(example = "The page was redirected to a login provider")]
    pub message: String,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service health status
    #[schema(example = "healthy")]
    pub status: String,

    /// Current service version
    #[schema(example = "0.1.0")]
    pub version: String,

    /// Health check timestamp
    #[schema(example = "2024-01-15T10:30:00Z")]
    pub timestamp: DateTime<Utc>,
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let mut response = match self.body {
            Some(body) => Json(body).into_response(),
            None => ().into_response(),
        };
        *response.status_mut() = self.status;
        for (name, value) in self.headers.iter() {
            response.headers_mut().insert(name, value.clone());
        }
        response
    }
}
