//! Response envelope: the terminal artifact of every pipeline run.
//!
//! Envelopes are built once and never mutated. Every one of them, success
//! or failure, carries the open cross-origin header; error envelopes put
//! the classification code in `x-error` and, for the failure kinds that
//! have one, a JSON `{"message": ...}` body.

use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, CONTENT_TYPE,
};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde_json::Value;

use crate::domain::errors::AuditError;

/// Carries the failure classification code.
pub const X_ERROR: HeaderName = HeaderName::from_static("x-error");

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl ResponseEnvelope {
    fn bare(status: StatusCode) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        Self {
            status,
            headers,
            body: None,
        }
    }

    /// 200 envelope with a JSON body.
    pub fn success(body: Value) -> Self {
        let mut envelope = Self::bare(StatusCode::OK);
        envelope
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        envelope.body = Some(body);
        envelope
    }

    /// Fixed preflight answer: no body, allowed methods and headers,
    /// cacheable for a day.
    pub fn preflight() -> Self {
        let mut envelope = Self::bare(StatusCode::NO_CONTENT);
        envelope
            .headers
            .insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));
        envelope.headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST"),
        );
        envelope.headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("x-set-cookie"),
        );
        envelope
    }

    /// Error envelope with a classification code and an optional message
    /// body.
    pub fn error(status: StatusCode, code: &str, message: Option<&str>) -> Self {
        let mut envelope = Self::bare(status);
        envelope.headers.insert(X_ERROR, ascii_header_value(code));
        if let Some(message) = message {
            envelope
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            envelope.body = Some(serde_json::json!({ "message": message }));
        }
        envelope
    }

    pub fn from_error(error: &AuditError) -> Self {
        Self::error(error.status(), &error.error_code(), error.public_message())
    }
}

/// Header values must be visible ASCII; anything else becomes a space.
fn ascii_header_value(value: &str) -> HeaderValue {
    let cleaned: String = value
        .chars()
        .map(|c| if (' '..='~').contains(&c) { c } else { ' ' })
        .collect();
    HeaderValue::from_str(cleaned.trim()).unwrap_or_else(|_| HeaderValue::from_static("error"))
}
