//! Config resolver: raw request parameters to a validated [`AuditConfig`].
//!
//! Only the query-parameter path is implemented; structured-body (POST)
//! resolution is an explicit unimplemented variant. No side effects beyond
//! building the config, and cookie values never reach the log.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use http::Method;
use percent_encoding::percent_decode_str;
use tracing::debug;
use url::Url;

use crate::domain::audit::{
    self, AuditConfig, COOKIE_TTL_SECONDS, DEFAULT_AUDITS, DEFAULT_CATEGORIES, IncludeSpec,
    Strategy,
};
use crate::domain::errors::AuditError;

/// Request header carrying semicolon-delimited `name=value` cookie pairs.
pub const COOKIE_HEADER: &str = "x-set-cookie";

/// Transport-agnostic view of one incoming request.
#[derive(Debug, Clone)]
pub struct AuditRequest {
    pub method: Method,
    /// Query parameters; repeated names were collapsed first-value-wins.
    pub params: BTreeMap<String, String>,
    /// Header names lowercased.
    pub headers: BTreeMap<String, String>,
}

impl AuditRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            params: BTreeMap::new(),
            headers: BTreeMap::new(),
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn options() -> Self {
        Self::new(Method::OPTIONS)
    }

    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn is_preflight(&self) -> bool {
        self.method == Method::OPTIONS
    }
}

/// Turns requests into audit configurations. Holds the fallback include
/// sets applied when a request omits `audits`/`categories`.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    default_audits: IncludeSpec,
    default_categories: IncludeSpec,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self {
            default_audits: IncludeSpec::of(DEFAULT_AUDITS),
            default_categories: IncludeSpec::of(DEFAULT_CATEGORIES),
        }
    }
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(default_audits: IncludeSpec, default_categories: IncludeSpec) -> Self {
        Self {
            default_audits,
            default_categories,
        }
    }

    /// Resolve one request. Fails with [`AuditError::InvalidRequest`] on a
    /// bad `strategy`/`url` and [`AuditError::NotImplemented`] for the
    /// structured-body path.
    pub fn resolve(&self, request: &AuditRequest) -> Result<AuditConfig, AuditError> {
        if request.method == Method::POST {
            return self.resolve_structured_body(request);
        }

        let strategy = match request.param("strategy") {
            None => Strategy::default(),
            Some(value) => Strategy::parse(value)
                .ok_or_else(|| AuditError::invalid_request("invalid strategy"))?,
        };

        let url = resolve_url(request)?;

        let audits = match request.param("audits") {
            Some(list) => IncludeSpec::parse(list),
            None => self.default_audits.clone(),
        };
        let categories = match request.param("categories") {
            Some(list) => IncludeSpec::parse(list),
            None => self.default_categories.clone(),
        };
        let timing = request.param("timing") == Some("true");

        let cookies = match request.header(COOKIE_HEADER) {
            Some(header) => {
                let domain = audit::cookie_domain(&url);
                let expires_at = unix_now() + COOKIE_TTL_SECONDS;
                let cookies = audit::parse_cookie_header(header, &domain, expires_at);
                let names: Vec<&str> = cookies.iter().map(|c| c.name.as_str()).collect();
                debug!(?names, %domain, "cookies resolved");
                cookies
            }
            None => Vec::new(),
        };

        Ok(AuditConfig {
            url,
            strategy,
            cookies,
            audits,
            categories,
            timing,
        })
    }

    /// Structured-body resolution. Deliberately unimplemented; the variant
    /// exists so the method surface is explicit about it.
    fn resolve_structured_body(&self, _request: &AuditRequest) -> Result<AuditConfig, AuditError> {
        Err(AuditError::NotImplemented)
    }
}

fn resolve_url(request: &AuditRequest) -> Result<Url, AuditError> {
    let raw = request
        .param("url")
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AuditError::invalid_request("missing url parameter"))?;

    // The value arrives percent-encoded on top of transport decoding.
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| AuditError::invalid_request("invalid url parameter"))?;
    Url::parse(&decoded).map_err(|_| AuditError::invalid_request("invalid url parameter"))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
