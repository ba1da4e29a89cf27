//! Audit configuration value objects.
//!
//! Everything here is resolved once per request and immutable afterwards.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

/// The seven core performance audits requested when the caller names none.
pub const DEFAULT_AUDITS: [&str; 7] = [
    "speed-index",
    "first-contentful-paint",
    "first-meaningful-paint",
    "largest-contentful-paint",
    "interactive",
    "total-blocking-time",
    "cumulative-layout-shift",
];

/// Every standard category except `pwa`, the default category set.
pub const DEFAULT_CATEGORIES: [&str; 4] = ["accessibility", "best-practices", "performance", "seo"];

/// Lifetime of a seeded cookie, in seconds from resolution time.
pub const COOKIE_TTL_SECONDS: u64 = 30;

/// Device/network profile under which an audit runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Mobile,
    Desktop,
}

impl Strategy {
    /// Parse the `strategy` request parameter. Anything but the two known
    /// values is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mobile" => Some(Self::Mobile),
            "desktop" => Some(Self::Desktop),
            _ => None,
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Mobile
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mobile => write!(f, "mobile"),
            Self::Desktop => write!(f, "desktop"),
        }
    }
}

/// Filter over category or audit identifiers: everything, or an explicit
/// membership-tested set.
///
/// Unknown identifiers are permitted in the explicit set; they simply never
/// match anything in a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeSpec {
    All,
    Only(BTreeSet<String>),
}

impl IncludeSpec {
    /// Parse a comma-separated identifier list. Tokens are trimmed, empty
    /// tokens dropped. The literal token `all` anywhere in the list
    /// short-circuits the whole field to [`IncludeSpec::All`].
    pub fn parse(list: &str) -> Self {
        let mut ids = BTreeSet::new();
        for token in list.split(',') {
            let token = token.trim();
            if token == "all" {
                return Self::All;
            }
            if !token.is_empty() {
                ids.insert(token.to_string());
            }
        }
        Self::Only(ids)
    }

    /// Build an explicit set from identifiers.
    pub fn of<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(ids.into_iter().map(Into::into).collect())
    }

    pub fn includes(&self, id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.contains(id),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The explicit identifier set, unless this is the `all` sentinel.
    pub fn explicit(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::All => None,
            Self::Only(ids) => Some(ids),
        }
    }
}

/// `SameSite` attribute of a seeded cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// One cookie seeded into the browser page before navigation.
///
/// Cookies are only ever created from a request's cookie header: all specs
/// from one request share a derived domain and expiry, and the remaining
/// attributes are fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSpec {
    pub domain: String,
    pub name: String,
    pub value: String,
    pub path: String,
    pub same_site: SameSite,
    pub http_only: bool,
    pub secure: bool,
    /// Unix timestamp, seconds.
    pub expires_at: u64,
}

impl CookieSpec {
    pub fn new(
        domain: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        expires_at: u64,
    ) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            value: value.into(),
            path: "/".to_string(),
            same_site: SameSite::None,
            http_only: true,
            secure: true,
            expires_at,
        }
    }
}

/// Cookie scope for `url`: the last three dot-segments of its hostname, so
/// the cookie covers sibling subdomains without leaking to unrelated
/// domains. Hostnames with fewer segments are used whole.
pub fn cookie_domain(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let segments: Vec<&str> = host.split('.').collect();
    let keep = segments.len().saturating_sub(3);
    segments[keep..].join(".")
}

/// Parse a semicolon-delimited `name=value` header into one [`CookieSpec`]
/// per pair. Pairs are trimmed and split on the first `=`; segments without
/// a `=` are skipped. Duplicate names are preserved here, the browser keeps
/// whichever lands last.
pub fn parse_cookie_header(header: &str, domain: &str, expires_at: u64) -> Vec<CookieSpec> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            Some(CookieSpec::new(domain, name, value, expires_at))
        })
        .collect()
}

/// Fully resolved audit configuration. Built once per request by the config
/// resolver, then handed read-only through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditConfig {
    pub url: Url,
    pub strategy: Strategy,
    pub cookies: Vec<CookieSpec>,
    pub audits: IncludeSpec,
    pub categories: IncludeSpec,
    pub timing: bool,
}

impl AuditConfig {
    /// Whether the caller supplied a cookie with the given name.
    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.iter().any(|c| c.name == name)
    }
}
