//! Report factories shaped like real engine output

use pharos::domain::report::AuditReport;
use serde_json::{Value, json};

fn parse(value: Value) -> AuditReport {
    serde_json::from_value(value).expect("factory report must deserialize")
}

fn base_report_json() -> Value {
    json!({
        "lighthouseVersion": "12.6.0",
        "requestedUrl": "https://example.com/",
        "finalDisplayedUrl": "https://example.com/",
        "categories": {
            "performance": {
                "id": "performance",
                "title": "Performance",
                "score": 0.93,
                "auditRefs": [
                    { "id": "speed-index", "weight": 10, "group": "metrics" },
                    { "id": "first-contentful-paint", "weight": 10, "group": "metrics" },
                    { "id": "largest-contentful-paint", "weight": 25, "group": "metrics" },
                    { "id": "interactive", "weight": 10, "group": "metrics" },
                    { "id": "total-blocking-time", "weight": 30, "group": "metrics" },
                    { "id": "cumulative-layout-shift", "weight": 15, "group": "metrics" },
                    { "id": "render-blocking-resources", "weight": 0 }
                ]
            },
            "accessibility": {
                "id": "accessibility",
                "title": "Accessibility",
                "score": 0.87,
                "auditRefs": [{ "id": "color-contrast", "weight": 3 }]
            },
            "best-practices": {
                "id": "best-practices",
                "title": "Best Practices",
                "score": 1.0,
                "auditRefs": [{ "id": "uses-https", "weight": 1 }]
            },
            "seo": {
                "id": "seo",
                "title": "SEO",
                "score": 0.92,
                "auditRefs": [{ "id": "meta-description", "weight": 1 }]
            }
        },
        "audits": {
            "speed-index": { "id": "speed-index", "score": 0.88, "numericValue": 2301.4 },
            "first-contentful-paint": { "id": "first-contentful-paint", "score": 0.95, "numericValue": 1203.0 },
            "first-meaningful-paint": { "id": "first-meaningful-paint", "score": 0.91, "numericValue": 1408.2 },
            "largest-contentful-paint": { "id": "largest-contentful-paint", "score": 0.82, "numericValue": 2460.7 },
            "interactive": { "id": "interactive", "score": 0.97, "numericValue": 2101.9 },
            "total-blocking-time": { "id": "total-blocking-time", "score": 0.99, "numericValue": 44.0 },
            "cumulative-layout-shift": { "id": "cumulative-layout-shift", "score": 1.0, "numericValue": 0.004 },
            "render-blocking-resources": { "id": "render-blocking-resources", "score": 0.75 },
            "color-contrast": { "id": "color-contrast", "score": 1.0 },
            "uses-https": { "id": "uses-https", "score": 1.0 },
            "meta-description": { "id": "meta-description", "score": 1.0 }
        },
        "timing": { "total": 4231.2, "entries": [] },
        "i18n": { "rendererFormattedStrings": { "varianceDisclaimer": "Values are estimated" } },
        "categoryGroups": { "metrics": { "title": "Metrics" } }
    })
}

/// Healthy report: every core audit scored, all four default categories
/// present, plus internal sections a real run carries.
pub fn full_report() -> AuditReport {
    parse(base_report_json())
}

/// Healthy report except the named audit produced a `null` score.
pub fn report_with_null_score(audit_id: &str) -> AuditReport {
    let mut value = base_report_json();
    value["audits"][audit_id] = json!({ "id": audit_id, "score": null });
    parse(value)
}

/// Healthy report carrying one run warning.
pub fn report_with_warning(warning: &str) -> AuditReport {
    let mut value = base_report_json();
    value["runWarnings"] = json!([warning]);
    parse(value)
}

/// Report whose page failed to load.
pub fn report_with_runtime_error(code: &str, message: &str) -> AuditReport {
    let mut value = base_report_json();
    value["runtimeError"] = json!({ "code": code, "message": message });
    parse(value)
}
