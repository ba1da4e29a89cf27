//! Audit report model.
//!
//! Mirrors the engine's JSON output. Only the fields the pipeline inspects
//! or projects are typed; everything else flows through the `extra` overflow
//! map untouched, so the engine can grow its output without breaking us.
//! Projection only removes or empties fields, which is why the raw and the
//! filtered report share this one model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured output of one engine run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    /// Category id to category result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<BTreeMap<String, CategoryResult>>,

    /// Audit id to audit outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audits: Option<BTreeMap<String, AuditOutcome>>,

    /// Engine self-profiling data. Stripped unless explicitly requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<Value>,

    /// Localisation bundle. Never exposed to callers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n: Option<Value>,

    /// Category grouping metadata. Never exposed to callers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_groups: Option<Value>,

    /// Engine warnings about the run as a whole, e.g. unexpected redirects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_warnings: Vec<String>,

    /// Set when the page itself failed to load or execute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_error: Option<RuntimeError>,

    /// Everything the pipeline does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl AuditReport {
    /// Score of the named audit, when the audit is present.
    /// `Some(None)` means the audit ran but produced a null score.
    pub fn audit_score(&self, id: &str) -> Option<Option<f64>> {
        self.audits.as_ref()?.get(id).map(|a| a.score)
    }
}

/// Engine-reported page load failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeError {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Result for one category. The audit references are the only part the
/// pipeline interprets; score, title and the rest ride along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResult {
    /// Cleared entirely (absent in output) when the caller asked for an
    /// empty audit set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audit_refs: Vec<AuditRef>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Reference from a category to one of its audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRef {
    pub id: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl AuditRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Outcome of a single audit. A `null` score means the audit could not
/// produce a measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditOutcome {
    #[serde(default)]
    pub score: Option<f64>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn report_deserializes_camel_case_fields() {
        let report: AuditReport = serde_json::from_value(json!({
            "lighthouseVersion": "12.0.0",
            "runWarnings": ["warning"],
            "runtimeError": { "code": "NO_FCP", "message": "no paint" },
            "categoryGroups": { "metrics": {} },
            "categories": {
                "performance": {
                    "title": "Performance",
                    "score": 0.95,
                    "auditRefs": [{ "id": "speed-index", "weight": 10 }]
                }
            },
            "audits": {
                "speed-index": { "score": null, "displayValue": "3.2 s" }
            }
        }))
        .unwrap();

        assert_eq!(report.run_warnings, vec!["warning".to_string()]);
        assert_eq!(report.runtime_error.as_ref().unwrap().code, "NO_FCP");
        assert!(report.category_groups.is_some());
        let perf = &report.categories.as_ref().unwrap()["performance"];
        assert_eq!(perf.audit_refs[0].id, "speed-index");
        assert_eq!(perf.extra["title"], json!("Performance"));
        assert_eq!(report.audit_score("speed-index"), Some(None));
        assert_eq!(report.extra["lighthouseVersion"], json!("12.0.0"));
    }

    #[test]
    fn report_serializes_unknown_fields_back() {
        let source = json!({
            "fetchTime": "2024-01-01T00:00:00.000Z",
            "audits": { "interactive": { "score": 0.5 } }
        });
        let report: AuditReport = serde_json::from_value(source).unwrap();
        let out = serde_json::to_value(&report).unwrap();
        assert_eq!(out["fetchTime"], json!("2024-01-01T00:00:00.000Z"));
        assert_eq!(out["audits"]["interactive"]["score"], json!(0.5));
    }

    #[test]
    fn empty_audit_refs_are_omitted_from_output() {
        let category = CategoryResult::default();
        let out = serde_json::to_value(&category).unwrap();
        assert!(out.get("auditRefs").is_none());
    }

    #[test]
    fn audit_score_distinguishes_missing_from_null() {
        let report: AuditReport = serde_json::from_value(json!({
            "audits": { "interactive": { "score": null } }
        }))
        .unwrap();
        assert_eq!(report.audit_score("interactive"), Some(None));
        assert_eq!(report.audit_score("speed-index"), None);
    }
}
