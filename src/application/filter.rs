//! Result filter: pure projection of an audit report.
//!
//! Filtering is idempotent and order-dependent: strip internal fields,
//! project categories, project audits (re-deriving each surviving
//! category's audit references), then drop timing unless requested.

use std::collections::BTreeMap;

use crate::domain::audit::{AuditConfig, IncludeSpec};
use crate::domain::report::AuditReport;

/// Project `report` down to what `config` asked for.
pub fn filter_report(mut report: AuditReport, config: &AuditConfig) -> AuditReport {
    report.i18n = None;
    report.category_groups = None;

    project(&mut report.categories, &config.categories);
    project(&mut report.audits, &config.audits);
    rederive_audit_refs(&mut report, &config.audits);

    if !config.timing {
        report.timing = None;
    }

    report
}

/// Project one id-keyed map field. The `all` sentinel keeps the field
/// untouched; an empty set forces the field to an empty map (present even
/// when the source had none); otherwise matching keys survive, and the
/// field is dropped entirely when nothing matches.
fn project<T>(field: &mut Option<BTreeMap<String, T>>, include: &IncludeSpec) {
    let Some(ids) = include.explicit() else {
        return;
    };

    if ids.is_empty() {
        *field = Some(BTreeMap::new());
        return;
    }

    let Some(map) = field.take() else {
        return;
    };
    let kept: BTreeMap<String, T> = map
        .into_iter()
        .filter(|(key, _)| ids.contains(key))
        .collect();
    *field = (!kept.is_empty()).then_some(kept);
}

/// With an explicit audit filter, each surviving category keeps only the
/// references that passed it; the empty filter clears reference lists
/// outright. Categories themselves are never removed here.
fn rederive_audit_refs(report: &mut AuditReport, audits: &IncludeSpec) {
    let Some(ids) = audits.explicit() else {
        return;
    };
    let Some(categories) = report.categories.as_mut() else {
        return;
    };

    for category in categories.values_mut() {
        if ids.is_empty() {
            category.audit_refs.clear();
        } else {
            category.audit_refs.retain(|r| ids.contains(&r.id));
        }
    }
}
