//! Domain layer: the audit vocabulary.
//!
//! Value objects for audit configuration, the report model, the seam to the
//! browser/audit engines, and the failure taxonomy the external contract is
//! built on.

pub mod audit;
pub mod engine;
pub mod errors;
pub mod report;

pub use audit::{AuditConfig, CookieSpec, IncludeSpec, Strategy};
pub use errors::AuditError;
pub use report::AuditReport;
