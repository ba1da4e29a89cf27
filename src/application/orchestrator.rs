//! Pipeline front door.
//!
//! ```text
//! AuditRequest ─▶ resolve ─▶ session (under timeout) ─▶ filter ─▶ envelope
//!       │
//!       └─ OPTIONS ─────────────────────────────────────────────▶ preflight
//! ```

use serde_json::json;
use tracing::{error, info, warn};

use crate::application::filter::filter_report;
use crate::application::resolver::{AuditRequest, ConfigResolver};
use crate::application::response::ResponseEnvelope;
use crate::application::session::AuditSessionManager;
use crate::application::timeout::TimeoutGuard;
use crate::domain::errors::AuditError;
use crate::domain::report::AuditReport;

/// Drives one request through the full pipeline. Cheap to clone; one
/// instance serves the whole application.
#[derive(Clone)]
pub struct AuditOrchestrator {
    resolver: ConfigResolver,
    sessions: AuditSessionManager,
    guard: TimeoutGuard,
}

impl AuditOrchestrator {
    pub fn new(
        resolver: ConfigResolver,
        sessions: AuditSessionManager,
        guard: TimeoutGuard,
    ) -> Self {
        Self {
            resolver,
            sessions,
            guard,
        }
    }

    /// Handle one request end to end. Never fails: every failure becomes
    /// an error envelope.
    pub async fn handle(&self, request: &AuditRequest) -> ResponseEnvelope {
        if request.is_preflight() {
            return ResponseEnvelope::preflight();
        }

        match self.execute(request).await {
            Ok(report) => ResponseEnvelope::success(json!({ "lighthouseResult": report })),
            Err(error) => {
                log_failure(&error);
                ResponseEnvelope::from_error(&error)
            }
        }
    }

    async fn execute(&self, request: &AuditRequest) -> Result<AuditReport, AuditError> {
        let config = self.resolver.resolve(request)?;
        info!(url = %config.url, strategy = %config.strategy, "audit resolved");

        let sessions = self.sessions.clone();
        let session_config = config.clone();
        let report = self
            .guard
            .run(async move { sessions.run(&session_config).await })
            .await?;

        Ok(filter_report(report, &config))
    }
}

/// Unclassified failures carry the full diagnostic chain; everything else
/// is already shaped for the caller and logs at the matching severity.
fn log_failure(error: &AuditError) {
    match error {
        AuditError::Internal(detail) => error!(error = ?detail, "audit failed"),
        other if other.is_caller_fault() => info!(code = %other, "audit rejected"),
        other => warn!(code = %other, status = %other.status(), "audit failed"),
    }
}
