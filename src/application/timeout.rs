//! Wall-clock budget around a whole audit attempt.
//!
//! The guarded future runs on its own task. When the budget elapses the
//! guard stops waiting and reports [`AuditError::Timeout`]; the task itself
//! keeps running so an in-flight session can still tear its browser down.

use std::time::Duration;

use tracing::warn;

use crate::domain::errors::AuditError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
pub struct TimeoutGuard {
    budget: Duration,
}

impl TimeoutGuard {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    /// Run `operation` under the budget.
    ///
    /// Elapsing the budget abandons the task rather than aborting it, so
    /// cleanup scheduled inside the operation still happens.
    pub async fn run<T, F>(&self, operation: F) -> Result<T, AuditError>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, AuditError>> + Send + 'static,
    {
        let handle = tokio::spawn(operation);
        match tokio::time::timeout(self.budget, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(AuditError::Internal(anyhow::anyhow!(
                "audit task failed: {join_error}"
            ))),
            Err(_) => {
                warn!(budget_ms = self.budget.as_millis() as u64, "audit timed out");
                Err(AuditError::Timeout)
            }
        }
    }
}

impl Default for TimeoutGuard {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}
