//! Failure taxonomy of the audit pipeline.
//!
//! Every component raises [`AuditError`] for its own concern; the
//! orchestrator is the single place that turns one into a response
//! envelope. The `Display` string of each variant doubles as the `x-error`
//! classification code of the external contract.

use http::StatusCode;

use super::engine::EngineFailure;

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// Caller error; the message names the offending field.
    #[error("{0}")]
    InvalidRequest(String),

    /// The invocation exceeded its wall-clock budget.
    #[error("timeout")]
    Timeout,

    /// The target required authentication the supplied cookie could not
    /// satisfy; carries the engine warning that revealed the redirect.
    #[error("authorization error")]
    AuthRedirect { warning: String },

    /// The engine ran but could not produce a trustworthy core measurement.
    #[error("{0}")]
    QualityFailure(String),

    /// The page failed to load or execute; the engine's own code/message.
    #[error("error from lighthouse: {code}")]
    EngineRuntime { code: String, message: String },

    /// The browser could not be started.
    #[error("failed to launch browser")]
    EngineLaunch(#[source] EngineFailure),

    /// The browser session could not be prepared.
    #[error("failed to prepare browser session")]
    EngineSession(#[source] EngineFailure),

    /// The structured-body request path.
    #[error("not implemented")]
    NotImplemented,

    /// Anything else. Full detail goes to the diagnostic log, never to the
    /// caller.
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuditError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn quality_failure(message: impl Into<String>) -> Self {
        Self::QualityFailure(message.into())
    }

    /// Status of the response envelope this failure maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::AuthRedirect { .. } => StatusCode::UNAUTHORIZED,
            Self::QualityFailure(_) | Self::EngineRuntime { .. } => StatusCode::BAD_GATEWAY,
            Self::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            Self::EngineLaunch(_) | Self::EngineSession(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Classification code for the `x-error` response header.
    pub fn error_code(&self) -> String {
        self.to_string()
    }

    /// Message exposed to the caller in the response body, when the failure
    /// kind carries one.
    pub fn public_message(&self) -> Option<&str> {
        match self {
            Self::AuthRedirect { warning } => Some(warning),
            Self::EngineRuntime { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Whether the failure is attributable to the caller.
    pub fn is_caller_fault(&self) -> bool {
        matches!(self, Self::InvalidRequest(_) | Self::NotImplemented)
    }
}
