//! Configuration validation module

use crate::config::{AuditSettings, EngineConfig, LoggingConfig, ServerConfig};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Server configuration error: {message}")]
    Server { message: String },

    #[error("Logging configuration error: {message}")]
    Logging { message: String },

    #[error("Audit configuration error: {message}")]
    Audit { message: String },

    #[error("Engine configuration error: {message}")]
    Engine { message: String },
}

impl ValidationError {
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    pub fn audit(message: impl Into<String>) -> Self {
        Self::Audit {
            message: message.into(),
        }
    }

    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // u16 cannot exceed 65535, so we only need to check for 0
        if self.port == 0 {
            return Err(ValidationError::server(format!(
                "Port must be in range 1-65535, got {}",
                self.port
            )));
        }

        if self.host.is_empty() {
            return Err(ValidationError::server("Host cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !matches!(
            self.level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            return Err(ValidationError::logging(format!(
                "Unknown log level: {}. Must be one of: trace, debug, info, warn, error",
                self.level
            )));
        }

        if !matches!(self.format.as_str(), "pretty" | "json") {
            return Err(ValidationError::logging(format!(
                "Unknown log format: {}. Must be one of: pretty, json",
                self.format
            )));
        }

        Ok(())
    }
}

impl Validate for AuditSettings {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_seconds == 0 {
            return Err(ValidationError::audit(
                "Audit timeout must be greater than 0 seconds".to_string(),
            ));
        }

        if self.auth_cookie_name.is_empty() {
            return Err(ValidationError::audit(
                "Auth cookie name cannot be empty".to_string(),
            ));
        }

        if self.login_redirect_marker.is_empty() {
            return Err(ValidationError::audit(
                "Login redirect marker cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.lighthouse_bin.is_empty() {
            return Err(ValidationError::engine(
                "Engine binary cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Validate for crate::config::Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.logging.validate()?;
        self.audit.validate()?;
        self.engine.validate()?;
        Ok(())
    }
}
