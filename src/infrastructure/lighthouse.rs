//! Audit engine backed by the Lighthouse CLI.
//!
//! The engine attaches to an already-running browser over its devtools
//! port, so no browser management happens here. Settings travel through a
//! temporary configuration file; the report comes back on stdout as JSON.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde_json::json;
use tokio::process::Command;
use tracing::debug;
use url::Url;

use crate::domain::engine::{AuditEngine, EngineEndpoint, EngineFailure, EngineSettings};
use crate::domain::report::AuditReport;

pub struct LighthouseCliEngine {
    binary: PathBuf,
}

impl LighthouseCliEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl AuditEngine for LighthouseCliEngine {
    async fn run(
        &self,
        endpoint: &EngineEndpoint,
        url: &Url,
        settings: &EngineSettings,
    ) -> Result<AuditReport, EngineFailure> {
        let temp_dir = tempfile::tempdir()?;
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(&config_path, serde_json::to_vec(&engine_config(settings))?)?;

        let args = cli_args(url, endpoint, &config_path)?;
        debug!(binary = %self.binary.display(), ?args, "running audit engine");

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineFailure::Protocol(format!(
                "engine exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if blank(&output.stdout) {
            return Err(EngineFailure::EmptyReport);
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

/// Engine configuration document: the default ruleset with this
/// invocation's settings layered on top.
fn engine_config(settings: &EngineSettings) -> serde_json::Value {
    json!({
        "extends": "lighthouse:default",
        "settings": settings,
    })
}

fn cli_args(
    url: &Url,
    endpoint: &EngineEndpoint,
    config_path: &Path,
) -> Result<Vec<String>, EngineFailure> {
    let port = endpoint.devtools_port.ok_or_else(|| {
        EngineFailure::Protocol("browser endpoint carries no devtools port".to_string())
    })?;
    Ok(vec![
        url.to_string(),
        "--output=json".to_string(),
        "--output-path=stdout".to_string(),
        "--quiet".to_string(),
        format!("--config-path={}", config_path.display()),
        format!("--port={port}"),
    ])
}

fn blank(output: &[u8]) -> bool {
    output.iter().all(u8::is_ascii_whitespace)
}
