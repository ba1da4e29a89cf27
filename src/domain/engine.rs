//! Seam to the browser automation and audit engines.
//!
//! The pipeline only ever talks to these traits; production wiring lives in
//! `infrastructure`, tests substitute in-memory doubles. One launched
//! browser serves exactly one audit invocation and is never pooled.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use super::audit::{CookieSpec, Strategy};
use super::report::AuditReport;

/// Failure surfaced by the browser driver or the audit engine. The session
/// manager classifies it into the response taxonomy based on the lifecycle
/// phase it occurred in.
#[derive(Debug, thiserror::Error)]
pub enum EngineFailure {
    #[error("engine process error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Protocol(String),

    #[error("engine produced no report")]
    EmptyReport,

    #[error("engine output malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Deployment environment the browser launches into. Threaded in as explicit
/// configuration so launch behavior is testable without touching the
/// process environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentProfile {
    /// Locked-down serverless sandbox: no kernel sandbox available, shared
    /// memory is scarce, nothing may run in the background.
    Hardened,
    /// Local or CI machine with a full browser install.
    Permissive,
}

impl Default for EnvironmentProfile {
    fn default() -> Self {
        Self::Hardened
    }
}

/// Argument set for the hardened profile: drop the sandboxing the
/// deployment environment cannot provide, disable background work and
/// network-aware optimisations that distort measurements, and force
/// deterministic rendering.
const HARDENED_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--single-process",
    "--no-zygote",
    "--no-first-run",
    "--disable-background-networking",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-renderer-backgrounding",
    "--disable-ipc-flooding-protection",
    "--disable-client-side-phishing-detection",
    "--disable-default-apps",
    "--disable-extensions",
    "--disable-sync",
    "--metrics-recording-only",
    "--mute-audio",
    "--hide-scrollbars",
    "--font-render-hinting=none",
    "--force-color-profile=srgb",
];

/// Measurement-relevant subset of the hardened set, for environments where
/// the full browser install can keep its sandbox.
const PERMISSIVE_ARGS: &[&str] = &[
    "--no-first-run",
    "--disable-background-networking",
    "--disable-background-timer-throttling",
    "--disable-renderer-backgrounding",
    "--mute-audio",
    "--force-color-profile=srgb",
];

/// How to start the browser for one audit invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    /// Explicit browser executable. `None` lets the driver discover one.
    pub executable: Option<PathBuf>,
    pub args: Vec<String>,
    pub headless: bool,
}

impl LaunchPlan {
    /// Fixed argument set for the given environment profile.
    pub fn for_profile(profile: EnvironmentProfile, executable: Option<PathBuf>) -> Self {
        let args = match profile {
            EnvironmentProfile::Hardened => HARDENED_ARGS,
            EnvironmentProfile::Permissive => PERMISSIVE_ARGS,
        };
        Self {
            executable,
            args: args.iter().map(|a| a.to_string()).collect(),
            headless: true,
        }
    }
}

/// Simulated network/CPU throttling handed to the audit engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottlingProfile {
    pub rtt_ms: f64,
    pub throughput_kbps: f64,
    pub request_latency_ms: f64,
    pub download_throughput_kbps: f64,
    pub upload_throughput_kbps: f64,
    pub cpu_slowdown_multiplier: f64,
}

impl ThrottlingProfile {
    /// Slow-4G-class profile for mobile runs.
    pub const MOBILE: Self = Self {
        rtt_ms: 150.0,
        throughput_kbps: 1638.4,
        request_latency_ms: 150.0,
        download_throughput_kbps: 1600.0,
        upload_throughput_kbps: 750.0,
        cpu_slowdown_multiplier: 1.0,
    };

    /// Broadband profile for desktop runs.
    pub const DESKTOP: Self = Self {
        rtt_ms: 40.0,
        throughput_kbps: 10240.0,
        request_latency_ms: 0.0,
        download_throughput_kbps: 0.0,
        upload_throughput_kbps: 0.0,
        cpu_slowdown_multiplier: 1.0,
    };
}

/// Viewport emulation for the audit run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenEmulation {
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
    pub mobile: bool,
    pub disabled: bool,
}

impl ScreenEmulation {
    pub const MOBILE: Self = Self {
        width: 412,
        height: 823,
        device_scale_factor: 1.75,
        mobile: true,
        disabled: false,
    };

    pub const DESKTOP: Self = Self {
        width: 1350,
        height: 940,
        device_scale_factor: 1.0,
        mobile: false,
        disabled: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThrottlingMethod {
    Simulate,
    Devtools,
    Provided,
}

/// Settings profile for one engine run. Serializes camelCase, matching the
/// engine's own configuration format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettings {
    pub form_factor: Strategy,
    pub screen_emulation: ScreenEmulation,
    pub throttling_method: ThrottlingMethod,
    pub throttling: ThrottlingProfile,
    /// Milliseconds to wait for first contentful paint.
    pub max_wait_for_fcp: u32,
    /// Milliseconds to wait for page load.
    pub max_wait_for_load: u32,
    /// Restrict the run to these categories; `None` runs the engine's full
    /// default set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_categories: Option<Vec<String>>,
    /// Screenshot capture costs time and memory and is never requested.
    pub disable_full_page_screenshot: bool,
}

impl EngineSettings {
    /// Base profile for a strategy. Category restriction is applied
    /// separately by the session manager.
    pub fn for_strategy(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Mobile => Self {
                form_factor: Strategy::Mobile,
                screen_emulation: ScreenEmulation::MOBILE,
                throttling_method: ThrottlingMethod::Simulate,
                throttling: ThrottlingProfile::MOBILE,
                max_wait_for_fcp: 15_000,
                max_wait_for_load: 35_000,
                only_categories: None,
                disable_full_page_screenshot: true,
            },
            Strategy::Desktop => Self {
                form_factor: Strategy::Desktop,
                screen_emulation: ScreenEmulation::DESKTOP,
                throttling_method: ThrottlingMethod::Simulate,
                throttling: ThrottlingProfile::DESKTOP,
                max_wait_for_fcp: 15_000,
                max_wait_for_load: 45_000,
                only_categories: None,
                disable_full_page_screenshot: true,
            },
        }
    }

    pub fn with_only_categories(mut self, categories: Vec<String>) -> Self {
        self.only_categories = Some(categories);
        self
    }
}

/// Where a running browser can be reached by an attaching engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineEndpoint {
    pub devtools_port: Option<u16>,
    pub websocket_url: Option<String>,
}

/// Starts browser processes.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Launch one browser for one audit invocation.
    async fn launch(&self, plan: &LaunchPlan) -> Result<Box<dyn BrowserHandle>, EngineFailure>;
}

/// One running browser process.
#[async_trait]
pub trait BrowserHandle: Send + Sync {
    /// Open a fresh page in this browser.
    async fn open_page(&self) -> Result<Box<dyn PageHandle>, EngineFailure>;

    /// Devtools endpoint an attaching engine can use.
    fn endpoint(&self) -> EngineEndpoint;

    /// Shut the browser down. The session manager calls this exactly once.
    async fn close(&mut self) -> Result<(), EngineFailure>;
}

/// One open page inside a running browser.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Install cookies. Must happen before any navigation.
    async fn seed_cookies(&self, cookies: &[CookieSpec]) -> Result<(), EngineFailure>;

    async fn close(self: Box<Self>) -> Result<(), EngineFailure>;
}

/// The audit engine itself, treated as a black box: run an audit against a
/// URL through an already-running browser, return a structured report or
/// fail.
#[async_trait]
pub trait AuditEngine: Send + Sync {
    async fn run(
        &self,
        endpoint: &EngineEndpoint,
        url: &Url,
        settings: &EngineSettings,
    ) -> Result<AuditReport, EngineFailure>;
}
