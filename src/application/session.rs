//! One browser session per audit invocation.
//!
//! The manager owns the full lifecycle: launch a browser, open a page,
//! seed cookies, run the engine against the live browser, validate the
//! report, tear everything down. Teardown runs exactly once on every
//! path that gets past the launch, success or failure.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::audit::{AuditConfig, DEFAULT_AUDITS, DEFAULT_CATEGORIES};
use crate::domain::engine::{
    AuditEngine, BrowserDriver, BrowserHandle, EngineFailure, EngineSettings, LaunchPlan,
    PageHandle,
};
use crate::domain::errors::AuditError;
use crate::domain::report::AuditReport;

/// Lifecycle phase of a session.
///
/// ```text
/// Idle ──▶ Launching ──▶ Configuring ──▶ Auditing ──▶ Closing ──▶ Done
///              │              │                        ▲  │
///              │              └────────────────────────┘  │
///              └─────────────────▶ Failed ◀───────────────┘
/// ```
///
/// Only a launch failure reaches `Failed` without passing through
/// `Closing`; once a browser exists, teardown always runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Launching,
    Configuring,
    Auditing,
    Closing,
    Done,
    Failed,
}

impl SessionPhase {
    pub fn valid_transitions(&self) -> &'static [SessionPhase] {
        match self {
            Self::Idle => &[Self::Launching],
            Self::Launching => &[Self::Configuring, Self::Failed],
            Self::Configuring => &[Self::Auditing, Self::Closing],
            Self::Auditing => &[Self::Closing],
            Self::Closing => &[Self::Done, Self::Failed],
            Self::Done | Self::Failed => &[],
        }
    }

    pub fn can_transition_to(&self, next: SessionPhase) -> bool {
        self.valid_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            Self::Idle => "idle",
            Self::Launching => "launching",
            Self::Configuring => "configuring",
            Self::Auditing => "auditing",
            Self::Closing => "closing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{phase}")
    }
}

fn advance(phase: &mut SessionPhase, next: SessionPhase) {
    debug_assert!(
        phase.can_transition_to(next),
        "invalid session transition {phase} -> {next}"
    );
    debug!(from = %phase, to = %next, "session phase");
    *phase = next;
}

/// Checks applied to a finished report before it is accepted.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    /// Cookie name whose presence marks an authenticated run.
    pub auth_cookie_name: String,
    /// Substring of a run warning that betrays a redirect to a login page.
    pub login_redirect_marker: String,
    /// Audits that must carry a score whenever the caller asked for them.
    pub core_audits: Vec<String>,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            auth_cookie_name: "hlx-auth-token".to_string(),
            login_redirect_marker: "was redirected to https://login.microsoftonline.com"
                .to_string(),
            core_audits: DEFAULT_AUDITS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// A live browser, and at most one page, tied to a single invocation.
/// Consuming [`teardown`](Self::teardown) is the only way out, so cleanup
/// runs exactly once.
struct OpenSession {
    browser: Box<dyn BrowserHandle>,
    page: Option<Box<dyn PageHandle>>,
}

impl OpenSession {
    async fn teardown(mut self) {
        if let Some(page) = self.page.take() {
            if let Err(error) = page.close().await {
                warn!(%error, "page close failed");
            }
        }
        if let Err(error) = self.browser.close().await {
            warn!(%error, "browser close failed");
        }
    }
}

/// Runs one audit inside a dedicated browser session.
#[derive(Clone)]
pub struct AuditSessionManager {
    driver: Arc<dyn BrowserDriver>,
    engine: Arc<dyn AuditEngine>,
    launch_plan: LaunchPlan,
    policy: SessionPolicy,
}

impl AuditSessionManager {
    pub fn new(
        driver: Arc<dyn BrowserDriver>,
        engine: Arc<dyn AuditEngine>,
        launch_plan: LaunchPlan,
        policy: SessionPolicy,
    ) -> Self {
        Self {
            driver,
            engine,
            launch_plan,
            policy,
        }
    }

    /// Launch, audit, tear down.
    pub async fn run(&self, config: &AuditConfig) -> Result<AuditReport, AuditError> {
        let mut phase = SessionPhase::Idle;
        advance(&mut phase, SessionPhase::Launching);

        let browser = match self.driver.launch(&self.launch_plan).await {
            Ok(browser) => browser,
            Err(failure) => {
                advance(&mut phase, SessionPhase::Failed);
                return Err(AuditError::EngineLaunch(failure));
            }
        };

        let mut session = OpenSession {
            browser,
            page: None,
        };
        let result = self.audit_in_session(&mut session, &mut phase, config).await;

        advance(&mut phase, SessionPhase::Closing);
        session.teardown().await;
        advance(
            &mut phase,
            if result.is_ok() {
                SessionPhase::Done
            } else {
                SessionPhase::Failed
            },
        );
        result
    }

    async fn audit_in_session(
        &self,
        session: &mut OpenSession,
        phase: &mut SessionPhase,
        config: &AuditConfig,
    ) -> Result<AuditReport, AuditError> {
        advance(phase, SessionPhase::Configuring);

        let page = session
            .browser
            .open_page()
            .await
            .map_err(AuditError::EngineSession)?;
        // Register the page before seeding so a seeding failure still
        // closes it.
        let page = session.page.insert(page);
        if !config.cookies.is_empty() {
            page.seed_cookies(&config.cookies)
                .await
                .map_err(AuditError::EngineSession)?;
        }

        advance(phase, SessionPhase::Auditing);
        let endpoint = session.browser.endpoint();
        let settings = engine_settings(config);
        let report = self
            .engine
            .run(&endpoint, &config.url, &settings)
            .await
            .map_err(classify_engine_failure)?;

        validate_report(&self.policy, &report, config)?;
        Ok(report)
    }
}

/// An empty report means the engine ran and produced nothing usable;
/// everything else stays unclassified.
fn classify_engine_failure(failure: EngineFailure) -> AuditError {
    match failure {
        EngineFailure::EmptyReport => AuditError::quality_failure("failed to run lighthouse"),
        other => AuditError::Internal(anyhow::Error::new(other).context("audit engine run failed")),
    }
}

/// Engine settings for this invocation. Outside the `all` sentinel, any
/// category selection that does not mention `pwa` narrows the run to the
/// default category set; the caller's own list is applied afterwards by
/// the result filter.
fn engine_settings(config: &AuditConfig) -> EngineSettings {
    let settings = EngineSettings::for_strategy(config.strategy);
    if !config.categories.is_all() && !config.categories.includes("pwa") {
        settings
            .with_only_categories(DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect())
    } else {
        settings
    }
}

/// Checks run in order: authorization redirect, engine runtime error,
/// missing core scores.
fn validate_report(
    policy: &SessionPolicy,
    report: &AuditReport,
    config: &AuditConfig,
) -> Result<(), AuditError> {
    if config.has_cookie(&policy.auth_cookie_name) {
        if let Some(warning) = report
            .run_warnings
            .iter()
            .find(|w| w.contains(&policy.login_redirect_marker))
        {
            return Err(AuditError::AuthRedirect {
                warning: warning.clone(),
            });
        }
    }

    if let Some(error) = &report.runtime_error {
        return Err(AuditError::EngineRuntime {
            code: error.code.clone(),
            message: error.message.clone(),
        });
    }

    for id in &policy.core_audits {
        if config.audits.includes(id) && report.audit_score(id) == Some(None) {
            return Err(AuditError::quality_failure(format!(
                "audit '{id}' produced no score"
            )));
        }
    }

    Ok(())
}
