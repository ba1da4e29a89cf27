//! Shared browser and engine fakes
//!
//! The fakes implement the engine seam traits and record everything that
//! happens to them in a [`SessionLog`], so tests can assert on lifecycle
//! ordering and cleanup without a real browser.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use pharos::application::{
    AuditOrchestrator, AuditSessionManager, ConfigResolver, SessionPolicy, TimeoutGuard,
};
use pharos::domain::audit::CookieSpec;
use pharos::domain::engine::{
    AuditEngine, BrowserDriver, BrowserHandle, EngineEndpoint, EngineFailure, EngineSettings,
    EnvironmentProfile, LaunchPlan, PageHandle,
};
use pharos::domain::report::AuditReport;

/// Everything the fakes observed, shared across driver, browser, page and
/// engine for one test.
#[derive(Debug, Default)]
pub struct SessionLog {
    launches: AtomicUsize,
    pages_opened: AtomicUsize,
    pages_closed: AtomicUsize,
    browsers_closed: AtomicUsize,
    audits_started: AtomicUsize,
    seeded: Mutex<Vec<CookieSpec>>,
    settings: Mutex<Vec<EngineSettings>>,
}

impl SessionLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn pages_opened(&self) -> usize {
        self.pages_opened.load(Ordering::SeqCst)
    }

    pub fn pages_closed(&self) -> usize {
        self.pages_closed.load(Ordering::SeqCst)
    }

    pub fn browsers_closed(&self) -> usize {
        self.browsers_closed.load(Ordering::SeqCst)
    }

    pub fn audits_started(&self) -> usize {
        self.audits_started.load(Ordering::SeqCst)
    }

    /// All cookies seeded into any page, in seeding order.
    pub fn seeded_cookies(&self) -> Vec<CookieSpec> {
        self.seeded.lock().unwrap().clone()
    }

    /// Engine settings of every audit run, in run order.
    pub fn recorded_settings(&self) -> Vec<EngineSettings> {
        self.settings.lock().unwrap().clone()
    }
}

/// Where in the session lifecycle a fake should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Launch,
    OpenPage,
    SeedCookies,
}

/// Browser driver fake handing out [`MockBrowser`] handles.
#[derive(Clone)]
pub struct MockDriver {
    log: Arc<SessionLog>,
    fail_at: Option<FailAt>,
}

impl MockDriver {
    /// Driver whose sessions succeed all the way through.
    pub fn new(log: Arc<SessionLog>) -> Self {
        Self { log, fail_at: None }
    }

    /// Driver whose sessions fail at the given lifecycle stage.
    pub fn failing_at(log: Arc<SessionLog>, stage: FailAt) -> Self {
        Self {
            log,
            fail_at: Some(stage),
        }
    }
}

#[async_trait]
impl BrowserDriver for MockDriver {
    async fn launch(&self, _plan: &LaunchPlan) -> Result<Box<dyn BrowserHandle>, EngineFailure> {
        if self.fail_at == Some(FailAt::Launch) {
            return Err(EngineFailure::Protocol("browser refused to start".into()));
        }
        self.log.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockBrowser {
            log: self.log.clone(),
            fail_at: self.fail_at,
        }))
    }
}

pub struct MockBrowser {
    log: Arc<SessionLog>,
    fail_at: Option<FailAt>,
}

#[async_trait]
impl BrowserHandle for MockBrowser {
    async fn open_page(&self) -> Result<Box<dyn PageHandle>, EngineFailure> {
        if self.fail_at == Some(FailAt::OpenPage) {
            return Err(EngineFailure::Protocol("no page target".into()));
        }
        self.log.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockPage {
            log: self.log.clone(),
            fail_at: self.fail_at,
        }))
    }

    fn endpoint(&self) -> EngineEndpoint {
        EngineEndpoint {
            devtools_port: Some(9222),
            websocket_url: Some("ws://127.0.0.1:9222/devtools/browser/fake".to_string()),
        }
    }

    async fn close(&mut self) -> Result<(), EngineFailure> {
        self.log.browsers_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct MockPage {
    log: Arc<SessionLog>,
    fail_at: Option<FailAt>,
}

#[async_trait]
impl PageHandle for MockPage {
    async fn seed_cookies(&self, cookies: &[CookieSpec]) -> Result<(), EngineFailure> {
        if self.fail_at == Some(FailAt::SeedCookies) {
            return Err(EngineFailure::Protocol("cookie seeding refused".into()));
        }
        self.log.seeded.lock().unwrap().extend_from_slice(cookies);
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), EngineFailure> {
        self.log.pages_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// What the fake engine produces when asked to run.
#[derive(Clone)]
pub enum EngineScript {
    /// Hand back this report.
    Report(AuditReport),
    /// Produce no output at all.
    Empty,
    /// Fail with a protocol error.
    Fail(String),
}

/// Audit engine fake. Records the settings of every run and then follows
/// its script, optionally after a delay.
pub struct MockEngine {
    log: Arc<SessionLog>,
    script: EngineScript,
    delay: Option<Duration>,
}

impl MockEngine {
    /// Engine that succeeds with the given report.
    pub fn returning(log: Arc<SessionLog>, report: AuditReport) -> Self {
        Self::scripted(log, EngineScript::Report(report))
    }

    pub fn scripted(log: Arc<SessionLog>, script: EngineScript) -> Self {
        Self {
            log,
            script,
            delay: None,
        }
    }

    /// Make every run take this long. Combine with a paused tokio clock to
    /// exercise the timeout path.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl AuditEngine for MockEngine {
    async fn run(
        &self,
        _endpoint: &EngineEndpoint,
        _url: &Url,
        settings: &EngineSettings,
    ) -> Result<AuditReport, EngineFailure> {
        self.log.audits_started.fetch_add(1, Ordering::SeqCst);
        self.log.settings.lock().unwrap().push(settings.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.script {
            EngineScript::Report(report) => Ok(report.clone()),
            EngineScript::Empty => Err(EngineFailure::EmptyReport),
            EngineScript::Fail(message) => Err(EngineFailure::Protocol(message.clone())),
        }
    }
}

/// Assemble the full pipeline against the given fakes with the default
/// resolver and session policy.
pub fn orchestrator(
    driver: MockDriver,
    engine: MockEngine,
    timeout: Duration,
) -> AuditOrchestrator {
    let sessions = AuditSessionManager::new(
        Arc::new(driver),
        Arc::new(engine),
        LaunchPlan::for_profile(EnvironmentProfile::Permissive, None),
        SessionPolicy::default(),
    );
    AuditOrchestrator::new(ConfigResolver::new(), sessions, TimeoutGuard::new(timeout))
}
