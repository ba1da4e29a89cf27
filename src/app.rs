//! Application setup and wiring

use std::sync::Arc;

use axum::Router;

use crate::application::{
    AuditOrchestrator, AuditSessionManager, ConfigResolver, SessionPolicy, TimeoutGuard,
};
use crate::config::Config;
use crate::domain::engine::LaunchPlan;
use crate::infrastructure::{ChromiumDriver, LighthouseCliEngine};
use crate::presentation::{AppState, create_router};

/// Build the audit pipeline and the router serving it.
pub fn create_app(config: &Config) -> Router {
    let launch_plan =
        LaunchPlan::for_profile(config.engine.environment, config.engine.browser_path.clone());
    let policy = SessionPolicy {
        auth_cookie_name: config.audit.auth_cookie_name.clone(),
        login_redirect_marker: config.audit.login_redirect_marker.clone(),
        ..SessionPolicy::default()
    };

    let sessions = AuditSessionManager::new(
        Arc::new(ChromiumDriver::new()),
        Arc::new(LighthouseCliEngine::new(
            config.engine.lighthouse_bin.clone(),
        )),
        launch_plan,
        policy,
    );
    let orchestrator = AuditOrchestrator::new(
        ConfigResolver::new(),
        sessions,
        TimeoutGuard::new(config.audit.timeout()),
    );

    let state = AppState {
        orchestrator: Arc::new(orchestrator),
    };
    create_router(state, config)
}
