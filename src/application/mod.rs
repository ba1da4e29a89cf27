//! Application layer: the audit orchestration pipeline.
//!
//! One request flows resolver → session manager (under the timeout guard) →
//! result filter → response envelope, composed by the orchestrator.

pub mod filter;
pub mod orchestrator;
pub mod resolver;
pub mod response;
pub mod session;
pub mod timeout;

pub use orchestrator::AuditOrchestrator;
pub use resolver::{AuditRequest, ConfigResolver};
pub use response::ResponseEnvelope;
pub use session::{AuditSessionManager, SessionPolicy};
pub use timeout::TimeoutGuard;
