//! # Pharos
//!
//! Request-driven URL audit orchestration service. Each request names a
//! target URL; pharos launches a dedicated headless browser session, runs a
//! Lighthouse audit against it under a hard wall-clock deadline, projects
//! the report down to the categories/audits the caller asked for, and maps
//! every failure mode onto a fixed response contract.
//!
//! ## Architecture
//!
//! The crate follows a layered architecture:
//!
//! ```text
//! presentation  ── axum routes, request/response translation, OpenAPI
//!      │
//! application   ── config resolver, timeout guard, session manager,
//!      │           result filter, orchestrator, response envelope
//!      │
//! domain        ── audit config, report model, engine seam, error taxonomy
//!      │
//! infrastructure ─ chromiumoxide browser driver, Lighthouse CLI engine
//! ```
//!
//! One invocation is one pipeline run:
//!
//! ```text
//! request ──► resolve config ──► session (under timeout) ──► filter ──► envelope
//! ```
//!
//! The browser and audit engine sit behind [`domain::engine`] traits so the
//! whole pipeline runs against in-memory doubles in tests.

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

pub use app::create_app;
pub use config::Config;
pub use logging::init_tracing;
