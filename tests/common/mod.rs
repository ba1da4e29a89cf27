//! Common test utilities shared by the integration suites
//!
//! This module provides:
//! - Browser and engine fakes that record session activity
//! - Report factories shaped like real engine output
//! - Helpers assembling the full pipeline against the fakes

#![allow(dead_code)]

pub mod factories;
pub mod mocks;

// Re-export commonly used items
pub use factories::*;
pub use mocks::*;
