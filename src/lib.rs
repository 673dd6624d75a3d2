//! Restaurant API Check - end-to-end scenarios for the restaurant management API
//!
//! This library drives fixed user journeys (authentication, menu management,
//! ordering) against a running server over HTTP and reports pass/fail with a
//! human-readable trace.

pub mod cli;
pub mod commands;
pub mod common;
pub mod http;
pub mod scenario;

// Re-export commonly used types for tests
pub use common::{Error, FailureKind, Result};
pub use scenario::{RunReport, RunnerConfig, ScenarioResult, ScenarioRunner, Templates};
