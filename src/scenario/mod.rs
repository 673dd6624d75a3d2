//! Scenario runner
//!
//! Each scenario is a fixed, ordered chain of dependent API calls made with
//! its own session. The first failing step fails the scenario; the result
//! keeps the trace and the failure class for the console and JSON reports.

mod context;
pub mod journeys;
pub mod payload;
pub mod registry;
mod runner;
pub mod suite;
pub mod templates;
mod trace;

pub use context::{Scenario, ScenarioContext, ScenarioInfo};
pub use runner::{FailureReport, RunReport, RunnerConfig, ScenarioResult, ScenarioRunner};
pub use suite::SuiteFile;
pub use templates::Templates;
pub use trace::Trace;
