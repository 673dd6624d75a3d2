//! Scenario runner implementation
//!
//! Runs scenarios one after another, each with a fresh session, and turns
//! their outcome into immutable results. A failing scenario never stops the
//! ones after it.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn, Level};

use crate::common::{unix_stamp, Error, FailureKind, Result};
use crate::http::{ApiSession, SessionOptions};

use super::context::{Scenario, ScenarioContext, ScenarioInfo};
use super::registry;
use super::templates::Templates;
use super::trace::Trace;

/// Longest response body quoted in a trace
const MAX_BODY_IN_TRACE: usize = 500;

/// Runner settings
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Endpoint and client settings for every session
    pub session: SessionOptions,
    /// Add request/response detail to traces
    pub verbose: bool,
    /// Print trace lines to stdout as they are recorded
    pub echo: bool,
    /// Value substituted for `{ts}` in templates
    pub stamp: u64,
}

impl RunnerConfig {
    /// Quiet runner against `base_url`, stamped with the current time
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            session: SessionOptions::new(base_url),
            verbose: false,
            echo: false,
            stamp: unix_stamp(),
        }
    }
}

/// Why a scenario failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureReport {
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    id: String,
    name: String,
    passed: bool,
    steps_run: usize,
    steps_total: usize,
    stamp: u64,
    duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure: Option<FailureReport>,
    trace: Vec<String>,
}

impl ScenarioResult {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn steps_run(&self) -> usize {
        self.steps_run
    }

    pub fn steps_total(&self) -> usize {
        self.steps_total
    }

    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn failure(&self) -> Option<&FailureReport> {
        self.failure.as_ref()
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure.as_ref().map(|f| f.kind)
    }

    pub fn trace(&self) -> &[String] {
        &self.trace
    }
}

/// Results of a batch of scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub base_url: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<ScenarioResult>,
}

impl RunReport {
    pub fn new(base_url: &str, results: Vec<ScenarioResult>) -> Self {
        let passed = results.iter().filter(|r| r.passed()).count();
        Self {
            base_url: base_url.to_string(),
            total: results.len(),
            passed,
            failed: results.len() - passed,
            results,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Runs scenarios against one base endpoint
pub struct ScenarioRunner {
    config: RunnerConfig,
    templates: Templates,
}

impl ScenarioRunner {
    pub fn new(config: RunnerConfig, templates: Templates) -> Self {
        Self { config, templates }
    }

    /// Run a registered scenario by ID
    pub async fn run_id(&self, id: &str) -> Result<ScenarioResult> {
        let scenario = registry::get_scenario(id)
            .ok_or_else(|| Error::unknown_scenario(id, &registry::known_ids()))?;
        Ok(self.run(scenario.as_ref()).await)
    }

    /// Run registered scenarios in the given order
    ///
    /// Every ID is resolved before anything is sent, so an unknown ID fails
    /// without touching the server.
    pub async fn run_ids<S: AsRef<str>>(&self, ids: &[S]) -> Result<RunReport> {
        let scenarios = registry::resolve(ids)?;
        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in &scenarios {
            results.push(self.run(scenario.as_ref()).await);
        }
        Ok(RunReport::new(&self.config.session.base_url, results))
    }

    /// Run one scenario with a fresh session
    pub async fn run(&self, scenario: &dyn Scenario) -> ScenarioResult {
        let info = scenario.info();
        let start = Instant::now();
        let mut trace = Trace::new(self.config.echo, self.config.verbose);
        trace.header(info.name);

        info!(
            scenario = info.id,
            base_url = %self.config.session.base_url,
            stamp = self.config.stamp,
            "running scenario"
        );

        let session = match ApiSession::new(&self.config.session) {
            Ok(session) => session,
            Err(e) => return self.finish(info, trace, 0, start, Err(e)),
        };

        let mut ctx = ScenarioContext::new(session, &self.templates, self.config.stamp, trace);
        let outcome = scenario.run(&mut ctx).await;
        let steps_run = ctx.steps_run();

        self.finish(info, ctx.into_trace(), steps_run, start, outcome)
    }

    fn finish(
        &self,
        info: &ScenarioInfo,
        mut trace: Trace,
        steps_run: usize,
        start: Instant,
        outcome: Result<()>,
    ) -> ScenarioResult {
        let failure = match outcome {
            Ok(()) => {
                trace.ok(format!("{} successful", info.name));
                info!(scenario = info.id, "scenario passed");
                None
            }
            Err(e) => {
                let kind = e.failure_kind();
                if failure_log_level(kind) == Level::WARN {
                    warn!(scenario = info.id, error = %e, "scenario failed");
                } else {
                    info!(scenario = info.id, %kind, error = %e, "scenario failed");
                }
                trace.fail(e.to_string());
                match &e {
                    Error::Connectivity { base_url, .. } => {
                        trace.info(format!("Current base URL: {}", base_url));
                        trace.info("Make sure the application is running at this address");
                    }
                    Error::UnexpectedStatus { body, .. } if !body.is_empty() => {
                        trace.info(format!("Response: {}", truncate(body, MAX_BODY_IN_TRACE)));
                    }
                    _ => {}
                }
                Some(FailureReport {
                    kind,
                    message: e.to_string(),
                })
            }
        };

        ScenarioResult {
            id: info.id.to_string(),
            name: info.name.to_string(),
            passed: failure.is_none(),
            steps_run,
            steps_total: info.steps,
            stamp: self.config.stamp,
            duration_ms: start.elapsed().as_millis() as u64,
            failure,
            trace: trace.into_lines(),
        }
    }
}

/// Level for a scenario failure log
///
/// Classified failures are already shown in the trace on stdout, so they
/// stay below the default `warn` filter.
fn failure_log_level(kind: FailureKind) -> Level {
    match kind {
        FailureKind::Other => Level::WARN,
        _ => Level::INFO,
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
