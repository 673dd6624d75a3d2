//! Scenario trait and per-run context

use async_trait::async_trait;

use crate::common::Result;
use crate::http::ApiSession;

use super::templates::Templates;
use super::trace::Trace;

/// Static description of a scenario
#[derive(Debug, Clone)]
pub struct ScenarioInfo {
    /// Identifier used on the command line and in suite files
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// What the scenario verifies
    pub description: &'static str,
    /// Number of steps when every step runs
    pub steps: usize,
}

/// One fixed user journey against the API
///
/// `run` executes the steps in order and returns at the first failing one.
#[async_trait]
pub trait Scenario: Send + Sync {
    /// Get scenario metadata
    fn info(&self) -> &ScenarioInfo;

    /// Execute every step against the context's session
    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Result<()>;
}

/// State owned by one scenario run
pub struct ScenarioContext<'a> {
    /// Session carrying the cookies issued during this run only
    pub session: ApiSession,
    pub templates: &'a Templates,
    /// Run stamp substituted into unique fields
    pub stamp: u64,
    pub trace: Trace,
    steps_run: usize,
}

impl<'a> ScenarioContext<'a> {
    pub fn new(session: ApiSession, templates: &'a Templates, stamp: u64, trace: Trace) -> Self {
        Self {
            session,
            templates,
            stamp,
            trace,
            steps_run: 0,
        }
    }

    /// Announce the next step
    pub fn begin_step(&mut self, title: &str) {
        self.steps_run += 1;
        self.trace.step(self.steps_run, title);
    }

    /// Steps started so far, including a step that failed
    pub fn steps_run(&self) -> usize {
        self.steps_run
    }

    pub fn into_trace(self) -> Trace {
        self.trace
    }
}
