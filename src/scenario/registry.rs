//! Scenario registry
//!
//! Lists every scenario the tool can run, in the order `all` runs them.

use std::sync::Arc;

use crate::common::{Error, Result};

use super::context::{Scenario, ScenarioInfo};
use super::journeys;

/// All available scenarios
static SCENARIOS: [&ScenarioInfo; 3] = [
    &journeys::auth::INFO,
    &journeys::menu::INFO,
    &journeys::order::INFO,
];

/// Get all registered scenarios
pub fn all_scenarios() -> &'static [&'static ScenarioInfo] {
    &SCENARIOS
}

/// Get the implementation of a scenario
pub fn get_scenario(id: &str) -> Option<Arc<dyn Scenario>> {
    match id {
        "auth" => Some(Arc::new(journeys::auth::AuthScenario)),
        "menu" => Some(Arc::new(journeys::menu::MenuScenario)),
        "order" => Some(Arc::new(journeys::order::OrderScenario)),
        _ => None,
    }
}

/// Resolve a list of IDs, failing on the first unknown one
pub fn resolve<S: AsRef<str>>(ids: &[S]) -> Result<Vec<Arc<dyn Scenario>>> {
    ids.iter()
        .map(|id| {
            let id = id.as_ref();
            get_scenario(id).ok_or_else(|| Error::unknown_scenario(id, &known_ids()))
        })
        .collect()
}

/// IDs of every registered scenario
pub fn known_ids() -> Vec<&'static str> {
    SCENARIOS.iter().map(|s| s.id).collect()
}
