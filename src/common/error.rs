//! Error types for the API checker
//!
//! Scenario failures and setup failures share one error type. Scenario
//! failures are terminal for the scenario only; the runner records them in
//! the result instead of aborting the process.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the API checker
#[derive(Error, Debug)]
pub enum Error {
    // === Scenario Failures ===
    #[error("Connection error: could not reach {base_url}. Please ensure the application is running")]
    Connectivity {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{step} failed: expected HTTP {expected}, got HTTP {actual}")]
    UnexpectedStatus {
        step: String,
        expected: u16,
        actual: u16,
        body: String,
    },

    #[error("Assertion failed: {0}")]
    TestAssertion(String),

    #[error("Could not determine {0} ID")]
    IndeterminateIdentifier(String),

    // === HTTP Errors ===
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    // === Scenario Lookup ===
    #[error("Unknown scenario '{id}'. Known scenarios: {known}")]
    UnknownScenario { id: String, known: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create an unexpected status error for a named step
    pub fn unexpected_status(step: &str, expected: u16, actual: u16, body: &str) -> Self {
        Self::UnexpectedStatus {
            step: step.to_string(),
            expected,
            actual,
            body: body.to_string(),
        }
    }

    /// Create an unknown scenario error listing the registered ids
    pub fn unknown_scenario<S: AsRef<str>>(id: &str, known: &[S]) -> Self {
        Self::UnknownScenario {
            id: id.to_string(),
            known: known.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(", "),
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: &str, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Classify this error for scenario reports
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Error::Connectivity { .. } => FailureKind::Connectivity,
            Error::UnexpectedStatus { .. } => FailureKind::UnexpectedStatus,
            Error::TestAssertion(_) | Error::Json(_) => FailureKind::Assertion,
            Error::IndeterminateIdentifier(_) => FailureKind::IndeterminateIdentifier,
            _ => FailureKind::Other,
        }
    }
}

/// Informational failure class recorded in scenario results
///
/// Every class fails the scenario the same way; the class only changes how
/// the failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Connectivity,
    UnexpectedStatus,
    Assertion,
    IndeterminateIdentifier,
    Other,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FailureKind::Connectivity => "connectivity failure",
            FailureKind::UnexpectedStatus => "unexpected status",
            FailureKind::Assertion => "assertion failure",
            FailureKind::IndeterminateIdentifier => "indeterminate identifier",
            FailureKind::Other => "error",
        };
        f.write_str(label)
    }
}
