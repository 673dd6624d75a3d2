//! Suite file types
//!
//! A suite is a YAML file naming the scenarios to run, optionally with its
//! own endpoint and template overrides:
//!
//! ```yaml
//! name: Nightly smoke
//! base_url: https://staging.example.com
//! scenarios: [auth, order]
//! templates:
//!   order:
//!     quantities: [1]
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::common::{Error, Result};

use super::registry;
use super::templates::{AuthTemplate, Credentials, MenuTemplate, OrderTemplate, Templates};

/// A suite loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct SuiteFile {
    /// Name of the suite
    pub name: String,
    /// Optional description of what the suite covers
    pub description: Option<String>,
    /// Endpoint overriding the configured one
    pub base_url: Option<String>,
    /// Scenario IDs, run in this order
    pub scenarios: Vec<String>,
    /// Template sections replacing the configured ones
    #[serde(default)]
    pub templates: TemplateOverrides,
}

/// Per-section template replacements
#[derive(Deserialize, Debug, Default)]
pub struct TemplateOverrides {
    pub auth: Option<AuthTemplate>,
    pub admin: Option<Credentials>,
    pub menu: Option<MenuTemplate>,
    pub order: Option<OrderTemplate>,
}

impl TemplateOverrides {
    /// Replace the sections present in this override
    pub fn apply(&self, base: &Templates) -> Templates {
        Templates {
            auth: self.auth.clone().unwrap_or_else(|| base.auth.clone()),
            admin: self.admin.clone().unwrap_or_else(|| base.admin.clone()),
            menu: self.menu.clone().unwrap_or_else(|| base.menu.clone()),
            order: self.order.clone().unwrap_or_else(|| base.order.clone()),
        }
    }
}

impl SuiteFile {
    /// Load and validate a suite file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate suite YAML
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let suite: SuiteFile = serde_yaml::from_str(content)?;
        if suite.scenarios.is_empty() {
            return Err(Error::Config(format!(
                "Suite '{}' lists no scenarios",
                suite.name
            )));
        }
        registry::resolve(suite.scenarios.as_slice())?;
        Ok(suite)
    }

    /// Templates for this suite on top of the configured ones
    pub fn templates(&self, base: &Templates) -> Result<Templates> {
        let templates = self.templates.apply(base);
        templates.validate()?;
        Ok(templates)
    }
}
