//! Generator configuration.
//!
//! Every knob has a default matching the behaviour of the classic ASP.NET documentation
//! generator, so an empty (or absent) configuration file is valid. The collection and
//! wrapper tables are plain data: extending them never requires code changes.

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How colliding type names are handled by the symbol index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// First declaration wins, later duplicates are dropped silently
    #[default]
    FirstWins,
    /// Duplicate keys fail the index build, ambiguous lookups resolve to nothing
    Strict,
}

/// How the request example is built when several parameters carry a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestMode {
    /// The last payload parameter's example is used
    #[default]
    LastWins,
    /// All payload parameters are merged into one object keyed by parameter name
    Merge,
}

/// Configuration shared by every stage of one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Generic heads representing zero-or-more values of their first argument
    pub collection_types: Vec<String>,
    /// Generic heads that only carry their first argument
    pub wrapper_types: Vec<String>,
    /// Base classes identifying a controller
    pub controller_base_types: Vec<String>,
    /// Attribute names marking an HTTP endpoint
    pub http_verbs: Vec<String>,
    pub name_policy: NamePolicy,
    pub request_mode: RequestMode,
    /// Upper bound on nested expansion, independent of the cycle guard
    pub max_depth: usize,
    /// Example literal for date and time types
    pub date_example: String,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            collection_types: strings(&[
                "IEnumerable",
                "List",
                "ICollection",
                "IEnumerator",
                "IList",
                "IReadOnlyList",
                "IReadOnlyCollection",
                "IAsyncEnumerable",
                "HashSet",
                "Collection",
            ]),
            wrapper_types: strings(&[
                "ActionResult",
                "IActionResult",
                "ObjectResult",
                "PartialViewResult",
                "ViewResult",
                "OkObjectResult",
                "BadRequestObjectResult",
                "NotFoundObjectResult",
                "ContentResult",
                "Task",
                "ValueTask",
                "Nullable",
            ]),
            controller_base_types: strings(&["ControllerBase", "Controller"]),
            http_verbs: strings(&["HttpGet", "HttpPost", "HttpPut", "HttpDelete", "HttpPatch"]),
            name_policy: NamePolicy::FirstWins,
            request_mode: RequestMode::LastWins,
            max_depth: 32,
            date_example: "2023-08-01T20:42:56.710Z".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Load a configuration from a YAML file; missing fields keep their defaults
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn is_http_verb(&self, attribute_name: &str) -> bool {
        self.http_verbs.iter().any(|v| v == attribute_name)
    }
}
