//! Declarative scenario model
//!
//! A scenario is an ordered list of steps driven against the target
//! application: navigations, form fills, clicks, and assertions on the
//! resulting URL or page content. Scenarios can be authored in YAML or
//! built in code (see [`crate::suite`] for the built-in auth suite).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{E2eError, E2eResult};
use crate::identity::TestIdentity;

/// How to locate a page element. Covers the three lookup modes the
/// auth flows need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locator {
    Id(String),
    Css(String),
    LinkText(String),
}

impl Locator {
    pub fn as_fantoccini(&self) -> fantoccini::Locator<'_> {
        match self {
            Locator::Id(id) => fantoccini::Locator::Id(id),
            Locator::Css(css) => fantoccini::Locator::Css(css),
            Locator::LinkText(text) => fantoccini::Locator::LinkText(text),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "id={}", id),
            Locator::Css(css) => write!(f, "css={}", css),
            Locator::LinkText(text) => write!(f, "link_text={}", text),
        }
    }
}

/// A single step in a scenario
///
/// `value` fields may reference the run identity with `{username}` and
/// `{password}` placeholders; they are expanded at execution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Navigate to a path relative to the target base URL
    Navigate { path: String },

    /// Type text into an input field
    Fill { locator: Locator, value: String },

    /// Click an element
    Click { locator: Locator },

    /// Drop all cookies on the active session
    ClearCookies,

    /// Assert the current URL contains a fragment
    AssertUrlContains { value: String },

    /// Assert the current URL ends with a path (trailing slash ignored)
    AssertUrlEndsWith { value: String },

    /// Assert the rendered page source contains a fragment
    AssertSourceContains { value: String },

    /// Log a message (for debugging)
    Log { message: String },
}

impl Step {
    /// Short label used in step results and logs
    pub fn label(&self) -> String {
        match self {
            Step::Navigate { path } => format!("navigate:{}", path),
            Step::Fill { locator, .. } => format!("fill:{}", locator),
            Step::Click { locator } => format!("click:{}", locator),
            Step::ClearCookies => "clear_cookies".to_string(),
            Step::AssertUrlContains { value } => format!("assert_url_contains:{}", value),
            Step::AssertUrlEndsWith { value } => format!("assert_url_ends_with:{}", value),
            Step::AssertSourceContains { value } => format!("assert_source_contains:{}", value),
            Step::Log { message } => {
                // Truncate on character boundaries; messages are free text.
                let head: String = message.chars().take(30).collect();
                format!("log:{}", head)
            }
        }
    }
}

/// Expand `{username}` / `{password}` placeholders against the run
/// identity.
pub fn expand_placeholders(value: &str, identity: &TestIdentity) -> String {
    value
        .replace("{username}", &identity.username)
        .replace("{password}", &identity.password)
}

/// A complete scenario: ordinal position, action sequence, and the
/// assertions embedded in its step list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique name for this scenario
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Ordinal position; scenarios execute in ascending order
    pub order: u32,

    /// Tags for filtering
    #[serde(default)]
    pub tags: Vec<String>,

    /// The scenario consumes the run identity as an already-registered
    /// account. The runner performs an idempotent registration setup
    /// before the first such scenario instead of relying on the
    /// registration scenario having run earlier.
    #[serde(default)]
    pub requires_registered: bool,

    /// Steps to execute in order
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Parse a scenario from a YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        serde_yaml::from_str(yaml).map_err(E2eError::from)
    }

    /// Parse a scenario from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load all scenarios from a directory, sorted by declared order
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut scenarios = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            let scenario = Self::from_file(entry.path())?;
            scenarios.push(scenario);
        }

        scenarios.sort_by_key(|s| s.order);
        Ok(scenarios)
    }

    /// True when the scenario submits the registration form with the
    /// run identity, leaving the account registered once it succeeds.
    pub fn registers_identity(&self) -> bool {
        let visits_register = self
            .steps
            .iter()
            .any(|s| matches!(s, Step::Navigate { path } if path == crate::suite::REGISTER_PATH));
        let fills_username = self
            .steps
            .iter()
            .any(|s| matches!(s, Step::Fill { value, .. } if value == "{username}"));

        visits_register && fills_username
    }

    /// Filter scenarios by tag
    pub fn filter_by_tag(scenarios: Vec<Self>, tag: &str) -> Vec<Self> {
        scenarios
            .into_iter()
            .filter(|s| s.tags.iter().any(|t| t == tag))
            .collect()
    }
}
