//! Scenario runner
//!
//! Owns one browser session for the suite's lifetime, clears cookies
//! before every scenario, executes scenarios strictly sequentially in
//! declared order, and records per-step results. A failed step ends its
//! scenario; a failed scenario never stops the suite. The browser
//! session is released on every exit path.

use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::browser::{BrowserConfig, BrowserHandle};
use crate::error::{E2eError, E2eResult};
use crate::identity::TestIdentity;
use crate::scenario::{expand_placeholders, Scenario, Step};
use crate::suite;
use crate::target::TargetConfig;

/// Result of executing one step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub label: String,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub order: u32,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

/// Result of running the whole suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

/// Configuration for the scenario runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub browser: BrowserConfig,
    pub target: TargetConfig,

    /// Directory of YAML scenarios; `None` runs the built-in suite
    pub specs_dir: Option<PathBuf>,

    /// Output directory for the JSON report
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            target: TargetConfig::default(),
            specs_dir: None,
            output_dir: PathBuf::from("test-results"),
        }
    }
}

/// Drives the target application through one browser session
pub struct ScenarioRunner {
    config: RunnerConfig,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    fn scenarios(&self) -> E2eResult<Vec<Scenario>> {
        match &self.config.specs_dir {
            Some(dir) => Scenario::load_all(dir),
            None => Ok(suite::builtin_suite()),
        }
    }

    /// Run every scenario in declared order
    pub async fn run_all(&self) -> E2eResult<SuiteResult> {
        let scenarios = self.scenarios()?;
        self.run_suite(scenarios).await
    }

    /// Run the scenarios carrying a tag, preserving order
    pub async fn run_tagged(&self, tag: &str) -> E2eResult<SuiteResult> {
        let scenarios = Scenario::filter_by_tag(self.scenarios()?, tag);
        self.run_suite(scenarios).await
    }

    /// Run one scenario by name
    ///
    /// Dependent scenarios still work standalone: `requires_registered`
    /// establishes the account precondition without the registration
    /// scenario having run.
    pub async fn run_scenario(&self, name: &str) -> E2eResult<SuiteResult> {
        let scenario = self
            .scenarios()?
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| E2eError::SpecParse(format!("scenario not found: {}", name)))?;
        self.run_suite(vec![scenario]).await
    }

    /// Execute a list of scenarios against one browser session
    pub async fn run_suite(&self, scenarios: Vec<Scenario>) -> E2eResult<SuiteResult> {
        let start = Instant::now();

        self.config.target.probe().await?;

        let browser = BrowserHandle::connect(&self.config.browser).await?;
        let identity = TestIdentity::generate();
        info!(
            "running {} scenario(s) against {} as {}",
            scenarios.len(),
            self.config.target.base_url,
            identity.username
        );

        let mut suite_result = self.execute(&browser, &identity, &scenarios).await;

        // Teardown runs whether scenarios passed or not.
        if let Err(e) = browser.close().await {
            warn!("browser session close failed: {}", e);
        }

        suite_result.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "suite finished: {} passed, {} failed ({} ms)",
            suite_result.passed, suite_result.failed, suite_result.duration_ms
        );

        Ok(suite_result)
    }

    async fn execute(
        &self,
        browser: &BrowserHandle,
        identity: &TestIdentity,
        scenarios: &[Scenario],
    ) -> SuiteResult {
        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;
        let mut registered = false;

        for scenario in scenarios {
            let result = self
                .run_one(browser, identity, scenario, &mut registered)
                .await;

            // A passed registration scenario already created the
            // account; later scenarios can skip the setup pass.
            if result.success && scenario.registers_identity() {
                registered = true;
            }

            if result.success {
                passed += 1;
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        SuiteResult {
            total: scenarios.len(),
            passed,
            failed,
            duration_ms: 0,
            results,
        }
    }

    async fn run_one(
        &self,
        browser: &BrowserHandle,
        identity: &TestIdentity,
        scenario: &Scenario,
        registered: &mut bool,
    ) -> ScenarioResult {
        let start = Instant::now();
        debug!("running scenario: {}", scenario.name);

        let mut steps = Vec::new();
        let mut scenario_error: Option<String> = None;

        // Every scenario starts unauthenticated.
        if let Err(e) = browser.delete_all_cookies().await {
            scenario_error = Some(format!("cookie reset failed: {}", e));
        }

        if scenario_error.is_none() && scenario.requires_registered && !*registered {
            match self.ensure_registered(browser, identity).await {
                Ok(()) => *registered = true,
                Err(e) => scenario_error = Some(format!("registration setup failed: {}", e)),
            }
        }

        if scenario_error.is_none() {
            for step in &scenario.steps {
                let result = self.run_step(browser, identity, step).await;
                let ok = result.success;
                if !ok {
                    scenario_error = result.error.clone();
                }
                steps.push(result);
                if !ok {
                    break; // first failed step ends the scenario
                }
            }
        }

        ScenarioResult {
            name: scenario.name.clone(),
            order: scenario.order,
            success: scenario_error.is_none(),
            duration_ms: start.elapsed().as_millis() as u64,
            steps,
            error: scenario_error,
        }
    }

    /// Idempotent setup for scenarios that consume the run identity as
    /// an existing account. A duplicate attempt is rejected by the
    /// target, which is fine: afterwards the account exists either way.
    async fn ensure_registered(
        &self,
        browser: &BrowserHandle,
        identity: &TestIdentity,
    ) -> E2eResult<()> {
        debug!("ensuring {} is registered", identity.username);

        browser
            .goto(&self.config.target.url_for(suite::REGISTER_PATH))
            .await?;
        browser
            .fill(&suite::username_field(), &identity.username)
            .await?;
        browser
            .fill(&suite::password_field(), &identity.password)
            .await?;
        browser
            .fill(&suite::confirm_password_field(), &identity.password)
            .await?;
        browser.click(&suite::submit_button()).await?;

        Ok(())
    }

    async fn run_step(
        &self,
        browser: &BrowserHandle,
        identity: &TestIdentity,
        step: &Step,
    ) -> StepResult {
        let start = Instant::now();
        let label = step.label();
        debug!("step: {}", label);

        let outcome = self.execute_step(browser, identity, step).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => StepResult {
                label,
                success: true,
                duration_ms,
                error: None,
            },
            Err(e) => StepResult {
                label,
                success: false,
                duration_ms,
                error: Some(e.to_string()),
            },
        }
    }

    async fn execute_step(
        &self,
        browser: &BrowserHandle,
        identity: &TestIdentity,
        step: &Step,
    ) -> E2eResult<()> {
        match step {
            Step::Navigate { path } => browser.goto(&self.config.target.url_for(path)).await,
            Step::Fill { locator, value } => {
                browser
                    .fill(locator, &expand_placeholders(value, identity))
                    .await
            }
            Step::Click { locator } => browser.click(locator).await,
            Step::ClearCookies => browser.delete_all_cookies().await,
            Step::AssertUrlContains { value } => {
                let url = browser.current_url().await?;
                let needle = expand_placeholders(value, identity);
                if url.contains(&needle) {
                    Ok(())
                } else {
                    Err(E2eError::AssertionFailed(format!(
                        "expected URL containing {:?}, got {:?}",
                        needle, url
                    )))
                }
            }
            Step::AssertUrlEndsWith { value } => {
                let url = browser.current_url().await?;
                let needle = expand_placeholders(value, identity);
                if url_ends_with(&url, &needle) {
                    Ok(())
                } else {
                    Err(E2eError::AssertionFailed(format!(
                        "expected URL ending with {:?}, got {:?}",
                        needle, url
                    )))
                }
            }
            Step::AssertSourceContains { value } => {
                let source = browser.page_source().await?;
                let needle = expand_placeholders(value, identity);
                if source.contains(&needle) {
                    Ok(())
                } else {
                    Err(E2eError::AssertionFailed(format!(
                        "page content does not contain {:?}",
                        needle
                    )))
                }
            }
            Step::Log { message } => {
                info!("[scenario] {}", message);
                Ok(())
            }
        }
    }

    /// Write the suite result to a JSON report
    pub fn write_results(&self, results: &SuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("suite-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("results written to: {}", path.display());
        Ok(path)
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// URL suffix match, ignoring a trailing slash on the current URL
fn url_ends_with(url: &str, needle: &str) -> bool {
    url.trim_end_matches('/').ends_with(needle)
}
