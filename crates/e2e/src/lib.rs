//! Authcheck E2E suite
//!
//! Browser-driven end-to-end tests for a web application's
//! registration, login, session, and logout flows. The suite owns a
//! single WebDriver session for its whole lifetime, resets cookies
//! before each scenario, executes scenarios in a fixed order, and
//! asserts on URL transitions and page content after each simulated
//! user action.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Scenario Runner (Rust)                  │
//! ├─────────────────────────────────────────────────────────┤
//! │  ScenarioRunner                                         │
//! │    ├── TargetConfig::probe()  — preflight the base URL  │
//! │    ├── BrowserHandle::connect() — one WebDriver session │
//! │    ├── TestIdentity::generate() — one identity per run  │
//! │    ├── run_suite(scenarios) — ordered, cookie reset     │
//! │    │   before each scenario, stop at first failed step  │
//! │    └── write_results() — JSON report                    │
//! ├─────────────────────────────────────────────────────────┤
//! │  Scenario (code-built suite or YAML)                    │
//! │    ├── name, order, tags, requires_registered           │
//! │    └── steps: navigate | fill | click | clear_cookies   │
//! │              | assert_url_* | assert_source_contains    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The application under test and the WebDriver endpoint are external;
//! nothing here defines authentication semantics or the wire protocol.

pub mod browser;
pub mod error;
pub mod identity;
pub mod runner;
pub mod scenario;
pub mod suite;
pub mod target;

pub use browser::{BrowserConfig, BrowserHandle, BrowserKind};
pub use error::{E2eError, E2eResult};
pub use identity::TestIdentity;
pub use runner::{RunnerConfig, ScenarioRunner, SuiteResult};
pub use scenario::{Scenario, Step};
pub use target::TargetConfig;
