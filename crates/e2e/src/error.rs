//! Error types for the E2E suite

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("WebDriver session error: {0}")]
    Session(String),

    #[error("WebDriver session could not be established: {0}")]
    NewSession(#[from] fantoccini::error::NewSessionError),

    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    #[error("Element not found within {waited_ms} ms: {locator}")]
    ElementTimeout { locator: String, waited_ms: u64 },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Target unreachable at {url} after {attempts} attempt(s)")]
    TargetUnreachable { url: String, attempts: usize },

    #[error("Scenario parse error: {0}")]
    SpecParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
