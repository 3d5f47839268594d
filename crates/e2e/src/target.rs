//! Target application preflight
//!
//! The application under test is remote and not under suite control.
//! Before spending a browser session on seven scenarios, probe the base
//! URL so a dead target fails fast with one clear error instead of a
//! cascade of misleading scenario failures.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};

/// The target application the suite runs against
#[derive(Debug, Clone)]
pub struct TargetConfig {
    /// Base URL, no trailing slash
    pub base_url: String,

    /// Total time to keep probing before giving up
    pub probe_timeout: Duration,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: "https://practice.expandtesting.com".to_string(),
            probe_timeout: Duration::from_secs(30),
        }
    }
}

impl TargetConfig {
    /// Check that the target responds before the suite starts
    pub async fn probe(&self) -> E2eResult<()> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        let start = std::time::Instant::now();
        let mut attempts = 0;

        while start.elapsed() < self.probe_timeout {
            attempts += 1;

            match client.get(&self.base_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    info!("target reachable at {}", self.base_url);
                    return Ok(());
                }
                Ok(resp) => {
                    warn!("target probe returned {}", resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("waiting for target at {}...", self.base_url);
                    }
                    // Connection errors are retried until the timeout
                    if !e.is_connect() && !e.is_timeout() {
                        warn!("target probe error: {}", e);
                    }
                }
            }

            sleep(Duration::from_millis(500)).await;
        }

        Err(E2eError::TargetUnreachable {
            url: self.base_url.clone(),
            attempts,
        })
    }

    /// Absolute URL for a path on the target
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_the_practice_target() {
        let config = TargetConfig::default();
        assert_eq!(config.base_url, "https://practice.expandtesting.com");
        assert!(!config.base_url.ends_with('/'));
    }

    #[test]
    fn url_for_joins_base_and_path() {
        let config = TargetConfig {
            base_url: "http://127.0.0.1:8080".to_string(),
            ..Default::default()
        };
        assert_eq!(config.url_for("/login"), "http://127.0.0.1:8080/login");
    }
}
