//! WebDriver browser session handle
//!
//! Wraps a [`fantoccini::Client`] with the capability set the runner
//! needs: navigation, bounded-wait element lookup, form input, clicks,
//! URL/source reads, and cookie management. The WebDriver wire protocol
//! stays behind this type.

use std::time::{Duration, Instant};

use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::scenario::Locator;

/// Poll interval for the implicit element wait
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BrowserKind {
    #[default]
    Chrome,
    Firefox,
}

/// Configuration for the browser session
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// WebDriver endpoint (chromedriver / geckodriver)
    pub webdriver_url: String,

    /// Which browser the endpoint drives
    pub kind: BrowserKind,

    /// Run without a visible window
    pub headless: bool,

    /// Bounded wait applied when locating elements before failing
    pub implicit_wait: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            kind: BrowserKind::Chrome,
            headless: true,
            implicit_wait: Duration::from_secs(5),
        }
    }
}

impl BrowserConfig {
    /// Build the WebDriver capability object for this configuration
    fn capabilities(&self) -> E2eResult<serde_json::Map<String, serde_json::Value>> {
        let value = match self.kind {
            BrowserKind::Chrome => {
                let mut args: Vec<&str> = vec!["--no-sandbox", "--disable-dev-shm-usage"];
                if self.headless {
                    args.push("--headless=new");
                }
                json!({
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                })
            }
            BrowserKind::Firefox => {
                let mut args: Vec<&str> = Vec::new();
                if self.headless {
                    args.push("-headless");
                }
                json!({
                    "browserName": "firefox",
                    "moz:firefoxOptions": { "args": args }
                })
            }
        };

        serde_json::from_value(value).map_err(E2eError::from)
    }
}

/// An exclusive handle to one browser session
///
/// Owned by the runner for the suite's whole lifetime; release is
/// explicit via [`BrowserHandle::close`] so teardown can run on every
/// exit path.
pub struct BrowserHandle {
    client: Client,
    implicit_wait: Duration,
}

impl BrowserHandle {
    /// Establish a WebDriver session
    pub async fn connect(config: &BrowserConfig) -> E2eResult<Self> {
        let caps = config.capabilities()?;

        debug!("connecting to WebDriver at {}", config.webdriver_url);
        let client = ClientBuilder::rustls()
            .map_err(|e| E2eError::Session(format!("TLS connector setup failed: {}", e)))?
            .capabilities(caps)
            .connect(&config.webdriver_url)
            .await?;

        Ok(Self {
            client,
            implicit_wait: config.implicit_wait,
        })
    }

    /// Navigate to an absolute URL
    pub async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!("goto {}", url);
        self.client.goto(url).await.map_err(E2eError::from)
    }

    /// Locate an element, polling until the implicit wait is exhausted
    pub async fn find(&self, locator: &Locator) -> E2eResult<Element> {
        let deadline = Instant::now() + self.implicit_wait;

        loop {
            match self.client.find(locator.as_fantoccini()).await {
                Ok(element) => return Ok(element),
                Err(_) if Instant::now() < deadline => {
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
                Err(_) => {
                    return Err(E2eError::ElementTimeout {
                        locator: locator.to_string(),
                        waited_ms: self.implicit_wait.as_millis() as u64,
                    });
                }
            }
        }
    }

    /// Type text into an input field
    pub async fn fill(&self, locator: &Locator, text: &str) -> E2eResult<()> {
        let element = self.find(locator).await?;
        element.send_keys(text).await.map_err(E2eError::from)
    }

    /// Click an element
    pub async fn click(&self, locator: &Locator) -> E2eResult<()> {
        let element = self.find(locator).await?;
        element.click().await.map_err(E2eError::from)
    }

    /// Current URL of the active window
    pub async fn current_url(&self) -> E2eResult<String> {
        Ok(self.client.current_url().await?.to_string())
    }

    /// Full page source of the active window
    pub async fn page_source(&self) -> E2eResult<String> {
        self.client.source().await.map_err(E2eError::from)
    }

    /// Delete all cookies on the active session
    pub async fn delete_all_cookies(&self) -> E2eResult<()> {
        self.client
            .delete_all_cookies()
            .await
            .map_err(E2eError::from)
    }

    /// End the WebDriver session
    pub async fn close(self) -> E2eResult<()> {
        self.client.close().await.map_err(E2eError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_suite_contract() {
        let config = BrowserConfig::default();
        assert_eq!(config.kind, BrowserKind::Chrome);
        assert!(config.headless);
        assert_eq!(config.implicit_wait, Duration::from_secs(5));
    }

    #[test]
    fn chrome_capabilities_request_headless() {
        let config = BrowserConfig::default();
        let caps = config.capabilities().unwrap();

        assert_eq!(caps["browserName"], "chrome");
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless=new"));
    }

    #[test]
    fn firefox_headed_capabilities_have_no_headless_arg() {
        let config = BrowserConfig {
            kind: BrowserKind::Firefox,
            headless: false,
            ..Default::default()
        };
        let caps = config.capabilities().unwrap();

        assert_eq!(caps["browserName"], "firefox");
        let args = caps["moz:firefoxOptions"]["args"].as_array().unwrap();
        assert!(args.is_empty());
    }
}
