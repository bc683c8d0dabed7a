// src/fetcher.rs
//! Retrieves a job-search results page for one source, either through a
//! headless browser (sources behind anti-bot JS) or a direct HTTP GET.

use crate::config::{FetchMode, SourceConfig};
use crate::error::FetchError;
use headless_chrome::{Browser, LaunchOptions};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(25);
const SELECTOR_TIMEOUT: Duration = Duration::from_secs(15);

pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch the raw HTML of a source's results page. Errors here are
    /// non-fatal to the scrape pass: the source contributes an empty
    /// collection.
    pub async fn fetch(&self, source: &SourceConfig) -> Result<String, FetchError> {
        match source.fetch {
            FetchMode::Browser => self.fetch_with_browser(source).await,
            FetchMode::Http => self.fetch_with_http(source).await,
        }
    }

    async fn fetch_with_http(&self, source: &SourceConfig) -> Result<String, FetchError> {
        info!("[{}] GET {}", source.name, source.url);

        let response = self
            .client
            .get(&source.url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if matches!(status.as_u16(), 403 | 429 | 999) {
            return Err(FetchError::Blocked(status.as_u16()));
        }
        if !status.is_success() {
            return Err(FetchError::Network(format!("HTTP error: {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))
    }

    async fn fetch_with_browser(&self, source: &SourceConfig) -> Result<String, FetchError> {
        info!("[{}] navigating headless browser to {}", source.name, source.url);

        let url = source.url.clone();
        let wait_selector = source.wait_selector.clone();
        let cookie_header = source.session_cookie.as_ref().and_then(|cookie| {
            cookie
                .value
                .as_ref()
                .map(|value| format!("{}={}", cookie.name, value))
        });
        let name = source.name.clone();

        tokio::task::spawn_blocking(move || {
            navigate_and_capture(&name, &url, wait_selector.as_deref(), cookie_header.as_deref())
        })
        .await
        .map_err(|e| FetchError::Network(format!("Browser task failed: {}", e)))?
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Blocking headless-browser navigation. Runs on the blocking pool since
/// headless_chrome exposes a synchronous API.
fn navigate_and_capture(
    source_name: &str,
    url: &str,
    wait_selector: Option<&str>,
    cookie_header: Option<&str>,
) -> Result<String, FetchError> {
    let options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(false)
        .idle_browser_timeout(Duration::from_secs(90))
        .build()
        .map_err(|e| FetchError::Network(format!("Failed to build launch options: {}", e)))?;

    let browser =
        Browser::new(options).map_err(|e| FetchError::Network(format!("Failed to launch browser: {}", e)))?;
    let tab = browser
        .new_tab()
        .map_err(|e| FetchError::Network(format!("Failed to open tab: {}", e)))?;

    tab.set_default_timeout(NAVIGATION_TIMEOUT);
    tab.set_user_agent(USER_AGENT, None, None)
        .map_err(|e| FetchError::Network(format!("Failed to set user agent: {}", e)))?;

    if let Some(cookie) = cookie_header {
        let mut headers = HashMap::new();
        headers.insert("Cookie", cookie);
        tab.set_extra_http_headers(headers)
            .map_err(|e| FetchError::Network(format!("Failed to set session cookie: {}", e)))?;
        info!("[{}] session cookie configured", source_name);
    }

    tab.navigate_to(url)
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(|e| FetchError::Network(format!("Navigation failed: {}", e)))?;

    if let Some(selector) = wait_selector {
        if let Err(e) = tab.wait_for_element_with_custom_timeout(selector, SELECTOR_TIMEOUT) {
            // LinkedIn serves a CAPTCHA page instead of results when it
            // rejects the session; the wait-selector never appears.
            warn!(
                "[{}] content selector '{}' never appeared: {}",
                source_name, selector, e
            );
            return Err(FetchError::Timeout);
        }
    }

    tab.get_content()
        .map_err(|e| FetchError::Network(format!("Failed to read page content: {}", e)))
}
