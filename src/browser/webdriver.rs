use crate::browser::Renderer;
use crate::browser::driver::ChromeDriverProcess;
use crate::config::FetchConfig;
use crate::error::{FetchError, LaunchError, NavigationError};
use async_trait::async_trait;
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tokio::time::{Instant, timeout};

const READY_STATE_SCRIPT: &str = "return document.readyState;";

/// Renders pages in a headless browser over the WebDriver protocol
///
/// Every call to [`Renderer::render`] opens a fresh session and closes it
/// before returning, so no browser process is shared between fetches.
#[derive(Debug, Clone)]
pub struct WebDriverRenderer {
    config: FetchConfig,
}

impl WebDriverRenderer {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Session capabilities carrying the browser arguments
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": self.config.chrome_args() }),
        );
        caps
    }

    async fn open_session(&self, endpoint: &str) -> Result<Client, LaunchError> {
        match ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(endpoint)
            .await
        {
            Ok(client) => {
                ::log::debug!("Opened browser session at {}", endpoint);
                Ok(client)
            }
            Err(source) => Err(LaunchError::Session {
                endpoint: endpoint.to_string(),
                source,
            }),
        }
    }

    /// Runs navigation, readiness and capture under the navigation bound
    async fn capture(&self, client: &Client, url: &str) -> Result<String, NavigationError> {
        let limit = self.config.navigation_timeout();

        match timeout(limit, self.navigate_and_capture(client, url)).await {
            Ok(result) => result,
            Err(_) => Err(NavigationError::Timeout {
                url: url.to_string(),
                after: limit,
            }),
        }
    }

    async fn navigate_and_capture(
        &self,
        client: &Client,
        url: &str,
    ) -> Result<String, NavigationError> {
        // Lets the driver abort a stalled load instead of holding the session
        let timeouts =
            TimeoutConfiguration::new(None, Some(self.config.navigation_timeout()), None);
        if let Err(e) = client.update_timeouts(timeouts).await {
            ::log::warn!("Failed to set page load timeout for {}: {}", url, e);
        }

        client
            .goto(url)
            .await
            .map_err(|source| NavigationError::Goto {
                url: url.to_string(),
                source,
            })?;

        let ready_timeout = self.config.ready_timeout();
        if wait_for_ready(client, ready_timeout, self.config.poll_interval()).await {
            let settle = self.config.settle_delay();
            if !settle.is_zero() {
                tokio::time::sleep(settle).await;
            }
        } else {
            ::log::warn!(
                "{} not ready after {:?}, capturing anyway",
                url,
                ready_timeout
            );
        }

        client
            .source()
            .await
            .map_err(|source| NavigationError::Capture {
                url: url.to_string(),
                source,
            })
    }

    /// Opens a session, captures the page and always closes the session
    async fn render_in_session(&self, endpoint: &str, url: &str) -> Result<String, FetchError> {
        let client = self.open_session(endpoint).await?;

        let captured = self.capture(&client, url).await;
        close_session(client, self.config.session_close_timeout()).await;

        Ok(captured?)
    }
}

#[async_trait]
impl Renderer for WebDriverRenderer {
    async fn render(&self, url: &str) -> Result<String, FetchError> {
        let started = Instant::now();

        let driver = match &self.config.driver_binary {
            Some(binary) => Some(
                ChromeDriverProcess::spawn(
                    binary,
                    self.config.driver_port,
                    self.config.driver_startup_timeout(),
                )
                .await?,
            ),
            None => None,
        };

        let result = self
            .render_in_session(&self.config.session_endpoint(), url)
            .await;

        if let Some(driver) = driver {
            driver.shutdown().await;
        }

        ::log::debug!(
            "Rendered {} in {:.2} seconds",
            url,
            started.elapsed().as_secs_f64()
        );
        result
    }
}

/// Polls `document.readyState` until it is `complete` or `limit` elapses
///
/// Returns whether the document reported ready in time. Script errors while
/// polling are treated as "not ready yet".
pub async fn wait_for_ready(client: &Client, limit: Duration, interval: Duration) -> bool {
    let deadline = Instant::now() + limit;

    loop {
        match client.execute(READY_STATE_SCRIPT, Vec::new()).await {
            Ok(state) if is_ready_state(&state) => return true,
            Ok(state) => ::log::trace!("Document readyState is {}", state),
            Err(e) => ::log::debug!("readyState check failed: {}", e),
        }

        if Instant::now() >= deadline {
            return false;
        }

        tokio::time::sleep(interval).await;
    }
}

fn is_ready_state(state: &Value) -> bool {
    state.as_str() == Some("complete")
}

/// Closes the session within `limit`, logging rather than propagating failures
///
/// A command still in flight (e.g. a stalled `goto` abandoned by the
/// navigation timeout) queues the close behind it, so the wait is bounded.
async fn close_session(client: Client, limit: Duration) {
    match timeout(limit, client.close()).await {
        Ok(Ok(())) => ::log::debug!("Closed browser session"),
        Ok(Err(e)) => ::log::warn!("Failed to close browser session: {}", e),
        Err(_) => ::log::warn!("Browser session did not close within {:?}", limit),
    }
}
