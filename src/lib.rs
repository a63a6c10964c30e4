// Re-export modules
pub mod browser;
pub mod config;
pub mod error;
pub mod parsers;
pub mod results;

// Re-export commonly used types for convenience
pub use browser::{ChromeDriverProcess, Renderer, WebDriverRenderer};
pub use config::FetchConfig;
pub use error::{ConfigError, FetchError, LaunchError, NavigationError, ParseError};
pub use results::{NO_TITLE_FOUND, PageContent};

use parsers::ExtractOptions;
use std::path::Path;

/// Fetches a single page and turns it into a [`PageContent`] record
///
/// Holds no browser state between calls: each [`PageFetcher::fetch`] renders
/// the page with its own session and releases it before extraction starts.
pub struct PageFetcher<R = WebDriverRenderer> {
    renderer: R,
    config: FetchConfig,
}

impl PageFetcher<WebDriverRenderer> {
    /// Create a fetcher with default configuration
    pub fn new() -> Self {
        Self::from_config(FetchConfig::default())
    }

    /// Create a fetcher backed by a WebDriver session built from `config`
    pub fn from_config(config: FetchConfig) -> Self {
        Self {
            renderer: WebDriverRenderer::new(config.clone()),
            config,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(self, config: FetchConfig) -> Self {
        Self::from_config(config)
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = FetchConfig::from_file(path)?;
        config.validate()?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a JSON string
    pub fn with_config_str(self, json: &str) -> Result<Self, ConfigError> {
        let config = FetchConfig::from_json(json)?;
        config.validate()?;
        Ok(self.with_config(config))
    }

    /// Set the WebDriver endpoint
    pub fn with_webdriver_url(self, webdriver_url: &str) -> Self {
        self.reconfigure(|c| c.webdriver_url = webdriver_url.to_string())
    }

    /// Launch the given driver binary for each fetch instead of using a running endpoint
    pub fn with_driver_binary(self, binary: &str) -> Self {
        self.reconfigure(|c| c.driver_binary = Some(binary.to_string()))
    }

    /// Set the upper bound on the readiness poll
    pub fn with_ready_timeout(self, timeout_ms: u64) -> Self {
        self.reconfigure(|c| c.ready_timeout_ms = timeout_ms)
    }

    fn reconfigure(mut self, update: impl FnOnce(&mut FetchConfig)) -> Self {
        update(&mut self.config);
        Self::from_config(self.config)
    }
}

impl Default for PageFetcher<WebDriverRenderer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Renderer> PageFetcher<R> {
    /// Create a fetcher around any renderer
    pub fn with_renderer(renderer: R, config: FetchConfig) -> Self {
        Self { renderer, config }
    }

    /// Set the maximum number of characters kept in the extracted text
    pub fn with_max_text_chars(mut self, max_text_chars: usize) -> Self {
        self.config.max_text_chars = max_text_chars;
        self
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Render `url`, then extract its title, text and links
    pub async fn fetch(&self, url: &str) -> Result<PageContent, FetchError> {
        ::log::info!("Fetching page: {}", url);

        // Reject bad settings before paying for a browser session
        self.config.validate()?;

        let html = self.renderer.render(url).await?;
        let extracted = parsers::extract(&html, &ExtractOptions::from(&self.config))?;

        ::log::info!("Found {} links in {}", extracted.links.len(), url);
        Ok(PageContent::new(
            url.to_string(),
            extracted.title,
            extracted.text,
            extracted.links,
        ))
    }
}

/// Fetch a page with default configuration plus environment overrides
pub async fn fetch(url: &str) -> Result<PageContent, FetchError> {
    let mut config = FetchConfig::default();
    config.apply_env_overrides();
    fetch_with_config(url, &config).await
}

/// Fetch a page with an explicit configuration
pub async fn fetch_with_config(url: &str, config: &FetchConfig) -> Result<PageContent, FetchError> {
    PageFetcher::from_config(config.clone()).fetch(url).await
}

/// Blocking form of [`fetch_with_config`]
///
/// Runs the fetch on a private current-thread runtime, so it must not be
/// called from inside another tokio runtime.
pub fn fetch_blocking(url: &str, config: &FetchConfig) -> Result<PageContent, FetchError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(LaunchError::Runtime)?;

    runtime.block_on(fetch_with_config(url, config))
}
