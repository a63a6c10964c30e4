use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding [`FetchConfig::webdriver_url`]
pub const WEBDRIVER_URL_ENV: &str = "WEBDRIVER_URL";

/// Environment variable overriding [`FetchConfig::driver_binary`]
pub const CHROMEDRIVER_PATH_ENV: &str = "CHROMEDRIVER_PATH";

/// Configuration for a single page fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// URL of the WebDriver endpoint
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Whether to run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Extra browser command-line arguments
    #[serde(default = "default_browser_args")]
    pub browser_args: Vec<String>,

    /// Upper bound on the document readiness poll, in milliseconds
    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,

    /// Interval between readiness checks, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Extra pause after the document reports ready, in milliseconds
    #[serde(default)]
    pub settle_delay_ms: u64,

    /// Bound on navigation, readiness and capture together, in seconds
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,

    /// Bound on closing the browser session, in milliseconds
    #[serde(default = "default_session_close_timeout_ms")]
    pub session_close_timeout_ms: u64,

    /// Maximum number of characters kept in the extracted text
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,

    /// Tag names removed from the document before text extraction
    #[serde(default = "default_noise_tags")]
    pub noise_tags: Vec<String>,

    /// Local driver binary to launch for the fetch (uses `webdriver_url` if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_binary: Option<String>,

    /// Port the launched driver listens on
    #[serde(default = "default_driver_port")]
    pub driver_port: u16,

    /// How long to wait for a launched driver to accept connections, in milliseconds
    #[serde(default = "default_driver_startup_timeout_ms")]
    pub driver_startup_timeout_ms: u64,
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

/// Arguments suited to running inside a container
fn default_browser_args() -> Vec<String> {
    vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
    ]
}

fn default_ready_timeout_ms() -> u64 {
    5000
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_navigation_timeout_secs() -> u64 {
    45
}

fn default_session_close_timeout_ms() -> u64 {
    5000
}

fn default_max_text_chars() -> usize {
    2000
}

fn default_noise_tags() -> Vec<String> {
    ["script", "style", "img", "input"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

/// ChromeDriver default
fn default_driver_port() -> u16 {
    9515
}

fn default_driver_startup_timeout_ms() -> u64 {
    10_000
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            browser_args: default_browser_args(),
            ready_timeout_ms: default_ready_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            settle_delay_ms: 0,
            navigation_timeout_secs: default_navigation_timeout_secs(),
            session_close_timeout_ms: default_session_close_timeout_ms(),
            max_text_chars: default_max_text_chars(),
            noise_tags: default_noise_tags(),
            driver_binary: None,
            driver_port: default_driver_port(),
            driver_startup_timeout_ms: default_driver_startup_timeout_ms(),
        }
    }
}

impl FetchConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply `WEBDRIVER_URL` and `CHROMEDRIVER_PATH` from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using the given lookup; empty values are ignored
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(webdriver_url) = lookup(WEBDRIVER_URL_ENV).filter(|v| !v.is_empty()) {
            ::log::debug!("Using WebDriver URL from environment: {}", webdriver_url);
            self.webdriver_url = webdriver_url;
        }

        if let Some(binary) = lookup(CHROMEDRIVER_PATH_ENV).filter(|v| !v.is_empty()) {
            ::log::debug!("Using driver binary from environment: {}", binary);
            self.driver_binary = Some(binary);
        }
    }

    /// Check that the endpoint and noise tags are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.webdriver_url)?;

        if self.noise_tags.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::InvalidNoiseTags(
                "tag names must not be empty".to_string(),
            ));
        }
        if !self.noise_tags.is_empty() {
            scraper::Selector::parse(&self.noise_tags.join(", "))
                .map_err(|e| ConfigError::InvalidNoiseTags(e.to_string()))?;
        }

        Ok(())
    }

    /// Browser arguments sent with the session request
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.browser_args.len() + 1);
        if self.headless && !self.browser_args.iter().any(|a| a.starts_with("--headless")) {
            args.push("--headless".to_string());
        }
        args.extend(self.browser_args.iter().cloned());
        args
    }

    /// Endpoint the session connects to, given whether a driver is launched locally
    pub fn session_endpoint(&self) -> String {
        match self.driver_binary {
            Some(_) => format!("http://localhost:{}", self.driver_port),
            None => self.webdriver_url.clone(),
        }
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn session_close_timeout(&self) -> Duration {
        Duration::from_millis(self.session_close_timeout_ms)
    }

    pub fn driver_startup_timeout(&self) -> Duration {
        Duration::from_millis(self.driver_startup_timeout_ms)
    }
}
