use std::time::Duration;
use thiserror::Error;

/// Error returned by a page fetch
///
/// Each variant is a distinct failure class so batch callers can log and
/// skip a URL without aborting the whole run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Browser session or driver process could not be started
    #[error(transparent)]
    Launch(#[from] LaunchError),

    /// Target page could not be reached, rendered or captured
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// Captured HTML could not be turned into a content record
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Configuration was rejected before any browser work started
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to open browser session at {endpoint}: {source}")]
    Session {
        endpoint: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    #[error("failed to spawn driver binary {binary}: {source}")]
    DriverSpawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("port {port} is already in use, refusing to launch driver {binary}")]
    PortInUse { binary: String, port: u16 },

    #[error("driver {binary} did not accept connections on port {port} within {waited:?}")]
    DriverNotReady {
        binary: String,
        port: u16,
        waited: Duration,
    },

    #[error("failed to build async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("failed to navigate to {url}: {source}")]
    Goto {
        url: String,
        #[source]
        source: fantoccini::error::CmdError,
    },

    #[error("failed to capture page source for {url}: {source}")]
    Capture {
        url: String,
        #[source]
        source: fantoccini::error::CmdError,
    },

    #[error("timed out after {after:?} loading {url}")]
    Timeout { url: String, after: Duration },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("document has no <body> element")]
    MissingBody,

    #[error("invalid noise selector: {0}")]
    Selector(String),
}

/// Error raised while loading or validating a [`crate::config::FetchConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid webdriver url: {0}")]
    InvalidWebDriverUrl(#[from] url::ParseError),

    #[error("invalid noise tags: {0}")]
    InvalidNoiseTags(String),
}

impl FetchError {
    /// The URL the failure relates to, when one is known
    pub fn url(&self) -> Option<&str> {
        match self {
            FetchError::Navigation(NavigationError::Goto { url, .. })
            | FetchError::Navigation(NavigationError::Capture { url, .. })
            | FetchError::Navigation(NavigationError::Timeout { url, .. }) => Some(url),
            _ => None,
        }
    }
}
