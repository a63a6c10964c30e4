pub mod driver;
pub mod webdriver;

use crate::error::FetchError;
use async_trait::async_trait;

pub use driver::ChromeDriverProcess;
pub use webdriver::WebDriverRenderer;

/// Turns a URL into fully rendered HTML
///
/// Implementations own every browser resource they acquire and must have
/// released it by the time `render` returns, whatever the outcome.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render the page at `url` and return its final HTML source
    async fn render(&self, url: &str) -> Result<String, FetchError>;
}
