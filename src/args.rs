use clap::Parser;
use page_fetch::FetchConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-fetch")]
#[command(about = "Render web pages in a headless browser and print their title, text and links")]
#[command(version)]
pub struct Args {
    /// URLs to fetch, one after another
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver endpoint (overrides config and WEBDRIVER_URL)
    #[arg(short, long)]
    pub webdriver_url: Option<String>,

    /// Driver binary to launch for each fetch (overrides config and CHROMEDRIVER_PATH)
    #[arg(short, long)]
    pub driver_binary: Option<String>,

    /// Maximum time to wait for the document to report ready, in milliseconds
    #[arg(long)]
    pub ready_timeout: Option<u64>,

    /// Maximum number of characters of page text to keep
    #[arg(long)]
    pub max_chars: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

impl Args {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_to(&self, config: &mut FetchConfig) {
        if let Some(webdriver_url) = &self.webdriver_url {
            config.webdriver_url = webdriver_url.clone();
        }
        if let Some(binary) = &self.driver_binary {
            config.driver_binary = Some(binary.clone());
        }
        if let Some(ready_timeout) = self.ready_timeout {
            config.ready_timeout_ms = ready_timeout;
        }
        if let Some(max_chars) = self.max_chars {
            config.max_text_chars = max_chars;
        }
    }
}
