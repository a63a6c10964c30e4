use clap::Parser;
use page_fetch::{FetchConfig, PageContent, PageFetcher};
use std::error::Error;
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if config.driver_binary.is_none() {
        ::log::info!("Using WebDriver at {}", config.webdriver_url);
    }

    let fetcher = PageFetcher::from_config(config);

    let mut fetched = 0;
    let start_time = std::time::Instant::now();

    // Failures are logged and skipped so one bad URL does not end the run
    for url in &args.urls {
        match fetcher.fetch(url).await {
            Ok(page) => match render_output(&page, args.pretty) {
                Ok(json) => {
                    println!("{}", json);
                    fetched += 1;
                }
                Err(e) => ::log::error!("Failed to serialize {}: {}", url, e),
            },
            Err(e) => ::log::error!("Failed to fetch {}: {}", url, e),
        }
    }

    ::log::info!(
        "Fetched {} of {} pages in {:.2} seconds",
        fetched,
        args.urls.len(),
        start_time.elapsed().as_secs_f64()
    );

    if fetched == 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Config file (or defaults), then environment, then command line
fn load_config(args: &Args) -> Result<FetchConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => FetchConfig::from_file(path)?,
        None => FetchConfig::default(),
    };
    config.apply_env_overrides();
    args.apply_to(&mut config);
    config.validate()?;
    Ok(config)
}

fn render_output(page: &PageContent, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(page)
    } else {
        serde_json::to_string(page)
    }
}
