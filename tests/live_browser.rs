//! Tests against a real browser. Run with a driver available:
//!
//! CHROMEDRIVER_PATH=/usr/bin/chromedriver cargo test -- --ignored

use page_fetch::{FetchConfig, FetchError, PageFetcher};
use std::fs;

/// Number of running processes whose name starts with `chrome`
fn browser_process_count() -> usize {
    let Ok(entries) = fs::read_dir("/proc") else {
        return 0;
    };

    entries
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().chars().all(|c| c.is_ascii_digit()))
        .filter_map(|e| fs::read_to_string(e.path().join("comm")).ok())
        .filter(|name| name.trim_end().starts_with("chrome"))
        .count()
}

fn live_config() -> FetchConfig {
    let mut config = FetchConfig::default();
    config.apply_env_overrides();
    config
}

#[tokio::test]
#[ignore = "requires a WebDriver and a browser"]
async fn fetches_a_real_page() {
    let fetcher = PageFetcher::from_config(live_config());
    let page = fetcher.fetch("https://example.com/").await.unwrap();

    assert_eq!(page.url, "https://example.com/");
    assert_eq!(page.title, "Example Domain");
    assert!(page.text.contains("Example Domain"));
    assert!(page.links.iter().all(|l| !l.is_empty()));
}

#[tokio::test]
#[ignore = "requires a local driver binary"]
async fn browser_processes_return_to_baseline() {
    let config = live_config();
    assert!(
        config.driver_binary.is_some(),
        "set CHROMEDRIVER_PATH so the test owns the driver process"
    );

    let baseline = browser_process_count();
    let fetcher = PageFetcher::from_config(config);

    for _ in 0..3 {
        fetcher.fetch("https://example.com/").await.unwrap();

        // Unresolvable host: navigation fails after the session is open
        let err = fetcher
            .fetch("http://does-not-exist.invalid/")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Navigation(_)));
    }

    // Give the OS a moment to reap browser children
    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    assert_eq!(browser_process_count(), baseline);
}
