use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;

/// Inclusive millisecond range for the randomized politeness delays.
#[derive(Debug, Clone, Copy)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub fn sample(self) -> Duration {
        Duration::from_millis(rand::rng().random_range(self.min_ms..=self.max_ms))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Delays {
    /// Between each scroll action on a list page.
    pub scroll: DelayRange,
    /// Before scraping a product detail page. Detail pages are the
    /// higher-risk surface for rate limiting, so this range is the largest.
    pub detail_page: DelayRange,
    /// Before loading the next list page.
    pub next_list_page: DelayRange,
}

/// CSS selectors for everything the collector extracts. Each entry is a
/// prioritized list; lookups try them in order and take the first hit.
#[derive(Debug, Clone, Copy)]
pub struct Selectors {
    pub product_container: &'static str,
    pub next_page_button: &'static [&'static str],
    pub product_name: &'static [&'static str],
    pub price: &'static [&'static str],
    pub rating: &'static [&'static str],
    pub num_reviews: &'static [&'static str],
    pub product_url: &'static [&'static str],
    /// Reserved for seller extraction; not wired into the collector yet.
    pub seller_info: &'static [&'static str],
    pub review_text: &'static str,
}

/// Explicit configuration object handed to both the collector and the
/// analyzer. `Default` reproduces the values this was tuned with.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub output_path: PathBuf,
    /// Address of an already-running chromedriver.
    pub webdriver_url: String,
    pub user_agent: &'static str,
    pub chrome_args: &'static [&'static str],
    /// Stage 1 stops once this many unique products are collected.
    pub records_goal: usize,
    /// How many collected products get a detail-page deep dive.
    pub detail_count: usize,
    /// Max wait for a product container to appear on a list page.
    pub wait_timeout: Duration,
    /// Safety cap on scroll rounds per list page, so a page that keeps
    /// loading content forever cannot stall the run.
    pub max_scroll_rounds: u32,
    pub delays: Delays,
    pub selectors: Selectors,
}

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

pub const CHROME_ARGUMENTS: &[&str] = &[
    "--headless",
    "--window-size=1920,1080",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-blink-features=AutomationControlled",
    // Handles SSL handshake issues on certain networks.
    "--ignore-certificate-errors",
];

pub const SELECTORS: Selectors = Selectors {
    product_container: "div.zg-grid-general-faceout",
    next_page_button: &["li.a-last a"],
    product_name: &["div._cDEzb_p13n-sc-css-line-clamp-3_g3dy1"],
    price: &["span._cDEzb_p13n-sc-price_3mJ9Z"],
    rating: &["span.a-icon-alt"],
    num_reviews: &["span.a-size-small"],
    product_url: &[
        // Primary, more specific selector.
        "a.a-link-normal.aok-block",
        // Fallback, more general selector.
        "a.a-link-normal",
    ],
    seller_info: &[
        "div#merchant-info",
        "div#sellerProfileTriggerId",
        "div#bylineInfo",
    ],
    review_text: r#"div[data-hook="review-collapsed"] span"#,
};

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: "https://www.amazon.com/Best-Sellers-Electronics/zgbs/electronics/"
                .to_string(),
            output_path: PathBuf::from("amazon_bestsellers.json"),
            webdriver_url: "http://localhost:9515".to_string(),
            user_agent: USER_AGENT,
            chrome_args: CHROME_ARGUMENTS,
            records_goal: 100,
            detail_count: 100,
            wait_timeout: Duration::from_secs(20),
            max_scroll_rounds: 40,
            delays: Delays {
                scroll: DelayRange { min_ms: 2200, max_ms: 4500 },
                detail_page: DelayRange { min_ms: 6000, max_ms: 12_000 },
                next_list_page: DelayRange { min_ms: 7000, max_ms: 15_000 },
            },
            selectors: SELECTORS,
        }
    }
}
