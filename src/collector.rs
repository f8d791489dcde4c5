use std::future::Future;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use scraper::{Html, Selector};
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use tokio::time::sleep;

use crate::config::Config;
use crate::models::ProductRecord;
use crate::session;

/// Reviews scraped per detail page.
const MAX_REVIEWS: usize = 10;

const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Runs both scraping stages against a fresh browser session. Collected
/// records accumulate in `products` so the caller can persist partial
/// results even when a stage fails; the session is quit exactly once on
/// every path.
pub async fn run(cfg: &Config, products: &mut Vec<ProductRecord>) -> Result<()> {
    let driver = session::launch(cfg).await?;
    let staged = run_stages(&driver, cfg, products).await;
    let quit = driver.quit().await;
    staged?;
    quit.context("closing browser session")?;
    Ok(())
}

async fn run_stages(
    driver: &WebDriver,
    cfg: &Config,
    products: &mut Vec<ProductRecord>,
) -> Result<()> {
    collect_listings(driver, cfg, products).await?;
    println!(
        "\n--- STAGE 1 COMPLETE: Collected {} unique products. ---",
        products.len()
    );
    enrich_details(driver, cfg, products).await?;
    println!("\n--- Scraping process finished. ---");
    Ok(())
}

/// Stage 1: walk the paginated listing until the record goal is met or the
/// site runs out of pages. A wait timeout on any page saves a diagnostic
/// screenshot and ends the stage early, keeping what was collected.
pub async fn collect_listings(
    driver: &WebDriver,
    cfg: &Config,
    products: &mut Vec<ProductRecord>,
) -> Result<()> {
    println!(
        "--- STAGE 1: Scraping list pages until {} products are collected ---",
        cfg.records_goal
    );
    let mut next_url = Some(cfg.base_url.clone());

    while products.len() < cfg.records_goal {
        let Some(url) = next_url.take() else { break };
        println!("\nNavigating to list page: {url}");
        driver
            .goto(url.as_str())
            .await
            .with_context(|| format!("navigating to {url}"))?;

        let container_sel = cfg.selectors.product_container;
        if !session::wait_for_selector(driver, container_sel, cfg.wait_timeout).await {
            let shot = format!("debug_{}.png", Utc::now().format("%Y%m%dT%H%M%S"));
            match driver.screenshot(Path::new(&shot)).await {
                Ok(()) => eprintln!(
                    "Timed out on page: {url}. View {shot} for an idea of what went wrong!"
                ),
                Err(e) => eprintln!("Timed out on page: {url} (screenshot failed: {e})"),
            }
            break;
        }

        scroll_to_load_all(driver, cfg).await?;

        let containers = driver.find_all(By::Css(container_sel)).await?;
        for container in &containers {
            if products.len() >= cfg.records_goal {
                break;
            }
            let product_url = match find_in_element(container, cfg.selectors.product_url).await {
                Some(el) => el.attr("href").await.ok().flatten(),
                None => None,
            };
            try_admit(products, product_url, cfg.records_goal, move || async move {
                ScrapedFields {
                    name: probe_text(container, cfg.selectors.product_name).await,
                    price: probe_text(container, cfg.selectors.price).await,
                    rating_text: probe_inner_html(container, cfg.selectors.rating).await,
                    num_reviews: probe_text(container, cfg.selectors.num_reviews).await,
                }
            })
            .await;
        }

        if products.len() >= cfg.records_goal {
            break;
        }

        next_url = match find_on_page(driver, cfg.selectors.next_page_button).await {
            Some(el) => el.attr("href").await?,
            None => None,
        };
        match &next_url {
            Some(_) => sleep(cfg.delays.next_list_page.sample()).await,
            None => println!("No more 'Next Page' buttons found. Ending list scrape."),
        }
    }
    Ok(())
}

/// Raw per-field probe results for one container, before sentinel defaults.
pub(crate) struct ScrapedFields {
    pub name: Option<String>,
    pub price: Option<String>,
    pub rating_text: Option<String>,
    pub num_reviews: Option<String>,
}

/// The stage-1 admission step for one probed container: containers without a
/// resolvable URL are skipped, already-collected URLs collapse, and nothing
/// is added once the record goal is met. The remaining fields are only
/// probed for containers that pass those gates. Returns whether a record was
/// added.
pub(crate) async fn try_admit<F, Fut>(
    products: &mut Vec<ProductRecord>,
    url: Option<String>,
    goal: usize,
    probe_fields: F,
) -> bool
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ScrapedFields>,
{
    if products.len() >= goal {
        return false;
    }
    let Some(url) = url else {
        return false;
    };
    if products.iter().any(|p| p.product_url == url) {
        return false;
    }
    let fields = probe_fields().await;
    products.push(ProductRecord::from_scrape(
        url,
        fields.name,
        fields.price,
        fields.rating_text,
        fields.num_reviews,
    ));
    true
}

/// The first `count` records that have a usable URL, with their positions.
pub(crate) fn detail_targets(
    products: &mut [ProductRecord],
    count: usize,
) -> impl Iterator<Item = (usize, &mut ProductRecord)> {
    products
        .iter_mut()
        .take(count)
        .enumerate()
        .filter(|(_, p)| has_detail_url(p))
}

/// Stage 2: visit the first `detail_count` products with a usable URL and
/// attach up to [`MAX_REVIEWS`] review texts to each.
pub async fn enrich_details(
    driver: &WebDriver,
    cfg: &Config,
    products: &mut [ProductRecord],
) -> Result<()> {
    println!(
        "\n--- STAGE 2: Scraping reviews for top {} products ---",
        cfg.detail_count
    );
    for (i, product) in detail_targets(products, cfg.detail_count) {
        println!(
            "Scraping reviews for product {}/{}: {:.30}...",
            i + 1,
            cfg.detail_count,
            product.product_name
        );
        driver
            .goto(product.product_url.as_str())
            .await
            .with_context(|| format!("navigating to {}", product.product_url))?;
        sleep(cfg.delays.detail_page.sample()).await;
        let html = driver.source().await?;
        product.reviews = Some(extract_reviews(&html, cfg.selectors.review_text, MAX_REVIEWS));
    }
    Ok(())
}

pub(crate) fn has_detail_url(product: &ProductRecord) -> bool {
    !product.product_url.is_empty() && product.product_url != "N/A"
}

/// Pulls review texts out of a detail-page snapshot. The first `limit`
/// matching elements are considered; empty ones are dropped.
pub fn extract_reviews(html: &str, selector: &str, limit: usize) -> Vec<String> {
    let doc = Html::parse_document(html);
    let Ok(sel) = Selector::parse(selector) else {
        return Vec::new();
    };
    doc.select(&sel)
        .take(limit)
        .filter_map(|el| {
            let text = el.text().collect::<Vec<_>>().join(" ");
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            (!text.is_empty()).then_some(text)
        })
        .collect()
}

/// Scrolls to the bottom of the page until the container count stops
/// growing, forcing lazy-loaded content to materialize.
async fn scroll_to_load_all(driver: &WebDriver, cfg: &Config) -> Result<()> {
    println!("...scrolling to load all dynamic content...");
    let selector = cfg.selectors.product_container;
    let scroll_delay = cfg.delays.scroll;
    let outcome = settle_element_count(
        cfg.max_scroll_rounds,
        move || async move {
            let els = driver.find_all(By::Css(selector)).await?;
            Ok::<usize, WebDriverError>(els.len())
        },
        move || async move {
            driver.execute(SCROLL_SCRIPT, Vec::new()).await?;
            let delay = scroll_delay.sample();
            sleep(delay).await;
            Ok::<(), WebDriverError>(())
        },
    )
    .await?;
    match outcome {
        Settled::Stable(n) => println!("   ...finished scrolling ({n} containers)."),
        Settled::CapReached(n) => eprintln!(
            "Scroll round cap hit with {n} containers still loading; continuing with what's on the page."
        ),
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Settled {
    /// One scroll produced no new elements.
    Stable(usize),
    /// The safety cap fired before the count stabilized.
    CapReached(usize),
}

/// Repeats scroll-then-count until one observation shows no growth, bounded
/// by `max_rounds` so an endlessly-loading page cannot stall the run.
pub(crate) async fn settle_element_count<E, C, CF, S, SF>(
    max_rounds: u32,
    count: C,
    scroll_and_wait: S,
) -> Result<Settled, E>
where
    C: Fn() -> CF,
    CF: Future<Output = Result<usize, E>>,
    S: Fn() -> SF,
    SF: Future<Output = Result<(), E>>,
{
    let mut last = count().await?;
    for _ in 0..max_rounds {
        scroll_and_wait().await?;
        let now = count().await?;
        if now == last {
            return Ok(Settled::Stable(now));
        }
        last = now;
    }
    Ok(Settled::CapReached(last))
}

/// Tries each selector in order and returns the first successful probe.
pub(crate) async fn find_with_fallback<T, E, F, Fut>(selectors: &[&str], probe: F) -> Option<T>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    for selector in selectors {
        if let Ok(found) = probe((*selector).to_string()).await {
            return Some(found);
        }
    }
    None
}

async fn find_in_element(el: &WebElement, selectors: &[&str]) -> Option<WebElement> {
    find_with_fallback(selectors, move |s| el.find(By::Css(s))).await
}

async fn find_on_page(driver: &WebDriver, selectors: &[&str]) -> Option<WebElement> {
    find_with_fallback(selectors, move |s| driver.find(By::Css(s))).await
}

async fn probe_text(el: &WebElement, selectors: &[&str]) -> Option<String> {
    match find_in_element(el, selectors).await {
        Some(found) => found.text().await.ok(),
        None => None,
    }
}

async fn probe_inner_html(el: &WebElement, selectors: &[&str]) -> Option<String> {
    match find_in_element(el, selectors).await {
        Some(found) => found.inner_html().await.ok(),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[tokio::test]
    async fn fallback_returns_first_successful_probe() {
        let hit = find_with_fallback(&["sel-a", "sel-b"], |s| async move {
            if s == "sel-b" { Ok(format!("hit:{s}")) } else { Err(()) }
        })
        .await;
        assert_eq!(hit, Some("hit:sel-b".to_string()));

        let first = find_with_fallback(&["sel-a", "sel-b"], |s| async move {
            Ok::<_, ()>(format!("hit:{s}"))
        })
        .await;
        assert_eq!(first, Some("hit:sel-a".to_string()));

        let miss =
            find_with_fallback(&["sel-a", "sel-b"], |_s| async move { Err::<String, ()>(()) })
                .await;
        assert_eq!(miss, None);
    }

    #[tokio::test]
    async fn scrolling_stops_after_one_stable_observation() {
        let counts = RefCell::new(vec![5usize, 5]);
        let scrolls = Cell::new(0u32);
        let counts_ref = &counts;
        let scrolls_ref = &scrolls;
        let outcome = settle_element_count(
            10,
            move || async move { Ok::<usize, ()>(counts_ref.borrow_mut().remove(0)) },
            move || async move {
                scrolls_ref.set(scrolls_ref.get() + 1);
                Ok::<(), ()>(())
            },
        )
        .await
        .unwrap();
        assert_eq!(outcome, Settled::Stable(5));
        assert_eq!(scrolls.get(), 1);
    }

    #[tokio::test]
    async fn scrolling_respects_the_round_cap() {
        let next = Cell::new(0usize);
        let scrolls = Cell::new(0u32);
        let next_ref = &next;
        let scrolls_ref = &scrolls;
        let outcome = settle_element_count(
            3,
            move || async move {
                next_ref.set(next_ref.get() + 1);
                Ok::<usize, ()>(next_ref.get())
            },
            move || async move {
                scrolls_ref.set(scrolls_ref.get() + 1);
                Ok::<(), ()>(())
            },
        )
        .await
        .unwrap();
        assert_eq!(outcome, Settled::CapReached(4));
        assert_eq!(scrolls.get(), 3);
    }

    fn fields(name: &str) -> ScrapedFields {
        ScrapedFields {
            name: Some(name.to_string()),
            price: None,
            rating_text: None,
            num_reviews: None,
        }
    }

    #[tokio::test]
    async fn containers_without_urls_are_skipped_and_duplicates_collapse() {
        let scrapes: Vec<(Option<&str>, &str)> = vec![
            (Some("https://x/p/1"), "Echo Dot"),
            (None, "Ghost Product"),
            (Some("https://x/p/2"), "Kindle"),
            (Some("https://x/p/1"), "Echo Dot again"),
        ];
        let mut products: Vec<ProductRecord> = Vec::new();
        let mut admitted = Vec::new();
        for (url, name) in scrapes {
            let added = try_admit(&mut products, url.map(str::to_string), 10, move || async move {
                fields(name)
            })
            .await;
            admitted.push(added);
        }
        assert_eq!(admitted, vec![true, false, true, false]);
        assert_eq!(products.len(), 2);
        let urls: Vec<_> = products.iter().map(|p| p.product_url.as_str()).collect();
        assert_eq!(urls, vec!["https://x/p/1", "https://x/p/2"]);
        // The duplicate never overwrote the first record's fields.
        assert_eq!(products[0].product_name, "Echo Dot");
    }

    #[tokio::test]
    async fn admission_stops_at_the_record_goal() {
        let mut products = Vec::new();
        assert!(
            try_admit(&mut products, Some("https://x/p/1".to_string()), 1, || async {
                fields("First")
            })
            .await
        );
        // Goal already met; a fresh URL must not be added.
        assert!(
            !try_admit(&mut products, Some("https://x/p/2".to_string()), 1, || async {
                fields("Second")
            })
            .await
        );
        assert_eq!(products.len(), 1);
    }

    #[tokio::test]
    async fn skipped_containers_never_probe_their_fields() {
        let mut products =
            vec![ProductRecord::from_scrape("https://x/p/1".to_string(), None, None, None, None)];
        try_admit(&mut products, Some("https://x/p/1".to_string()), 10, || async {
            panic!("fields probed for a duplicate URL")
        })
        .await;
        try_admit(&mut products, None, 10, || async {
            panic!("fields probed for a container without a URL")
        })
        .await;
        assert_eq!(products.len(), 1);
    }

    #[test]
    fn only_records_with_usable_urls_are_detail_targets() {
        let mut products = vec![
            ProductRecord::from_scrape("N/A".to_string(), None, None, None, None),
            ProductRecord::from_scrape("https://x/p/2".to_string(), None, None, None, None),
            ProductRecord::from_scrape("https://x/p/3".to_string(), None, None, None, None),
        ];
        // Enrichment requested for the first two records only.
        for (i, product) in detail_targets(&mut products, 2) {
            product.reviews = Some(vec![format!("solid #{i}")]);
        }
        assert!(products[0].reviews.is_none());
        assert_eq!(products[1].reviews.as_deref(), Some(&["solid #1".to_string()][..]));
        // Past the requested count, even usable URLs stay untouched.
        assert!(products[2].reviews.is_none());
    }

    #[test]
    fn review_extraction_takes_first_elements_then_drops_empties() {
        let html = r#"
            <html><body>
              <div data-hook="review-collapsed"><span>Great sound quality</span></div>
              <div data-hook="review-collapsed"><span>   </span></div>
              <div data-hook="review-collapsed"><span>Battery   lasts all
                day</span></div>
              <div data-hook="review-collapsed"><span>Never considered</span></div>
            </body></html>
        "#;
        let reviews = extract_reviews(html, r#"div[data-hook="review-collapsed"] span"#, 3);
        assert_eq!(
            reviews,
            vec!["Great sound quality".to_string(), "Battery lasts all day".to_string()]
        );
    }

    #[test]
    fn missing_review_elements_yield_an_empty_list() {
        let reviews = extract_reviews(
            "<html><body><p>no reviews here</p></body></html>",
            r#"div[data-hook="review-collapsed"] span"#,
            MAX_REVIEWS,
        );
        assert!(reviews.is_empty());
    }
}
