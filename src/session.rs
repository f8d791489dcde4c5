use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde_json::json;
use thirtyfour::extensions::cdp::ChromeDevTools;
use thirtyfour::prelude::*;
use tokio::time::sleep;

use crate::config::Config;

/// Script injected on every new document so bot-detection checks that read
/// `navigator.webdriver` see `undefined`.
const STEALTH_SCRIPT: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})";

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Launches the browser session. Any failure here (chromedriver not
/// reachable, browser won't start) is fatal to the run.
pub async fn launch(cfg: &Config) -> Result<WebDriver> {
    println!("Setting up Chrome WebDriver...");
    let mut caps = DesiredCapabilities::chrome();
    caps.add_arg(&format!("user-agent={}", cfg.user_agent))?;
    for arg in cfg.chrome_args {
        caps.add_arg(arg)?;
    }
    caps.add_experimental_option("excludeSwitches", ["enable-automation"])?;
    caps.add_experimental_option("useAutomationExtension", false)?;

    let driver = WebDriver::new(cfg.webdriver_url.as_str(), caps)
        .await
        .with_context(|| format!("connecting to chromedriver at {}", cfg.webdriver_url))?;

    let dev_tools = ChromeDevTools::new(driver.handle.clone());
    dev_tools
        .execute_cdp_with_params(
            "Page.addScriptToEvaluateOnNewDocument",
            json!({ "source": STEALTH_SCRIPT }),
        )
        .await
        .context("injecting navigator.webdriver stealth script")?;

    Ok(driver)
}

/// Polls until at least one element matches `selector`, bounded by
/// `timeout`. Returns false on timeout; intermittent lookup errors are
/// treated the same as "not there yet".
pub async fn wait_for_selector(driver: &WebDriver, selector: &str, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        match driver.find_all(By::Css(selector)).await {
            Ok(elements) if !elements.is_empty() => return true,
            _ => sleep(POLL_INTERVAL).await,
        }
    }
    false
}
