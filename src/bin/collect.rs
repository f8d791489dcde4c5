use anyhow::Result;

use bestseller_scraper::{archiver, collector, config::Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::default();
    let mut products = Vec::new();
    let outcome = collector::run(&cfg, &mut products).await;

    // Partial results are worth keeping even when a stage failed.
    if products.is_empty() {
        println!("\nScraping failed to produce any data.");
    } else {
        archiver::save_records(&products, &cfg.output_path)?;
        println!(
            "\nSuccess! Saved {} records to {}",
            products.len(),
            cfg.output_path.display()
        );
    }
    outcome
}
