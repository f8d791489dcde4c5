use anyhow::Result;
use chrono::Utc;

use bestseller_scraper::{analyzer, archiver, config::Config};

fn main() -> Result<()> {
    let cfg = Config::default();
    let records = archiver::load_records(&cfg.output_path)?;
    println!(
        "Analyzing {} records from {} ({})",
        records.len(),
        cfg.output_path.display(),
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    );
    analyzer::print_report(&records)
}
