use std::collections::HashSet;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use regex::Regex;

use crate::lexicon::{
    CATEGORY_KEYWORDS, CUSTOM_STOPWORDS, ENGLISH_STOPWORDS, NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS,
};
use crate::models::ProductRecord;

/// Numeric view of a [`ProductRecord`], derived once per analysis run and
/// never written back to the archive.
#[derive(Debug, Clone)]
pub struct AnalyzedProduct {
    pub name: String,
    /// None when the raw price failed to coerce (e.g. the "N/A" sentinel).
    pub price: Option<f64>,
    pub rating: f64,
    pub num_reviews: u64,
    pub category: &'static str,
    pub sentiment: i64,
}

/// Coerces one record. Price failures degrade to None; rating and review
/// count failures propagate.
pub fn derive(record: &ProductRecord) -> Result<AnalyzedProduct> {
    let rating: f64 = record
        .rating
        .parse()
        .with_context(|| format!("parsing rating {:?} of {:?}", record.rating, record.product_name))?;
    let num_reviews = parse_count(&record.num_reviews).with_context(|| {
        format!("parsing review count {:?} of {:?}", record.num_reviews, record.product_name)
    })?;
    Ok(AnalyzedProduct {
        name: record.product_name.clone(),
        price: parse_price(&record.price),
        rating,
        num_reviews,
        category: categorize(&record.product_name),
        sentiment: sentiment_score(record.reviews.as_deref().unwrap_or(&[])),
    })
}

pub fn derive_all(records: &[ProductRecord]) -> Result<Vec<AnalyzedProduct>> {
    records.iter().map(derive).collect()
}

/// Strips the currency symbol and thousands separators, then parses.
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.replace(['$', ','], "").trim().parse().ok()
}

fn parse_count(raw: &str) -> Result<u64> {
    Ok(raw.replace(',', "").trim().parse()?)
}

/// First category whose any keyword appears in the lower-cased name wins;
/// the table order in [`CATEGORY_KEYWORDS`] is part of the contract.
pub fn categorize(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return category;
        }
    }
    "Other"
}

/// Additive bag-of-keywords score over all of a product's reviews: positive
/// keyword occurrences minus negative ones. Matching is substring-based, so
/// a keyword inside a longer token still counts.
pub fn sentiment_score(reviews: &[String]) -> i64 {
    reviews
        .iter()
        .map(|review| {
            let lower = review.to_lowercase();
            let pos: i64 = POSITIVE_KEYWORDS.iter().map(|kw| count_occurrences(&lower, kw)).sum();
            let neg: i64 = NEGATIVE_KEYWORDS.iter().map(|kw| count_occurrences(&lower, kw)).sum();
            pos - neg
        })
        .sum()
}

/// Non-overlapping substring occurrence count.
fn count_occurrences(haystack: &str, needle: &str) -> i64 {
    let mut total = 0;
    let mut rest = haystack;
    while let Some(pos) = rest.find(needle) {
        total += 1;
        rest = &rest[pos + needle.len()..];
    }
    total
}

/// Flattens every review, tokenizes on word boundaries, drops stopwords and
/// short tokens, and returns (word, count) pairs sorted by count descending.
/// Ties keep first-encountered order.
pub fn word_frequencies(records: &[ProductRecord]) -> Vec<(String, usize)> {
    let stopwords: HashSet<&str> = ENGLISH_STOPWORDS
        .iter()
        .chain(CUSTOM_STOPWORDS.iter())
        .copied()
        .collect();
    let full_text = records
        .iter()
        .filter_map(|r| r.reviews.as_deref())
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let word_re = Regex::new(r"\b\w+\b").expect("tokenizer regex is valid");
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for token in word_re.find_iter(&full_text) {
        let word = token.as_str();
        if word.chars().count() <= 2 || stopwords.contains(word) {
            continue;
        }
        *counts.entry(word.to_string()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

pub fn top_by_rating(products: &[AnalyzedProduct], n: usize) -> Vec<&AnalyzedProduct> {
    let mut ranked: Vec<&AnalyzedProduct> = products.iter().collect();
    ranked.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    ranked.truncate(n);
    ranked
}

pub fn top_by_reviews(products: &[AnalyzedProduct], n: usize) -> Vec<&AnalyzedProduct> {
    let mut ranked: Vec<&AnalyzedProduct> = products.iter().collect();
    ranked.sort_by(|a, b| b.num_reviews.cmp(&a.num_reviews));
    ranked.truncate(n);
    ranked
}

/// Highest sentiment first when `descending`, lowest first otherwise.
pub fn rank_by_sentiment(products: &[AnalyzedProduct], n: usize, descending: bool) -> Vec<&AnalyzedProduct> {
    let mut ranked: Vec<&AnalyzedProduct> = products.iter().collect();
    if descending {
        ranked.sort_by(|a, b| b.sentiment.cmp(&a.sentiment));
    } else {
        ranked.sort_by(|a, b| a.sentiment.cmp(&b.sentiment));
    }
    ranked.truncate(n);
    ranked
}

/// Category occurrence counts, most common first. Ties keep the order
/// categories were first seen in.
pub fn category_distribution(products: &[AnalyzedProduct]) -> Vec<(&'static str, usize)> {
    let mut counts: IndexMap<&'static str, usize> = IndexMap::new();
    for p in products {
        *counts.entry(p.category).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&'static str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Total review counts summed per category, largest first.
pub fn reviews_by_category(products: &[AnalyzedProduct]) -> Vec<(&'static str, u64)> {
    let mut sums: IndexMap<&'static str, u64> = IndexMap::new();
    for p in products {
        *sums.entry(p.category).or_insert(0) += p.num_reviews;
    }
    let mut ranked: Vec<(&'static str, u64)> = sums.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; None below two observations.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

pub fn describe(values: &[f64]) -> Option<ColumnStats> {
    if values.is_empty() {
        return None;
    }
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        Some(var.sqrt())
    } else {
        None
    };
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(ColumnStats {
        count,
        mean,
        std,
        min: sorted[0],
        q25: percentile(&sorted, 0.25),
        median: percentile(&sorted, 0.5),
        q75: percentile(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

/// Linearly interpolated percentile over an already-sorted slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn print_stats_row(label: &str, stats: Option<ColumnStats>) {
    match stats {
        Some(s) => {
            let std = s.std.map_or("-".to_string(), |v| format!("{v:.2}"));
            println!(
                "{label:<14} count={:<5} mean={:<12.2} std={std:<12} min={:<10.2} \
                 25%={:<10.2} 50%={:<10.2} 75%={:<10.2} max={:.2}",
                s.count, s.mean, s.min, s.q25, s.median, s.q75, s.max
            );
        }
        None => println!("{label:<14} (no values)"),
    }
}

/// Console report over a loaded archive: overview, descriptive statistics,
/// rankings, category distribution, review word frequencies, and sentiment
/// extremes. Mirrors the aggregations the chart sinks consume.
pub fn print_report(records: &[ProductRecord]) -> Result<()> {
    let products = derive_all(records)?;

    println!("--- Data Overview ---");
    for p in products.iter().take(5) {
        println!(
            "{:<45.45} price={:<10} rating={:<5} reviews={}",
            p.name,
            p.price.map_or("N/A".to_string(), |v| format!("${v:.2}")),
            p.rating,
            p.num_reviews
        );
    }

    println!("\n--- Basic Statistics for Numeric Columns ---");
    let prices: Vec<f64> = products.iter().filter_map(|p| p.price).collect();
    let ratings: Vec<f64> = products.iter().map(|p| p.rating).collect();
    let review_counts: Vec<f64> = products.iter().map(|p| p.num_reviews as f64).collect();
    print_stats_row("price", describe(&prices));
    print_stats_row("rating", describe(&ratings));
    print_stats_row("num_reviews", describe(&review_counts));

    println!("\n--- Top 5 Highest Rated Products (by average rating) ---");
    for p in top_by_rating(&products, 5) {
        println!("{:<45.45} rating={:<5} reviews={}", p.name, p.rating, p.num_reviews);
    }

    println!("\n--- Top 5 Most Reviewed Products ---");
    for p in top_by_reviews(&products, 5) {
        println!("{:<45.45} reviews={:<9} rating={}", p.name, p.num_reviews, p.rating);
    }

    println!("\n--- Product Categories Distribution ---");
    for (category, count) in category_distribution(&products) {
        println!("{category:<22} {count}");
    }

    println!("\n--- Total Reviews by Product Category ---");
    for (category, total) in reviews_by_category(&products) {
        println!("{category:<22} {total}");
    }

    println!("\n--- Top 20 Most Common Words in Reviews (excluding stopwords) ---");
    for (word, count) in word_frequencies(records).into_iter().take(20) {
        println!("{word}: {count}");
    }

    println!("\n--- Products with Highest Positive Sentiment (Top 5) ---");
    for p in rank_by_sentiment(&products, 5, true) {
        println!(
            "{:<45.45} rating={:<5} reviews={:<9} sentiment={}",
            p.name, p.rating, p.num_reviews, p.sentiment
        );
    }

    println!("\n--- Products with Lowest Sentiment (Top 5) ---");
    for p in rank_by_sentiment(&products, 5, false) {
        println!(
            "{:<45.45} rating={:<5} reviews={:<9} sentiment={}",
            p.name, p.rating, p.num_reviews, p.sentiment
        );
    }

    Ok(())
}
