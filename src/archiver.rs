use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::ProductRecord;

pub fn save_records(records: &[ProductRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).with_context(|| format!("writing archive {}", path.display()))?;
    Ok(())
}

pub fn load_records(path: &Path) -> Result<Vec<ProductRecord>> {
    let json =
        fs::read_to_string(path).with_context(|| format!("reading archive {}", path.display()))?;
    let records = serde_json::from_str(&json)
        .with_context(|| format!("parsing archive {}", path.display()))?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_preserves_every_field() {
        let records = vec![
            ProductRecord {
                product_url: "https://x/p/1".to_string(),
                product_name: "AirTag".to_string(),
                price: "$24.99".to_string(),
                rating: "4.7".to_string(),
                num_reviews: "9,001".to_string(),
                reviews: Some(vec!["love it".to_string()]),
            },
            ProductRecord {
                product_url: "https://x/p/2".to_string(),
                product_name: "N/A".to_string(),
                price: "N/A".to_string(),
                rating: "N/A".to_string(),
                num_reviews: "0".to_string(),
                reviews: None,
            },
        ];
        let path = std::env::temp_dir().join(format!("archive_rt_{}.json", std::process::id()));
        save_records(&records, &path).unwrap();
        let back = load_records(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(back, records);
    }
}
