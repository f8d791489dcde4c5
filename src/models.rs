use serde::{Deserialize, Serialize};

/// One collected product. The serde field names are the archive contract
/// shared with the analyzer; `reviews` only exists on records that went
/// through the detail-page stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_url: String,
    pub product_name: String,
    pub price: String,
    pub rating: String,
    pub num_reviews: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<String>>,
}

impl ProductRecord {
    /// Builds a record from raw per-field probe results, substituting the
    /// sentinel defaults where a probe came up empty. The rating is the
    /// token before the first space of the raw value ("4.5 out of 5 stars"
    /// becomes "4.5").
    pub fn from_scrape(
        url: String,
        name: Option<String>,
        price: Option<String>,
        rating_text: Option<String>,
        num_reviews: Option<String>,
    ) -> Self {
        ProductRecord {
            product_url: url,
            product_name: name.unwrap_or_else(|| "N/A".to_string()),
            price: price.unwrap_or_else(|| "N/A".to_string()),
            rating: rating_text
                .and_then(|t| t.split(' ').next().map(str::to_string))
                .unwrap_or_else(|| "N/A".to_string()),
            num_reviews: num_reviews.unwrap_or_else(|| "0".to_string()),
            reviews: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_scrape_applies_sentinels() {
        let rec = ProductRecord::from_scrape("https://x/p/1".to_string(), None, None, None, None);
        assert_eq!(rec.product_name, "N/A");
        assert_eq!(rec.price, "N/A");
        assert_eq!(rec.rating, "N/A");
        assert_eq!(rec.num_reviews, "0");
        assert!(rec.reviews.is_none());
    }

    #[test]
    fn from_scrape_takes_rating_token_before_space() {
        let rec = ProductRecord::from_scrape(
            "https://x/p/2".to_string(),
            Some("Echo Dot".to_string()),
            Some("$49.99".to_string()),
            Some("4.5 out of 5 stars".to_string()),
            Some("12,345".to_string()),
        );
        assert_eq!(rec.rating, "4.5");
        assert_eq!(rec.num_reviews, "12,345");
    }

    #[test]
    fn round_trips_through_json() {
        let records = vec![
            ProductRecord {
                product_url: "https://x/p/1".to_string(),
                product_name: "Fire TV Stick".to_string(),
                price: "$39.99".to_string(),
                rating: "4.7".to_string(),
                num_reviews: "301,112".to_string(),
                reviews: Some(vec!["Works great".to_string(), "Easy setup".to_string()]),
            },
            ProductRecord::from_scrape("https://x/p/2".to_string(), None, None, None, None),
        ];
        let json = serde_json::to_string_pretty(&records).unwrap();
        let back: Vec<ProductRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, records);
        // Records that never saw stage 2 must not serialize a reviews field.
        assert_eq!(json.matches("\"reviews\"").count(), 1);
    }
}
