// ============================================================
// Layer 3 — Product Card Figures
// ============================================================
// Numbers shown next to the product: how much cheaper the offer
// is than the list price, what share of reviews is positive and
// how many stars to draw. All derived from a ProductRecord.

use serde::Serialize;

use crate::domain::product::ProductRecord;

/// Histogram buckets counted as positive (5, 4 and 3 stars)
const POSITIVE_BUCKETS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    /// Name up to the first "("
    pub title: String,
    /// The parenthesised remainder of the name, if any
    pub subtitle: Option<String>,
    pub offer_price: Option<f64>,
    pub list_price: Option<f64>,
    /// Percent saved against the list price, one decimal
    pub discount_percent: Option<f64>,
    /// Percent of 3-star-or-better reviews
    pub positive_share: Option<f32>,
    pub negative_share: Option<f32>,
    pub stars: Option<u8>,
    pub image: Option<String>,
}

impl ProductSummary {
    pub fn from_record(record: &ProductRecord) -> Self {
        let (title, subtitle) = split_title(record.name.as_deref().unwrap_or_default());

        let offer_price = record.discount_price.as_deref().and_then(price_amount);
        let list_price  = record.actual_price.as_deref().and_then(price_amount);
        let discount_percent = match (list_price, offer_price) {
            (Some(list), Some(offer)) => discount_percent(list, offer),
            _ => None,
        };

        let positive_share = if record.histogram.is_empty() {
            None
        } else {
            Some(record.histogram.iter().take(POSITIVE_BUCKETS).sum::<f32>())
        };

        Self {
            title,
            subtitle,
            offer_price,
            list_price,
            discount_percent,
            positive_share,
            negative_share: positive_share.map(|up| 100.0 - up),
            stars: record.rating.map(star_count),
            image: record.images.first().cloned(),
        }
    }
}

fn split_title(name: &str) -> (String, Option<String>) {
    match name.split_once('(') {
        Some((head, rest)) => (head.trim().to_string(), Some(format!("({rest}"))),
        None => (name.trim().to_string(), None),
    }
}

/// Numeric amount of a price string such as "₹1,299.00".
/// Only the digits before the decimal point count.
pub fn price_amount(price: &str) -> Option<f64> {
    let whole = price.split('.').next().unwrap_or_default();
    let digits: String = whole.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Percent saved, rounded to one decimal. None for a zero list price.
pub fn discount_percent(list: f64, offer: f64) -> Option<f64> {
    if list <= 0.0 {
        return None;
    }
    Some(((list - offer) * 100.0 / list * 10.0).round() / 10.0)
}

/// Stars to draw for an average rating.
///
/// Buckets are half-open around each whole star; anything at or
/// above 4.5, and anything below 0.5, draws five.
pub fn star_count(rating: f32) -> u8 {
    match rating {
        r if (0.5..1.5).contains(&r) => 1,
        r if (1.5..2.5).contains(&r) => 2,
        r if (2.5..3.5).contains(&r) => 3,
        r if (3.5..4.5).contains(&r) => 4,
        _ => 5,
    }
}
